//! # Orchestrator Module
//!
//! The [`ServiceOrchestrator`] is the single entry point for every operation
//! that changes generated artifacts. It parses input locally, then hands the
//! normalized arguments to the external codegen or build tool. All file
//! mutation happens in those tools; the orchestrator only decides what to
//! ask for and classifies the result by exit code.
//!
//! ## Operations
//!
//! | Operation | External invocation |
//! |---|---|
//! | [`create_service`](ServiceOrchestrator::create_service) | `codegen NAME FIELDS` |
//! | [`add_rpc`](ServiceOrchestrator::add_rpc) | `codegen add-rpc SERVICE RPC REQ RES http=M:P [body=S]` |
//! | [`remove_service`](ServiceOrchestrator::remove_service) | `codegen remove NAME` |
//! | [`regenerate`](ServiceOrchestrator::regenerate) | `make proto` |
//!
//! Nothing is retried. Two concurrent mutations of the same service race in
//! the external tool; callers that need ordering must serialize them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use protosmith::config::ProjectConfig;
//! use protosmith::orchestrator::ServiceOrchestrator;
//!
//! let orchestrator = ServiceOrchestrator::new(ProjectConfig::new("."));
//! match orchestrator.create_service("User", "name:string,email:string,age:int32") {
//!     Ok(report) => println!("{}", report.output),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

mod error;
mod invoke;

#[cfg(test)]
mod tests;

pub use error::OrchestratorError;
pub use invoke::{run_tool, ToolOutput};

use crate::config::ProjectConfig;
use crate::inventory::{ArtifactInventory, ArtifactSet, InventoryListing};
use crate::spec::{
    check_service_name, parse_rpc_with, serialize_fields, FieldSpecParser, RpcDescriptor, RpcSpec,
    ServiceDescriptor,
};
use crate::status::{ProjectSnapshot, StatusReporter};
use std::ffi::OsString;
use tracing::{debug, info};

/// Which operation a report belongs to, with its identifying names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateService { service_name: String },
    AddRpc { service_name: String, rpc_name: String },
    RemoveService { service_name: String },
    Regenerate,
}

/// Successful outcome of a mutating operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub operation: Operation,
    /// The tool's standard output, unmodified
    pub output: String,
}

/// Coordinates parsing, the inventory and the external tools
#[derive(Debug, Clone)]
pub struct ServiceOrchestrator {
    config: ProjectConfig,
    inventory: ArtifactInventory,
}

impl ServiceOrchestrator {
    #[must_use]
    pub fn new(config: ProjectConfig) -> Self {
        let inventory = ArtifactInventory::new(&config);
        ServiceOrchestrator { config, inventory }
    }

    #[must_use]
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    #[must_use]
    pub fn inventory(&self) -> &ArtifactInventory {
        &self.inventory
    }

    /// All services currently on disk
    #[must_use]
    pub fn list_services(&self) -> InventoryListing {
        self.inventory.list_services()
    }

    /// Artifacts present for one service
    #[must_use]
    pub fn exists(&self, service_name: &str) -> ArtifactSet {
        self.inventory.exists(service_name)
    }

    /// Generate protocol, stub and model for a new service
    ///
    /// Repeating this for an existing name is left to the codegen tool's
    /// own overwrite/conflict policy.
    pub fn create_service(
        &self,
        name: &str,
        field_spec: &str,
    ) -> Result<OperationReport, OrchestratorError> {
        let descriptor = self.service_descriptor(name, field_spec)?;
        debug!(service = %descriptor.name, fields = descriptor.fields.len(), "parsed service");

        let fields = serialize_fields(&descriptor.fields);
        info!(service = %descriptor.name, "creating service");
        let out = self.codegen([OsString::from(&descriptor.name), OsString::from(fields)])?;
        info!(service = %descriptor.name, "service created");

        Ok(OperationReport {
            operation: Operation::CreateService {
                service_name: descriptor.name,
            },
            output: out.stdout,
        })
    }

    /// Append an RPC to an existing service
    ///
    /// The service is expected to exist already; this is not checked here.
    pub fn add_rpc(&self, spec: RpcSpec<'_>) -> Result<OperationReport, OrchestratorError> {
        let parser = self.field_parser(None);
        let descriptor = parse_rpc_with(&parser, spec)?;
        debug!(
            service = %descriptor.service_name,
            rpc = %descriptor.rpc_name,
            http = %descriptor.http_mapping(),
            "parsed rpc"
        );

        info!(service = %descriptor.service_name, rpc = %descriptor.rpc_name, "adding rpc");
        let out = self.codegen(add_rpc_args(&descriptor))?;
        info!(service = %descriptor.service_name, rpc = %descriptor.rpc_name, "rpc added");

        Ok(OperationReport {
            operation: Operation::AddRpc {
                service_name: descriptor.service_name,
                rpc_name: descriptor.rpc_name,
            },
            output: out.stdout,
        })
    }

    /// Delete a service's artifacts and registrations
    ///
    /// Existence is not pre-checked: if the tool exits 0 for an unknown
    /// name, that is reported as success.
    pub fn remove_service(&self, name: &str) -> Result<OperationReport, OrchestratorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OrchestratorError::EmptyServiceName);
        }

        info!(service = %name, "removing service");
        let out = self.codegen(["remove", name])?;
        info!(service = %name, "service removed");

        Ok(OperationReport {
            operation: Operation::RemoveService {
                service_name: name.to_string(),
            },
            output: out.stdout,
        })
    }

    /// Rebuild bindings, gateway and docs from every protocol definition
    pub fn regenerate(&self) -> Result<OperationReport, OrchestratorError> {
        info!(target = %self.config.build_target, "regenerating protocol bindings");
        let out = run_tool(
            &self.config.build_tool,
            [self.config.build_target.as_str()],
            &self.config.project_root,
        )?;
        info!("protocol bindings regenerated");

        Ok(OperationReport {
            operation: Operation::Regenerate,
            output: out.stdout,
        })
    }

    /// Artifact counts plus server liveness
    #[must_use]
    pub fn status(&self) -> ProjectSnapshot {
        StatusReporter::new(&self.config).snapshot()
    }

    fn service_descriptor(
        &self,
        name: &str,
        field_spec: &str,
    ) -> Result<ServiceDescriptor, OrchestratorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OrchestratorError::EmptyServiceName);
        }
        check_service_name(name)?;
        let fields = self.field_parser(Some(name)).parse(field_spec)?;
        Ok(ServiceDescriptor {
            name: name.to_string(),
            fields,
        })
    }

    /// Lenient parser, or a strict one seeded from the current inventory
    ///
    /// `own_name` lets a new service reference its own model.
    fn field_parser(&self, own_name: Option<&str>) -> FieldSpecParser {
        if !self.config.strict_types {
            return FieldSpecParser::new();
        }
        let mut known: Vec<String> = self
            .inventory
            .list_services()
            .services
            .into_iter()
            .map(|s| s.stem)
            .collect();
        known.extend(own_name.map(str::to_string));
        FieldSpecParser::strict(known)
    }

    fn codegen<I, S>(&self, args: I) -> Result<ToolOutput, OrchestratorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        run_tool(&self.config.codegen, args, &self.config.project_root)
    }
}

/// Positional arguments for the codegen tool's add-rpc mode
#[must_use]
pub fn add_rpc_args(rpc: &RpcDescriptor) -> Vec<String> {
    let mut args = vec![
        "add-rpc".to_string(),
        rpc.service_name.clone(),
        rpc.rpc_name.clone(),
        serialize_fields(&rpc.request_fields),
        serialize_fields(&rpc.response_fields),
        format!("http={}", rpc.http_mapping()),
    ];
    if let Some(body) = &rpc.body_selector {
        args.push(format!("body={body}"));
    }
    args
}
