//! # protosmith
//!
//! **protosmith** keeps the generated artifacts of a gRPC microservice project in
//! sync. From a compact textual description of a service's fields, or of a single
//! RPC and its HTTP mapping, it drives an external codegen tool that writes the
//! protocol definition, service stub, model and gateway wiring, and it can remove
//! services and regenerate all derived bindings.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Field-spec and RPC-spec parsers (the input mini-languages)
//! - **[`inventory`]** - Read-only view of which artifacts exist on disk
//! - **[`orchestrator`]** - Create / add-rpc / remove / regenerate through the external tools
//! - **[`status`]** - Artifact counts plus a bounded-timeout liveness probe
//! - **[`config`]** - Explicit project configuration (root, layout, executables)
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `protosmith` command-line front end
//!
//! ### Operation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant Orch as ServiceOrchestrator
//!     participant Spec as spec parsers
//!     participant Inv as ArtifactInventory
//!     participant Tool as gen_service.sh
//!     participant FS as File System
//!
//!     User->>Orch: create_service("User", "name:string,age:int32")
//!     Orch->>Spec: parse fields
//!     alt Parse error
//!         Spec-->>User: Err(Parse(MalformedFieldSpec))
//!     end
//!     Spec-->>Orch: Vec<FieldDescriptor>
//!     Orch->>Tool: gen_service.sh User name:string,age:int32
//!     Tool->>FS: write proto/user.proto, services/user.go, models/user.go
//!     alt Non-zero exit
//!         Tool-->>User: Err(ExternalToolFailure { stderr, .. })
//!     end
//!     Tool-->>Orch: stdout
//!     Orch-->>User: OperationReport
//!     User->>Inv: exists("User")
//!     Inv->>FS: stat artifacts
//!     Inv-->>User: ArtifactSet { has_protocol, has_service, has_model }
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use protosmith::config::ProjectConfig;
//! use protosmith::orchestrator::ServiceOrchestrator;
//!
//! let orchestrator = ServiceOrchestrator::new(ProjectConfig::new("."));
//! let report = orchestrator
//!     .create_service("Product", "name:string,price:float,tags:repeated string")
//!     .expect("codegen failed");
//! println!("{}", report.output);
//! assert!(orchestrator.exists("Product").is_complete());
//! ```
//!
//! The state of a project lives entirely in its files. Descriptors are built,
//! used for one operation and dropped; the inventory re-reads the disk on every
//! call.

pub mod cli;
pub mod config;
pub mod inventory;
pub mod logging;
pub mod orchestrator;
pub mod spec;
pub mod status;

pub use config::ProjectConfig;
pub use inventory::{ArtifactInventory, ArtifactSet, InventoryListing};
pub use orchestrator::{Operation, OperationReport, OrchestratorError, ServiceOrchestrator};
pub use spec::{parse_fields, parse_rpc, FieldDescriptor, ParseError, RpcDescriptor, RpcSpec};
pub use status::{Liveness, ProjectSnapshot, StatusReporter};
