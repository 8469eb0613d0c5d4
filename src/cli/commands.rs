use super::render::{guide, render_failure, render_listing, render_report, render_snapshot};
use crate::config::ProjectConfig;
use crate::logging::{init_logging, LogConfig};
use crate::orchestrator::{OperationReport, OrchestratorError, ServiceOrchestrator};
use crate::spec::RpcSpec;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line interface for protosmith
///
/// Drives the codegen and build tools of a gRPC project and reports on the
/// artifacts they produce.
#[derive(Parser, Debug)]
#[command(name = "protosmith", version)]
#[command(about = "Generate and keep gRPC service artifacts in sync", long_about = None)]
pub struct Cli {
    /// Project root (defaults to $PROTOSMITH_ROOT, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Config file (defaults to protosmith.toml at the project root, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available protosmith commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List services and which of their artifacts exist
    List {
        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate proto, service stub and model for a new service
    Create {
        /// Service name in PascalCase (e.g. User)
        name: String,

        /// Comma-separated fields, e.g. "name:string,tags:repeated string"
        #[arg(default_value = "")]
        fields: String,

        /// Reject message types that don't name an existing service
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Add an RPC to an existing service
    AddRpc {
        /// Target service (e.g. User)
        service: String,

        /// RPC name in PascalCase (e.g. SearchUsers)
        rpc: String,

        /// Request fields (e.g. "query:string,limit:int32")
        request: String,

        /// Response fields (e.g. "data:repeated User")
        response: String,

        /// HTTP mapping METHOD:/path (e.g. "GET:/v1/users:search")
        #[arg(long)]
        http: String,

        /// Body mapping: "*" or a request field name
        #[arg(long)]
        body: Option<String>,

        /// Reject message types that don't name an existing service
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Remove a service and all its artifacts and registrations
    Remove {
        /// Service name (e.g. User)
        name: String,
    },
    /// Regenerate bindings, gateway code and docs from all protos
    Regenerate,
    /// Show server liveness and artifact counts
    Status {
        /// Print JSON instead of a summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Explain field types, formats and HTTP mappings
    Guide,
}

/// Parse arguments, set up logging and run the command
///
/// # Errors
///
/// Returns an error if the configuration can't be resolved or output can't
/// be serialized. Operation failures are printed and reported through the
/// exit code instead.
pub fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    init_logging(&log_config)?;
    run(cli)
}

/// Run an already-parsed command line
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Commands::Guide = cli.command {
        print!("{}", guide());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = ProjectConfig::resolve(cli.root.as_deref(), cli.config.as_deref())?;
    if matches!(
        cli.command,
        Commands::Create { strict: true, .. } | Commands::AddRpc { strict: true, .. }
    ) {
        config.strict_types = true;
    }
    let orchestrator = ServiceOrchestrator::new(config);

    match cli.command {
        Commands::List { json } => {
            let listing = orchestrator.list_services();
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                print!("{}", render_listing(&listing));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Create { name, fields, .. } => Ok(finish(
            &format!("generate service '{name}'"),
            orchestrator.create_service(&name, &fields),
        )),
        Commands::AddRpc {
            service,
            rpc,
            request,
            response,
            http,
            body,
            ..
        } => Ok(finish(
            &format!("add RPC '{rpc}' to service '{service}'"),
            orchestrator.add_rpc(RpcSpec {
                service_name: &service,
                rpc_name: &rpc,
                request_fields: &request,
                response_fields: &response,
                http: &http,
                body: body.as_deref(),
            }),
        )),
        Commands::Remove { name } => Ok(finish(
            &format!("remove service '{name}'"),
            orchestrator.remove_service(&name),
        )),
        Commands::Regenerate => Ok(finish(
            "regenerate proto files",
            orchestrator.regenerate(),
        )),
        Commands::Status { json } => {
            let snapshot = orchestrator.status();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render_snapshot(&snapshot));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Guide => Ok(ExitCode::SUCCESS),
    }
}

fn finish(what: &str, result: Result<OperationReport, OrchestratorError>) -> ExitCode {
    match result {
        Ok(report) => {
            print!("{}", render_report(&report));
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(stdout) = err.output().filter(|s| !s.is_empty()) {
                print!("{stdout}");
            }
            eprintln!("{}", render_failure(what, &err));
            ExitCode::FAILURE
        }
    }
}
