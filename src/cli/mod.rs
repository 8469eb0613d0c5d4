//! # CLI Module
//!
//! Command-line front end for the orchestrator.
//!
//! ## Commands
//!
//! ```bash
//! protosmith list [--json]
//! protosmith create User "name:string,email:string,age:int32"
//! protosmith add-rpc User SearchUsers "query:string" "data:repeated User" --http "GET:/v1/users:search"
//! protosmith remove User
//! protosmith regenerate
//! protosmith status [--json]
//! protosmith guide
//! ```
//!
//! Global options: `--root <DIR>`, `--config <FILE>`, `--verbose`.
//!
//! Failed operations print the external tool's stderr verbatim and exit
//! with status 1.

mod commands;
mod render;


pub use commands::{run, run_cli, Cli, Commands};
pub use render::{guide, render_failure, render_listing, render_report, render_snapshot};
