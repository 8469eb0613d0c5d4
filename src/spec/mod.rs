//! # Spec Module
//!
//! Parsers for the two input mini-languages: field specs (service models and
//! RPC messages) and RPC specs (messages plus an HTTP gateway mapping).
//!
//! Parsing is local and side-effect free. A descriptor that comes out of this
//! module is what gets re-serialized and handed to the codegen tool.
//!
//! ```rust
//! use protosmith::spec::{parse_fields, serialize_fields};
//!
//! let fields = parse_fields("repeated string tags, name:string").unwrap();
//! assert_eq!(serialize_fields(&fields), "tags:repeated string,name:string");
//! ```

mod error;
mod field;
mod rpc;
mod types;


pub use error::ParseError;
pub use field::{is_identifier, parse_fields, serialize_fields, FieldSpecParser};
pub(crate) use rpc::check_service_name;
pub use rpc::{parse_http_mapping, parse_rpc, parse_rpc_with, path_parameters, RpcSpec};
pub use types::*;
