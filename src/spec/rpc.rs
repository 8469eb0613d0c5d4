//! RPC-spec parser
//!
//! Turns the loose arguments of an "add RPC" request into a validated
//! [`RpcDescriptor`]. The HTTP mapping is `METHOD:PATH`, split at the first
//! colon so custom-verb paths such as `GET:/v1/users:search` survive intact.

use super::error::ParseError;
use super::field::{is_identifier, FieldSpecParser};
use super::types::{BodySelector, FieldDescriptor, HttpMethod, RpcDescriptor};
use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder regex should be valid"));

/// Raw, unparsed arguments of an RPC definition
#[derive(Debug, Clone, Copy)]
pub struct RpcSpec<'a> {
    pub service_name: &'a str,
    pub rpc_name: &'a str,
    pub request_fields: &'a str,
    pub response_fields: &'a str,
    pub http: &'a str,
    pub body: Option<&'a str>,
}

/// Parse an RPC definition with a lenient field parser
pub fn parse_rpc(spec: RpcSpec<'_>) -> Result<RpcDescriptor, ParseError> {
    parse_rpc_with(&FieldSpecParser::new(), spec)
}

/// Parse an RPC definition using the given field parser for both messages
pub fn parse_rpc_with(
    fields: &FieldSpecParser,
    spec: RpcSpec<'_>,
) -> Result<RpcDescriptor, ParseError> {
    check_identifier("service name", spec.service_name)?;
    check_identifier("RPC name", spec.rpc_name)?;

    let request_fields = fields.parse(spec.request_fields)?;
    let response_fields = fields.parse(spec.response_fields)?;
    let (http_method, http_path) = parse_http_mapping(spec.http)?;

    for parameter in path_parameters(&http_path)? {
        let root = parameter.split('.').next().unwrap_or_default();
        if !has_field(&request_fields, root) {
            return Err(ParseError::UnboundPathParameter {
                path: http_path,
                parameter: root.to_string(),
            });
        }
    }

    let body_selector = match spec.body.map(str::trim) {
        None | Some("") => None,
        Some("*") => Some(BodySelector::All),
        Some(name) if has_field(&request_fields, name) => Some(BodySelector::Field(name.to_string())),
        Some(other) => {
            return Err(ParseError::InvalidBodySelector {
                selector: other.to_string(),
            })
        }
    };

    Ok(RpcDescriptor {
        service_name: spec.service_name.to_string(),
        rpc_name: spec.rpc_name.to_string(),
        request_fields,
        response_fields,
        http_method,
        http_path,
        body_selector,
    })
}

/// Split `METHOD:PATH` and normalize the verb to upper case
pub fn parse_http_mapping(mapping: &str) -> Result<(HttpMethod, String), ParseError> {
    let invalid = |reason: &str| ParseError::InvalidHttpMapping {
        mapping: mapping.to_string(),
        reason: reason.to_string(),
    };

    let (method, path) = mapping
        .trim()
        .split_once(':')
        .ok_or_else(|| invalid("expected METHOD:PATH"))?;
    let method = method
        .trim()
        .parse::<HttpMethod>()
        .map_err(|_| invalid("method must be one of GET, POST, PUT, PATCH, DELETE"))?;
    let path = path.trim();
    if !path.starts_with('/') {
        return Err(invalid("path must start with '/'"));
    }
    Ok((method, path.to_string()))
}

/// Field paths referenced by `{...}` placeholders, in order of appearance
///
/// `{name=shelves/*}` style templates yield `name`. Unbalanced braces are
/// rejected.
pub fn path_parameters(path: &str) -> Result<Vec<String>, ParseError> {
    let stripped = PLACEHOLDER_REGEX.replace_all(path, "");
    if stripped.contains('{') || stripped.contains('}') {
        return Err(ParseError::InvalidHttpMapping {
            mapping: path.to_string(),
            reason: "unbalanced '{' or '}' in path".to_string(),
        });
    }

    let mut parameters = Vec::new();
    for caps in PLACEHOLDER_REGEX.captures_iter(path) {
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let field_path = inner.split('=').next().unwrap_or_default().trim();
        if field_path.is_empty() {
            return Err(ParseError::InvalidHttpMapping {
                mapping: path.to_string(),
                reason: "empty path placeholder".to_string(),
            });
        }
        parameters.push(field_path.to_string());
    }
    Ok(parameters)
}

fn has_field(fields: &[FieldDescriptor], name: &str) -> bool {
    fields.iter().any(|f| f.name == name)
}

fn check_identifier(what: &'static str, value: &str) -> Result<(), ParseError> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(ParseError::InvalidIdentifier {
            what,
            value: value.to_string(),
        })
    }
}

pub(crate) fn check_service_name(value: &str) -> Result<(), ParseError> {
    check_identifier("service name", value)
}
