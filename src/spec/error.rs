use std::fmt;

/// Errors raised while parsing field or RPC specifications
///
/// All of these are detected before any external tool runs, so a parse
/// failure never leaves partial artifacts behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A field segment is neither `name:type` nor `repeated Type name`
    MalformedFieldSpec {
        /// The offending segment, trimmed
        segment: String,
        reason: String,
    },
    /// Strict mode only: the type is not a primitive and not a known message
    UnknownFieldType { field: String, type_name: String },
    /// The HTTP mapping is not `METHOD:/path`
    InvalidHttpMapping { mapping: String, reason: String },
    /// A `{placeholder}` in the path names no request field
    UnboundPathParameter { path: String, parameter: String },
    /// The body selector is neither `*` nor a request field
    InvalidBodySelector { selector: String },
    /// A service or RPC name is not a valid identifier
    InvalidIdentifier { what: &'static str, value: String },
}

impl ParseError {
    /// Stable machine-readable kind, used in logs and JSON output
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::MalformedFieldSpec { .. } => "MalformedFieldSpec",
            ParseError::UnknownFieldType { .. } => "UnknownFieldType",
            ParseError::InvalidHttpMapping { .. } => "InvalidHttpMapping",
            ParseError::UnboundPathParameter { .. } => "UnboundPathParameter",
            ParseError::InvalidBodySelector { .. } => "InvalidBodySelector",
            ParseError::InvalidIdentifier { .. } => "InvalidIdentifier",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedFieldSpec { segment, reason } => {
                write!(f, "malformed field spec '{segment}': {reason}")
            }
            ParseError::UnknownFieldType { field, type_name } => {
                write!(
                    f,
                    "unknown type '{type_name}' for field '{field}' (not a primitive or a known service)"
                )
            }
            ParseError::InvalidHttpMapping { mapping, reason } => {
                write!(f, "invalid HTTP mapping '{mapping}': {reason}")
            }
            ParseError::UnboundPathParameter { path, parameter } => {
                write!(
                    f,
                    "path '{path}' references '{{{parameter}}}' but no request field is named '{parameter}'"
                )
            }
            ParseError::InvalidBodySelector { selector } => {
                write!(
                    f,
                    "invalid body selector '{selector}': expected '*' or a request field name"
                )
            }
            ParseError::InvalidIdentifier { what, value } => {
                write!(f, "invalid {what} '{value}': expected an identifier")
            }
        }
    }
}

impl std::error::Error for ParseError {}
