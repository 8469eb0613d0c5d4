//! Field-spec parser
//!
//! Accepts the comma-separated mini-language used for service models and
//! RPC messages:
//!
//! ```text
//! name:string, tags:repeated string, repeated Item items, owner:User
//! ```
//!
//! `name:repeated T` and `repeated T name` normalize to the same
//! [`FieldDescriptor`].

use super::error::ParseError;
use super::types::{FieldDescriptor, FieldType, PrimitiveType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex should be valid")
});

static MESSAGE_TYPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z0-9_]*$").expect("message type regex should be valid")
});

const REPEATED: &str = "repeated";

/// Returns `true` if `s` is usable as a field, service or RPC name
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER_REGEX.is_match(s)
}

/// Field-spec parser with an optional strict type check
///
/// In the default (lenient) mode any capitalized type name is accepted as a
/// forward reference to another service's model; the codegen tool decides
/// later whether it resolves. Strict mode only accepts message types found
/// in `known_types` (compared case-insensitively).
#[derive(Debug, Clone, Default)]
pub struct FieldSpecParser {
    known_types: Option<HashSet<String>>,
}

impl FieldSpecParser {
    /// Lenient parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict parser accepting only the given message types
    #[must_use]
    pub fn strict<I, S>(known_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FieldSpecParser {
            known_types: Some(
                known_types
                    .into_iter()
                    .map(|t| t.as_ref().to_ascii_lowercase())
                    .collect(),
            ),
        }
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.known_types.is_some()
    }

    /// Parse a whole field spec; a blank spec yields no fields.
    pub fn parse(&self, spec: &str) -> Result<Vec<FieldDescriptor>, ParseError> {
        if spec.trim().is_empty() {
            return Ok(Vec::new());
        }
        spec.split(',').map(|seg| self.parse_segment(seg)).collect()
    }

    fn parse_segment(&self, raw: &str) -> Result<FieldDescriptor, ParseError> {
        let segment = raw.trim();
        if segment.is_empty() {
            return Err(malformed(segment, "empty field definition"));
        }

        let (name, repeated, type_name) = match segment.split_once(':') {
            Some((name, rest)) => {
                let rest = rest.trim();
                match rest.strip_prefix(REPEATED) {
                    Some(ty) if ty.starts_with(char::is_whitespace) => (name.trim(), true, ty.trim()),
                    _ => (name.trim(), false, rest),
                }
            }
            None => {
                let tokens: Vec<&str> = segment.split_whitespace().collect();
                match tokens.as_slice() {
                    [REPEATED, ty, name] => (*name, true, *ty),
                    _ => {
                        return Err(malformed(
                            segment,
                            "expected 'name:type', 'name:repeated type' or 'repeated type name'",
                        ))
                    }
                }
            }
        };

        if !is_identifier(name) {
            return Err(malformed(segment, format!("invalid field name '{name}'")));
        }
        let field_type = self.resolve_type(segment, name, type_name)?;
        Ok(FieldDescriptor::new(name, field_type, repeated))
    }

    fn resolve_type(
        &self,
        segment: &str,
        field: &str,
        type_name: &str,
    ) -> Result<FieldType, ParseError> {
        if let Ok(primitive) = type_name.parse::<PrimitiveType>() {
            return Ok(FieldType::Primitive(primitive));
        }
        if !MESSAGE_TYPE_REGEX.is_match(type_name) {
            return Err(malformed(
                segment,
                format!("type '{type_name}' is neither a primitive nor a capitalized message type"),
            ));
        }
        if let Some(known) = &self.known_types {
            if !known.contains(&type_name.to_ascii_lowercase()) {
                return Err(ParseError::UnknownFieldType {
                    field: field.to_string(),
                    type_name: type_name.to_string(),
                });
            }
        }
        Ok(FieldType::Message(type_name.to_string()))
    }
}

fn malformed(segment: &str, reason: impl Into<String>) -> ParseError {
    ParseError::MalformedFieldSpec {
        segment: segment.to_string(),
        reason: reason.into(),
    }
}

/// Parse a field spec in the default, lenient mode
pub fn parse_fields(spec: &str) -> Result<Vec<FieldDescriptor>, ParseError> {
    FieldSpecParser::new().parse(spec)
}

/// Re-serialize fields into the canonical form the codegen tool expects
#[must_use]
pub fn serialize_fields(fields: &[FieldDescriptor]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
