use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Scalar types understood by the field mini-language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Int32,
    Int64,
    Bool,
    Float,
    Double,
    /// Lowers to `google.protobuf.Timestamp` on the wire
    Timestamp,
    Bytes,
}

impl PrimitiveType {
    /// Every primitive, in the order they are documented to users
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::String,
        PrimitiveType::Int32,
        PrimitiveType::Int64,
        PrimitiveType::Bool,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Timestamp,
        PrimitiveType::Bytes,
    ];

    /// The spelling accepted in field specs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Timestamp => "timestamp",
            PrimitiveType::Bytes => "bytes",
        }
    }

    /// The protobuf type the primitive lowers to
    #[must_use]
    pub fn wire_type(&self) -> &'static str {
        match self {
            PrimitiveType::Timestamp => "google.protobuf.Timestamp",
            other => other.as_str(),
        }
    }
}

impl FromStr for PrimitiveType {
    type Err = ();

    /// Case-sensitive: `String` is a message reference, `string` is a primitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type of a single field: a primitive or a reference to another message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum FieldType {
    Primitive(PrimitiveType),
    /// Another service's model, possibly not generated yet
    Message(String),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Primitive(p) => write!(f, "{p}"),
            FieldType::Message(name) => f.write_str(name),
        }
    }
}

/// One normalized field of a service model or RPC message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub repeated: bool,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType, repeated: bool) -> Self {
        FieldDescriptor {
            name: name.into(),
            field_type,
            repeated,
        }
    }

    /// Referenced message type name, if this field is not a primitive
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        match &self.field_type {
            FieldType::Message(name) => Some(name),
            FieldType::Primitive(_) => None,
        }
    }
}

impl fmt::Display for FieldDescriptor {
    /// Canonical `name:type` / `name:repeated type` form expected by the codegen tool
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeated {
            write!(f, "{}:repeated {}", self.name, self.field_type)
        } else {
            write!(f, "{}:{}", self.name, self.field_type)
        }
    }
}

/// A named service and the fields of its model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// HTTP verbs allowed in a gateway mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the request message becomes the HTTP body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySelector {
    /// `*`: the whole request message
    All,
    /// A single top-level request field
    Field(String),
}

impl fmt::Display for BodySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodySelector::All => f.write_str("*"),
            BodySelector::Field(name) => f.write_str(name),
        }
    }
}

/// A single RPC to append to an existing service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcDescriptor {
    pub service_name: String,
    pub rpc_name: String,
    pub request_fields: Vec<FieldDescriptor>,
    pub response_fields: Vec<FieldDescriptor>,
    pub http_method: HttpMethod,
    pub http_path: String,
    pub body_selector: Option<BodySelector>,
}

impl RpcDescriptor {
    /// `METHOD:PATH`, as passed in the `http=` argument
    #[must_use]
    pub fn http_mapping(&self) -> String {
        format!("{}:{}", self.http_method, self.http_path)
    }
}
