//! Template-ready records.
//!
//! Everything a template needs is precomputed here (escaped literals,
//! declarations, builder calls) so the templates stay free of logic.

use std::fmt;

/// How a response body is consumed by the generated client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// No body
    None,
    /// Raw text
    Text,
    /// Opaque structured document
    JsonDocument,
    /// Deserialized into a concrete type
    Json,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::None => "none",
            ResponseMode::Text => "string",
            ResponseMode::JsonDocument => "json-document",
            ResponseMode::Json => "json",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRecord {
    /// Name on the wire
    pub json_name: String,
    /// `json_name` escaped for a C# string literal
    pub json_name_literal: String,
    pub property_name: String,
    pub type_name: String,
    pub description: String,
    pub required: bool,
    pub needs_initializer: bool,
    pub is_value_type: bool,
    pub is_nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberRecord {
    pub name: String,
    pub value: String,
    /// `value` escaped for a C# string literal
    pub value_literal: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectModel {
    pub properties: Vec<PropertyRecord>,
    /// Value type of the `[JsonExtensionData]` dictionary, when the schema is open
    pub extension_data_type: Option<String>,
    pub uses_collections: bool,
    pub uses_json: bool,
    /// Set for models used as error payloads
    pub emit_to_string: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumModel {
    pub members: Vec<EnumMemberRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelKind {
    Object(ObjectModel),
    Enum(EnumModel),
}

/// A named class or enum to emit under `Models/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRecord {
    pub name: String,
    pub description: String,
    pub kind: ModelKind,
}

impl ModelRecord {
    pub fn as_object(&self) -> Option<&ObjectModel> {
        match &self.kind {
            ModelKind::Object(object) => Some(object),
            ModelKind::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumModel> {
        match &self.kind {
            ModelKind::Enum(model) => Some(model),
            ModelKind::Object(_) => None,
        }
    }
}

/// Request location of a parameter that reaches the request builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl ParameterLocation {
    /// Name of the `RequestBuilder` method receiving this kind of parameter.
    pub fn builder_method(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "AddPath",
            ParameterLocation::Query => "AddQuery",
            ParameterLocation::Header => "AddHeader",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    pub location: ParameterLocation,
    /// Name on the wire
    pub name: String,
    /// C# argument name
    pub arg_name: String,
    pub type_name: String,
    /// `Type arg` or `Type? arg = null`
    pub declaration: String,
    pub description: String,
    pub required: bool,
    /// `builder.AddQuery("name", arg);`
    pub builder_call: String,
    pub is_collection: bool,
}

/// One argument of a generated client method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameterRecord {
    pub name: String,
    pub signature: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRecord {
    pub arg_name: String,
    pub type_name: String,
    pub signature: String,
    pub description: String,
    pub required: bool,
    /// Media type the schema was taken from
    pub content_type: String,
    pub is_collection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMappingRecord {
    /// Three-digit status code, `None` for the default mapping
    pub status_literal: Option<String>,
    pub error_type: String,
    pub is_default: bool,
}

impl ErrorMappingRecord {
    /// Pattern of the C# switch arm matching this mapping.
    pub fn switch_pattern(&self) -> &str {
        self.status_literal.as_deref().unwrap_or("_")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub method_name: String,
    /// Upper-case HTTP verb
    pub http_method: String,
    /// `HttpMethod.Get`, `new HttpMethod("PATCH")`, ...
    pub http_method_expr: String,
    pub path: String,
    pub path_literal: String,
    pub summary: String,
    pub description: String,
    pub path_params: Vec<ParameterRecord>,
    pub query_params: Vec<ParameterRecord>,
    pub header_params: Vec<ParameterRecord>,
    /// Method signature order: required first, then optional
    pub parameters: Vec<MethodParameterRecord>,
    pub body: Option<BodyRecord>,
    pub response_type: String,
    /// Type argument of `ApiResponse<T>`
    pub return_type: String,
    pub response_mode: ResponseMode,
    pub error_mappings: Vec<ErrorMappingRecord>,
    pub uses_collections: bool,
}

impl OperationRecord {
    pub fn has_builder(&self) -> bool {
        !(self.path_params.is_empty() && self.query_params.is_empty() && self.header_params.is_empty())
    }

    pub fn has_default_error(&self) -> bool {
        self.error_mappings.iter().any(|e| e.is_default)
    }

    /// Second and third arguments of `SendAsync`: body expression and content type literal.
    pub fn send_arguments(&self) -> String {
        match &self.body {
            Some(body) => format!(
                "{}, \"{}\"",
                body.arg_name,
                crate::naming::csharp_string_literal(&body.content_type)
            ),
            None => "null, null".to_string(),
        }
    }
}

/// One generated `{Name}Client` class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub client_name: String,
    pub property_name: String,
    pub operations: Vec<OperationRecord>,
    pub uses_collections: bool,
    pub uses_error_responses: bool,
}

impl ClientRecord {
    /// Class name of the generated client.
    pub fn class_name(&self) -> String {
        format!("{}Client", self.client_name)
    }
}

/// The root aggregator exposing every client as a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootRecord {
    pub namespace: String,
    pub class_name: String,
    pub clients: Vec<ClientRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionRecord {
    pub namespace: String,
    pub version: String,
    pub version_literal: String,
}

/// Everything one run produces, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkDefinition {
    pub models: Vec<ModelRecord>,
    pub root: RootRecord,
    pub api_version: ApiVersionRecord,
}

impl SdkDefinition {
    pub fn clients(&self) -> &[ClientRecord] {
        &self.root.clients
    }

    pub fn model(&self, name: &str) -> Option<&ModelRecord> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn client(&self, name: &str) -> Option<&ClientRecord> {
        self.root.clients.iter().find(|c| c.client_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_mode_labels() {
        assert_eq!(ResponseMode::None.to_string(), "none");
        assert_eq!(ResponseMode::Text.as_str(), "string");
        assert_eq!(ResponseMode::JsonDocument.as_str(), "json-document");
        assert_eq!(ResponseMode::Json.as_str(), "json");
    }

    #[test]
    fn test_error_switch_pattern() {
        let code = ErrorMappingRecord {
            status_literal: Some("404".to_string()),
            error_type: "NotFound".to_string(),
            is_default: false,
        };
        let fallback = ErrorMappingRecord {
            status_literal: None,
            error_type: "Problem".to_string(),
            is_default: true,
        };
        assert_eq!(code.switch_pattern(), "404");
        assert_eq!(fallback.switch_pattern(), "_");
    }
}
