use super::ApiDocument;
use oas3::spec::{ObjectOrReference, ObjectSchema, Parameter, RequestBody, Response};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const SCHEMAS_PREFIX: &str = "#/components/schemas/";
const PARAMETERS_PREFIX: &str = "#/components/parameters/";
const REQUEST_BODIES_PREFIX: &str = "#/components/requestBodies/";
const RESPONSES_PREFIX: &str = "#/components/responses/";
const MAX_REF_DEPTH: usize = 16;

/// Component name addressed by a local `$ref`, with JSON-pointer escapes decoded.
///
/// ```rust
/// use dotnet_sdkgen::spec::component_name;
///
/// assert_eq!(component_name("#/components/schemas/Merchant", "#/components/schemas/"), Some("Merchant".to_string()));
/// assert_eq!(component_name("other.yaml#/Merchant", "#/components/schemas/"), None);
/// ```
pub fn component_name(ref_path: &str, prefix: &str) -> Option<String> {
    let raw = ref_path.strip_prefix(prefix)?;
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    Some(raw.replace("~1", "/").replace("~0", "~"))
}

/// Component schema name addressed by `ref_path`.
pub fn schema_ref_name(ref_path: &str) -> Option<String> {
    component_name(ref_path, SCHEMAS_PREFIX)
}

/// Resolve a `#/components/parameters/...` reference.
pub fn resolve_parameter_ref<'a>(doc: &'a ApiDocument, ref_path: &str) -> Option<&'a Parameter> {
    let components = doc.spec.components.as_ref()?;
    follow_ref(&components.parameters, ref_path, PARAMETERS_PREFIX)
}

/// Resolve a `#/components/requestBodies/...` reference.
pub fn resolve_request_body_ref<'a>(doc: &'a ApiDocument, ref_path: &str) -> Option<&'a RequestBody> {
    let components = doc.spec.components.as_ref()?;
    follow_ref(&components.request_bodies, ref_path, REQUEST_BODIES_PREFIX)
}

/// Resolve a `#/components/responses/...` reference.
pub fn resolve_response_ref<'a>(doc: &'a ApiDocument, ref_path: &str) -> Option<&'a Response> {
    let components = doc.spec.components.as_ref()?;
    follow_ref(&components.responses, ref_path, RESPONSES_PREFIX)
}

// Chains of component aliases are followed up to MAX_REF_DEPTH hops; a cycle yields None.
fn follow_ref<'a, T>(
    table: &'a BTreeMap<String, ObjectOrReference<T>>,
    ref_path: &str,
    prefix: &str,
) -> Option<&'a T> {
    let mut current = ref_path;
    for _ in 0..MAX_REF_DEPTH {
        let name = component_name(current, prefix)?;
        match table.get(&name)? {
            ObjectOrReference::Object(item) => return Some(item),
            ObjectOrReference::Ref { ref_path, .. } => current = ref_path,
        }
    }
    None
}

/// Convert a typed schema slot into a JSON schema node.
///
/// References stay references (`{"$ref": ...}`) so the type resolver can map
/// them to named types instead of inlining them.
pub fn schema_value(schema: &ObjectOrReference<ObjectSchema>) -> Value {
    match schema {
        ObjectOrReference::Object(obj) => serde_json::to_value(obj).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "schema could not be converted, treating as untyped");
            Value::Null
        }),
        ObjectOrReference::Ref { ref_path, .. } => json!({ "$ref": ref_path }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn doc() -> ApiDocument {
        ApiDocument::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "Refs", "version": "1.0.0" },
            "paths": {},
            "components": {
                "parameters": {
                    "MerchantCode": {
                        "name": "merchant_code", "in": "path", "required": true,
                        "schema": { "type": "string" }
                    },
                    "Alias": { "$ref": "#/components/parameters/MerchantCode" },
                    "Loop": { "$ref": "#/components/parameters/Loop" }
                },
                "requestBodies": {
                    "Checkout": {
                        "content": { "application/json": { "schema": { "type": "object" } } }
                    }
                },
                "responses": {
                    "NotFound": { "description": "missing" }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_component_name_decodes_pointer_escapes() {
        assert_eq!(
            component_name("#/components/schemas/a~1b~0c", SCHEMAS_PREFIX).as_deref(),
            Some("a/b~c")
        );
        assert_eq!(schema_ref_name("#/components/parameters/X"), None);
        assert_eq!(schema_ref_name("#/components/schemas/"), None);
    }

    #[test]
    fn test_resolve_component_refs() {
        let doc = doc();
        let param = resolve_parameter_ref(&doc, "#/components/parameters/Alias").unwrap();
        assert_eq!(param.name, "merchant_code");
        assert!(resolve_parameter_ref(&doc, "#/components/parameters/Missing").is_none());
        assert!(resolve_parameter_ref(&doc, "#/components/parameters/Loop").is_none());
        assert!(resolve_request_body_ref(&doc, "#/components/requestBodies/Checkout").is_some());
        assert!(resolve_response_ref(&doc, "#/components/responses/NotFound").is_some());
        assert!(resolve_response_ref(&doc, "#/components/schemas/NotFound").is_none());
    }
}
