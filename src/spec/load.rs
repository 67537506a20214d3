use crate::error::{GenerateError, Result};
use oas3::OpenApiV3Spec;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Version written to the SDK when `info.version` is blank.
pub const DEFAULT_API_VERSION: &str = "1.0.0";

/// A parsed OpenAPI document.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    /// Typed document model
    pub spec: OpenApiV3Spec,
    /// `components.schemas` as raw JSON nodes, keyed by component name
    pub schemas: BTreeMap<String, Value>,
}

impl ApiDocument {
    /// Build a document from an already parsed JSON/YAML value.
    pub fn from_value(mut value: Value) -> std::result::Result<Self, serde_json::Error> {
        strip_unknown_verbs(&mut value);
        let schemas = value
            .pointer("/components/schemas")
            .and_then(Value::as_object)
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        let spec: OpenApiV3Spec = serde_json::from_value(value)?;
        Ok(ApiDocument { spec, schemas })
    }

    /// `info.version`, or [`DEFAULT_API_VERSION`] when blank.
    pub fn api_version(&self) -> String {
        let version = self.spec.info.version.trim();
        if version.is_empty() {
            DEFAULT_API_VERSION.to_string()
        } else {
            version.to_string()
        }
    }

    /// Number of operations across all paths.
    pub fn operation_count(&self) -> usize {
        self.spec
            .paths
            .as_ref()
            .map(|paths| paths.values().map(|item| item.methods().into_iter().count()).sum())
            .unwrap_or(0)
    }
}

fn strip_unknown_verbs(val: &mut Value) {
    const METHODS: [&str; 8] = ["get", "post", "put", "delete", "patch", "options", "head", "trace"];

    let Some(Value::Object(paths_map)) = val.get_mut("paths") else {
        return;
    };
    for item in paths_map.values_mut() {
        if let Value::Object(obj) = item {
            obj.retain(|k, _| {
                let lk = k.to_ascii_lowercase();
                match lk.as_str() {
                    "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                    m if METHODS.contains(&m) => true,
                    _ => k.starts_with("x-"),
                }
            });
        }
    }
}

/// Load an OpenAPI document from a `.yaml`, `.yml` or `.json` file.
pub fn load_spec(file_path: &Path) -> Result<ApiDocument> {
    let spec_error = |message: String| GenerateError::Spec {
        path: file_path.to_path_buf(),
        message,
    };
    let content = std::fs::read_to_string(file_path).map_err(|e| spec_error(e.to_string()))?;
    let is_yaml = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| spec_error(e.to_string()))?
    } else {
        serde_json::from_str(&content).map_err(|e| spec_error(e.to_string()))?
    };
    let document = ApiDocument::from_value(value).map_err(|e| spec_error(e.to_string()))?;
    tracing::debug!(
        path = %file_path.display(),
        title = %document.spec.info.title,
        operations = document.operation_count(),
        schemas = document.schemas.len(),
        "loaded OpenAPI document"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_strip_unknown_verbs() {
        let mut v = json!({
            "paths": {
                "/x": { "get": {}, "patch": {}, "unknown": {}, "x-internal": true }
            }
        });
        strip_unknown_verbs(&mut v);
        assert!(v["paths"]["/x"].get("unknown").is_none());
        assert!(v["paths"]["/x"].get("patch").is_some());
        assert!(v["paths"]["/x"].get("x-internal").is_some());
    }

    #[test]
    fn test_from_value_keeps_raw_schemas() {
        let doc = ApiDocument::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "Demo", "version": " " },
            "paths": {},
            "components": {
                "schemas": {
                    "Legacy": { "type": "string", "nullable": true }
                }
            }
        }))
        .unwrap();
        assert_eq!(doc.schemas["Legacy"]["nullable"], json!(true));
        assert_eq!(doc.api_version(), DEFAULT_API_VERSION);
        assert_eq!(doc.operation_count(), 0);
    }

    #[test]
    fn test_load_yaml_spec() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        write!(
            file,
            "openapi: 3.1.0\ninfo:\n  title: Demo\n  version: '2.1.0'\npaths:\n  /ping:\n    get:\n      responses:\n        '204':\n          description: ok\n"
        )
        .unwrap();
        let doc = load_spec(file.path()).unwrap();
        assert_eq!(doc.api_version(), "2.1.0");
        assert_eq!(doc.operation_count(), 1);
    }

    #[test]
    fn test_load_invalid_spec() {
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_spec(file.path()).unwrap_err();
        assert!(matches!(err, GenerateError::Spec { .. }));
    }
}
