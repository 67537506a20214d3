use askama::Template;

use super::records::{
    ApiVersionRecord, ClientRecord, EnumModel, ModelKind, ModelRecord, ObjectModel, RootRecord,
};
use crate::error::{GenerateError, Result};

/// Template data for a model class under `Models/`
#[derive(Template)]
#[template(path = "model_class.cs.txt", escape = "none")]
pub struct ModelClassTemplate<'r> {
    /// Root namespace of the SDK
    pub namespace: &'r str,
    pub model: &'r ModelRecord,
    pub object: &'r ObjectModel,
    /// `true` when an `AdditionalProperties` dictionary is emitted
    pub has_extension_data: bool,
    /// Value type of the `AdditionalProperties` dictionary
    pub extension_data_type: &'r str,
    /// `true` when the file needs `using System.Text.Json;`
    pub imports_json: bool,
}

/// Template data for a string enum under `Models/`
#[derive(Template)]
#[template(path = "model_enum.cs.txt", escape = "none")]
pub struct ModelEnumTemplate<'r> {
    pub namespace: &'r str,
    pub model: &'r ModelRecord,
    pub enumeration: &'r EnumModel,
}

/// Template data for one `{Name}Client` class
#[derive(Template)]
#[template(path = "client.cs.txt", escape = "none")]
pub struct ClientTemplate<'r> {
    pub namespace: &'r str,
    pub client: &'r ClientRecord,
}

/// Template data for the root partial class aggregating every client
#[derive(Template)]
#[template(path = "root_client.cs.txt", escape = "none")]
pub struct RootClientTemplate<'r> {
    pub root: &'r RootRecord,
}

/// Template data for `Http/ApiVersion.g.cs`
#[derive(Template)]
#[template(path = "api_version.cs.txt", escape = "none")]
pub struct ApiVersionTemplate<'r> {
    pub record: &'r ApiVersionRecord,
}

fn render_named(name: &str, template: &impl Template) -> Result<String> {
    template.render().map_err(|source| GenerateError::Render {
        template: name.to_string(),
        source,
    })
}

/// Render a model record with the class or enum template.
pub fn render_model(namespace: &str, model: &ModelRecord) -> Result<String> {
    match &model.kind {
        ModelKind::Object(object) => {
            let extension_data_type = object.extension_data_type.as_deref().unwrap_or_default();
            render_named(
                "model_class.cs.txt",
                &ModelClassTemplate {
                    namespace,
                    model,
                    object,
                    has_extension_data: object.extension_data_type.is_some(),
                    extension_data_type,
                    imports_json: object.uses_json || object.emit_to_string,
                },
            )
        }
        ModelKind::Enum(enumeration) => render_named(
            "model_enum.cs.txt",
            &ModelEnumTemplate {
                namespace,
                model,
                enumeration,
            },
        ),
    }
}

pub fn render_client(namespace: &str, client: &ClientRecord) -> Result<String> {
    render_named("client.cs.txt", &ClientTemplate { namespace, client })
}

pub fn render_root_client(root: &RootRecord) -> Result<String> {
    render_named("root_client.cs.txt", &RootClientTemplate { root })
}

pub fn render_api_version(record: &ApiVersionRecord) -> Result<String> {
    render_named("api_version.cs.txt", &ApiVersionTemplate { record })
}
