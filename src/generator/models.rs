//! # Model Assembler
//!
//! Builds [`ModelRecord`]s from the component schema table and from inline
//! schemas promoted by the type resolver.
//!
//! Classification happens in two passes. Pass one reserves a type name for
//! every component schema and assigns its [`SchemaKind`]; pass two resolves
//! alias targets, which may point at schemas classified later in pass one.
//!
//! Object properties merge the schema's own properties with those of every
//! `allOf` branch, depth first in declaration order. When two sources declare
//! the same property the first one wins and later ones are skipped.

use super::context::{GenerationContext, SchemaKind, SchemaTypeInfo};
use super::records::{EnumMemberRecord, EnumModel, ModelKind, ModelRecord, ObjectModel, PropertyRecord};
use super::resolve::{
    alias_target, defines_structure, is_nullable, resolve, resolve_inline, JSON_ELEMENT,
};
use crate::naming::{csharp_string_literal, doc_text, pascal_identifier};
use crate::spec::schema_ref_name;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

// Name of the `[JsonExtensionData]` property emitted for open schemas.
const EXTENSION_DATA_MEMBER: &str = "AdditionalProperties";

/// Classify every component schema and build the named models.
///
/// Inline models discovered while resolving property types stay queued on
/// the context until [`drain_inline_models`] runs.
pub fn build_models(ctx: &mut GenerationContext<'_>) -> Vec<ModelRecord> {
    classify_schemas(ctx);

    let infos: Vec<SchemaTypeInfo> = ctx.schema_infos().cloned().collect();
    let mut models = Vec::with_capacity(infos.len());
    for info in infos {
        let Some(schema) = ctx.component_schema(&info.source_name) else {
            continue;
        };
        match info.kind {
            SchemaKind::Alias => {}
            SchemaKind::Enum => models.push(ModelRecord {
                name: info.type_name.clone(),
                description: description_of(schema),
                kind: ModelKind::Enum(EnumModel {
                    members: enum_members(&info.enum_values),
                }),
            }),
            SchemaKind::Object => models.push(build_object_model(ctx, &info.type_name, schema)),
        }
    }
    models
}

fn classify_schemas(ctx: &mut GenerationContext<'_>) {
    let components = ctx.components();
    for (source_name, schema) in components {
        let type_name = ctx.reserve_model_name(&pascal_identifier(source_name));
        let kind = classify(schema);
        let enum_values = match kind {
            SchemaKind::Enum => enum_literals(schema),
            _ => Vec::new(),
        };
        tracing::trace!(schema = %source_name, %type_name, ?kind, "classified schema");
        ctx.register_schema(SchemaTypeInfo {
            source_name: source_name.clone(),
            type_name,
            kind,
            alias: None,
            enum_values,
        });
    }

    for source_name in components.keys() {
        let is_alias = ctx
            .schema_info(source_name)
            .is_some_and(|info| info.kind == SchemaKind::Alias);
        if is_alias {
            alias_target(ctx, source_name);
        }
    }
}

/// Kind of a named schema: enum literals win, then object structure, else alias.
pub fn classify(schema: &Value) -> SchemaKind {
    let has_enum = schema
        .get("enum")
        .and_then(Value::as_array)
        .is_some_and(|values| !values.is_empty());
    if has_enum {
        return SchemaKind::Enum;
    }
    let typed_object = match schema.get("type") {
        Some(Value::String(ty)) => ty == "object",
        Some(Value::Array(types)) => types.iter().any(|ty| ty.as_str() == Some("object")),
        _ => false,
    };
    let typed_map = schema
        .get("additionalProperties")
        .is_some_and(Value::is_object);
    if defines_structure(schema) || typed_object || typed_map {
        SchemaKind::Object
    } else {
        SchemaKind::Alias
    }
}

fn enum_literals(schema: &Value) -> Vec<String> {
    schema
        .get("enum")
        .and_then(Value::as_array)
        .map(|values| values.iter().map(literal_text).collect())
        .unwrap_or_default()
}

fn literal_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Member names for the given literals; repeats get `2`, `3`, ... in first-seen order.
pub fn enum_members(values: &[String]) -> Vec<EnumMemberRecord> {
    let mut used = BTreeSet::new();
    let mut next_suffix: BTreeMap<String, usize> = BTreeMap::new();
    let mut members = Vec::with_capacity(values.len());
    for value in values {
        let base = pascal_identifier(value);
        let mut name = base.clone();
        if !used.insert(name.clone()) {
            let suffix = next_suffix.entry(base.clone()).or_insert(2);
            loop {
                name = format!("{base}{suffix}");
                *suffix += 1;
                if used.insert(name.clone()) {
                    break;
                }
            }
        }
        members.push(EnumMemberRecord {
            name,
            value: value.clone(),
            value_literal: csharp_string_literal(value),
        });
    }
    members
}

/// Reserve a model name for an inline schema and queue it for synthesis.
pub fn create_inline_model(ctx: &mut GenerationContext<'_>, hint: &str, schema: &Value) -> String {
    let name = ctx.reserve_model_name(hint);
    tracing::debug!(%name, hint, "queued inline model");
    ctx.enqueue(name.clone(), schema.clone());
    name
}

/// Build every queued inline model, including those queued while draining.
pub fn drain_inline_models(ctx: &mut GenerationContext<'_>) -> Vec<ModelRecord> {
    let mut models = Vec::new();
    while let Some(pending) = ctx.next_pending() {
        models.push(build_object_model(ctx, &pending.name, &pending.schema));
    }
    models
}

/// Merge named and inline models, flag error payloads and sort by name.
pub fn finalize_models(ctx: &GenerationContext<'_>, mut models: Vec<ModelRecord>) -> Vec<ModelRecord> {
    for model in &mut models {
        if let ModelKind::Object(object) = &mut model.kind {
            object.emit_to_string = ctx.is_error_model(&model.name);
        }
    }
    models.sort_by(|a, b| a.name.cmp(&b.name));
    models
}

fn build_object_model(ctx: &mut GenerationContext<'_>, type_name: &str, schema: &Value) -> ModelRecord {
    let mut sources = Vec::new();
    let mut visited = BTreeSet::new();
    collect_sources(ctx.components(), schema, &mut sources, &mut visited);

    let extension_data_type = match schema.get("additionalProperties") {
        Some(value @ Value::Object(_)) => Some(resolve(ctx, value, true).base_name().to_string()),
        Some(Value::Bool(true)) => Some(JSON_ELEMENT.to_string()),
        _ => None,
    };

    let mut seen_json = BTreeSet::new();
    let mut member_names = BTreeSet::from([type_name.to_string()]);
    if extension_data_type.is_some() {
        member_names.insert(EXTENSION_DATA_MEMBER.to_string());
    }
    let mut properties = Vec::new();
    let mut uses_collections = false;
    let mut uses_json = false;

    for source in sources {
        let Some(declared) = source.get("properties").and_then(Value::as_object) else {
            continue;
        };
        let required: BTreeSet<&str> = source
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let mut names: Vec<&String> = declared.keys().collect();
        names.sort();

        for json_name in names {
            if !seen_json.insert(json_name.as_str()) {
                tracing::debug!(model = type_name, property = %json_name, "duplicate property ignored");
                continue;
            }
            let property_name = property_identifier(json_name, type_name, &mut member_names);
            let property_schema = &declared[json_name.as_str()];
            let is_required = required.contains(json_name.as_str()) && !is_nullable(property_schema);
            let hint = format!("{type_name}{}", pascal_identifier(json_name));
            let ty = resolve_inline(ctx, property_schema, is_required, &hint);

            uses_collections |= ty.is_collection;
            uses_json |= ty.uses_json();
            properties.push(PropertyRecord {
                json_name: json_name.clone(),
                json_name_literal: csharp_string_literal(json_name),
                property_name,
                description: property_description(ctx, property_schema),
                required: is_required,
                needs_initializer: is_required && !ty.is_value_type && !ty.nullable,
                is_value_type: ty.is_value_type,
                is_nullable: ty.nullable,
                type_name: ty.type_name,
            });
        }
    }
    properties.sort_by(|a, b| a.property_name.cmp(&b.property_name));

    if let Some(value_type) = &extension_data_type {
        uses_collections = true;
        uses_json |= value_type.contains("Json");
    }

    ModelRecord {
        name: type_name.to_string(),
        description: description_of(schema),
        kind: ModelKind::Object(ObjectModel {
            properties,
            extension_data_type,
            uses_collections,
            uses_json,
            emit_to_string: false,
        }),
    }
}

/// Member name for `json_name`, unique within the model.
///
/// A C# member may not share its enclosing type's name, so that case gets a
/// `Value` suffix. Distinct wire names normalizing to a taken member name get
/// `2`, `3`, ... in iteration order.
fn property_identifier(json_name: &str, owner: &str, used: &mut BTreeSet<String>) -> String {
    let mut base = pascal_identifier(json_name);
    if base == owner {
        base.push_str("Value");
    }
    if used.insert(base.clone()) {
        return base;
    }
    let mut index = 2usize;
    loop {
        let candidate = format!("{base}{index}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        index += 1;
    }
}

/// The schema itself, then each `allOf` branch depth first. Referenced branches
/// are visited once.
fn collect_sources<'v>(
    components: &'v BTreeMap<String, Value>,
    schema: &'v Value,
    out: &mut Vec<&'v Value>,
    visited: &mut BTreeSet<String>,
) {
    out.push(schema);
    let Some(branches) = schema.get("allOf").and_then(Value::as_array) else {
        return;
    };
    for branch in branches {
        match branch.get("$ref").and_then(Value::as_str) {
            Some(reference) => {
                let Some(name) = schema_ref_name(reference) else {
                    tracing::warn!(reference, "unsupported allOf reference skipped");
                    continue;
                };
                if !visited.insert(name.clone()) {
                    continue;
                }
                match components.get(&name) {
                    Some(target) => collect_sources(components, target, out, visited),
                    None => tracing::warn!(reference, "unresolved allOf reference skipped"),
                }
            }
            None => collect_sources(components, branch, out, visited),
        }
    }
}

fn description_of(schema: &Value) -> String {
    schema
        .get("description")
        .and_then(Value::as_str)
        .map(doc_text)
        .unwrap_or_default()
}

fn property_description(ctx: &GenerationContext<'_>, schema: &Value) -> String {
    let own = description_of(schema);
    if !own.is_empty() {
        return own;
    }
    schema
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(schema_ref_name)
        .and_then(|name| ctx.component_schema(&name))
        .map(description_of)
        .unwrap_or_default()
}
