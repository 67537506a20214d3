//! # Type Resolver
//!
//! Maps a schema node to a C# [`TypeDescriptor`].
//!
//! Schemas arrive as [`serde_json::Value`] nodes and are first classified into
//! a closed [`SchemaShape`]; every shape has exactly one mapping rule. The
//! `resolve_inline` entry point additionally promotes anonymous composite
//! schemas (those declaring `properties` or `allOf`) to named models by
//! reserving a name and queueing the schema on the context's work-list.
//!
//! | Shape                     | C# type                                  | Value type |
//! |---------------------------|------------------------------------------|------------|
//! | string                    | `string`                                 | no         |
//! | string `date-time`        | `DateTimeOffset`                         | yes        |
//! | string `date`             | `DateTime`                               | yes        |
//! | string `uuid`             | `Guid`                                   | yes        |
//! | string `byte` / `binary`  | `byte[]`                                 | no         |
//! | integer / `int64`         | `int` / `long`                           | yes        |
//! | number / `float`/`double` | `decimal` / `float` / `double`           | yes        |
//! | boolean                   | `bool`                                   | yes        |
//! | array                     | `IEnumerable<T>`                         | no         |
//! | object + schema map       | `IDictionary<string, T>`                 | no         |
//! | object + `true` map       | `IDictionary<string, JsonElement>`       | no         |
//! | anything else             | `JsonDocument`                           | no         |

use super::context::{GenerationContext, SchemaKind};
use super::models::create_inline_model;
use crate::spec::schema_ref_name;
use serde_json::Value;

/// Opaque fallback for schemas that carry no usable type information.
pub const JSON_DOCUMENT: &str = "JsonDocument";
/// Element type of open (`additionalProperties: true`) maps.
pub const JSON_ELEMENT: &str = "JsonElement";

/// A resolved C# type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Type name, ending in `?` when nullable
    pub type_name: String,
    pub nullable: bool,
    pub is_value_type: bool,
    pub is_collection: bool,
}

impl TypeDescriptor {
    pub fn value(name: impl Into<String>) -> Self {
        TypeDescriptor {
            type_name: name.into(),
            nullable: false,
            is_value_type: true,
            is_collection: false,
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeDescriptor {
            type_name: name.into(),
            nullable: false,
            is_value_type: false,
            is_collection: false,
        }
    }

    pub fn collection(name: impl Into<String>) -> Self {
        TypeDescriptor {
            is_collection: true,
            ..TypeDescriptor::reference(name)
        }
    }

    pub fn json_document() -> Self {
        TypeDescriptor::reference(JSON_DOCUMENT)
    }

    /// Apply the requiredness of the use site: optional types get a single `?`.
    pub fn with_required(mut self, required: bool) -> Self {
        if !required {
            if !self.type_name.ends_with('?') {
                self.type_name.push('?');
            }
            self.nullable = true;
        }
        self
    }

    /// Drop the nullability marker.
    pub fn into_required(mut self) -> Self {
        if let Some(stripped) = self.type_name.strip_suffix('?') {
            self.type_name = stripped.to_string();
        }
        self.nullable = false;
        self
    }

    /// Type name without the `?` marker.
    pub fn base_name(&self) -> &str {
        self.type_name.strip_suffix('?').unwrap_or(&self.type_name)
    }

    /// `true` if the type mentions `JsonDocument` or `JsonElement`.
    pub fn uses_json(&self) -> bool {
        self.type_name.contains(JSON_DOCUMENT) || self.type_name.contains(JSON_ELEMENT)
    }
}

/// Structural classification of a schema node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaShape<'s> {
    /// `$ref` to another schema
    Reference(&'s str),
    Text { format: Option<&'s str> },
    Integer { format: Option<&'s str> },
    Number { format: Option<&'s str> },
    Boolean,
    Array { items: Option<&'s Value> },
    /// Object whose `additionalProperties` is a schema
    TypedMap(&'s Value),
    /// Object with `additionalProperties: true`
    OpenMap,
    /// Object with a fixed property set, or none at all
    Object,
    /// No recognisable type information
    Untyped,
}

impl<'s> SchemaShape<'s> {
    pub fn of(schema: &'s Value) -> Self {
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            return SchemaShape::Reference(reference);
        }
        let format = schema.get("format").and_then(Value::as_str);
        let items = schema.get("items").filter(|items| items.is_object());
        match primary_type(schema) {
            Some("string") => SchemaShape::Text { format },
            Some("integer") => SchemaShape::Integer { format },
            Some("number") => SchemaShape::Number { format },
            Some("boolean") => SchemaShape::Boolean,
            Some("array") => SchemaShape::Array { items },
            Some("object") => object_shape(schema),
            Some(_) => SchemaShape::Untyped,
            None if items.is_some() => SchemaShape::Array { items },
            None if defines_structure(schema) || schema.get("additionalProperties").is_some() => {
                object_shape(schema)
            }
            None => SchemaShape::Untyped,
        }
    }
}

fn object_shape(schema: &Value) -> SchemaShape<'_> {
    match schema.get("additionalProperties") {
        Some(value @ Value::Object(_)) => SchemaShape::TypedMap(value),
        Some(Value::Bool(true)) => SchemaShape::OpenMap,
        _ => SchemaShape::Object,
    }
}

/// First non-`null` entry of `type`, which may be a string or an array.
fn primary_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(ty) => Some(ty.as_str()),
        Value::Array(types) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            let first = names.iter().copied().find(|ty| *ty != "null");
            first.or_else(|| names.first().copied())
        }
        _ => None,
    }
}

/// `nullable: true`, or `null` listed among the types.
pub fn is_nullable(schema: &Value) -> bool {
    if schema.get("nullable").and_then(Value::as_bool) == Some(true) {
        return true;
    }
    match schema.get("type") {
        Some(Value::String(ty)) => ty == "null",
        Some(Value::Array(types)) => types.iter().any(|ty| ty.as_str() == Some("null")),
        _ => false,
    }
}

/// `true` when the schema declares properties or `allOf` composition.
pub fn defines_structure(schema: &Value) -> bool {
    let has_properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|props| !props.is_empty());
    let has_all_of = schema
        .get("allOf")
        .and_then(Value::as_array)
        .is_some_and(|branches| !branches.is_empty());
    has_properties || has_all_of
}

/// Resolve `schema` without synthesizing inline models.
pub fn resolve(ctx: &mut GenerationContext<'_>, schema: &Value, required: bool) -> TypeDescriptor {
    resolve_with(ctx, schema, required, None)
}

/// Resolve `schema`, promoting an anonymous composite schema to a model named after `hint`.
pub fn resolve_inline(
    ctx: &mut GenerationContext<'_>,
    schema: &Value,
    required: bool,
    hint: &str,
) -> TypeDescriptor {
    resolve_with(ctx, schema, required, Some(hint))
}

fn resolve_with(
    ctx: &mut GenerationContext<'_>,
    schema: &Value,
    required: bool,
    hint: Option<&str>,
) -> TypeDescriptor {
    let required = required && !is_nullable(schema);

    if let Some(hint) = hint {
        if schema.get("$ref").is_none() && defines_structure(schema) {
            let name = create_inline_model(ctx, hint, schema);
            return TypeDescriptor::reference(name).with_required(required);
        }
    }

    let descriptor = match SchemaShape::of(schema) {
        SchemaShape::Reference(reference) => reference_type(ctx, reference),
        SchemaShape::Text { format } => match format {
            Some("date-time") => TypeDescriptor::value("DateTimeOffset"),
            Some("date") => TypeDescriptor::value("DateTime"),
            Some("uuid") => TypeDescriptor::value("Guid"),
            Some("byte") | Some("binary") => TypeDescriptor::reference("byte[]"),
            _ => TypeDescriptor::reference("string"),
        },
        SchemaShape::Integer { format } => match format {
            Some("int64") => TypeDescriptor::value("long"),
            _ => TypeDescriptor::value("int"),
        },
        SchemaShape::Number { format } => match format {
            Some("float") => TypeDescriptor::value("float"),
            Some("double") => TypeDescriptor::value("double"),
            _ => TypeDescriptor::value("decimal"),
        },
        SchemaShape::Boolean => TypeDescriptor::value("bool"),
        SchemaShape::Array { items } => {
            let item_hint = hint.map(|h| format!("{h}Item"));
            let item = match items {
                Some(items) => resolve_with(ctx, items, true, item_hint.as_deref()),
                None => TypeDescriptor::json_document(),
            };
            TypeDescriptor::collection(format!("IEnumerable<{}>", item.base_name()))
        }
        SchemaShape::TypedMap(values) => {
            let value_hint = hint.map(|h| format!("{h}Value"));
            let value = resolve_with(ctx, values, true, value_hint.as_deref());
            TypeDescriptor::collection(format!("IDictionary<string, {}>", value.base_name()))
        }
        SchemaShape::OpenMap => {
            TypeDescriptor::collection(format!("IDictionary<string, {JSON_ELEMENT}>"))
        }
        SchemaShape::Object | SchemaShape::Untyped => TypeDescriptor::json_document(),
    };
    descriptor.with_required(required)
}

fn reference_type(ctx: &mut GenerationContext<'_>, reference: &str) -> TypeDescriptor {
    let Some(source_name) = schema_ref_name(reference) else {
        tracing::warn!(reference, "unsupported schema reference, using JsonDocument");
        return TypeDescriptor::json_document();
    };
    let Some(info) = ctx.schema_info(&source_name) else {
        tracing::warn!(reference, "unresolved schema reference, using JsonDocument");
        return TypeDescriptor::json_document();
    };
    let (kind, type_name) = (info.kind, info.type_name.clone());
    match kind {
        SchemaKind::Enum => TypeDescriptor::value(type_name),
        SchemaKind::Object => TypeDescriptor::reference(type_name),
        SchemaKind::Alias => alias_target(ctx, &source_name),
    }
}

/// Underlying type of an alias schema, resolved on first use and cached.
pub(crate) fn alias_target(ctx: &mut GenerationContext<'_>, source_name: &str) -> TypeDescriptor {
    if let Some(target) = ctx.schema_info(source_name).and_then(|info| info.alias.clone()) {
        return target;
    }
    let Some(schema) = ctx.component_schema(source_name) else {
        return TypeDescriptor::json_document();
    };
    if !ctx.begin_alias(source_name) {
        tracing::warn!(schema = source_name, "cyclic alias, using JsonDocument");
        return TypeDescriptor::json_document();
    }
    let target = resolve(ctx, schema, true).into_required();
    ctx.end_alias(source_name);
    ctx.set_alias(source_name, target.clone());
    target
}
