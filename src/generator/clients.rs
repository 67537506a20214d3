//! # Operation/Client Assembler
//!
//! Groups operations into clients by their first tag and builds one
//! [`OperationRecord`] per operation: parameters, request body, response type
//! and mode, and the error-type mapping.

use super::context::GenerationContext;
use super::records::{
    BodyRecord, ClientRecord, ErrorMappingRecord, MethodParameterRecord, OperationRecord,
    ParameterLocation, ParameterRecord, ResponseMode,
};
use super::resolve::{resolve, resolve_inline, TypeDescriptor, JSON_DOCUMENT};
use crate::error::{GenerateError, Result};
use crate::naming::{csharp_string_literal, doc_text, identifier, pascal_identifier};
use crate::spec::{
    resolve_parameter_ref, resolve_request_body_ref, resolve_response_ref, schema_value, ApiDocument,
};
use oas3::spec::{
    MediaType, ObjectOrReference, ObjectSchema, Operation, Parameter, ParameterIn, PathItem, Response,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Client receiving operations without tags.
pub const DEFAULT_CLIENT: &str = "Core";

const BODY_ARG: &str = "body";
const BODY_DESCRIPTION: &str = "Request body payload.";
// Names used by the generated method bodies; parameters must not shadow them.
const RESERVED_ARGS: [&str; 4] = [BODY_ARG, "builder", "request", "cancellationToken"];

/// Build every client, ordered by name, with operations ordered by method name.
///
/// Fails with [`GenerateError::NoOperations`] when the document declares no
/// operation at all.
pub fn build_clients(doc: &ApiDocument, ctx: &mut GenerationContext<'_>) -> Result<Vec<ClientRecord>> {
    let Some(paths) = doc.spec.paths.as_ref().filter(|_| doc.operation_count() > 0) else {
        return Err(GenerateError::NoOperations);
    };

    let mut clients: BTreeMap<String, ClientRecord> = BTreeMap::new();
    let mut method_names: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (path, item) in paths {
        for (method, operation) in item.methods() {
            let http_method = method.as_str().to_ascii_uppercase();
            let client_name = client_name_for(operation);
            let base_name = operation_base_name(&http_method, path, operation);
            let method_name = unique_method_name(
                method_names.entry(client_name.clone()).or_default(),
                &base_name,
            );

            let site = OperationSite {
                path,
                http_method,
                method_name,
                client_name: client_name.clone(),
                operation,
                item,
            };
            let record = build_operation(doc, ctx, &site)?;
            tracing::debug!(
                client = %client_name,
                method = %record.method_name,
                http_method = %record.http_method,
                path = %record.path,
                "built operation"
            );

            let client = clients.entry(client_name.clone()).or_insert_with(|| ClientRecord {
                client_name: client_name.clone(),
                property_name: client_name.clone(),
                operations: Vec::new(),
                uses_collections: false,
                uses_error_responses: false,
            });
            client.uses_collections |= record.uses_collections;
            client.uses_error_responses |= !record.error_mappings.is_empty();
            client.operations.push(record);
        }
    }

    Ok(clients
        .into_values()
        .map(|mut client| {
            client.operations.sort_by(|a, b| a.method_name.cmp(&b.method_name));
            client
        })
        .collect())
}

struct OperationSite<'d> {
    path: &'d str,
    http_method: String,
    method_name: String,
    client_name: String,
    operation: &'d Operation,
    item: &'d PathItem,
}

impl OperationSite<'_> {
    fn label(&self) -> String {
        self.operation
            .operation_id
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.http_method, self.path))
    }
}

fn client_name_for(operation: &Operation) -> String {
    operation
        .tags
        .first()
        .filter(|tag| !tag.trim().is_empty())
        .map(|tag| pascal_identifier(tag))
        .unwrap_or_else(|| DEFAULT_CLIENT.to_string())
}

/// `x-codegen.method_name`, then `operationId`, then `{Method}_{path}` without braces.
pub fn operation_base_name(http_method: &str, path: &str, operation: &Operation) -> String {
    let directive = operation
        .extensions
        .get("x-codegen")
        .or_else(|| operation.extensions.get("codegen"))
        .and_then(|codegen| codegen.get("method_name"))
        .and_then(Value::as_str);
    let usable = |name: &&str| name.chars().any(|c| c.is_ascii_alphanumeric());
    let declared = directive
        .filter(usable)
        .or_else(|| operation.operation_id.as_deref().filter(usable));
    match declared {
        Some(name) => pascal_identifier(name),
        None => synthesized_operation_name(http_method, path),
    }
}

fn synthesized_operation_name(http_method: &str, path: &str) -> String {
    let combined = format!("{http_method}_{path}").replace(['{', '}'], "");
    pascal_identifier(&combined)
}

fn unique_method_name(used: &mut BTreeSet<String>, base: &str) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
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

/// C# expression constructing the `HttpMethod` for `method`.
pub fn http_method_expression(method: &str) -> String {
    match method.to_ascii_lowercase().as_str() {
        "get" => "HttpMethod.Get".to_string(),
        "post" => "HttpMethod.Post".to_string(),
        "put" => "HttpMethod.Put".to_string(),
        "delete" => "HttpMethod.Delete".to_string(),
        "options" => "HttpMethod.Options".to_string(),
        "head" => "HttpMethod.Head".to_string(),
        "trace" => "HttpMethod.Trace".to_string(),
        other => format!("new HttpMethod(\"{}\")", other.to_ascii_uppercase()),
    }
}

fn build_operation(
    doc: &ApiDocument,
    ctx: &mut GenerationContext<'_>,
    site: &OperationSite<'_>,
) -> Result<OperationRecord> {
    let (path_params, query_params, header_params) = build_parameters(doc, ctx, site)?;
    let body = build_body(doc, ctx, site)?;
    let responses = collect_responses(doc, site);
    let (response, response_mode) = resolve_response(ctx, site, &responses);
    let error_mappings = resolve_error_mappings(ctx, site, &responses);

    let mut parameters: Vec<MethodParameterRecord> = path_params
        .iter()
        .chain(&query_params)
        .chain(&header_params)
        .map(|p| MethodParameterRecord {
            name: p.arg_name.clone(),
            signature: p.declaration.clone(),
            description: p.description.clone(),
            required: p.required,
        })
        .collect();
    if let Some(body) = &body {
        parameters.push(MethodParameterRecord {
            name: body.arg_name.clone(),
            signature: body.signature.clone(),
            description: if body.description.is_empty() {
                BODY_DESCRIPTION.to_string()
            } else {
                body.description.clone()
            },
            required: body.required,
        });
    }
    // C# requires optional arguments after required ones; sort is stable.
    parameters.sort_by_key(|p| !p.required);

    let uses_collections = path_params
        .iter()
        .chain(&query_params)
        .chain(&header_params)
        .any(|p| p.is_collection)
        || body.as_ref().is_some_and(|b| b.is_collection)
        || response.is_collection;

    let summary = site
        .operation
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(doc_text)
        .unwrap_or_else(|| format!("{} {}", site.http_method, site.path));
    let return_type = match response_mode {
        ResponseMode::Text => "string".to_string(),
        _ => response.base_name().to_string(),
    };

    Ok(OperationRecord {
        method_name: site.method_name.clone(),
        http_method_expr: http_method_expression(&site.http_method),
        http_method: site.http_method.clone(),
        path: site.path.to_string(),
        path_literal: csharp_string_literal(site.path),
        summary,
        description: site
            .operation
            .description
            .as_deref()
            .map(doc_text)
            .unwrap_or_default(),
        path_params,
        query_params,
        header_params,
        parameters,
        body,
        response_type: response.type_name,
        return_type,
        response_mode,
        error_mappings,
        uses_collections,
    })
}

type ParameterLists = (Vec<ParameterRecord>, Vec<ParameterRecord>, Vec<ParameterRecord>);

/// Path-item parameters first, then operation parameters; an operation
/// parameter with the same location and name replaces the earlier one in place.
fn build_parameters(
    doc: &ApiDocument,
    ctx: &mut GenerationContext<'_>,
    site: &OperationSite<'_>,
) -> Result<ParameterLists> {
    let mut merged: Vec<(ParameterLocation, &Parameter)> = Vec::new();
    for param_ref in site.item.parameters.iter().chain(&site.operation.parameters) {
        let param = match param_ref {
            ObjectOrReference::Object(param) => param,
            ObjectOrReference::Ref { ref_path, .. } => resolve_parameter_ref(doc, ref_path)
                .ok_or_else(|| GenerateError::UnresolvedParameter {
                    operation: site.label(),
                    reference: ref_path.clone(),
                })?,
        };
        let location = match param.location {
            ParameterIn::Path => ParameterLocation::Path,
            ParameterIn::Query => ParameterLocation::Query,
            ParameterIn::Header => ParameterLocation::Header,
            ParameterIn::Cookie => {
                tracing::debug!(operation = %site.label(), parameter = %param.name, "cookie parameter ignored");
                continue;
            }
        };
        match merged
            .iter_mut()
            .find(|(loc, existing)| *loc == location && existing.name == param.name)
        {
            Some(slot) => slot.1 = param,
            None => merged.push((location, param)),
        }
    }

    let mut used_args: BTreeSet<String> = RESERVED_ARGS.iter().map(|s| s.to_string()).collect();
    let (mut path, mut query, mut header) = (Vec::new(), Vec::new(), Vec::new());
    for (location, param) in merged {
        let record = convert_parameter(ctx, location, param, &mut used_args);
        match location {
            ParameterLocation::Path => path.push(record),
            ParameterLocation::Query => query.push(record),
            ParameterLocation::Header => header.push(record),
        }
    }
    Ok((path, query, header))
}

fn convert_parameter(
    ctx: &mut GenerationContext<'_>,
    location: ParameterLocation,
    param: &Parameter,
    used_args: &mut BTreeSet<String>,
) -> ParameterRecord {
    // Path parameters are always required.
    let required = param.required.unwrap_or(false) || location == ParameterLocation::Path;
    let ty = match &param.schema {
        Some(schema) => resolve(ctx, &schema_value(schema), required),
        None => TypeDescriptor::json_document().with_required(required),
    };
    let arg_name = unique_method_name(used_args, &identifier(&param.name));
    let default_value = if required { "" } else { " = null" };
    ParameterRecord {
        location,
        declaration: format!("{} {arg_name}{default_value}", ty.type_name),
        builder_call: format!(
            "builder.{}(\"{}\", {arg_name});",
            location.builder_method(),
            csharp_string_literal(&param.name)
        ),
        name: param.name.clone(),
        arg_name,
        type_name: ty.type_name,
        description: param.description.as_deref().map(doc_text).unwrap_or_default(),
        required,
        is_collection: ty.is_collection,
    }
}

fn build_body(
    doc: &ApiDocument,
    ctx: &mut GenerationContext<'_>,
    site: &OperationSite<'_>,
) -> Result<Option<BodyRecord>> {
    let Some(body_ref) = &site.operation.request_body else {
        return Ok(None);
    };
    let body = match body_ref {
        ObjectOrReference::Object(body) => body,
        ObjectOrReference::Ref { ref_path, .. } => resolve_request_body_ref(doc, ref_path)
            .ok_or_else(|| GenerateError::UnresolvedRequestBody {
                operation: site.label(),
                reference: ref_path.clone(),
            })?,
    };
    let Some((content_type, schema)) = preferred_schema(&body.content) else {
        return Ok(None);
    };
    let required = body.required.unwrap_or(false);
    let hint = format!("{}{}Request", site.client_name, site.method_name);
    let ty = resolve_inline(ctx, &schema_value(schema), required, &hint);
    let default_value = if required { "" } else { " = null" };
    Ok(Some(BodyRecord {
        arg_name: BODY_ARG.to_string(),
        signature: format!("{} {BODY_ARG}{default_value}", ty.type_name),
        description: body.description.as_deref().map(doc_text).unwrap_or_default(),
        required,
        content_type: content_type.to_string(),
        is_collection: ty.is_collection,
        type_name: ty.type_name,
    }))
}

/// `application/json` when it carries a schema, else the first media type that does.
pub fn preferred_schema(
    content: &BTreeMap<String, MediaType>,
) -> Option<(&str, &ObjectOrReference<ObjectSchema>)> {
    if let Some(schema) = content.get("application/json").and_then(|m| m.schema.as_ref()) {
        return Some(("application/json", schema));
    }
    content
        .iter()
        .find_map(|(media_type, media)| media.schema.as_ref().map(|s| (media_type.as_str(), s)))
}

/// Responses keyed by status code with references resolved. Unresolvable
/// response references are skipped.
fn collect_responses<'d>(doc: &'d ApiDocument, site: &OperationSite<'d>) -> Vec<(&'d str, &'d Response)> {
    let Some(responses) = site.operation.responses.as_ref() else {
        return Vec::new();
    };
    responses
        .iter()
        .filter_map(|(code, response_ref)| {
            let response = match response_ref {
                ObjectOrReference::Object(response) => Some(response),
                ObjectOrReference::Ref { ref_path, .. } => {
                    let resolved = resolve_response_ref(doc, ref_path);
                    if resolved.is_none() {
                        tracing::warn!(operation = %site.label(), reference = %ref_path, "unresolved response reference skipped");
                    }
                    resolved
                }
            };
            response.map(|r| (code.as_str(), r))
        })
        .collect()
}

fn is_default_code(code: &str) -> bool {
    code.eq_ignore_ascii_case("default")
}

fn is_numeric_status(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Response type and mode: the first 2xx response (lexicographic) with a
/// schema, else the default response with a schema, else `JsonDocument`.
fn resolve_response(
    ctx: &mut GenerationContext<'_>,
    site: &OperationSite<'_>,
    responses: &[(&str, &Response)],
) -> (TypeDescriptor, ResponseMode) {
    let success = responses.iter().filter(|(code, _)| code.starts_with('2'));
    let default = responses.iter().filter(|(code, _)| is_default_code(code));
    let prefix = format!("{}{}", site.client_name, site.method_name);

    let candidates = success
        .clone()
        .map(|entry| (entry, format!("{prefix}Response")))
        .chain(default.clone().map(|entry| (entry, format!("{prefix}ResponseDefault"))));
    for ((_, response), hint) in candidates {
        if let Some((content_type, schema)) = preferred_schema(&response.content) {
            let ty = resolve_inline(ctx, &schema_value(schema), true, &hint);
            let mode = response_mode(&ty, content_type);
            return (ty, mode);
        }
    }

    let mode = success
        .chain(default)
        .next()
        .map(|(_, response)| match response.content.keys().next() {
            None => ResponseMode::None,
            Some(content_type) if is_text(content_type) => ResponseMode::Text,
            Some(_) => ResponseMode::JsonDocument,
        })
        .unwrap_or(ResponseMode::None);
    (TypeDescriptor::json_document(), mode)
}

fn is_text(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/")
}

fn response_mode(ty: &TypeDescriptor, content_type: &str) -> ResponseMode {
    match ty.base_name() {
        "string" => ResponseMode::Text,
        JSON_DOCUMENT if is_text(content_type) => ResponseMode::Text,
        JSON_DOCUMENT => ResponseMode::JsonDocument,
        _ => ResponseMode::Json,
    }
}

/// Non-2xx codes in order, then `default`. Codes that are neither three
/// digits nor `default` get no mapping.
fn resolve_error_mappings(
    ctx: &mut GenerationContext<'_>,
    site: &OperationSite<'_>,
    responses: &[(&str, &Response)],
) -> Vec<ErrorMappingRecord> {
    let codes = responses
        .iter()
        .filter(|(code, _)| !code.starts_with('2') && !is_default_code(code))
        .chain(responses.iter().filter(|(code, _)| is_default_code(code)));

    let mut mappings = Vec::new();
    for (code, response) in codes {
        let is_default = is_default_code(code);
        if !is_default && !is_numeric_status(code) {
            tracing::warn!(
                operation = %site.label(),
                status = %code,
                "status code pattern is not mapped to an error type"
            );
            continue;
        }
        let Some((_, schema)) = preferred_schema(&response.content) else {
            continue;
        };
        let suffix = if is_default { "Default" } else { *code };
        let hint = format!("{}{}Error{suffix}", site.client_name, site.method_name);
        let ty = resolve_inline(ctx, &schema_value(schema), true, &hint);
        let error_type = ty.base_name().to_string();
        ctx.mark_error_model(&error_type);
        mappings.push(ErrorMappingRecord {
            status_literal: (!is_default).then(|| code.to_string()),
            error_type,
            is_default,
        });
    }
    mappings
}
