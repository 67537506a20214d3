//! Mutable state of one generation run.

use super::resolve::TypeDescriptor;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Classification of a named component schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// Stands for another type; references are substituted transparently
    Alias,
    /// Emitted as a class
    Object,
    /// Emitted as an enum
    Enum,
}

/// What the generator knows about one named component schema.
#[derive(Debug, Clone)]
pub struct SchemaTypeInfo {
    /// Name under `components.schemas`
    pub source_name: String,
    /// Reserved C# type name
    pub type_name: String,
    pub kind: SchemaKind,
    /// Underlying type of an alias, without the `?` marker. Filled lazily.
    pub alias: Option<TypeDescriptor>,
    /// Stringified `enum` literals in declaration order
    pub enum_values: Vec<String>,
}

/// Inline schema waiting to be turned into a model.
#[derive(Debug, Clone)]
pub struct PendingModel {
    pub name: String,
    pub schema: Value,
}

/// Owner of the schema table, name registry, inline work-list and error-model set.
///
/// One context lives for exactly one run; nothing leaks between runs.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    components: &'a BTreeMap<String, Value>,
    schema_types: BTreeMap<String, SchemaTypeInfo>,
    model_names: BTreeSet<String>,
    pending: VecDeque<PendingModel>,
    error_models: BTreeSet<String>,
    aliases_in_progress: BTreeSet<String>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(components: &'a BTreeMap<String, Value>) -> Self {
        GenerationContext {
            components,
            schema_types: BTreeMap::new(),
            model_names: BTreeSet::new(),
            pending: VecDeque::new(),
            error_models: BTreeSet::new(),
            aliases_in_progress: BTreeSet::new(),
        }
    }

    /// Component schemas keyed by source name.
    pub fn components(&self) -> &'a BTreeMap<String, Value> {
        self.components
    }

    pub fn component_schema(&self, source_name: &str) -> Option<&'a Value> {
        self.components.get(source_name)
    }

    pub fn schema_info(&self, source_name: &str) -> Option<&SchemaTypeInfo> {
        self.schema_types.get(source_name)
    }

    pub fn schema_infos(&self) -> impl Iterator<Item = &SchemaTypeInfo> {
        self.schema_types.values()
    }

    pub(crate) fn register_schema(&mut self, info: SchemaTypeInfo) {
        self.schema_types.insert(info.source_name.clone(), info);
    }

    pub(crate) fn set_alias(&mut self, source_name: &str, target: TypeDescriptor) {
        if let Some(info) = self.schema_types.get_mut(source_name) {
            info.alias = Some(target);
        }
    }

    /// Returns `false` when `source_name` is already being resolved (a cycle).
    pub(crate) fn begin_alias(&mut self, source_name: &str) -> bool {
        self.aliases_in_progress.insert(source_name.to_string())
    }

    pub(crate) fn end_alias(&mut self, source_name: &str) {
        self.aliases_in_progress.remove(source_name);
    }

    /// Reserve a unique type name: `hint`, then `hint2`, `hint3`, ...
    pub fn reserve_model_name(&mut self, hint: &str) -> String {
        if self.model_names.insert(hint.to_string()) {
            return hint.to_string();
        }
        let mut index = 2usize;
        loop {
            let candidate = format!("{hint}{index}");
            if self.model_names.insert(candidate.clone()) {
                return candidate;
            }
            index += 1;
        }
    }

    pub fn is_reserved_name(&self, name: &str) -> bool {
        self.model_names.contains(name)
    }

    pub(crate) fn enqueue(&mut self, name: String, schema: Value) {
        self.pending.push_back(PendingModel { name, schema });
    }

    pub(crate) fn next_pending(&mut self) -> Option<PendingModel> {
        self.pending.pop_front()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn mark_error_model(&mut self, type_name: &str) {
        self.error_models.insert(type_name.to_string());
    }

    pub fn is_error_model(&self, type_name: &str) -> bool {
        self.error_models.contains(type_name)
    }
}
