//! Struct resolution.
//!
//! Structs may reference each other, so every struct name is registered
//! before any struct's attributes are mapped.

use super::attribute::{AttributeResolver, AttributeSet};
use crate::cache::ModelCache;
use crate::catalog::StructDef;
use serde::Serialize;
use std::collections::BTreeSet;

/// A resolved struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStructModel {
    /// Name in the catalog.
    pub original_name: String,
    /// Generated class name.
    pub class_name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes ordered by renamed name.
    pub attributes: AttributeSet,
    /// Renamed names of map-valued attributes.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub map_attributes: BTreeSet<String>,
}

impl ResolvedStructModel {
    /// A model with a name and no attributes.
    pub fn named(original_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            class_name: class_name.into(),
            description: None,
            attributes: AttributeSet::new(),
            map_attributes: BTreeSet::new(),
        }
    }
}

/// Register the class name of every struct definition.
pub fn resolve_struct_names(cache: &ModelCache) {
    for def in cache.struct_defs() {
        let class_name = cache.config().resolve_class_name(&def.name);
        cache.register_struct(ResolvedStructModel::named(def.name.clone(), class_name));
    }
}

/// Resolve the attributes of a struct whose name is already registered.
pub fn resolve_struct(cache: &ModelCache, def: &StructDef) -> ResolvedStructModel {
    let mut model = cache.cached_struct(&def.name).unwrap_or_else(|| {
        ResolvedStructModel::named(def.name.clone(), cache.config().resolve_class_name(&def.name))
    });
    model.description = def.description.clone();

    let resolver = AttributeResolver::for_assets(cache);
    for attribute in &def.attribute_defs {
        let resolved = resolver.resolve_attribute(&def.name, &def.name, attribute);
        if resolved.mapped_type.is_map() {
            model.map_attributes.insert(resolved.renamed_name.clone());
        }
        model
            .attributes
            .insert(resolved, &def.name, cache.diagnostics());
    }

    tracing::debug!(
        name = %def.name,
        attributes = model.attributes.len(),
        "resolved struct"
    );
    model
}
