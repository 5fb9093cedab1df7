//! Relationship definition resolution.

use super::attribute::{AttributeResolver, AttributeSet};
use crate::cache::ModelCache;
use crate::catalog::{Cardinality, RelationshipDef, RelationshipEndDef};
use crate::diagnostics::DiagnosticKind;
use serde::Serialize;
use std::collections::BTreeSet;

/// One resolved end of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRelationshipEnd {
    /// Participating entity type name in the catalog.
    pub type_name: String,
    /// Class name of the participating entity.
    pub class_name: String,
    /// Renamed role attribute name.
    pub attribute_name: String,
    /// Cardinality of this end.
    pub cardinality: Cardinality,
    /// Whether this end contains the other.
    pub is_container: bool,
}

/// A resolved relationship definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRelationshipModel {
    /// Name in the catalog.
    pub original_name: String,
    /// Generated class name.
    pub class_name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// First end.
    pub end1: ResolvedRelationshipEnd,
    /// Second end.
    pub end2: ResolvedRelationshipEnd,
    /// Attributes carried by the relationship itself.
    pub attributes: AttributeSet,
    /// Renamed names of map-valued attributes.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub map_attributes: BTreeSet<String>,
}

/// Resolve a relationship definition.
///
/// Entity names must already be registered so that both ends resolve to
/// assigned class names.
pub fn resolve_relationship(cache: &ModelCache, def: &RelationshipDef) -> ResolvedRelationshipModel {
    let config = cache.config();
    let mut model = ResolvedRelationshipModel {
        original_name: def.name.clone(),
        class_name: config.resolve_class_name(&def.name),
        description: def.description.clone(),
        end1: resolve_end(cache, &def.name, &def.end1),
        end2: resolve_end(cache, &def.name, &def.end2),
        attributes: AttributeSet::new(),
        map_attributes: BTreeSet::new(),
    };

    let resolver = AttributeResolver::for_relationship_defs(cache);
    for attribute in &def.attribute_defs {
        let resolved = resolver.resolve_attribute(&def.name, &def.name, attribute);
        if resolved.mapped_type.is_map() {
            model.map_attributes.insert(resolved.renamed_name.clone());
        }
        model
            .attributes
            .insert(resolved, &def.name, cache.diagnostics());
    }

    model
}

fn resolve_end(cache: &ModelCache, relationship: &str, end: &RelationshipEndDef) -> ResolvedRelationshipEnd {
    let config = cache.config();
    let class_name = match cache.cached_asset_class_name(&end.type_name) {
        Some(class_name) => class_name,
        None => {
            cache.diagnostics().record(
                DiagnosticKind::UnresolvedReference,
                relationship,
                end.type_name.as_str(),
                format!("end type of {} not registered", end.name),
            );
            config.resolve_class_name(&end.type_name)
        }
    };

    ResolvedRelationshipEnd {
        type_name: end.type_name.clone(),
        class_name,
        attribute_name: config.resolve_attribute_name(&end.name),
        cardinality: end.cardinality,
        is_container: end.is_container,
    }
}
