//! Attribute and relationship attribute resolution.

use super::search::{IndexType, SearchClassification, SearchClassifier};
use crate::cache::ModelCache;
use crate::catalog::{AttributeDef, RelationshipAttributeDef};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::mapper::{map_type, MappedType, TypeKind};
use serde::Serialize;
use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

/// A fully resolved attribute or relationship attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAttribute {
    /// Name as declared in the catalog.
    pub original_name: String,
    /// Name after renaming.
    pub renamed_name: String,
    /// Type that declared the attribute.
    pub owner: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mapped type.
    pub mapped_type: MappedType,
    /// Whether a type override replaced the natural mapped type.
    pub retyped: bool,
    /// Search index classification.
    pub search: SearchClassification,
    /// Whether the attribute is inherited by the type being resolved.
    pub inherited: bool,
    /// Whether this is a relationship attribute.
    pub is_relationship: bool,
    /// Relationship def defining the attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type_name: Option<String>,
    /// Class name of that relationship def, if it was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_class_name: Option<String>,
    /// Singular form, for multi-valued attributes that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singular_name: Option<String>,
}

/// Resolved attributes keyed by renamed name.
///
/// The first attribute inserted under a name is kept; later ones are reported
/// as conflicts and discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    entries: BTreeMap<String, ResolvedAttribute>,
}

impl AttributeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, returning false if the name was already taken.
    pub fn insert(
        &mut self,
        attribute: ResolvedAttribute,
        owner: &str,
        diagnostics: &Diagnostics,
    ) -> bool {
        match self.entries.entry(attribute.renamed_name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(attribute);
                true
            }
            Entry::Occupied(existing) => {
                let kept = existing.get();
                diagnostics.record(
                    DiagnosticKind::Conflict,
                    owner,
                    attribute.renamed_name.as_str(),
                    format!(
                        "kept {}.{}:{}, discarded {}.{}:{}",
                        kept.owner,
                        kept.original_name,
                        kept.mapped_type.base,
                        attribute.owner,
                        attribute.original_name,
                        attribute.mapped_type.base
                    ),
                );
                false
            }
        }
    }

    /// Get an attribute by renamed name.
    pub fn get(&self, renamed_name: &str) -> Option<&ResolvedAttribute> {
        self.entries.get(renamed_name)
    }

    /// Check if an attribute with this renamed name is present.
    pub fn contains(&self, renamed_name: &str) -> bool {
        self.entries.contains_key(renamed_name)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renamed names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Attributes ordered by renamed name.
    pub fn iter(&self) -> btree_map::Values<'_, String, ResolvedAttribute> {
        self.entries.values()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a ResolvedAttribute;
    type IntoIter = btree_map::Values<'a, String, ResolvedAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Applies renaming, overrides and search classification to attributes.
pub struct AttributeResolver<'a> {
    cache: &'a ModelCache,
    string_default: IndexType,
}

impl<'a> AttributeResolver<'a> {
    /// Resolver for entity and struct attributes; plain strings are keywords.
    pub fn for_assets(cache: &'a ModelCache) -> Self {
        Self {
            cache,
            string_default: IndexType::Keyword,
        }
    }

    /// Resolver for a relationship def's own attributes; plain strings are text.
    pub fn for_relationship_defs(cache: &'a ModelCache) -> Self {
        Self {
            cache,
            string_default: IndexType::Text,
        }
    }

    /// Resolve an attribute of `owning_type` declared by `declared_by`.
    pub fn resolve_attribute(
        &self,
        owning_type: &str,
        declared_by: &str,
        def: &AttributeDef,
    ) -> ResolvedAttribute {
        let (mapped_type, retyped) = self.map_with_overrides(owning_type, def);
        let search = SearchClassifier::new(self.cache.diagnostics(), owning_type, self.string_default)
            .classify_attribute(def, &mapped_type);
        self.build(owning_type, declared_by, def, mapped_type, retyped, search, None)
    }

    /// Resolve a relationship attribute of `owning_type` declared by `declared_by`.
    pub fn resolve_relationship(
        &self,
        owning_type: &str,
        declared_by: &str,
        def: &RelationshipAttributeDef,
    ) -> ResolvedAttribute {
        let attribute = &def.attribute;
        let (mapped_type, retyped) = self.map_with_overrides(owning_type, attribute);
        let searchable_as = self.cache.config().searchable_relationship(&attribute.name);
        let search = SearchClassifier::new(self.cache.diagnostics(), owning_type, self.string_default)
            .classify_relationship(&attribute.name, &def.relationship_type_name, searchable_as);
        self.build(
            owning_type,
            declared_by,
            attribute,
            mapped_type,
            retyped,
            search,
            Some(def.relationship_type_name.clone()),
        )
    }

    fn map_with_overrides(&self, owning_type: &str, def: &AttributeDef) -> (MappedType, bool) {
        let config = self.cache.config();
        let mut mapped = map_type(self.cache, &def.type_name);

        if let Some(enum_name) = config.enum_override(&def.name) {
            let class_name = self
                .cache
                .cached_enum(enum_name)
                .map(|model| model.class_name)
                .unwrap_or_else(|| config.resolve_class_name(enum_name));
            mapped = MappedType {
                kind: TypeKind::Enum,
                name: class_name,
                base: enum_name.to_string(),
                container: mapped.container,
            };
        }

        if let Some(replacement) = config.type_override(owning_type, &def.name) {
            tracing::debug!(
                owner = owning_type,
                attribute = %def.name,
                replacement,
                "applying type override"
            );
            let class_name = self
                .cache
                .cached_asset_class_name(replacement)
                .unwrap_or_else(|| replacement.to_string());
            mapped = MappedType {
                kind: TypeKind::Asset,
                name: class_name,
                base: replacement.to_string(),
                container: mapped.container,
            };
            return (mapped, true);
        }

        (mapped, false)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        owning_type: &str,
        declared_by: &str,
        def: &AttributeDef,
        mapped_type: MappedType,
        retyped: bool,
        search: SearchClassification,
        relationship_type_name: Option<String>,
    ) -> ResolvedAttribute {
        let config = self.cache.config();
        let renamed_name = config.resolve_attribute_name(&def.name);
        let singular_name = if mapped_type.is_multi_valued() {
            Some(config.resolve_singular_form(&renamed_name)).filter(|s| !s.is_empty())
        } else {
            None
        };

        let relationship_class_name = relationship_type_name
            .as_deref()
            .and_then(|name| self.cache.cached_relationship(name))
            .map(|model| model.class_name);

        ResolvedAttribute {
            original_name: def.name.clone(),
            renamed_name,
            owner: declared_by.to_string(),
            description: def.description.clone(),
            mapped_type,
            retyped,
            search,
            inherited: declared_by != owning_type,
            is_relationship: relationship_type_name.is_some(),
            relationship_type_name,
            relationship_class_name,
            singular_name,
        }
    }
}
