//! Entity resolution.
//!
//! Entities are resolved in two passes. [`register_entity_names`] assigns a
//! class name to every entity and registers a name-only model in the cache;
//! [`EntityResolver`] then resolves the details of each entity, looking other
//! entities up by their already assigned class names. Pass 2 may run on
//! several workers because Pass 1 is complete before it starts.

use super::attribute::{AttributeResolver, AttributeSet};
use crate::cache::{AttributeClosure, ModelCache, RelationshipClosure};
use crate::catalog::EntityDef;
use crate::diagnostics::DiagnosticKind;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

/// A resolved entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntityModel {
    /// Name in the catalog.
    pub original_name: String,
    /// Generated class name.
    pub class_name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Output-level parent class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_class_name: Option<String>,
    /// Class names of direct super-types.
    pub super_classes: Vec<String>,
    /// Class names of included direct sub-types.
    pub sub_classes: Vec<String>,
    /// Whether the class is abstract.
    pub is_abstract: bool,
    /// Every attribute visible on the type.
    pub interface_attributes: AttributeSet,
    /// Attributes the generated class declares.
    pub class_attributes: AttributeSet,
    /// Attributes the type declares itself.
    pub own_attributes: AttributeSet,
    /// Every relationship visible on the type.
    pub interface_relationships: AttributeSet,
    /// Relationships the generated class declares.
    pub class_relationships: AttributeSet,
    /// Relationships first declared by the type.
    pub own_relationships: AttributeSet,
    /// Renamed names of map-valued attributes.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub map_attributes: BTreeSet<String>,
}

impl ResolvedEntityModel {
    /// A model with a name and nothing else, as registered by Pass 1.
    pub fn named(original_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            class_name: class_name.into(),
            description: None,
            parent_class_name: None,
            super_classes: Vec::new(),
            sub_classes: Vec::new(),
            is_abstract: false,
            interface_attributes: AttributeSet::new(),
            class_attributes: AttributeSet::new(),
            own_attributes: AttributeSet::new(),
            interface_relationships: AttributeSet::new(),
            class_relationships: AttributeSet::new(),
            own_relationships: AttributeSet::new(),
            map_attributes: BTreeSet::new(),
        }
    }
}

/// Stable handle of an entity registered in Pass 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityHandle(usize);

/// Entities registered by Pass 1, in name order.
#[derive(Debug, Clone, Default)]
pub struct RegisteredEntities {
    names: Vec<String>,
}

impl RegisteredEntities {
    /// Original name behind a handle.
    pub fn name(&self, handle: EntityHandle) -> &str {
        &self.names[handle.0]
    }

    /// Handle of an original name.
    pub fn handle(&self, name: &str) -> Option<EntityHandle> {
        self.names
            .binary_search_by(|n| n.as_str().cmp(name))
            .ok()
            .map(EntityHandle)
    }

    /// Every handle, in name order.
    pub fn handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        (0..self.names.len()).map(EntityHandle)
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Pass 1: assign and register the class name of every entity.
///
/// Every entity is registered, including those excluded from output, so
/// references to excluded types still resolve to a class name.
pub fn register_entity_names(cache: &ModelCache) -> RegisteredEntities {
    let mut names = Vec::new();
    for def in cache.entity_defs() {
        let class_name = cache.config().resolve_class_name(&def.name);
        cache.register_asset(ResolvedEntityModel::named(def.name.clone(), class_name));
        names.push(def.name.clone());
    }
    tracing::debug!(entities = names.len(), "entity names registered");
    RegisteredEntities { names }
}

/// Pass 2: resolves the details of registered entities.
pub struct EntityResolver<'a> {
    cache: &'a ModelCache,
    attributes: AttributeResolver<'a>,
}

impl<'a> EntityResolver<'a> {
    /// Create a resolver over a cache whose entity names are registered.
    pub fn new(cache: &'a ModelCache) -> Self {
        Self {
            cache,
            attributes: AttributeResolver::for_assets(cache),
        }
    }

    /// Resolve every included entity, using up to `workers` threads.
    ///
    /// Each resolved model replaces the name-only model in the cache. The
    /// result is ordered by original name regardless of worker count.
    pub fn resolve_all(&self, registered: &RegisteredEntities, workers: usize) -> Vec<ResolvedEntityModel> {
        let included: Vec<EntityHandle> = registered
            .handles()
            .filter(|&handle| self.is_included(registered.name(handle)))
            .collect();

        let mut models = if workers <= 1 || included.len() < 2 {
            included
                .iter()
                .filter_map(|&handle| self.resolve_details(registered.name(handle)))
                .collect::<Vec<_>>()
        } else {
            let chunk_size = included.len().div_ceil(workers);
            thread::scope(|scope| {
                let joins: Vec<_> = included
                    .chunks(chunk_size)
                    .map(|chunk| {
                        scope.spawn(move || {
                            chunk
                                .iter()
                                .filter_map(|&handle| self.resolve_details(registered.name(handle)))
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();

                let mut models = Vec::with_capacity(included.len());
                for join in joins {
                    match join.join() {
                        Ok(resolved) => models.extend(resolved),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
                models
            })
        };

        models.sort_by(|a, b| a.original_name.cmp(&b.original_name));
        for model in &models {
            self.cache.register_asset(model.clone());
        }
        tracing::info!(
            entities = models.len(),
            workers = workers.max(1),
            "entity details resolved"
        );
        models
    }

    /// Resolve the details of one entity.
    ///
    /// Returns `None` if the entity has no definition.
    pub fn resolve_details(&self, name: &str) -> Option<ResolvedEntityModel> {
        let cache = self.cache;
        let config = cache.config();
        let Some(def) = cache.entity_def(name) else {
            cache.diagnostics().record(
                DiagnosticKind::MissingDefinition,
                name,
                name,
                "no entity definition to resolve",
            );
            return None;
        };

        let mut model = cache
            .cached_asset_type(name)
            .map(|cached| ResolvedEntityModel::named(cached.original_name, cached.class_name))
            .unwrap_or_else(|| ResolvedEntityModel::named(name, config.resolve_class_name(name)));
        model.description = def.description.clone();

        model.parent_class_name = Some(self.parent_class_name(name));
        model.sub_classes = self.sub_classes(def);
        model.super_classes = self.super_classes(def);

        let is_asset_base = name == config.asset_type || name == config.root_type;
        self.resolve_attributes(def, is_asset_base, &mut model);
        self.resolve_relationships(def, is_asset_base, &mut model);

        model.is_abstract = !model.sub_classes.is_empty() && !config.force_concrete(name);

        tracing::debug!(
            name,
            class = %model.class_name,
            attributes = model.interface_attributes.len(),
            relationships = model.interface_relationships.len(),
            is_abstract = model.is_abstract,
            "resolved entity"
        );
        Some(model)
    }

    fn is_included(&self, name: &str) -> bool {
        self.cache
            .entity_def(name)
            .is_some_and(|def| self.cache.config().include_type_def(def))
    }

    fn parent_class_name(&self, name: &str) -> String {
        let config = self.cache.config();
        if name == config.root_type || name == config.asset_type {
            return config.reference_class.clone();
        }
        self.cache
            .cached_asset_class_name(&config.asset_type)
            .unwrap_or_else(|| config.resolve_class_name(&config.asset_type))
    }

    fn sub_classes(&self, def: &EntityDef) -> Vec<String> {
        let mut sub_classes = Vec::new();
        for sub_type in &def.sub_types {
            if self.cache.entity_def(sub_type).is_none() {
                self.cache.diagnostics().record(
                    DiagnosticKind::UnresolvedReference,
                    def.name.as_str(),
                    sub_type.as_str(),
                    "sub-type has no definition",
                );
                continue;
            }
            if !self.is_included(sub_type) {
                tracing::debug!(owner = %def.name, sub_type = %sub_type, "sub-type not included");
                continue;
            }
            match self.cache.cached_asset_class_name(sub_type) {
                Some(class_name) => sub_classes.push(class_name),
                None => self.cache.diagnostics().record(
                    DiagnosticKind::UnresolvedReference,
                    def.name.as_str(),
                    sub_type.as_str(),
                    "sub-type has no registered class name",
                ),
            }
        }
        sub_classes
    }

    fn super_classes(&self, def: &EntityDef) -> Vec<String> {
        let mut super_classes = Vec::new();
        for super_type in &def.super_types {
            match self.cache.cached_asset_class_name(super_type) {
                Some(class_name) => super_classes.push(class_name),
                None => self.cache.diagnostics().record(
                    DiagnosticKind::UnresolvedReference,
                    def.name.as_str(),
                    super_type.as_str(),
                    "super-type has no registered class name",
                ),
            }
        }
        super_classes
    }

    fn resolve_attributes(&self, def: &EntityDef, is_asset_base: bool, model: &mut ResolvedEntityModel) {
        let cache = self.cache;
        let config = cache.config();
        let name = def.name.as_str();
        let diagnostics = cache.diagnostics();

        for attribute in &def.attribute_defs {
            if !self.is_output_attribute(&attribute.name, &attribute.type_name) {
                continue;
            }
            let resolved = self.attributes.resolve_attribute(name, name, attribute);
            if resolved.mapped_type.is_map() {
                model.map_attributes.insert(resolved.renamed_name.clone());
            }
            model.own_attributes.insert(resolved, name, diagnostics);
        }

        let class_closure: Arc<AttributeClosure> = if is_asset_base {
            cache.all_attributes_of(name)
        } else {
            cache.non_asset_attributes_of(name)
        };
        for owned in class_closure.values() {
            if owned.def.type_name == config.internal_type {
                continue;
            }
            let resolved = self.attributes.resolve_attribute(name, &owned.owner, &owned.def);
            if resolved.mapped_type.is_map() {
                model.map_attributes.insert(resolved.renamed_name.clone());
            }
            model.class_attributes.insert(resolved, name, diagnostics);
        }

        for owned in cache.all_attributes_of(name).values() {
            if owned.def.type_name == config.internal_type {
                continue;
            }
            let resolved = self.attributes.resolve_attribute(name, &owned.owner, &owned.def);
            if resolved.mapped_type.is_map() {
                model.map_attributes.insert(resolved.renamed_name.clone());
            }
            model.interface_attributes.insert(resolved, name, diagnostics);
        }
    }

    fn resolve_relationships(&self, def: &EntityDef, is_asset_base: bool, model: &mut ResolvedEntityModel) {
        let cache = self.cache;
        let name = def.name.as_str();
        let diagnostics = cache.diagnostics();

        let unique = cache.unique_relationships_of(name);
        for relationship in &def.relationship_attribute_defs {
            if !unique.contains(relationship.name())
                || !self.is_output_attribute(relationship.name(), &relationship.attribute.type_name)
            {
                continue;
            }
            let resolved = self.attributes.resolve_relationship(name, name, relationship);
            model.own_relationships.insert(resolved, name, diagnostics);
        }

        let class_closure: Arc<RelationshipClosure> = if is_asset_base {
            cache.all_relationships_of(name)
        } else {
            cache.non_asset_relationships_of(name)
        };
        for owned in class_closure.values() {
            let resolved = self.attributes.resolve_relationship(name, &owned.owner, &owned.def);
            model.class_relationships.insert(resolved, name, diagnostics);
        }

        for owned in cache.all_relationships_of(name).values() {
            let resolved = self.attributes.resolve_relationship(name, &owned.owner, &owned.def);
            model.interface_relationships.insert(resolved, name, diagnostics);
        }
    }

    fn is_output_attribute(&self, name: &str, type_name: &str) -> bool {
        let config = self.cache.config();
        type_name != config.internal_type && !config.is_skipped_attribute(name)
    }
}
