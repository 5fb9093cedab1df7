//! Model cache - the context object of one generation run.
//!
//! Holds the raw definitions read from the type definition store, the
//! memoized inheritance closures derived from them, and registries of
//! already-resolved models so sibling types can reference each other.
//!
//! A cache lives for exactly one run. Raw definitions are read-only after
//! ingestion; the derived tables are `DashMap`s populated at most once per key
//! with idempotent computations, so concurrent readers are safe.

mod closure;

pub use closure::{AttributeClosure, OwnedDef, RelationshipClosure};

use crate::catalog::{EntityDef, EnumDef, RelationshipDef, StructDef, TypeDefSource};
use crate::config::GeneratorConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::mapper::{MappedType, TypeKind};
use crate::resolve::{
    ResolvedEntityModel, ResolvedEnumModel, ResolvedRelationshipModel, ResolvedStructModel,
};
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// The model cache.
pub struct ModelCache {
    config: Arc<GeneratorConfig>,
    diagnostics: Diagnostics,

    enum_defs: BTreeMap<String, EnumDef>,
    struct_defs: BTreeMap<String, StructDef>,
    entity_defs: BTreeMap<String, EntityDef>,
    relationship_defs: BTreeMap<String, RelationshipDef>,

    super_types: DashMap<String, Arc<BTreeSet<String>>>,
    attributes: DashMap<String, Arc<AttributeClosure>>,
    relationships: DashMap<String, Arc<RelationshipClosure>>,
    non_asset_attributes: DashMap<String, Arc<AttributeClosure>>,
    non_asset_relationships: DashMap<String, Arc<RelationshipClosure>>,
    unique_relationships: DashMap<String, Arc<BTreeSet<String>>>,

    enums: DashMap<String, ResolvedEnumModel>,
    structs: DashMap<String, ResolvedStructModel>,
    assets: DashMap<String, ResolvedEntityModel>,
    relationship_models: DashMap<String, ResolvedRelationshipModel>,
}

impl ModelCache {
    /// Ingest every definition from the source.
    ///
    /// Definitions are keyed by original name; a repeated name keeps the first
    /// definition. The root type's description is backfilled if missing.
    pub fn new(source: &dyn TypeDefSource, config: GeneratorConfig) -> Self {
        Self::with_shared_config(source, Arc::new(config))
    }

    /// Ingest every definition using an already shared configuration.
    pub fn with_shared_config(source: &dyn TypeDefSource, config: Arc<GeneratorConfig>) -> Self {
        let diagnostics = Diagnostics::new();

        let enum_defs = index_defs(source.list_enum_defs(), |d| &d.name, "enum", &diagnostics);
        let struct_defs =
            index_defs(source.list_struct_defs(), |d| &d.name, "struct", &diagnostics);
        let mut entity_defs =
            index_defs(source.list_entity_defs(), |d| &d.name, "entity", &diagnostics);
        let relationship_defs = index_defs(
            source.list_relationship_defs(),
            |d| &d.name,
            "relationship",
            &diagnostics,
        );

        if let Some(root) = entity_defs.get_mut(&config.root_type) {
            let missing = root
                .description
                .as_deref()
                .map_or(true, |d| d.trim().is_empty());
            if missing {
                tracing::debug!(root = %root.name, "backfilling root type description");
                root.description = Some(config.root_description.clone());
            }
        }

        tracing::info!(
            enums = enum_defs.len(),
            structs = struct_defs.len(),
            entities = entity_defs.len(),
            relationships = relationship_defs.len(),
            "type definitions ingested"
        );

        Self {
            config,
            diagnostics,
            enum_defs,
            struct_defs,
            entity_defs,
            relationship_defs,
            super_types: DashMap::new(),
            attributes: DashMap::new(),
            relationships: DashMap::new(),
            non_asset_attributes: DashMap::new(),
            non_asset_relationships: DashMap::new(),
            unique_relationships: DashMap::new(),
            enums: DashMap::new(),
            structs: DashMap::new(),
            assets: DashMap::new(),
            relationship_models: DashMap::new(),
        }
    }

    /// The run configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Get an enum definition by name.
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enum_defs.get(name)
    }

    /// Get a struct definition by name.
    pub fn struct_def(&self, name: &str) -> Option<&StructDef> {
        self.struct_defs.get(name)
    }

    /// Get an entity definition by name.
    pub fn entity_def(&self, name: &str) -> Option<&EntityDef> {
        self.entity_defs.get(name)
    }

    /// Get a relationship definition by name.
    pub fn relationship_def(&self, name: &str) -> Option<&RelationshipDef> {
        self.relationship_defs.get(name)
    }

    /// All enum definitions, ordered by name.
    pub fn enum_defs(&self) -> impl Iterator<Item = &EnumDef> {
        self.enum_defs.values()
    }

    /// All struct definitions, ordered by name.
    pub fn struct_defs(&self) -> impl Iterator<Item = &StructDef> {
        self.struct_defs.values()
    }

    /// All entity definitions, ordered by name.
    pub fn entity_defs(&self) -> impl Iterator<Item = &EntityDef> {
        self.entity_defs.values()
    }

    /// All relationship definitions, ordered by name.
    pub fn relationship_defs(&self) -> impl Iterator<Item = &RelationshipDef> {
        self.relationship_defs.values()
    }

    /// Register a resolved enum.
    pub fn register_enum(&self, model: ResolvedEnumModel) {
        self.enums.insert(model.original_name.clone(), model);
    }

    /// Register a (possibly partially) resolved struct.
    pub fn register_struct(&self, model: ResolvedStructModel) {
        self.structs.insert(model.original_name.clone(), model);
    }

    /// Register a (possibly partially) resolved entity.
    pub fn register_asset(&self, model: ResolvedEntityModel) {
        self.assets.insert(model.original_name.clone(), model);
    }

    /// Register a resolved relationship.
    pub fn register_relationship(&self, model: ResolvedRelationshipModel) {
        self.relationship_models
            .insert(model.original_name.clone(), model);
    }

    /// A resolved enum, if registered.
    pub fn cached_enum(&self, name: &str) -> Option<ResolvedEnumModel> {
        self.enums.get(name).map(|m| m.value().clone())
    }

    /// A resolved struct, if registered.
    pub fn cached_struct(&self, name: &str) -> Option<ResolvedStructModel> {
        self.structs.get(name).map(|m| m.value().clone())
    }

    /// A resolved entity, if registered.
    pub fn cached_asset_type(&self, name: &str) -> Option<ResolvedEntityModel> {
        self.assets.get(name).map(|m| m.value().clone())
    }

    /// Class name assigned to an entity, if registered.
    pub fn cached_asset_class_name(&self, name: &str) -> Option<String> {
        self.assets.get(name).map(|m| m.class_name.clone())
    }

    /// A resolved relationship, if registered.
    pub fn cached_relationship(&self, name: &str) -> Option<ResolvedRelationshipModel> {
        self.relationship_models.get(name).map(|m| m.value().clone())
    }

    /// Look a type name up in the enum, struct and asset registries, in that order.
    pub fn cached_type(&self, name: &str) -> Option<MappedType> {
        if let Some(model) = self.enums.get(name) {
            return Some(MappedType::new(TypeKind::Enum, model.class_name.clone(), name));
        }
        if let Some(model) = self.structs.get(name) {
            return Some(MappedType::new(TypeKind::Struct, model.class_name.clone(), name));
        }
        self.assets
            .get(name)
            .map(|model| MappedType::new(TypeKind::Asset, model.class_name.clone(), name))
    }
}

fn index_defs<T>(
    defs: Vec<T>,
    name_of: impl Fn(&T) -> &String,
    kind: &str,
    diagnostics: &Diagnostics,
) -> BTreeMap<String, T> {
    let mut indexed = BTreeMap::new();
    for def in defs {
        let name = name_of(&def).clone();
        if indexed.contains_key(&name) {
            diagnostics.record(
                DiagnosticKind::Conflict,
                name.clone(),
                name,
                format!("duplicate {kind} definition, keeping the first"),
            );
            continue;
        }
        indexed.insert(name, def);
    }
    indexed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeDef, TypeDefSnapshot};
    use crate::resolve::{ResolvedEntityModel, ResolvedEnumModel, ResolvedStructModel};

    fn snapshot() -> TypeDefSnapshot {
        TypeDefSnapshot::new()
            .with_entity(EntityDef::new("Referenceable"))
            .with_entity(EntityDef::new("Asset").with_super_type("Referenceable"))
            .with_entity(
                EntityDef::new("Asset")
                    .with_super_type("Referenceable")
                    .with_attribute(AttributeDef::new("duplicate", "string")),
            )
    }

    #[test]
    fn test_ingest_keeps_first_duplicate() {
        let cache = ModelCache::new(&snapshot(), GeneratorConfig::default());

        assert_eq!(cache.entity_defs().count(), 2);
        assert!(cache.entity_def("Asset").unwrap().attribute_defs.is_empty());
        assert_eq!(cache.diagnostics().count(DiagnosticKind::Conflict), 1);
    }

    #[test]
    fn test_root_description_backfilled() {
        let cache = ModelCache::new(&snapshot(), GeneratorConfig::default());
        let root = cache.entity_def("Referenceable").unwrap();
        assert_eq!(
            root.description.as_deref(),
            Some(crate::config::DEFAULT_ROOT_DESCRIPTION)
        );
    }

    #[test]
    fn test_existing_root_description_kept() {
        let snapshot = TypeDefSnapshot::new()
            .with_entity(EntityDef::new("Referenceable").with_description("Root of all types"));
        let cache = ModelCache::new(&snapshot, GeneratorConfig::default());
        assert_eq!(
            cache.entity_def("Referenceable").unwrap().description.as_deref(),
            Some("Root of all types")
        );
    }

    #[test]
    fn test_cached_type_priority() {
        let cache = ModelCache::new(&TypeDefSnapshot::new(), GeneratorConfig::default());
        assert!(cache.cached_type("Shared").is_none());

        cache.register_asset(ResolvedEntityModel::named("Shared", "SharedAsset"));
        assert_eq!(cache.cached_type("Shared").unwrap().kind, TypeKind::Asset);

        cache.register_struct(ResolvedStructModel::named("Shared", "SharedStruct"));
        assert_eq!(cache.cached_type("Shared").unwrap().kind, TypeKind::Struct);

        cache.register_enum(ResolvedEnumModel::named("Shared", "SharedEnum"));
        let mapped = cache.cached_type("Shared").unwrap();
        assert_eq!(mapped.kind, TypeKind::Enum);
        assert_eq!(mapped.name, "SharedEnum");
    }
}
