//! Integration tests for end-to-end model resolution.

use modelgen_core::{
    AttributeDef, Container, EntityDef, EnumDef, GeneratedModels, GeneratorConfig,
    GeneratorOptions, IndexField, ModelCache, ModelGenerator, RelationshipAttributeDef,
    RelationshipDef, RelationshipEndDef, ResolvedAttribute, SearchField, StructDef, TypeDefSnapshot,
    TypeKind,
};
use std::collections::BTreeSet;

struct TestContext {
    snapshot: TypeDefSnapshot,
    config: GeneratorConfig,
}

impl TestContext {
    fn new() -> Self {
        Self {
            snapshot: catalog_snapshot(),
            config: GeneratorConfig::default()
                .with_type_override("Table", "shared", "Catalog")
                .with_force_concrete("Table")
                .with_searchable_relationship("meanings", "AtlasGlossarySemanticAssignment")
                .with_enum_override("certificateStatus", "CertificateStatus"),
        }
    }

    fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    fn generate(&self, workers: usize) -> GeneratedModels {
        ModelGenerator::new(self.config.clone())
            .with_options(GeneratorOptions::default().with_workers(workers))
            .generate(&self.snapshot)
    }

    fn cache(&self) -> ModelCache {
        ModelCache::new(&self.snapshot, self.config.clone())
    }
}

fn catalog_snapshot() -> TypeDefSnapshot {
    TypeDefSnapshot::new()
        .with_enum(
            EnumDef::new("CertificateStatus")
                .with_value("DRAFT")
                .with_value("VERIFIED")
                .with_value("DEPRECATED"),
        )
        .with_struct(
            StructDef::new("SourceTagAttachment")
                .with_attribute(AttributeDef::new("sourceTagName", "string"))
                .with_attribute(AttributeDef::new("sourceTagValue", "array<map<string,string>>")),
        )
        .with_entity(
            EntityDef::new("Referenceable")
                .with_attribute(AttributeDef::new("qualifiedName", "string"))
                .with_attribute(AttributeDef::new("__state", "string"))
                .with_relationship(RelationshipAttributeDef::new(
                    "meanings",
                    "array<AtlasGlossaryTerm>",
                    "AtlasGlossarySemanticAssignment",
                ))
                .with_sub_type("Asset"),
        )
        .with_entity(
            EntityDef::new("Asset")
                .with_super_type("Referenceable")
                .with_attribute(
                    AttributeDef::new("name", "string")
                        .with_analyzer("atlan_text_analyzer")
                        .with_index_field("keyword", IndexField::keyword())
                        .with_index_field("stemmed", IndexField::text("snowball")),
                )
                .with_attribute(AttributeDef::new("certificateStatus", "string"))
                .with_attribute(AttributeDef::new("sourceTags", "array<SourceTagAttachment>"))
                .with_attribute(AttributeDef::new("inputs", "array<Catalog>"))
                .with_relationship(RelationshipAttributeDef::new("links", "array<Link>", "asset_links"))
                .with_sub_type("Catalog")
                .with_sub_type("Column")
                .with_sub_type("Link"),
        )
        .with_entity(
            EntityDef::new("Catalog")
                .with_super_type("Asset")
                .with_relationship(RelationshipAttributeDef::new(
                    "inputToProcesses",
                    "array<Process>",
                    "process_inputs",
                ))
                .with_sub_type("SQL")
                .with_sub_type("Dbt"),
        )
        .with_entity(
            EntityDef::new("SQL")
                .with_super_type("Catalog")
                .with_attribute(AttributeDef::new("shared", "string"))
                .with_attribute(AttributeDef::new("queryCount", "long"))
                .with_sub_type("Table"),
        )
        .with_entity(
            EntityDef::new("Dbt")
                .with_super_type("Catalog")
                .with_attribute(AttributeDef::new("shared", "long"))
                .with_attribute(AttributeDef::new("dbtAlias", "string"))
                .with_sub_type("Table"),
        )
        .with_entity(
            EntityDef::new("Table")
                .with_super_type("SQL")
                .with_super_type("Dbt")
                .with_attribute(AttributeDef::new("rowCount", "long"))
                .with_attribute(AttributeDef::new("partitionValues", "map<string,string>"))
                .with_relationship(RelationshipAttributeDef::new(
                    "columns",
                    "array<Column>",
                    "table_columns",
                ))
                .with_sub_type("ViewTable"),
        )
        .with_entity(
            EntityDef::new("ViewTable")
                .with_super_type("Table")
                .with_attribute(AttributeDef::new("definition", "string")),
        )
        .with_entity(
            EntityDef::new("Column")
                .with_super_type("Asset")
                .with_attribute(AttributeDef::new("order", "int"))
                .with_relationship(RelationshipAttributeDef::new("table", "Table", "table_columns")),
        )
        .with_entity(EntityDef::new("Link").with_super_type("Asset"))
        .with_relationship(
            RelationshipDef::new(
                "table_columns",
                RelationshipEndDef::set("Table", "columns").container(),
                RelationshipEndDef::single("Column", "table"),
            )
            .with_attribute(AttributeDef::new("note", "string")),
        )
        .with_relationship(RelationshipDef::new(
            "asset_links",
            RelationshipEndDef::set("Asset", "links"),
            RelationshipEndDef::single("Link", "asset"),
        ))
}

fn every_attribute(models: &GeneratedModels) -> Vec<&ResolvedAttribute> {
    let mut attributes = Vec::new();
    for model in models.assets.values() {
        attributes.extend(model.interface_attributes.iter());
        attributes.extend(model.class_attributes.iter());
        attributes.extend(model.own_attributes.iter());
    }
    for model in models.structs.values() {
        attributes.extend(model.attributes.iter());
    }
    for model in models.relationships.values() {
        attributes.extend(model.attributes.iter());
    }
    attributes
}

#[test]
fn test_idempotent_runs() {
    let ctx = TestContext::new();

    let first = ctx.generate(1);
    let second = ctx.generate(1);

    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
}

#[test]
fn test_parallel_matches_sequential() {
    let ctx = TestContext::new();

    let sequential = ctx.generate(1);
    let parallel = ctx.generate(4);

    assert_eq!(sequential.fingerprint().unwrap(), parallel.fingerprint().unwrap());
    assert_eq!(sequential.diagnostics, parallel.diagnostics);
}

#[test]
fn test_super_type_closure_contains_parents() {
    let ctx = TestContext::new();
    let cache = ctx.cache();

    for def in cache.entity_defs() {
        let closure = cache.all_super_types_of(&def.name);
        for parent in &def.super_types {
            assert!(closure.contains(parent), "{} missing {}", def.name, parent);
            let parent_closure = cache.all_super_types_of(parent);
            assert!(
                parent_closure.is_subset(&closure),
                "{} does not cover the closure of {}",
                def.name,
                parent
            );
        }
    }
}

#[test]
fn test_diamond_conflict_resolved_by_override() {
    let models = TestContext::new().generate(1);
    let table = &models.assets["Table"];

    let shared = table.interface_attributes.get("shared").unwrap();
    assert_eq!(shared.mapped_type.kind, TypeKind::Asset);
    assert_eq!(shared.mapped_type.name, "Catalog");
    assert!(shared.retyped);
    assert_eq!(shared.owner, "SQL");

    // The conflict is still reported.
    assert!(models
        .diagnostics
        .iter()
        .any(|d| d.owner == "Table" && d.subject == "shared"));

    let sql = &models.assets["SQL"];
    assert!(!sql.own_attributes.get("shared").unwrap().retyped);
}

#[test]
fn test_abstractness() {
    let models = TestContext::new().generate(1);

    assert!(models.assets["Asset"].is_abstract);
    assert!(!models.assets["Table"].is_abstract);
    assert!(!models.assets["Column"].is_abstract);
    assert!(!models.assets["ViewTable"].is_abstract);

    let without_override = TestContext::new()
        .with_config(GeneratorConfig::default())
        .generate(1);
    assert!(without_override.assets["Table"].is_abstract);
    assert_eq!(without_override.assets["Table"].sub_classes, ["ViewTable"]);

    let filtered = TestContext::new()
        .with_config(GeneratorConfig::default().with_excluded_type("ViewTable"))
        .generate(1);
    assert!(!filtered.assets["Table"].is_abstract);
    assert!(!filtered.assets.contains_key("ViewTable"));
}

#[test]
fn test_struct_containers_are_lists() {
    let models = TestContext::new().generate(1);

    let structs: Vec<_> = every_attribute(&models)
        .into_iter()
        .filter(|a| a.mapped_type.kind == TypeKind::Struct && a.mapped_type.container.is_some())
        .collect();
    assert!(!structs.is_empty());
    for attribute in structs {
        assert_eq!(attribute.mapped_type.container, Some(Container::List));
    }
}

#[test]
fn test_non_inherited_sets_are_disjoint() {
    let ctx = TestContext::new();
    let models = ctx.generate(1);
    let cache = ctx.cache();

    for (name, model) in &models.assets {
        let mut identities = BTreeSet::new();
        // The root's closure already contains the root itself.
        let mut chain: BTreeSet<String> = cache.all_super_types_of(name).iter().cloned().collect();
        chain.insert(name.clone());
        for member in chain {
            let Some(member_model) = models.assets.get(&member) else {
                continue;
            };
            for attribute in &member_model.own_attributes {
                let identity = (attribute.owner.clone(), attribute.original_name.clone());
                assert!(identities.insert(identity), "{name}: duplicate {}", attribute.renamed_name);
            }
        }
        assert!(model.own_attributes.iter().all(|a| !a.inherited));
    }
}

#[test]
fn test_class_level_sets_exclude_asset_base() {
    let models = TestContext::new().generate(1);
    let asset = &models.assets["Asset"];
    let column = &models.assets["Column"];

    assert!(asset.class_attributes.contains("name"));
    assert!(asset.class_attributes.contains("qualifiedName"));
    assert!(!asset.class_attributes.contains("__state"));
    assert!(!asset.class_attributes.contains("inputs"));
    assert!(asset.class_relationships.contains("meanings"));

    assert_eq!(column.class_attributes.names().collect::<Vec<_>>(), ["order"]);
    assert!(column.interface_attributes.contains("name"));
    assert_eq!(column.parent_class_name.as_deref(), Some("Asset"));
}

#[test]
fn test_search_and_overrides_flow_through() {
    let models = TestContext::new().generate(1);
    let asset = &models.assets["Asset"];

    let name = asset.own_attributes.get("name").unwrap();
    assert_eq!(name.search.field, Some(SearchField::KeywordTextStemmed));

    let status = asset.own_attributes.get("certificateStatus").unwrap();
    assert_eq!(status.mapped_type.kind, TypeKind::Enum);

    let meanings = asset.interface_relationships.get("meanings").unwrap();
    assert_eq!(meanings.search.field, Some(SearchField::SearchableRelation));

    let links = asset.own_relationships.get("links").unwrap();
    assert_eq!(links.search.field, Some(SearchField::Relation));
    assert_eq!(links.mapped_type.name, "Link");

    let note = models.relationships["table_columns"].attributes.get("note").unwrap();
    assert_eq!(note.search.field, Some(SearchField::Text));
}

#[test]
fn test_unique_relationships_not_redeclared() {
    let models = TestContext::new().generate(1);

    assert!(models.assets["Catalog"].own_relationships.contains("inputToProcesses"));
    let columns = models.assets["Table"].own_relationships.get("columns").unwrap();
    assert_eq!(columns.relationship_type_name.as_deref(), Some("table_columns"));
    assert_eq!(columns.relationship_class_name.as_deref(), Some("TableColumns"));
    // Relationship defs missing from the snapshot leave the class name unset.
    let processes = models.assets["Catalog"].own_relationships.get("inputToProcesses").unwrap();
    assert!(processes.relationship_class_name.is_none());
    assert!(!models.assets["Table"].own_relationships.contains("inputToProcesses"));
    assert!(models.assets["Table"].interface_relationships.contains("inputToProcesses"));
}

#[test]
fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let typedefs = dir.path().join("typedefs.json");
    let config_path = dir.path().join("config.json");

    std::fs::write(
        &typedefs,
        r#"{
            "enumDefs": [{"name": "icon_type", "elementDefs": [{"value": "image", "ordinal": 0}]}],
            "entityDefs": [
                {"name": "Referenceable", "attributeDefs": [{"name": "qualifiedName", "typeName": "string"}]},
                {"name": "Asset", "superTypes": ["Referenceable"], "subTypes": ["Readme"],
                 "attributeDefs": [{"name": "assetIcon", "typeName": "icon_type"}]},
                {"name": "Readme", "superTypes": ["Asset"]}
            ]
        }"#,
    )
    .unwrap();
    std::fs::write(&config_path, r#"{"class_renames": {"Readme": "AssetReadme"}}"#).unwrap();

    let snapshot = TypeDefSnapshot::from_path(&typedefs).unwrap();
    let config = GeneratorConfig::from_path(&config_path).unwrap();
    let models = ModelGenerator::new(config).generate(&snapshot);

    assert_eq!(models.enums["icon_type"].class_name, "IconType");
    assert_eq!(models.assets["Readme"].class_name, "AssetReadme");
    assert_eq!(models.assets["Asset"].sub_classes, ["AssetReadme"]);
    let icon = models.assets["Asset"].own_attributes.get("assetIcon").unwrap();
    assert_eq!(icon.mapped_type.kind, TypeKind::Enum);
    assert_eq!(icon.mapped_type.name, "IconType");
    assert_eq!(models.warning_count(), 0);
}
