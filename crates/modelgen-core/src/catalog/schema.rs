//! Type definition snapshot - the complete catalog fetched for one run.

use super::{EntityDef, EnumDef, RelationshipDef, StructDef, TypeDefSource};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An in-memory snapshot of every type definition in the catalog.
///
/// The JSON shape matches the typedef listing returned by the catalog
/// service (`enumDefs`, `structDefs`, `entityDefs`, `relationshipDefs`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefSnapshot {
    /// Enum definitions.
    #[serde(default)]
    pub enum_defs: Vec<EnumDef>,
    /// Struct definitions.
    #[serde(default)]
    pub struct_defs: Vec<StructDef>,
    /// Entity definitions.
    #[serde(default)]
    pub entity_defs: Vec<EntityDef>,
    /// Relationship definitions.
    #[serde(default)]
    pub relationship_defs: Vec<RelationshipDef>,
}

impl TypeDefSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enum definition.
    pub fn with_enum(mut self, def: EnumDef) -> Self {
        self.enum_defs.push(def);
        self
    }

    /// Add a struct definition.
    pub fn with_struct(mut self, def: StructDef) -> Self {
        self.struct_defs.push(def);
        self
    }

    /// Add an entity definition.
    pub fn with_entity(mut self, def: EntityDef) -> Self {
        self.entity_defs.push(def);
        self
    }

    /// Add a relationship definition.
    pub fn with_relationship(mut self, def: RelationshipDef) -> Self {
        self.relationship_defs.push(def);
        self
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Total number of definitions across all kinds.
    pub fn len(&self) -> usize {
        self.enum_defs.len()
            + self.struct_defs.len()
            + self.entity_defs.len()
            + self.relationship_defs.len()
    }

    /// Check if the snapshot holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeDefSource for TypeDefSnapshot {
    fn list_enum_defs(&self) -> Vec<EnumDef> {
        self.enum_defs.clone()
    }

    fn list_struct_defs(&self) -> Vec<StructDef> {
        self.struct_defs.clone()
    }

    fn list_entity_defs(&self) -> Vec<EntityDef> {
        self.entity_defs.clone()
    }

    fn list_relationship_defs(&self) -> Vec<RelationshipDef> {
        self.relationship_defs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeDef, RelationshipEndDef};
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "enumDefs": [{"name": "CertificateStatus", "elementDefs": [{"value": "DRAFT", "ordinal": 0}]}],
        "structDefs": [{"name": "SourceTagAttachment", "attributeDefs": [{"name": "sourceTagName", "typeName": "string"}]}],
        "entityDefs": [
            {"name": "Referenceable", "attributeDefs": [{"name": "qualifiedName", "typeName": "string"}]},
            {"name": "Asset", "superTypes": ["Referenceable"]}
        ],
        "relationshipDefs": []
    }"#;

    #[test]
    fn test_snapshot_builder() {
        let snapshot = TypeDefSnapshot::new()
            .with_enum(EnumDef::new("CertificateStatus").with_value("DRAFT"))
            .with_entity(EntityDef::new("Asset").with_attribute(AttributeDef::new("name", "string")))
            .with_relationship(RelationshipDef::new(
                "asset_links",
                RelationshipEndDef::set("Asset", "links"),
                RelationshipEndDef::single("Link", "asset"),
            ));

        assert_eq!(snapshot.len(), 3);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.list_entity_defs().len(), 1);
    }

    #[test]
    fn test_from_json_str() {
        let snapshot = TypeDefSnapshot::from_json_str(SAMPLE).unwrap();

        assert_eq!(snapshot.enum_defs.len(), 1);
        assert_eq!(snapshot.struct_defs.len(), 1);
        assert_eq!(snapshot.entity_defs.len(), 2);
        assert!(snapshot.relationship_defs.is_empty());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let snapshot = TypeDefSnapshot::from_path(file.path()).unwrap();
        assert_eq!(snapshot.entity_defs[1].super_types, vec!["Referenceable".to_string()]);
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = TypeDefSnapshot::from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_from_invalid_json() {
        let result = TypeDefSnapshot::from_json_str("{\"entityDefs\": 7}");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
