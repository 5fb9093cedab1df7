//! Attribute definitions for entities, structs and relationships.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An attribute definition as declared in the type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDef {
    /// Attribute name (unique within its declaring type).
    pub name: String,
    /// Raw type name, e.g. `string` or `array<map<string,string>>`.
    pub type_name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Search index configuration for the attribute's own field.
    #[serde(
        default,
        rename = "indexTypeESConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub index_config: Option<IndexConfig>,
    /// Additional indexed sub-fields keyed by suffix (e.g. `keyword`, `stemmed`).
    #[serde(
        default,
        rename = "indexTypeESFields",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub index_fields: BTreeMap<String, IndexField>,
}

/// Index configuration for an attribute's primary field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Analyzer applied to the field, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

/// An additional indexed sub-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    /// Index type of the sub-field (`keyword`, `text`, `rank_feature`, ...).
    #[serde(rename = "type")]
    pub index_type: String,
    /// Analyzer applied to the sub-field, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

/// A relationship attribute declared on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipAttributeDef {
    /// The attribute portion of the definition.
    #[serde(flatten)]
    pub attribute: AttributeDef,
    /// Name of the relationship def that defines this attribute.
    pub relationship_type_name: String,
}

impl AttributeDef {
    /// Create a new attribute definition.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the analyzer of the primary field.
    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.index_config = Some(IndexConfig {
            analyzer: Some(analyzer.into()),
        });
        self
    }

    /// Add an indexed sub-field.
    pub fn with_index_field(mut self, suffix: impl Into<String>, field: IndexField) -> Self {
        self.index_fields.insert(suffix.into(), field);
        self
    }

    /// The analyzer of the primary field, if configured.
    pub fn analyzer(&self) -> Option<&str> {
        self.index_config
            .as_ref()
            .and_then(|c| c.analyzer.as_deref())
    }
}

impl IndexField {
    /// A keyword sub-field.
    pub fn keyword() -> Self {
        Self {
            index_type: "keyword".to_string(),
            analyzer: None,
        }
    }

    /// A text sub-field with the given analyzer.
    pub fn text(analyzer: impl Into<String>) -> Self {
        Self {
            index_type: "text".to_string(),
            analyzer: Some(analyzer.into()),
        }
    }

    /// A rank-feature sub-field.
    pub fn rank_feature() -> Self {
        Self {
            index_type: "rank_feature".to_string(),
            analyzer: None,
        }
    }
}

impl RelationshipAttributeDef {
    /// Create a new relationship attribute definition.
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        relationship_type_name: impl Into<String>,
    ) -> Self {
        Self {
            attribute: AttributeDef::new(name, type_name),
            relationship_type_name: relationship_type_name.into(),
        }
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.attribute.name
    }
}
