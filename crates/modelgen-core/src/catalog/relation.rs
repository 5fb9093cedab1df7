//! Relationship definitions between entities.

use super::field::AttributeDef;
use super::types::impl_type_def;
use serde::{Deserialize, Serialize};

/// Cardinality of one end of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    /// At most one related entity.
    #[default]
    Single,
    /// An unordered set of related entities.
    Set,
    /// An ordered list of related entities.
    List,
}

/// One end of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEndDef {
    /// Participating entity type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Role attribute name on that entity.
    pub name: String,
    /// Cardinality of this end.
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Whether this end contains the other.
    #[serde(default)]
    pub is_container: bool,
}

/// A relationship definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDef {
    /// Relationship name (unique within the catalog).
    pub name: String,
    /// Display alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Service namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    /// First end.
    #[serde(rename = "endDef1")]
    pub end1: RelationshipEndDef,
    /// Second end.
    #[serde(rename = "endDef2")]
    pub end2: RelationshipEndDef,
    /// Attributes carried by the relationship itself.
    #[serde(default)]
    pub attribute_defs: Vec<AttributeDef>,
}

impl_type_def!(RelationshipDef);

impl RelationshipEndDef {
    /// Create an end with single cardinality.
    pub fn single(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            cardinality: Cardinality::Single,
            is_container: false,
        }
    }

    /// Create an end with set cardinality.
    pub fn set(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cardinality: Cardinality::Set,
            ..Self::single(type_name, name)
        }
    }

    /// Mark this end as the container.
    pub fn container(mut self) -> Self {
        self.is_container = true;
        self
    }
}

impl RelationshipDef {
    /// Create a new relationship definition between two ends.
    pub fn new(name: impl Into<String>, end1: RelationshipEndDef, end2: RelationshipEndDef) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            service_type: None,
            end1,
            end2,
            attribute_defs: Vec::new(),
        }
    }

    /// Add an attribute carried by the relationship.
    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        self.attribute_defs.push(attribute);
        self
    }

    /// Set the service namespace.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    /// Check if the given entity participates in either end.
    pub fn involves(&self, entity: &str) -> bool {
        self.end1.type_name == entity || self.end2.type_name == entity
    }
}
