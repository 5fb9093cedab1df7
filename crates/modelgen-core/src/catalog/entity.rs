//! Entity definitions.

use super::field::{AttributeDef, RelationshipAttributeDef};
use super::types::impl_type_def;
use serde::{Deserialize, Serialize};

/// An entity definition (a node in the inheritance graph).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDef {
    /// Entity name (unique within the catalog).
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
    /// Attribute definitions in declaration order.
    #[serde(default)]
    pub attribute_defs: Vec<AttributeDef>,
    /// Relationship attribute definitions in declaration order.
    #[serde(default)]
    pub relationship_attribute_defs: Vec<RelationshipAttributeDef>,
    /// Direct super-type names.
    #[serde(default)]
    pub super_types: Vec<String>,
    /// Direct sub-type names.
    #[serde(default)]
    pub sub_types: Vec<String>,
}

impl_type_def!(EntityDef);

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        self.attribute_defs.push(attribute);
        self
    }

    /// Add a relationship attribute.
    pub fn with_relationship(mut self, relationship: RelationshipAttributeDef) -> Self {
        self.relationship_attribute_defs.push(relationship);
        self
    }

    /// Add a direct super-type.
    pub fn with_super_type(mut self, name: impl Into<String>) -> Self {
        self.super_types.push(name.into());
        self
    }

    /// Add a direct sub-type.
    pub fn with_sub_type(mut self, name: impl Into<String>) -> Self {
        self.sub_types.push(name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the service namespace.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }
}
