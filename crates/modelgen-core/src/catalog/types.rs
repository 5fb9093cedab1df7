//! Common type definition surface plus enum and struct definitions.

use super::field::AttributeDef;
use serde::{Deserialize, Serialize};

/// Properties shared by every kind of type definition.
pub trait TypeDef {
    /// Original name (unique key within its kind).
    fn name(&self) -> &str;
    /// Optional display alias.
    fn display_name(&self) -> Option<&str>;
    /// Human-readable description.
    fn description(&self) -> Option<&str>;
    /// Namespace tag used for inclusion filtering.
    fn service_type(&self) -> Option<&str>;
}

macro_rules! impl_type_def {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::catalog::TypeDef for $ty {
                fn name(&self) -> &str {
                    &self.name
                }

                fn display_name(&self) -> Option<&str> {
                    self.display_name.as_deref()
                }

                fn description(&self) -> Option<&str> {
                    self.description.as_deref()
                }

                fn service_type(&self) -> Option<&str> {
                    self.service_type.as_deref()
                }
            }
        )+
    };
}

pub(crate) use impl_type_def;

/// An enumeration definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    /// Enum name.
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
    /// Ordered element definitions.
    #[serde(default)]
    pub element_defs: Vec<EnumElementDef>,
}

/// A single enumeration element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumElementDef {
    /// Raw value as stored in the catalog.
    pub value: String,
    /// Position of the element, when the catalog supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i64>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A struct definition (nested, non-entity value type).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDef {
    /// Struct name.
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
}

impl_type_def!(EnumDef, StructDef);

impl EnumDef {
    /// Create a new enum definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append an element; its ordinal is its position.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        let ordinal = self.element_defs.len() as i64;
        self.element_defs.push(EnumElementDef {
            value: value.into(),
            ordinal: Some(ordinal),
            description: None,
        });
        self
    }

    /// Set the service namespace.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }
}

impl StructDef {
    /// Create a new struct definition.
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

    /// Set the service namespace.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }
}
