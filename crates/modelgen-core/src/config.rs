//! Naming and override configuration.
//!
//! A declarative table of renames, type overrides, singular forms,
//! searchable relationships and inclusion rules. Immutable once a run starts.

use crate::catalog::TypeDef;
use crate::error::Error;
use crate::naming;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Default name of the inheritance root type.
pub const DEFAULT_ROOT_TYPE: &str = "Referenceable";

/// Default name of the asset base type.
pub const DEFAULT_ASSET_TYPE: &str = "Asset";

/// Default sentinel parent class of the asset base type.
pub const DEFAULT_REFERENCE_CLASS: &str = "Reference";

/// Default identity attribute contributed by the root type.
pub const DEFAULT_IDENTITY_ATTRIBUTE: &str = "qualifiedName";

/// Default relationship contributed by the root type.
pub const DEFAULT_ROOT_RELATIONSHIP: &str = "meanings";

/// Default pseudo-type marking attributes with no output representation.
pub const DEFAULT_INTERNAL_TYPE: &str = "__internal";

/// Default description backfilled onto the root type.
pub const DEFAULT_ROOT_DESCRIPTION: &str = "Base class for everything in the catalog.";

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Name of the inheritance root type.
    pub root_type: String,
    /// Name of the type every generated asset class extends.
    pub asset_type: String,
    /// Parent class name of the asset base type.
    pub reference_class: String,
    /// The only attribute the root type contributes to closures.
    pub identity_attribute: String,
    /// The only relationship the root type contributes to closures.
    pub root_relationship: String,
    /// Description used when the root type has none.
    pub root_description: String,
    /// Attributes of this type name are dropped from generated models.
    pub internal_type: String,
    /// Attribute names that are always skipped.
    pub skipped_attributes: BTreeSet<String>,
    /// Type name -> class name.
    pub class_renames: BTreeMap<String, String>,
    /// Attribute name -> renamed attribute name.
    pub attribute_renames: BTreeMap<String, String>,
    /// Raw enum value -> constant name.
    pub enum_value_renames: BTreeMap<String, String>,
    /// Attribute name -> singular form.
    pub singular_forms: BTreeMap<String, String>,
    /// Owning type -> attribute name -> replacement type.
    pub type_overrides: BTreeMap<String, BTreeMap<String, String>>,
    /// Attribute name -> enumeration it is forced to.
    pub enum_overrides: BTreeMap<String, String>,
    /// Relationship attribute name -> relationship type that is searchable.
    pub searchable_relationships: BTreeMap<String, String>,
    /// Service namespaces to generate; empty means all.
    pub include_service_types: BTreeSet<String>,
    /// Type names never generated.
    pub exclude_types: BTreeSet<String>,
    /// Type names never generated as abstract.
    pub force_concrete: BTreeSet<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_type: DEFAULT_ROOT_TYPE.to_string(),
            asset_type: DEFAULT_ASSET_TYPE.to_string(),
            reference_class: DEFAULT_REFERENCE_CLASS.to_string(),
            identity_attribute: DEFAULT_IDENTITY_ATTRIBUTE.to_string(),
            root_relationship: DEFAULT_ROOT_RELATIONSHIP.to_string(),
            root_description: DEFAULT_ROOT_DESCRIPTION.to_string(),
            internal_type: DEFAULT_INTERNAL_TYPE.to_string(),
            skipped_attributes: ["inputs", "outputs"].into_iter().map(String::from).collect(),
            class_renames: BTreeMap::new(),
            attribute_renames: BTreeMap::new(),
            enum_value_renames: BTreeMap::new(),
            singular_forms: BTreeMap::new(),
            type_overrides: BTreeMap::new(),
            enum_overrides: BTreeMap::new(),
            searchable_relationships: BTreeMap::new(),
            include_service_types: BTreeSet::new(),
            exclude_types: BTreeSet::new(),
            force_concrete: BTreeSet::new(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check that the structural type names are set.
    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("root_type", &self.root_type),
            ("asset_type", &self.asset_type),
            ("reference_class", &self.reference_class),
            ("identity_attribute", &self.identity_attribute),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// Rename a type.
    pub fn with_class_rename(mut self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.class_renames.insert(name.into(), class.into());
        self
    }

    /// Rename an attribute.
    pub fn with_attribute_rename(
        mut self,
        name: impl Into<String>,
        renamed: impl Into<String>,
    ) -> Self {
        self.attribute_renames.insert(name.into(), renamed.into());
        self
    }

    /// Rename an enum value.
    pub fn with_enum_value_rename(
        mut self,
        raw: impl Into<String>,
        renamed: impl Into<String>,
    ) -> Self {
        self.enum_value_renames.insert(raw.into(), renamed.into());
        self
    }

    /// Set the singular form of an attribute name.
    pub fn with_singular_form(
        mut self,
        name: impl Into<String>,
        singular: impl Into<String>,
    ) -> Self {
        self.singular_forms.insert(name.into(), singular.into());
        self
    }

    /// Retype an attribute at a specific owning type.
    pub fn with_type_override(
        mut self,
        owning_type: impl Into<String>,
        attribute: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.type_overrides
            .entry(owning_type.into())
            .or_default()
            .insert(attribute.into(), type_name.into());
        self
    }

    /// Force an attribute to an enumeration.
    pub fn with_enum_override(
        mut self,
        attribute: impl Into<String>,
        enum_name: impl Into<String>,
    ) -> Self {
        self.enum_overrides.insert(attribute.into(), enum_name.into());
        self
    }

    /// Mark a relationship attribute as searchable through a relationship type.
    pub fn with_searchable_relationship(
        mut self,
        attribute: impl Into<String>,
        relationship_type: impl Into<String>,
    ) -> Self {
        self.searchable_relationships
            .insert(attribute.into(), relationship_type.into());
        self
    }

    /// Only generate types from the given service namespace (may be repeated).
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.include_service_types.insert(service_type.into());
        self
    }

    /// Never generate the given type.
    pub fn with_excluded_type(mut self, name: impl Into<String>) -> Self {
        self.exclude_types.insert(name.into());
        self
    }

    /// Never generate the given type as abstract.
    pub fn with_force_concrete(mut self, name: impl Into<String>) -> Self {
        self.force_concrete.insert(name.into());
        self
    }

    /// Resolved class name of a type.
    pub fn resolve_class_name(&self, name: &str) -> String {
        self.class_renames
            .get(name)
            .cloned()
            .unwrap_or_else(|| naming::class_name(name))
    }

    /// Resolved name of an attribute.
    pub fn resolve_attribute_name(&self, name: &str) -> String {
        self.attribute_renames
            .get(name)
            .cloned()
            .unwrap_or_else(|| naming::attribute_name(name))
    }

    /// Resolved constant name of a raw enum value.
    pub fn resolve_enum_value(&self, raw: &str) -> String {
        self.enum_value_renames
            .get(raw)
            .cloned()
            .unwrap_or_else(|| naming::enum_value(raw))
    }

    /// Singular form of an attribute name, or an empty string if it has none.
    pub fn resolve_singular_form(&self, name: &str) -> String {
        self.singular_forms
            .get(name)
            .cloned()
            .unwrap_or_else(|| naming::singular(name))
    }

    /// Replacement type for an attribute at a specific owning type.
    pub fn type_override(&self, owning_type: &str, attribute: &str) -> Option<&str> {
        self.type_overrides
            .get(owning_type)
            .and_then(|attrs| attrs.get(attribute))
            .map(String::as_str)
    }

    /// Enumeration an attribute is forced to.
    pub fn enum_override(&self, attribute: &str) -> Option<&str> {
        self.enum_overrides.get(attribute).map(String::as_str)
    }

    /// Relationship type through which a relationship attribute is searchable.
    pub fn searchable_relationship(&self, attribute: &str) -> Option<&str> {
        self.searchable_relationships
            .get(attribute)
            .map(String::as_str)
    }

    /// Whether a type definition should be generated.
    pub fn include_type_def(&self, def: &dyn TypeDef) -> bool {
        if self.exclude_types.contains(def.name()) {
            return false;
        }
        if self.include_service_types.is_empty() {
            return true;
        }
        def.service_type()
            .is_some_and(|service| self.include_service_types.contains(service))
    }

    /// Whether a type is never generated as abstract.
    pub fn force_concrete(&self, name: &str) -> bool {
        self.force_concrete.contains(name)
    }

    /// Whether an attribute name is always skipped.
    pub fn is_skipped_attribute(&self, name: &str) -> bool {
        self.skipped_attributes.contains(name)
    }
}
