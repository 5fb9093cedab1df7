//! Enumeration resolution.

use crate::cache::ModelCache;
use crate::catalog::EnumDef;
use crate::diagnostics::DiagnosticKind;
use serde::Serialize;
use std::collections::BTreeSet;

/// A resolved enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEnumValue {
    /// Raw value as stored in the catalog.
    pub raw: String,
    /// Constant name after renaming.
    pub name: String,
    /// Ordinal, when the catalog supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i64>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A resolved enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEnumModel {
    /// Name in the catalog.
    pub original_name: String,
    /// Generated class name.
    pub class_name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Values ordered by ordinal.
    pub values: Vec<ResolvedEnumValue>,
}

impl ResolvedEnumModel {
    /// A model with a name and no values.
    pub fn named(original_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            class_name: class_name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    /// Value by constant name.
    pub fn value(&self, name: &str) -> Option<&ResolvedEnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// Resolve an enumeration definition.
///
/// Elements are ordered by ordinal; elements without one follow in
/// declaration order. Two elements that resolve to the same constant name
/// are a conflict and the first is kept.
pub fn resolve_enum(cache: &ModelCache, def: &EnumDef) -> ResolvedEnumModel {
    let config = cache.config();
    let mut model = ResolvedEnumModel::named(def.name.clone(), config.resolve_class_name(&def.name));
    model.description = def.description.clone();

    let mut elements: Vec<_> = def.element_defs.iter().collect();
    elements.sort_by_key(|e| (e.ordinal.is_none(), e.ordinal));

    let mut seen = BTreeSet::new();
    for element in elements {
        let name = config.resolve_enum_value(&element.value);
        if !seen.insert(name.clone()) {
            cache.diagnostics().record(
                DiagnosticKind::Conflict,
                def.name.as_str(),
                name.as_str(),
                format!("value {} resolves to an existing constant", element.value),
            );
            continue;
        }
        model.values.push(ResolvedEnumValue {
            raw: element.value.clone(),
            name,
            ordinal: element.ordinal,
            description: element.description.clone(),
        });
    }

    tracing::debug!(name = %def.name, values = model.values.len(), "resolved enum");
    model
}
