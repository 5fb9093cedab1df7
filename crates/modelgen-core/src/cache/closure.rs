//! Inheritance closures over the entity graph.

use super::ModelCache;
use crate::catalog::{AttributeDef, EntityDef, RelationshipAttributeDef};
use crate::diagnostics::DiagnosticKind;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A definition together with the type that declared it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedDef<T> {
    /// Name of the declaring type.
    pub owner: String,
    /// The definition.
    pub def: T,
}

/// Attribute closure keyed by attribute name.
pub type AttributeClosure = BTreeMap<String, OwnedDef<AttributeDef>>;

/// Relationship closure keyed by relationship attribute name.
pub type RelationshipClosure = BTreeMap<String, OwnedDef<RelationshipAttributeDef>>;

/// A definition collected into a closure.
trait ClosureMember: Clone {
    fn members_of(def: &EntityDef) -> &[Self];
    fn member_name(&self) -> &str;
    fn member_type(&self) -> &str;
}

impl ClosureMember for AttributeDef {
    fn members_of(def: &EntityDef) -> &[Self] {
        &def.attribute_defs
    }

    fn member_name(&self) -> &str {
        &self.name
    }

    fn member_type(&self) -> &str {
        &self.type_name
    }
}

impl ClosureMember for RelationshipAttributeDef {
    fn members_of(def: &EntityDef) -> &[Self] {
        &def.relationship_attribute_defs
    }

    fn member_name(&self) -> &str {
        self.name()
    }

    fn member_type(&self) -> &str {
        &self.relationship_type_name
    }
}

impl ModelCache {
    /// Transitive closure of the super-types of `name`.
    ///
    /// The root type's closure is the root type itself.
    pub fn all_super_types_of(&self, name: &str) -> Arc<BTreeSet<String>> {
        let mut path = Vec::new();
        self.super_types_along(name, &mut path).0
    }

    /// Closure of `name` walked from `path`, and whether a cycle was cut.
    ///
    /// Only closures whose walk cut no cycle are memoized; a cut closure
    /// depends on where the walk entered the cycle.
    fn super_types_along(&self, name: &str, path: &mut Vec<String>) -> (Arc<BTreeSet<String>>, bool) {
        if let Some(hit) = self.super_types.get(name) {
            return (Arc::clone(hit.value()), false);
        }

        let mut result = BTreeSet::new();
        let mut cut = false;
        if name == self.config.root_type {
            result.insert(name.to_string());
        } else if let Some(def) = self.entity_defs.get(name) {
            path.push(name.to_string());
            for parent in &def.super_types {
                if path.iter().any(|p| p == parent) {
                    self.diagnostics.record(
                        DiagnosticKind::InheritanceCycle,
                        name,
                        parent.as_str(),
                        format!("cycle through {}", path.join(" -> ")),
                    );
                    cut = true;
                    continue;
                }
                result.insert(parent.clone());
                let (inherited, inherited_cut) = self.super_types_along(parent, path);
                result.extend(inherited.iter().cloned());
                cut |= inherited_cut;
            }
            path.pop();
        } else {
            self.diagnostics.record(
                DiagnosticKind::MissingDefinition,
                name,
                name,
                "no entity definition for super-type lookup",
            );
        }

        let result = Arc::new(result);
        if !cut {
            self.super_types
                .insert(name.to_string(), Arc::clone(&result));
        }
        (result, cut)
    }

    /// Every attribute visible on `name`, its own and inherited.
    ///
    /// The root type contributes only the identity attribute. Attribute names
    /// configured as skipped never appear. On a name collision the definition
    /// met first (own attributes, then super-types depth-first in declared
    /// order) is kept and the collision is reported.
    pub fn all_attributes_of(&self, name: &str) -> Arc<AttributeClosure> {
        if let Some(hit) = self.attributes.get(name) {
            return Arc::clone(hit.value());
        }

        let mut closure = BTreeMap::new();
        let mut visited = BTreeSet::new();
        self.collect_closure(
            name,
            name,
            &mut closure,
            &mut visited,
            &|is_root, attr: &AttributeDef| {
                !self.config.is_skipped_attribute(&attr.name)
                    && (!is_root || attr.name == self.config.identity_attribute)
            },
        );

        let closure = Arc::new(closure);
        self.attributes
            .insert(name.to_string(), Arc::clone(&closure));
        closure
    }

    /// Every relationship attribute visible on `name`, its own and inherited.
    ///
    /// The root type contributes only the configured root relationship.
    pub fn all_relationships_of(&self, name: &str) -> Arc<RelationshipClosure> {
        if let Some(hit) = self.relationships.get(name) {
            return Arc::clone(hit.value());
        }

        let mut closure = BTreeMap::new();
        let mut visited = BTreeSet::new();
        self.collect_closure(
            name,
            name,
            &mut closure,
            &mut visited,
            &|is_root, rel: &RelationshipAttributeDef| {
                !is_root || rel.name() == self.config.root_relationship
            },
        );

        let closure = Arc::new(closure);
        self.relationships
            .insert(name.to_string(), Arc::clone(&closure));
        closure
    }

    /// Relationship names declared directly on `name` that none of its
    /// super-types already declare.
    pub fn unique_relationships_of(&self, name: &str) -> Arc<BTreeSet<String>> {
        if let Some(hit) = self.unique_relationships.get(name) {
            return Arc::clone(hit.value());
        }

        let mut unique = BTreeSet::new();
        if let Some(def) = self.entity_defs.get(name) {
            let supers = self.all_super_types_of(name);
            let inherited: BTreeSet<&str> = supers
                .iter()
                .filter(|s| s.as_str() != name)
                .filter_map(|s| self.entity_defs.get(s))
                .flat_map(|s| s.relationship_attribute_defs.iter().map(|r| r.name()))
                .collect();
            unique.extend(
                def.relationship_attribute_defs
                    .iter()
                    .map(|r| r.name())
                    .filter(|n| !inherited.contains(n))
                    .map(String::from),
            );
        }

        let unique = Arc::new(unique);
        self.unique_relationships
            .insert(name.to_string(), Arc::clone(&unique));
        unique
    }

    /// Attributes of `name` not already present on the asset base type.
    pub fn non_asset_attributes_of(&self, name: &str) -> Arc<AttributeClosure> {
        if let Some(hit) = self.non_asset_attributes.get(name) {
            return Arc::clone(hit.value());
        }

        let base = self.all_attributes_of(&self.config.asset_type);
        let closure: AttributeClosure = self
            .all_attributes_of(name)
            .iter()
            .filter(|(key, _)| !base.contains_key(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let closure = Arc::new(closure);
        self.non_asset_attributes
            .insert(name.to_string(), Arc::clone(&closure));
        closure
    }

    /// Relationships of `name` not already present on the asset base type.
    pub fn non_asset_relationships_of(&self, name: &str) -> Arc<RelationshipClosure> {
        if let Some(hit) = self.non_asset_relationships.get(name) {
            return Arc::clone(hit.value());
        }

        let base = self.all_relationships_of(&self.config.asset_type);
        let closure: RelationshipClosure = self
            .all_relationships_of(name)
            .iter()
            .filter(|(key, _)| !base.contains_key(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let closure = Arc::new(closure);
        self.non_asset_relationships
            .insert(name.to_string(), Arc::clone(&closure));
        closure
    }

    fn collect_closure<T: ClosureMember>(
        &self,
        target: &str,
        current: &str,
        closure: &mut BTreeMap<String, OwnedDef<T>>,
        visited: &mut BTreeSet<String>,
        keep: &dyn Fn(bool, &T) -> bool,
    ) {
        if !visited.insert(current.to_string()) {
            return;
        }
        let Some(def) = self.entity_defs.get(current) else {
            self.diagnostics.record(
                DiagnosticKind::MissingDefinition,
                target,
                current,
                "super-type has no entity definition",
            );
            return;
        };

        let is_root = current == self.config.root_type;
        for item in T::members_of(def) {
            if !keep(is_root, item) {
                continue;
            }
            let key = item.member_name();
            match closure.get(key) {
                Some(existing) => {
                    self.diagnostics.record(
                        DiagnosticKind::Conflict,
                        target,
                        key,
                        format!(
                            "kept {}:{}, discarded {}:{}",
                            existing.owner,
                            existing.def.member_type(),
                            current,
                            item.member_type()
                        ),
                    );
                }
                None => {
                    closure.insert(
                        key.to_string(),
                        OwnedDef {
                            owner: current.to_string(),
                            def: item.clone(),
                        },
                    );
                }
            }
        }

        for parent in &def.super_types {
            self.collect_closure(target, parent, closure, visited, keep);
        }
    }
}
