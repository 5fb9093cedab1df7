//! Modelgen Core - Type-model resolution for generated object models.
//!
//! This crate turns a catalog of enum, struct, entity and relationship
//! definitions into fully named, inheritance-flattened models ready to be
//! rendered into source code.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod mapper;
pub mod naming;
pub mod resolve;

pub use cache::{AttributeClosure, ModelCache, OwnedDef, RelationshipClosure};
pub use catalog::{
    AttributeDef, Cardinality, EntityDef, EnumDef, EnumElementDef, IndexConfig, IndexField,
    RelationshipAttributeDef, RelationshipDef, RelationshipEndDef, StructDef, TypeDef,
    TypeDefSnapshot, TypeDefSource,
};
pub use config::GeneratorConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::Error;
pub use generator::{GeneratedModels, GeneratorOptions, ModelGenerator};
pub use mapper::{map_type, Container, MappedType, Primitive, TypeKind};

// Resolution exports
pub use resolve::{
    register_entity_names, resolve_enum, resolve_relationship, resolve_struct,
    resolve_struct_names, AttributeResolver, AttributeSet, EntityHandle, EntityResolver,
    IndexType, RegisteredEntities, ResolvedAttribute, ResolvedEntityModel, ResolvedEnumModel,
    ResolvedEnumValue, ResolvedRelationshipEnd, ResolvedRelationshipModel, ResolvedStructModel,
    SearchClassification, SearchClassifier, SearchField,
};
