//! Resolution of raw definitions into generator models.
//!
//! - Attribute resolution: renaming, type mapping, overrides, search classification
//! - Enum and struct resolution
//! - Relationship definition resolution
//! - Two-pass entity resolution

mod attribute;
mod entity;
mod enums;
mod relationship;
mod search;
mod structs;

pub use attribute::{AttributeResolver, AttributeSet, ResolvedAttribute};
pub use entity::{
    register_entity_names, EntityHandle, EntityResolver, RegisteredEntities, ResolvedEntityModel,
};
pub use enums::{resolve_enum, ResolvedEnumModel, ResolvedEnumValue};
pub use relationship::{resolve_relationship, ResolvedRelationshipEnd, ResolvedRelationshipModel};
pub use search::{IndexType, SearchClassification, SearchClassifier, SearchField};
pub use structs::{resolve_struct, resolve_struct_names, ResolvedStructModel};
