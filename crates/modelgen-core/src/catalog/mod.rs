//! Type definition catalog.
//!
//! Raw enum, struct, entity and relationship definitions as supplied by the
//! type definition store. These are read-only inputs to resolution.

mod catalog;
mod entity;
mod field;
mod relation;
mod schema;
mod types;

pub use catalog::TypeDefSource;
pub use entity::EntityDef;
pub use field::{AttributeDef, IndexConfig, IndexField, RelationshipAttributeDef};
pub use relation::{Cardinality, RelationshipDef, RelationshipEndDef};
pub use schema::TypeDefSnapshot;
pub use types::{EnumDef, EnumElementDef, StructDef, TypeDef};
