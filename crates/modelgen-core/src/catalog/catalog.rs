//! Read surface of the type definition store.

use super::{EntityDef, EnumDef, RelationshipDef, StructDef};

/// A source of type definitions, read once before resolution starts.
///
/// Implementations return stable, name-keyed collections; the resolver
/// never writes back to the store.
pub trait TypeDefSource {
    /// All enum definitions.
    fn list_enum_defs(&self) -> Vec<EnumDef>;

    /// All struct definitions.
    fn list_struct_defs(&self) -> Vec<StructDef>;

    /// All entity definitions.
    fn list_entity_defs(&self) -> Vec<EntityDef>;

    /// All relationship definitions.
    fn list_relationship_defs(&self) -> Vec<RelationshipDef>;
}
