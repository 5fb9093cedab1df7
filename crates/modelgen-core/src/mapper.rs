//! Mapping of raw catalog type names onto the target type vocabulary.
//!
//! A raw type name is either a bare name (`string`, `Table`,
//! `SourceTagAttachment`) or one of the container shapes `array<T>`,
//! `array<map<K,V>>` and `map<K,V>`.

use crate::cache::ModelCache;
use serde::Serialize;

/// Kind of a mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A built-in primitive or key/value pair.
    Primitive,
    /// A generated enumeration.
    Enum,
    /// A generated struct.
    Struct,
    /// A reference to a generated asset class.
    Asset,
}

/// Container wrapping a mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    /// `array<T>`: a sorted set of values.
    SortedSet,
    /// `array<map<K,V>>`: a list of maps.
    ListOfMap,
    /// `map<K,V>`.
    Map,
    /// A plain ordered list (arrays of structs).
    List,
}

/// Built-in primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `date`, carried as epoch milliseconds.
    Date,
    /// `float`
    Float,
    /// `string,string` key/value pair.
    StringStringPair,
    /// `string,long` key/value pair.
    StringLongPair,
}

impl Primitive {
    /// Look up a raw base name in the primitive table.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let normalized: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        match normalized.as_str() {
            "string" => Some(Primitive::String),
            "boolean" => Some(Primitive::Boolean),
            "int" => Some(Primitive::Int),
            "long" => Some(Primitive::Long),
            "date" => Some(Primitive::Date),
            "float" => Some(Primitive::Float),
            "string,string" => Some(Primitive::StringStringPair),
            "string,long" => Some(Primitive::StringLongPair),
            _ => None,
        }
    }

    /// Name of the primitive in the target vocabulary.
    pub fn target_name(&self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Boolean => "Boolean",
            Primitive::Int => "Integer",
            Primitive::Long | Primitive::Date => "Long",
            Primitive::Float => "Double",
            Primitive::StringStringPair => "String, String",
            Primitive::StringLongPair => "String, Long",
        }
    }
}

/// A raw type name resolved to the target vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MappedType {
    /// Kind of the resolved type.
    pub kind: TypeKind,
    /// Canonical target name (primitive name or generated class name).
    pub name: String,
    /// Raw base name inside any container, as declared.
    pub base: String,
    /// Container wrapper, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
}

impl MappedType {
    /// A type with no container.
    pub fn new(kind: TypeKind, name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            base: base.into(),
            container: None,
        }
    }

    /// Whether the type is wrapped in a map-shaped container.
    pub fn is_map(&self) -> bool {
        matches!(self.container, Some(Container::Map | Container::ListOfMap))
    }

    /// Whether the type holds more than one value.
    pub fn is_multi_valued(&self) -> bool {
        self.container.is_some()
    }
}

/// Split a raw type name into its container and inner base name.
pub fn parse_container(raw: &str) -> (Option<Container>, &str) {
    let raw = raw.trim();
    if let Some(inner) = raw
        .strip_prefix("array<map<")
        .and_then(|rest| rest.strip_suffix(">>"))
    {
        (Some(Container::ListOfMap), inner)
    } else if let Some(inner) = raw
        .strip_prefix("array<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        (Some(Container::SortedSet), inner)
    } else if let Some(inner) = raw
        .strip_prefix("map<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        (Some(Container::Map), inner)
    } else {
        (None, raw)
    }
}

/// Map a raw type name, consulting the cache for non-primitive names.
///
/// Names that are neither primitive nor known to the cache are treated as
/// forward references to assets resolved later in the same run.
pub fn map_type(cache: &ModelCache, raw: &str) -> MappedType {
    let (container, inner) = parse_container(raw);

    if let Some(primitive) = Primitive::from_raw(inner) {
        return MappedType {
            kind: TypeKind::Primitive,
            name: primitive.target_name().to_string(),
            base: inner.to_string(),
            container,
        };
    }

    if let Some(cached) = cache.cached_type(inner) {
        // Structs have no ordering or hashing in the output model.
        let container = match (cached.kind, container) {
            (TypeKind::Struct, Some(Container::SortedSet | Container::ListOfMap)) => {
                Some(Container::List)
            }
            (_, container) => container,
        };
        return MappedType {
            container,
            ..cached
        };
    }

    tracing::debug!(raw, base = inner, "mapping unknown type as asset reference");
    MappedType {
        kind: TypeKind::Asset,
        name: inner.to_string(),
        base: inner.to_string(),
        container,
    }
}
