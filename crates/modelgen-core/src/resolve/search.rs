//! Search-index classification of resolved attributes.
//!
//! Each attribute is indexed as zero or more concrete fields, each with an
//! index type. The set of index types present selects one composite search
//! field kind used by downstream query builders.

use crate::catalog::{AttributeDef, IndexField};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::mapper::{MappedType, TypeKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Suffix marking a stemmed text field.
const STEMMED_SUFFIX: &str = ".stemmed";

/// How one concrete field is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// Exact-match keyword.
    Keyword,
    /// Analyzed full text.
    Text,
    /// Stemmed full text.
    Stemmed,
    /// Numeric range.
    Numeric,
    /// Boolean.
    Boolean,
    /// Rank feature for scoring.
    RankFeature,
    /// Relationship, matched by reference only.
    Relation,
    /// Relationship searchable through its relationship type.
    SearchableRelation,
}

/// Composite search field kind of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    /// Keyword only.
    Keyword,
    /// Text only.
    Text,
    /// Keyword and text.
    KeywordText,
    /// Keyword, text and stemmed text.
    KeywordTextStemmed,
    /// Numeric only.
    Numeric,
    /// Boolean only.
    Boolean,
    /// Numeric with a rank feature.
    NumericRank,
    /// Plain relation.
    Relation,
    /// Searchable relation.
    SearchableRelation,
}

impl SearchField {
    /// Composite kind for a set of index types, if the combination is known.
    pub fn from_index_types(types: &BTreeSet<IndexType>) -> Option<Self> {
        use IndexType as T;
        let types: Vec<IndexType> = types.iter().copied().collect();
        match types.as_slice() {
            [T::Keyword] => Some(SearchField::Keyword),
            [T::Text] => Some(SearchField::Text),
            [T::Keyword, T::Text] => Some(SearchField::KeywordText),
            [T::Keyword, T::Text, T::Stemmed] => Some(SearchField::KeywordTextStemmed),
            [T::Numeric] => Some(SearchField::Numeric),
            [T::Boolean] => Some(SearchField::Boolean),
            [T::Numeric, T::RankFeature] => Some(SearchField::NumericRank),
            [T::Relation] => Some(SearchField::Relation),
            [T::SearchableRelation] => Some(SearchField::SearchableRelation),
            _ => None,
        }
    }
}

/// Search classification of one attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchClassification {
    /// Composite kind; `None` when the attribute is not searchable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<SearchField>,
    /// Concrete indexed field name per index type.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub indexed: BTreeMap<IndexType, String>,
}

impl SearchClassification {
    /// Whether the attribute is searchable.
    pub fn is_searchable(&self) -> bool {
        self.field.is_some()
    }

    /// Indexed field name for an index type.
    pub fn field_name(&self, index_type: IndexType) -> Option<&str> {
        self.indexed.get(&index_type).map(String::as_str)
    }
}

/// Classifies attributes for one owning type.
pub struct SearchClassifier<'a> {
    diagnostics: &'a Diagnostics,
    owner: &'a str,
    string_default: IndexType,
}

impl<'a> SearchClassifier<'a> {
    /// Create a classifier; `string_default` is the index type of plain strings.
    pub fn new(diagnostics: &'a Diagnostics, owner: &'a str, string_default: IndexType) -> Self {
        Self {
            diagnostics,
            owner,
            string_default,
        }
    }

    /// Classify a relationship attribute.
    ///
    /// `searchable_as` is the configured searchable relationship type for the
    /// attribute, if any; it only applies when it names the attribute's own
    /// relationship type.
    pub fn classify_relationship(
        &self,
        attribute: &str,
        relationship_type: &str,
        searchable_as: Option<&str>,
    ) -> SearchClassification {
        let mut indexed = BTreeMap::new();
        match searchable_as {
            Some(configured) if configured == relationship_type => {
                indexed.insert(IndexType::SearchableRelation, configured.to_string());
            }
            _ => {
                indexed.insert(IndexType::Relation, attribute.to_string());
            }
        }
        self.finish(attribute, indexed)
    }

    /// Classify a plain attribute with its mapped type.
    pub fn classify_attribute(&self, def: &AttributeDef, mapped: &MappedType) -> SearchClassification {
        let mut indexed = BTreeMap::new();

        let primary = match def.analyzer() {
            Some(_) => Some(text_or_stemmed(&def.name)),
            None => self.default_index_type(mapped),
        };
        if let Some(index_type) = primary {
            indexed.insert(index_type, def.name.clone());
        }

        for (suffix, sub) in &def.index_fields {
            let field_name = format!("{}.{}", def.name, suffix);
            let Some(index_type) = sub_field_index_type(&field_name, sub) else {
                tracing::debug!(
                    owner = self.owner,
                    field = %field_name,
                    index_type = %sub.index_type,
                    "ignoring sub-field with unknown index type"
                );
                continue;
            };
            if let Some(previous) = indexed.insert(index_type, field_name.clone()) {
                self.diagnostics.record(
                    DiagnosticKind::DuplicateIndexType,
                    self.owner,
                    def.name.as_str(),
                    format!("{index_type:?} on both {previous} and {field_name}, keeping {field_name}"),
                );
            }
        }

        self.finish(&def.name, indexed)
    }

    fn default_index_type(&self, mapped: &MappedType) -> Option<IndexType> {
        match mapped.kind {
            TypeKind::Primitive => match mapped.base.as_str() {
                "date" | "float" | "double" | "int" | "long" => Some(IndexType::Numeric),
                "boolean" => Some(IndexType::Boolean),
                "string" => Some(self.string_default),
                _ => None,
            },
            TypeKind::Enum => Some(IndexType::Keyword),
            TypeKind::Struct | TypeKind::Asset => None,
        }
    }

    fn finish(&self, attribute: &str, indexed: BTreeMap<IndexType, String>) -> SearchClassification {
        if indexed.is_empty() {
            return SearchClassification::default();
        }
        let types: BTreeSet<IndexType> = indexed.keys().copied().collect();
        let field = SearchField::from_index_types(&types);
        if field.is_none() {
            self.diagnostics.record(
                DiagnosticKind::UnhandledSearchCombination,
                self.owner,
                attribute,
                format!("{types:?}"),
            );
        }
        SearchClassification { field, indexed }
    }
}

fn text_or_stemmed(field_name: &str) -> IndexType {
    if field_name.ends_with(STEMMED_SUFFIX) {
        IndexType::Stemmed
    } else {
        IndexType::Text
    }
}

fn sub_field_index_type(field_name: &str, sub: &IndexField) -> Option<IndexType> {
    match sub.index_type.as_str() {
        "keyword" => Some(IndexType::Keyword),
        "text" => Some(text_or_stemmed(field_name)),
        "rank_feature" => Some(IndexType::RankFeature),
        "boolean" => Some(IndexType::Boolean),
        "long" | "integer" | "float" | "double" | "date" => Some(IndexType::Numeric),
        _ if sub.analyzer.is_some() => Some(text_or_stemmed(field_name)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Container;

    fn primitive(base: &str) -> MappedType {
        MappedType::new(TypeKind::Primitive, base, base)
    }

    #[test]
    fn test_composite_kinds() {
        let set = |types: &[IndexType]| types.iter().copied().collect::<BTreeSet<_>>();

        assert_eq!(
            SearchField::from_index_types(&set(&[IndexType::Text, IndexType::Keyword])),
            Some(SearchField::KeywordText)
        );
        assert_eq!(
            SearchField::from_index_types(&set(&[
                IndexType::Stemmed,
                IndexType::Keyword,
                IndexType::Text
            ])),
            Some(SearchField::KeywordTextStemmed)
        );
        assert_eq!(
            SearchField::from_index_types(&set(&[IndexType::RankFeature, IndexType::Numeric])),
            Some(SearchField::NumericRank)
        );
        assert_eq!(
            SearchField::from_index_types(&set(&[IndexType::Text, IndexType::Stemmed])),
            None
        );
    }

    #[test]
    fn test_default_string_is_keyword_for_assets() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "Table", IndexType::Keyword);
        let def = AttributeDef::new("schemaName", "string");

        let search = classifier.classify_attribute(&def, &primitive("string"));
        assert_eq!(search.field, Some(SearchField::Keyword));
        assert_eq!(search.field_name(IndexType::Keyword), Some("schemaName"));
    }

    #[test]
    fn test_default_string_is_text_for_relationship_defs() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "table_columns", IndexType::Text);
        let def = AttributeDef::new("createdBy", "string");

        let search = classifier.classify_attribute(&def, &primitive("string"));
        assert_eq!(search.field, Some(SearchField::Text));
    }

    #[test]
    fn test_numeric_and_boolean_defaults() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "Table", IndexType::Keyword);

        for base in ["date", "float", "int", "long"] {
            let def = AttributeDef::new("value", base);
            let search = classifier.classify_attribute(&def, &primitive(base));
            assert_eq!(search.field, Some(SearchField::Numeric), "{base}");
        }
        let flag = AttributeDef::new("isPartitioned", "boolean");
        let search = classifier.classify_attribute(&flag, &primitive("boolean"));
        assert_eq!(search.field, Some(SearchField::Boolean));
    }

    #[test]
    fn test_analyzer_with_sub_fields() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "Asset", IndexType::Keyword);
        let def = AttributeDef::new("name", "string")
            .with_analyzer("atlan_text_analyzer")
            .with_index_field("keyword", IndexField::keyword())
            .with_index_field("stemmed", IndexField::text("snowball"));

        let search = classifier.classify_attribute(&def, &primitive("string"));
        assert_eq!(search.field, Some(SearchField::KeywordTextStemmed));
        assert_eq!(search.field_name(IndexType::Text), Some("name"));
        assert_eq!(search.field_name(IndexType::Keyword), Some("name.keyword"));
        assert_eq!(search.field_name(IndexType::Stemmed), Some("name.stemmed"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_numeric_rank_feature() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "Asset", IndexType::Keyword);
        let def = AttributeDef::new("popularityScore", "float")
            .with_index_field("rank_feature", IndexField::rank_feature());

        let search = classifier.classify_attribute(&def, &primitive("float"));
        assert_eq!(search.field, Some(SearchField::NumericRank));
        assert_eq!(
            search.field_name(IndexType::RankFeature),
            Some("popularityScore.rank_feature")
        );
    }

    #[test]
    fn test_duplicate_index_type_last_wins() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "Asset", IndexType::Keyword);
        let def = AttributeDef::new("displayName", "string")
            .with_index_field("raw", IndexField::keyword());

        let search = classifier.classify_attribute(&def, &primitive("string"));
        assert_eq!(search.field_name(IndexType::Keyword), Some("displayName.raw"));
        assert_eq!(search.field, Some(SearchField::Keyword));
        assert_eq!(diagnostics.count(DiagnosticKind::DuplicateIndexType), 1);
    }

    #[test]
    fn test_unhandled_combination_leaves_unclassified() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "Asset", IndexType::Keyword);
        let def = AttributeDef::new("flag", "boolean")
            .with_index_field("keyword", IndexField::keyword());

        let search = classifier.classify_attribute(&def, &primitive("boolean"));
        assert!(!search.is_searchable());
        assert_eq!(search.indexed.len(), 2);
        assert_eq!(diagnostics.count(DiagnosticKind::UnhandledSearchCombination), 1);
    }

    #[test]
    fn test_struct_attribute_not_indexed() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "Asset", IndexType::Keyword);
        let def = AttributeDef::new("sourceTagAttachments", "array<SourceTagAttachment>");
        let mut mapped = MappedType::new(TypeKind::Struct, "SourceTagAttachment", "SourceTagAttachment");
        mapped.container = Some(Container::List);

        let search = classifier.classify_attribute(&def, &mapped);
        assert!(!search.is_searchable());
        assert!(search.indexed.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_relationship_classification() {
        let diagnostics = Diagnostics::new();
        let classifier = SearchClassifier::new(&diagnostics, "Asset", IndexType::Keyword);

        let plain = classifier.classify_relationship("links", "asset_links", None);
        assert_eq!(plain.field, Some(SearchField::Relation));
        assert_eq!(plain.field_name(IndexType::Relation), Some("links"));

        let searchable = classifier.classify_relationship(
            "meanings",
            "AtlasGlossarySemanticAssignment",
            Some("AtlasGlossarySemanticAssignment"),
        );
        assert_eq!(searchable.field, Some(SearchField::SearchableRelation));
        assert_eq!(
            searchable.field_name(IndexType::SearchableRelation),
            Some("AtlasGlossarySemanticAssignment")
        );

        let mismatched = classifier.classify_relationship("meanings", "other_type", Some("AtlasGlossarySemanticAssignment"));
        assert_eq!(mismatched.field, Some(SearchField::Relation));
    }
}
