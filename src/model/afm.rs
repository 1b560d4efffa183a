//! AFM: the normalized, execution-oriented model sent towards the backend.
//!
//! Top-level lists and optional definition fields are omitted when empty,
//! and default to empty when absent.

use serde::{Deserialize, Serialize};

use super::{AttributeKind, DateBound, is_false};

/// Root of an AFM execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Afm {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<AfmMeasure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AfmAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<AfmFilter>,
}

impl Afm {
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty() && self.attributes.is_empty() && self.filters.is_empty()
    }

    /// True when any global filter or any measure filter is present.
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty() || self.measures.iter().any(|m| !m.definition.filters.is_empty())
    }

    pub fn date_filters(&self) -> impl Iterator<Item = &AfmDateFilter> + '_ {
        self.filters.iter().filter_map(|filter| match filter {
            AfmFilter::Date(date) => Some(date),
            AfmFilter::Attribute(_) => None,
        })
    }

    pub fn attribute_filters(&self) -> impl Iterator<Item = &AfmAttributeFilter> + '_ {
        self.filters.iter().filter_map(|filter| match filter {
            AfmFilter::Attribute(attribute) => Some(attribute),
            AfmFilter::Date(_) => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Measures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfmMeasure {
    pub id: String,
    pub definition: MeasureDefinition,
}

impl AfmMeasure {
    /// True for a period-over-period companion.
    pub fn is_pop(&self) -> bool {
        self.definition.pop_attribute.is_some()
    }

    /// The id this measure borrows its base object from, if any.
    pub fn lookup_id(&self) -> Option<&str> {
        match &self.definition.base_object {
            BaseObject::LookupId(id) => Some(id),
            BaseObject::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureDefinition {
    pub base_object: BaseObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_in_percent: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<AfmAttributeFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pop_attribute: Option<PopAttribute>,
}

impl MeasureDefinition {
    pub fn new(base_object: BaseObject) -> Self {
        Self {
            base_object,
            aggregation: None,
            show_in_percent: false,
            filters: Vec::new(),
            pop_attribute: None,
        }
    }
}

/// What a measure is computed over: an object URI, or another measure of
/// the same AFM referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseObject {
    #[serde(rename = "id")]
    Id(String),
    #[serde(rename = "lookupId")]
    LookupId(String),
}

/// Attribute the period comparison is computed over. `id` is written as
/// `null` when it could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopAttribute {
    pub id: Option<String>,
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfmAttribute {
    /// Display-form URI, or a symbolic id resolved through result headers.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AttributeKind,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Global AFM filter, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AfmFilter {
    Date(AfmDateFilter),
    Attribute(AfmAttributeFilter),
}

impl AfmFilter {
    pub fn id(&self) -> &str {
        match self {
            Self::Date(date) => &date.id,
            Self::Attribute(attribute) => &attribute.id,
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfmDateFilter {
    /// Date dataset URI.
    pub id: String,
    pub between: [DateBound; 2],
    /// Bare granularity, e.g. `year`.
    pub granularity: String,
}

/// Attribute filter; also the untyped shape used inside measure definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfmAttributeFilter {
    /// Display-form URI.
    pub id: String,
    #[serde(flatten)]
    pub selection: ElementSelection,
}

impl AfmAttributeFilter {
    /// A `notIn: []` selection filters nothing out.
    pub fn is_select_all(&self) -> bool {
        matches!(&self.selection, ElementSelection::NotIn(ids) if ids.is_empty())
    }
}

/// Element ids kept (`in`) or dropped (`notIn`) by an attribute filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementSelection {
    In(Vec<String>),
    NotIn(Vec<String>),
}

impl ElementSelection {
    pub fn ids(&self) -> &[String] {
        match self {
            Self::In(ids) | Self::NotIn(ids) => ids,
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Self::NotIn(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
