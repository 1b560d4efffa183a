//! Visualization Object: the UI-oriented, bucket-structured chart model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AttributeKind, DateBound, SortDirection};

// ---------------------------------------------------------------------------
// Chart kind
// ---------------------------------------------------------------------------

/// Chart type a Visualization Object is rendered as.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Table,
    Column,
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
    Area,
    Combo,
    Scatter,
    Bubble,
    Heatmap,
    Treemap,
    Funnel,
    Headline,
}

impl ChartKind {
    pub const ALL: [ChartKind; 14] = [
        Self::Table,
        Self::Column,
        Self::Bar,
        Self::Line,
        Self::Pie,
        Self::Doughnut,
        Self::Area,
        Self::Combo,
        Self::Scatter,
        Self::Bubble,
        Self::Heatmap,
        Self::Treemap,
        Self::Funnel,
        Self::Headline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
            Self::Area => "area",
            Self::Combo => "combo",
            Self::Scatter => "scatter",
            Self::Bubble => "bubble",
            Self::Heatmap => "heatmap",
            Self::Treemap => "treemap",
            Self::Funnel => "funnel",
            Self::Headline => "headline",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown chart type '{0}'")]
pub struct ParseChartKindError(pub String);

impl std::str::FromStr for ChartKind {
    type Err = ParseChartKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ParseChartKindError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

/// Root of the Visualization Object.
///
/// Every bucket list is always serialized, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationObject {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub buckets: Buckets,
}

impl VisualizationObject {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            buckets: Buckets::default(),
        }
    }

    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.buckets.measures.push(MeasureItem { measure });
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.buckets.categories.push(CategoryItem { category });
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.buckets.filters.push(filter);
        self
    }

    /// Iterate the measures in bucket order, unwrapped.
    pub fn measures(&self) -> impl Iterator<Item = &Measure> + '_ {
        self.buckets.measures.iter().map(|item| &item.measure)
    }

    /// Iterate the categories in bucket order, unwrapped.
    pub fn categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.buckets.categories.iter().map(|item| &item.category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Buckets {
    #[serde(default)]
    pub measures: Vec<MeasureItem>,
    #[serde(default)]
    pub categories: Vec<CategoryItem>,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

// ---------------------------------------------------------------------------
// Measures
// ---------------------------------------------------------------------------

/// `{ "measure": { ... } }` wrapper used in the measures bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureItem {
    pub measure: Measure,
}

/// What a measure is computed from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    /// A stored metric; carries no aggregation.
    #[default]
    Metric,
    /// A fact aggregated by `sum`, `avg`, ...
    Fact,
    /// An attribute aggregated by `count`.
    Attribute,
}

impl std::fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Fact => write!(f, "fact"),
            Self::Attribute => write!(f, "attribute"),
        }
    }
}

/// A single measure of the measures bucket.
///
/// `show_pop` asks for a period-over-period companion. The companion is not
/// stored here; it only exists on the AFM side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    #[serde(rename = "type")]
    pub kind: MeasureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    pub object_uri: String,
    #[serde(default)]
    pub show_in_percent: bool,
    #[serde(default, rename = "showPoP")]
    pub show_pop: bool,
    pub title: String,
    #[serde(default)]
    pub measure_filters: Vec<MeasureFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<MeasureSort>,
}

impl Measure {
    pub fn new(kind: MeasureKind, object_uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind,
            aggregation: None,
            object_uri: object_uri.into(),
            show_in_percent: false,
            show_pop: false,
            title: title.into(),
            measure_filters: Vec::new(),
            format: None,
            sort: None,
        }
    }

    /// A stored metric.
    pub fn metric(object_uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(MeasureKind::Metric, object_uri, title)
    }

    /// A fact-based measure with the given aggregation.
    pub fn fact(
        object_uri: impl Into<String>,
        aggregation: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            aggregation: Some(aggregation.into()),
            ..Self::new(MeasureKind::Fact, object_uri, title)
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureSort {
    pub direction: SortDirection,
    #[serde(default, rename = "sortByPoP")]
    pub sort_by_pop: bool,
}

/// `{ "listAttributeFilter": { ... } }` wrapper used inside measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureFilter {
    #[serde(rename = "listAttributeFilter")]
    pub list_attribute_filter: ListAttributeFilter,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// `{ "category": { ... } }` wrapper used in the categories bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub category: Category,
}

/// The UI bucket a category is drawn in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    #[default]
    Attribute,
    Stack,
    View,
    Trend,
    Segment,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attribute => write!(f, "attribute"),
            Self::Stack => write!(f, "stack"),
            Self::View => write!(f, "view"),
            Self::Trend => write!(f, "trend"),
            Self::Segment => write!(f, "segment"),
        }
    }
}

/// One dimension-defining attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    pub collection: Collection,
    pub display_form: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
}

impl Category {
    pub fn new(kind: AttributeKind, collection: Collection, display_form: impl Into<String>) -> Self {
        Self {
            kind,
            collection,
            display_form: display_form.into(),
            attribute: None,
            sort: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_sort(mut self, direction: SortDirection) -> Self {
        self.sort = Some(direction);
        self
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Bucket-level filter, discriminated by its single wrapping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    DateFilter(DateFilter),
    ListAttributeFilter(ListAttributeFilter),
}

impl Filter {
    pub fn as_date(&self) -> Option<&DateFilter> {
        match self {
            Self::DateFilter(filter) => Some(filter),
            Self::ListAttributeFilter(_) => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilterKind {
    #[default]
    Relative,
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
    #[serde(rename = "type")]
    pub kind: DateFilterKind,
    pub from: DateBound,
    pub to: DateBound,
    /// Fully qualified granularity, e.g. `GDC.time.year`.
    pub granularity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAttributeFilter {
    pub attribute: String,
    pub display_form: String,
    #[serde(rename = "default")]
    pub selection: AttributeSelection,
}

impl ListAttributeFilter {
    /// Positive selection of the given element URIs.
    pub fn including(
        attribute: impl Into<String>,
        display_form: impl Into<String>,
        elements: Vec<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            display_form: display_form.into(),
            selection: AttributeSelection {
                negative_selection: false,
                attribute_elements: elements,
            },
        }
    }

    /// Negative selection of the given element URIs.
    pub fn excluding(
        attribute: impl Into<String>,
        display_form: impl Into<String>,
        elements: Vec<String>,
    ) -> Self {
        Self {
            selection: AttributeSelection {
                negative_selection: true,
                attribute_elements: elements,
            },
            ..Self::including(attribute, display_form, Vec::new())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSelection {
    pub negative_selection: bool,
    pub attribute_elements: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
