//! Wire models for both sides of the converter.
//!
//! - [`vis_obj`]: the bucket-structured Visualization Object
//! - [`afm`]: the execution-oriented AFM
//! - [`transformation`]: presentation overlay paired with an AFM
//! - [`headers`]: result headers used to resolve symbolic attribute ids
//!
//! AFM and Transformation drop empty lists when serialized; the
//! Visualization Object always writes every bucket.

use serde::{Deserialize, Serialize};

pub mod afm;
pub mod headers;
pub mod transformation;
pub mod vis_obj;

pub use afm::{
    Afm, AfmAttribute, AfmAttributeFilter, AfmDateFilter, AfmFilter, AfmMeasure, BaseObject,
    ElementSelection, MeasureDefinition, PopAttribute,
};
pub use headers::ResultHeader;
pub use transformation::{
    BucketAttribute, MeasureMeta, STACKS_BUCKET, SortItem, Transformation, TransformationBucket,
};
pub use vis_obj::{
    AttributeSelection, Buckets, Category, CategoryItem, ChartKind, Collection, DateFilter,
    DateFilterKind, Filter, ListAttributeFilter, Measure, MeasureFilter, MeasureItem, MeasureKind,
    MeasureSort, VisualizationObject,
};

// ---------------------------------------------------------------------------
// Shared enums
// ---------------------------------------------------------------------------

/// Sort direction, shared by measure sorts, category sorts and
/// Transformation sorting entries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Whether a dimension is a plain attribute or a date attribute.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    #[default]
    Attribute,
    Date,
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attribute => write!(f, "attribute"),
            Self::Date => write!(f, "date"),
        }
    }
}

/// One end of a date range: a period offset for relative filters, a date
/// string (`YYYY-MM-DD`) for absolute ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateBound {
    Offset(i64),
    Date(String),
}

impl From<i64> for DateBound {
    fn from(value: i64) -> Self {
        Self::Offset(value)
    }
}

impl From<&str> for DateBound {
    fn from(value: &str) -> Self {
        Self::Date(value.to_string())
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
