//! Forward/reverse cycle check.
//!
//! Measures without a PoP companion and all filters must come back
//! unchanged. A PoP measure only has to keep `showPoP` and
//! `sort.sortByPoP`.

use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use super::ConvertResult;
use super::resolver::Resolver;
use super::to_afm::to_afm;
use super::to_vis_obj::to_vis_obj;
use crate::model::{ChartKind, Filter, Measure, ResultHeader, VisualizationObject};

/// Bucket a mismatch was found in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Measures,
    Filters,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measures => write!(f, "measures"),
            Self::Filters => write!(f, "filters"),
        }
    }
}

/// One bucket entry that did not survive the cycle.
///
/// `expected`/`actual` hold the compared projection; `null` marks an entry
/// missing on that side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    pub bucket: Bucket,
    pub index: usize,
    pub expected: Value,
    pub actual: Value,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: expected {}, got {}",
            self.bucket, self.index, self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripReport {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub mismatches: Vec<Mismatch>,
}

impl RoundTripReport {
    pub fn is_lossless(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Run `vis_obj` through [`to_afm`] and back through [`to_vis_obj`], then
/// compare measures and filters.
///
/// Category display forms double as result headers so symbolic ids
/// resolve on the way back.
pub fn round_trip(
    vis_obj: &VisualizationObject,
    resolver: &impl Resolver,
) -> ConvertResult<RoundTripReport> {
    let bundle = to_afm(vis_obj, resolver);
    let headers: Vec<ResultHeader> = vis_obj
        .categories()
        .map(|category| ResultHeader::new(category.display_form.clone(), category.display_form.clone()))
        .collect();
    let restored = to_vis_obj(
        bundle.kind,
        &bundle.afm,
        &bundle.transformation,
        &headers,
        resolver,
    )?;

    let mut mismatches = compare(
        Bucket::Measures,
        vis_obj.measures().map(measure_projection),
        restored.measures().map(measure_projection),
    );
    mismatches.extend(compare(
        Bucket::Filters,
        vis_obj.buckets.filters.iter().map(filter_projection),
        restored.buckets.filters.iter().map(filter_projection),
    ));

    Ok(RoundTripReport {
        kind: vis_obj.kind,
        mismatches,
    })
}

fn measure_projection(measure: &Measure) -> Value {
    if measure.show_pop {
        json!({
            "showPoP": true,
            "sortByPoP": measure.sort.map(|sort| sort.sort_by_pop),
        })
    } else {
        serde_json::to_value(measure).unwrap_or_default()
    }
}

fn filter_projection(filter: &Filter) -> Value {
    serde_json::to_value(filter).unwrap_or_default()
}

fn compare(
    bucket: Bucket,
    expected: impl Iterator<Item = Value>,
    actual: impl Iterator<Item = Value>,
) -> Vec<Mismatch> {
    let expected: Vec<Value> = expected.collect();
    let actual: Vec<Value> = actual.collect();
    (0..expected.len().max(actual.len()))
        .filter_map(|index| {
            let left = expected.get(index).cloned().unwrap_or_default();
            let right = actual.get(index).cloned().unwrap_or_default();
            (left != right).then_some(Mismatch {
                bucket,
                index,
                expected: left,
                actual: right,
            })
        })
        .collect()
}
