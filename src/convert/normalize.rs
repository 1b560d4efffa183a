//! AFM preprocessing for the reverse converter.
//!
//! Absent lists are already empty after deserialization; this step builds
//! the id-keyed measure table once and resolves every `lookupId` against it.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::plan::MeasurePlan;
use super::{ConvertError, ConvertResult};
use crate::model::{Afm, AfmAttribute, AfmFilter, AfmMeasure, BaseObject};

/// Read-only view of an AFM with its measure lookup table.
#[derive(Debug)]
pub struct NormalizedAfm<'a> {
    pub measures: &'a [AfmMeasure],
    pub attributes: &'a [AfmAttribute],
    pub filters: &'a [AfmFilter],
    by_id: HashMap<&'a str, &'a AfmMeasure>,
}

/// Index `afm` and check measure ids are unique.
pub fn normalize_afm(afm: &Afm) -> ConvertResult<NormalizedAfm<'_>> {
    let mut by_id = HashMap::with_capacity(afm.measures.len());
    for measure in &afm.measures {
        if by_id.insert(measure.id.as_str(), measure).is_some() {
            return Err(ConvertError::DuplicateMeasureId(measure.id.clone()));
        }
    }
    Ok(NormalizedAfm {
        measures: &afm.measures,
        attributes: &afm.attributes,
        filters: &afm.filters,
        by_id,
    })
}

impl<'a> NormalizedAfm<'a> {
    pub fn measure(&self, id: &str) -> Option<&'a AfmMeasure> {
        self.by_id.get(id).copied()
    }

    /// Measure named by `measure`'s `lookupId`, if it has one.
    pub fn lookup_target(&self, measure: &AfmMeasure) -> ConvertResult<Option<&'a AfmMeasure>> {
        let Some(lookup_id) = measure.lookup_id() else {
            return Ok(None);
        };
        self.measure(lookup_id)
            .map(Some)
            .ok_or_else(|| ConvertError::UnresolvedLookup {
                measure: measure.id.clone(),
                lookup_id: lookup_id.to_string(),
            })
    }

    /// The measure that actually carries the object URI for `measure`, with
    /// that URI: `measure` itself, or its lookup target.
    pub fn shadow(&self, measure: &'a AfmMeasure) -> ConvertResult<(&'a AfmMeasure, &'a str)> {
        let owner = self.lookup_target(measure)?.unwrap_or(measure);
        match &owner.definition.base_object {
            BaseObject::Id(uri) => Ok((owner, uri.as_str())),
            BaseObject::LookupId(_) => Err(ConvertError::ChainedLookup {
                measure: measure.id.clone(),
                lookup_id: owner.id.clone(),
            }),
        }
    }

    /// Group measures into plans. Each PoP companion replaces the measure it
    /// looks up, at the companion's position. A companion whose target is
    /// itself a PoP measure is a [`ConvertError::ChainedLookup`].
    pub fn measure_plans(&self) -> ConvertResult<Vec<MeasurePlan<&'a AfmMeasure>>> {
        let mut folded = HashSet::new();
        for measure in self.measures.iter().filter(|m| m.is_pop()) {
            let Some(target) = self.lookup_target(measure)? else {
                continue;
            };
            // Covers a companion looking up itself as well as one another.
            if target.is_pop() {
                return Err(ConvertError::ChainedLookup {
                    measure: measure.id.clone(),
                    lookup_id: target.id.clone(),
                });
            }
            folded.insert(target.id.as_str());
        }

        let mut plans = Vec::with_capacity(self.measures.len() - folded.len());
        for measure in self.measures {
            if folded.contains(measure.id.as_str()) {
                continue;
            }
            let plan = match self.lookup_target(measure)? {
                Some(base) if measure.is_pop() => MeasurePlan::WithPeriodComparison {
                    base,
                    companion: measure,
                },
                _ => {
                    if measure.is_pop() {
                        debug!(measure = %measure.id, "PoP measure without lookupId kept as a plain measure");
                    }
                    MeasurePlan::Simple(measure)
                }
            };
            plans.push(plan);
        }
        Ok(plans)
    }
}
