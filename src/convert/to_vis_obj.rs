//! Reverse conversion: AFM + Transformation → Visualization Object.
//!
//! The result is always fully populated: empty buckets are written as empty
//! lists, never left out.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::ids;
use super::normalize::{NormalizedAfm, normalize_afm};
use super::plan::MeasurePlan;
use super::resolver::Resolver;
use super::ConvertResult;
use crate::model::headers;
use crate::model::{
    Afm, AfmAttribute, AfmAttributeFilter, AfmDateFilter, AfmFilter, AfmMeasure,
    AttributeSelection, Buckets, Category, CategoryItem, ChartKind, Collection, DateFilter,
    DateFilterKind, Filter, ListAttributeFilter, Measure, MeasureFilter, MeasureItem, MeasureKind,
    MeasureSort, ResultHeader, Transformation, VisualizationObject,
};

/// Rebuild a Visualization Object of type `kind` from an AFM execution.
///
/// `headers` resolves attribute ids that are not URIs; `resolver` maps
/// display forms back to their attributes.
pub fn to_vis_obj(
    kind: ChartKind,
    afm: &Afm,
    transformation: &Transformation,
    headers: &[ResultHeader],
    resolver: &impl Resolver,
) -> ConvertResult<VisualizationObject> {
    let normalized = normalize_afm(afm)?;
    let stacked = transformation.stacked_ids();

    let measures = normalized
        .measure_plans()?
        .into_iter()
        .map(|plan| convert_measure(&normalized, plan, transformation, resolver))
        .collect::<ConvertResult<Vec<_>>>()?;

    let categories: Vec<CategoryItem> = normalized
        .attributes
        .iter()
        .map(|attribute| convert_attribute(attribute, transformation, &stacked, headers, resolver))
        .collect();

    let filters = normalized
        .filters
        .iter()
        .map(|filter| convert_filter(filter, resolver))
        .collect();

    debug!(
        %kind,
        measures = measures.len(),
        categories = categories.len(),
        "converted AFM to visualization object"
    );

    Ok(VisualizationObject {
        kind,
        buckets: Buckets {
            measures,
            categories,
            filters,
        },
    })
}

// ---------------------------------------------------------------------------
// Measures
// ---------------------------------------------------------------------------

/// `count` counts attribute elements; any other aggregation reads a fact.
fn measure_kind(aggregation: Option<&str>) -> MeasureKind {
    match aggregation {
        None | Some("") => MeasureKind::Metric,
        Some("count") => MeasureKind::Attribute,
        Some(_) => MeasureKind::Fact,
    }
}

fn convert_measure<'a>(
    normalized: &NormalizedAfm<'a>,
    plan: MeasurePlan<&'a AfmMeasure>,
    transformation: &Transformation,
    resolver: &impl Resolver,
) -> ConvertResult<MeasureItem> {
    let show_pop = plan.has_companion();
    // A companion stands in for its base and is emitted in its place.
    let emitted = plan.companion().copied().unwrap_or(*plan.base());
    let (owner, object_uri) = normalized.shadow(emitted)?;
    let lookup_id = emitted.lookup_id();

    let meta = transformation.measure_meta(lookup_id.unwrap_or(&emitted.id));
    let title = meta
        .and_then(|meta| meta.title.clone())
        .unwrap_or_else(|| emitted.id.clone());
    let format = meta.and_then(|meta| meta.format.clone());

    let sort = transformation
        .sorting
        .iter()
        .find(|item| item.column == emitted.id || Some(item.column.as_str()) == lookup_id)
        .map(|item| MeasureSort {
            direction: item.direction,
            sort_by_pop: show_pop && item.column == emitted.id,
        });

    let definition = &owner.definition;
    Ok(MeasureItem {
        measure: Measure {
            kind: measure_kind(definition.aggregation.as_deref()),
            aggregation: definition.aggregation.clone(),
            object_uri: object_uri.to_string(),
            show_in_percent: definition.show_in_percent,
            show_pop,
            title,
            measure_filters: definition
                .filters
                .iter()
                .map(|filter| MeasureFilter {
                    list_attribute_filter: list_attribute_filter(filter, resolver),
                })
                .collect(),
            format,
            sort,
        },
    })
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

fn convert_attribute(
    attribute: &AfmAttribute,
    transformation: &Transformation,
    stacked: &HashSet<&str>,
    headers: &[ResultHeader],
    resolver: &impl Resolver,
) -> CategoryItem {
    let display_form = display_form(&attribute.id, headers);
    let collection = if stacked.contains(attribute.id.as_str()) {
        Collection::Stack
    } else {
        Collection::Attribute
    };
    CategoryItem {
        category: Category {
            kind: attribute.kind,
            collection,
            attribute: resolver.attribute(&display_form).map(str::to_owned),
            sort: transformation.sort_for(&attribute.id).map(|item| item.direction),
            display_form,
        },
    }
}

/// URI ids are display forms already; symbolic ids go through the headers.
///
/// An id no header carries is written through unchanged.
fn display_form(id: &str, headers: &[ResultHeader]) -> String {
    if ids::is_object_uri(id) {
        return id.to_string();
    }
    match headers::uri_for(headers, id) {
        Some(uri) => uri.to_string(),
        None => {
            warn!(attribute = %id, "no result header for attribute id; keeping the id as display form");
            id.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

fn convert_filter(filter: &AfmFilter, resolver: &impl Resolver) -> Filter {
    match filter {
        AfmFilter::Date(date) => Filter::DateFilter(date_filter(date)),
        AfmFilter::Attribute(attribute) => {
            Filter::ListAttributeFilter(list_attribute_filter(attribute, resolver))
        }
    }
}

fn date_filter(filter: &AfmDateFilter) -> DateFilter {
    let [from, to] = filter.between.clone();
    DateFilter {
        kind: DateFilterKind::Relative,
        from,
        to,
        granularity: ids::qualify_granularity(&filter.granularity),
        attribute: None,
        dataset: Some(filter.id.clone()),
    }
}

/// Element URIs are rebuilt under the attribute owning the display form,
/// or under the display form itself when the resolver does not know it.
fn list_attribute_filter(filter: &AfmAttributeFilter, resolver: &impl Resolver) -> ListAttributeFilter {
    let attribute = resolver.attribute(&filter.id).unwrap_or(&filter.id);
    ListAttributeFilter {
        attribute: attribute.to_string(),
        display_form: filter.id.clone(),
        selection: AttributeSelection {
            negative_selection: filter.selection.is_negative(),
            attribute_elements: filter
                .selection
                .ids()
                .iter()
                .map(|element| ids::element_uri(attribute, element))
                .collect(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
