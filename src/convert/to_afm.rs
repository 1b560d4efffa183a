//! Forward conversion: Visualization Object → AFM + Transformation.
//!
//! Total over well-formed input. Lookups that fail end up as `null`
//! popAttribute ids in the output rather than errors.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ids;
use super::plan::MeasurePlan;
use super::resolver::Resolver;
use crate::model::{
    Afm, AfmAttribute, AfmAttributeFilter, AfmDateFilter, AfmFilter, AfmMeasure, AttributeKind,
    BaseObject, BucketAttribute, Category, ChartKind, Collection, DateFilter, ElementSelection, Filter,
    ListAttributeFilter, Measure, MeasureDefinition, MeasureMeta, PopAttribute, STACKS_BUCKET,
    SortItem, Transformation, TransformationBucket, VisualizationObject,
};

/// Everything the forward converter produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionBundle {
    pub afm: Afm,
    pub transformation: Transformation,
    #[serde(rename = "type")]
    pub kind: ChartKind,
}

/// Convert `vis_obj` into an AFM execution and its presentation overlay.
pub fn to_afm(vis_obj: &VisualizationObject, resolver: &impl Resolver) -> ExecutionBundle {
    let pop_attribute = pop_attribute(vis_obj, resolver);
    let plans: Vec<MeasurePlan<AfmMeasure>> = vis_obj
        .measures()
        .enumerate()
        .map(|(index, measure)| convert_measure(index, measure, pop_attribute.as_deref()))
        .collect();

    let transformation = Transformation {
        measures: measure_meta(vis_obj),
        sorting: sorting(vis_obj),
        buckets: stack_buckets(vis_obj),
    };

    let afm = Afm {
        measures: plans.into_iter().flat_map(MeasurePlan::into_flat).collect(),
        attributes: vis_obj.categories().map(convert_category).collect(),
        filters: vis_obj.buckets.filters.iter().map(convert_filter).collect(),
    };

    debug!(
        kind = %vis_obj.kind,
        measures = afm.measures.len(),
        attributes = afm.attributes.len(),
        filters = afm.filters.len(),
        "converted visualization object to AFM"
    );

    ExecutionBundle {
        afm,
        transformation,
        kind: vis_obj.kind,
    }
}

/// Display form every PoP measure of `vis_obj` compares over.
///
/// Taken from the first category when it is a date, otherwise from the
/// first date filter. Only one per Visualization Object.
pub fn pop_attribute(vis_obj: &VisualizationObject, resolver: &impl Resolver) -> Option<String> {
    let attribute = match vis_obj.categories().next() {
        Some(category) if category.kind == AttributeKind::Date => category.attribute.as_deref(),
        _ => vis_obj
            .buckets
            .filters
            .iter()
            .find_map(Filter::as_date)
            .and_then(|date| date.attribute.as_deref()),
    };
    attribute
        .and_then(|attribute| resolver.display_form(attribute))
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Measures
// ---------------------------------------------------------------------------

fn convert_measure(
    index: usize,
    measure: &Measure,
    pop_attribute: Option<&str>,
) -> MeasurePlan<AfmMeasure> {
    let id = ids::measure_id(index);

    let mut definition = MeasureDefinition::new(BaseObject::Id(measure.object_uri.clone()));
    definition.aggregation = measure.aggregation.clone();
    definition.show_in_percent = measure.show_in_percent;
    definition.filters = measure
        .measure_filters
        .iter()
        .map(|filter| base_filter(&filter.list_attribute_filter))
        .collect();

    if !measure.show_pop {
        return MeasurePlan::Simple(AfmMeasure { id, definition });
    }

    if pop_attribute.is_none() {
        warn!(
            measure = %id,
            "period-over-period measure has no date attribute to compare over"
        );
    }
    let mut companion = MeasureDefinition::new(BaseObject::LookupId(id.clone()));
    companion.pop_attribute = Some(PopAttribute {
        id: pop_attribute.map(str::to_owned),
    });

    MeasurePlan::WithPeriodComparison {
        companion: AfmMeasure {
            id: ids::pop_measure_id(&id),
            definition: companion,
        },
        base: AfmMeasure { id, definition },
    }
}

/// `{id: displayForm, in|notIn: element ids}`.
fn base_filter(filter: &ListAttributeFilter) -> AfmAttributeFilter {
    let elements = filter
        .selection
        .attribute_elements
        .iter()
        .map(|uri| ids::element_id(uri).to_string())
        .collect();
    let selection = if filter.selection.negative_selection {
        ElementSelection::NotIn(elements)
    } else {
        ElementSelection::In(elements)
    };
    AfmAttributeFilter {
        id: filter.display_form.clone(),
        selection,
    }
}

// ---------------------------------------------------------------------------
// Attributes and filters
// ---------------------------------------------------------------------------

fn convert_category(category: &Category) -> AfmAttribute {
    AfmAttribute {
        id: category.display_form.clone(),
        kind: category.kind,
    }
}

fn convert_filter(filter: &Filter) -> AfmFilter {
    match filter {
        Filter::DateFilter(date) => AfmFilter::Date(date_filter(date)),
        Filter::ListAttributeFilter(list) => AfmFilter::Attribute(base_filter(list)),
    }
}

fn date_filter(filter: &DateFilter) -> AfmDateFilter {
    let id = filter
        .dataset
        .as_ref()
        .or(filter.attribute.as_ref())
        .cloned()
        .unwrap_or_else(|| {
            warn!("date filter names neither a dataset nor an attribute");
            String::new()
        });
    AfmDateFilter {
        id,
        between: [filter.from.clone(), filter.to.clone()],
        granularity: ids::strip_granularity(&filter.granularity).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Transformation
// ---------------------------------------------------------------------------

fn measure_meta(vis_obj: &VisualizationObject) -> Vec<MeasureMeta> {
    let mut metas = Vec::new();
    for (index, measure) in vis_obj.measures().enumerate() {
        let id = ids::measure_id(index);
        let companion = measure.show_pop.then(|| MeasureMeta {
            id: ids::pop_measure_id(&id),
            title: Some(ids::pop_title(&measure.title)),
            format: measure.format.clone(),
        });
        metas.push(MeasureMeta {
            id,
            title: Some(measure.title.clone()),
            format: measure.format.clone(),
        });
        metas.extend(companion);
    }
    metas
}

fn sorting(vis_obj: &VisualizationObject) -> Vec<SortItem> {
    let measure_sorts = vis_obj
        .measures()
        .enumerate()
        .filter_map(|(index, measure)| {
            let sort = measure.sort?;
            let id = ids::measure_id(index);
            let column = if sort.sort_by_pop && measure.show_pop {
                ids::pop_measure_id(&id)
            } else {
                id
            };
            Some(SortItem {
                column,
                direction: sort.direction,
            })
        });

    let category_sorts = vis_obj.categories().filter_map(|category| {
        category.sort.map(|direction| SortItem {
            column: category.display_form.clone(),
            direction,
        })
    });

    measure_sorts.chain(category_sorts).collect()
}

fn stack_buckets(vis_obj: &VisualizationObject) -> Vec<TransformationBucket> {
    let attributes: Vec<BucketAttribute> = vis_obj
        .categories()
        .filter(|category| category.collection == Collection::Stack)
        .map(|category| BucketAttribute {
            id: category.display_form.clone(),
        })
        .collect();

    if attributes.is_empty() {
        return Vec::new();
    }
    vec![TransformationBucket {
        name: STACKS_BUCKET.to_string(),
        attributes,
    }]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
