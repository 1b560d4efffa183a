//! Property tests for the converter pair.
//!
//! Generated Visualization Objects stay inside the shapes the reverse
//! converter can rebuild exactly: measure types agree with their
//! aggregation, element URIs use `{attribute}?id={element}`, date filters
//! are relative with a dataset, and categories use the `attribute` and
//! `stack` collections only.

use afm_bridge::convert::{AttributesMap, round_trip, to_afm, to_vis_obj};
use afm_bridge::model::{
    AttributeKind, Category, ChartKind, Collection, DateBound, DateFilter, DateFilterKind, Filter,
    ListAttributeFilter, Measure, MeasureFilter, MeasureKind, MeasureSort, SortDirection,
    VisualizationObject,
};
use proptest::prelude::*;

const AGGREGATIONS: [&str; 4] = ["sum", "avg", "min", "max"];
const GRANULARITIES: [&str; 5] = ["year", "quarter", "month", "week", "date"];

fn attribute_uri(n: u32) -> String {
    format!("/gdc/md/p/obj/{n}")
}

fn display_form_uri(n: u32) -> String {
    format!("/gdc/md/p/obj/{}", n + 1000)
}

fn attributes() -> AttributesMap {
    (1..=5)
        .map(|n| (attribute_uri(n), display_form_uri(n)))
        .collect()
}

// =============================================================================
// Strategies
// =============================================================================

fn arb_list_filter() -> impl Strategy<Value = ListAttributeFilter> {
    (
        1u32..=5,
        any::<bool>(),
        prop::collection::vec(1u32..100_000, 0..4),
    )
        .prop_map(|(n, negative, elements)| {
            let attribute = attribute_uri(n);
            let elements = elements
                .iter()
                .map(|element| format!("{attribute}?id={element}"))
                .collect();
            if negative {
                ListAttributeFilter::excluding(&attribute, display_form_uri(n), elements)
            } else {
                ListAttributeFilter::including(&attribute, display_form_uri(n), elements)
            }
        })
}

fn arb_date_filter() -> impl Strategy<Value = DateFilter> {
    (
        -20i64..=0,
        0i64..=5,
        prop::sample::select(GRANULARITIES.to_vec()),
        1u32..1000,
    )
        .prop_map(|(from, span, granularity, dataset)| DateFilter {
            kind: DateFilterKind::Relative,
            from: DateBound::Offset(from),
            to: DateBound::Offset(from + span),
            granularity: format!("GDC.time.{granularity}"),
            attribute: None,
            dataset: Some(format!("/gdc/md/p/obj/{}", dataset + 5000)),
        })
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    prop_oneof![
        arb_date_filter().prop_map(Filter::DateFilter),
        arb_list_filter().prop_map(Filter::ListAttributeFilter),
    ]
}

fn arb_measure(allow_pop: bool) -> impl Strategy<Value = Measure> {
    (
        0usize..3,
        prop::sample::select(AGGREGATIONS.to_vec()),
        1u32..10_000,
        "[A-Za-z][A-Za-z ]{0,15}",
        any::<bool>(),
        prop::option::of("#,##0(\\.00)?"),
        prop::option::of((any::<bool>(), any::<bool>())),
        prop::collection::vec(arb_list_filter(), 0..3),
        any::<bool>(),
    )
        .prop_map(
            move |(kind, aggregation, object, title, percent, format, sort, filters, pop)| {
                let uri = format!("/gdc/md/p/obj/{}", object + 10_000);
                let mut measure = match kind {
                    0 => Measure::metric(uri, title),
                    1 => Measure::fact(uri, aggregation, title),
                    _ => Measure {
                        aggregation: Some("count".into()),
                        ..Measure::new(MeasureKind::Attribute, uri, title)
                    },
                };
                let show_pop = allow_pop && pop;
                measure.show_in_percent = percent;
                measure.show_pop = show_pop;
                measure.format = format;
                measure.sort = sort.map(|(desc, by_pop)| MeasureSort {
                    direction: if desc {
                        SortDirection::Desc
                    } else {
                        SortDirection::Asc
                    },
                    sort_by_pop: show_pop && by_pop,
                });
                measure.measure_filters = filters
                    .into_iter()
                    .map(|list_attribute_filter| MeasureFilter {
                        list_attribute_filter,
                    })
                    .collect();
                measure
            },
        )
}

/// Categories with distinct display forms.
fn arb_categories() -> impl Strategy<Value = Vec<Category>> {
    prop::collection::vec(
        (any::<bool>(), any::<bool>(), prop::option::of(any::<bool>())),
        0..4,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (date, stacked, sort))| {
                let kind = if date {
                    AttributeKind::Date
                } else {
                    AttributeKind::Attribute
                };
                let collection = if stacked {
                    Collection::Stack
                } else {
                    Collection::Attribute
                };
                let mut category =
                    Category::new(kind, collection, format!("/gdc/md/p/obj/{}", index + 2000));
                category.sort =
                    sort.map(|desc| if desc { SortDirection::Desc } else { SortDirection::Asc });
                category
            })
            .collect()
    })
}

fn arb_vis_obj(allow_pop: bool) -> impl Strategy<Value = VisualizationObject> {
    (
        prop::sample::select(ChartKind::ALL.to_vec()),
        prop::collection::vec(arb_measure(allow_pop), 0..5),
        arb_categories(),
        prop::collection::vec(arb_filter(), 0..4),
    )
        .prop_map(|(kind, measures, categories, filters)| {
            let mut vis_obj = VisualizationObject::new(kind);
            for measure in measures {
                vis_obj = vis_obj.with_measure(measure);
            }
            for category in categories {
                vis_obj = vis_obj.with_category(category);
            }
            for filter in filters {
                vis_obj = vis_obj.with_filter(filter);
            }
            vis_obj
        })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn proptest_round_trip_without_pop_is_exact(vis_obj in arb_vis_obj(false)) {
        let attributes = attributes();
        let bundle = to_afm(&vis_obj, &attributes);
        let restored = to_vis_obj(bundle.kind, &bundle.afm, &bundle.transformation, &[], &attributes)
            .expect("reverse conversion of a forward result");

        prop_assert_eq!(restored.kind, vis_obj.kind);
        prop_assert_eq!(&restored.buckets.measures, &vis_obj.buckets.measures);
        prop_assert_eq!(&restored.buckets.filters, &vis_obj.buckets.filters);
    }

    #[test]
    fn proptest_round_trip_keeps_pop_flags(vis_obj in arb_vis_obj(true)) {
        let report = round_trip(&vis_obj, &attributes()).expect("round trip");
        prop_assert!(report.is_lossless(), "mismatches: {:?}", report.mismatches);
    }

    #[test]
    fn proptest_measure_ids_are_positional(vis_obj in arb_vis_obj(true)) {
        let bundle = to_afm(&vis_obj, &attributes());
        let expected: Vec<String> = vis_obj
            .measures()
            .enumerate()
            .flat_map(|(index, measure)| {
                let id = format!("m{}", index + 1);
                let companion = measure.show_pop.then(|| format!("{id}_pop"));
                std::iter::once(id).chain(companion)
            })
            .collect();
        let actual: Vec<String> = bundle.afm.measures.iter().map(|m| m.id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn proptest_stacking_is_symmetric(vis_obj in arb_vis_obj(false)) {
        let attributes = attributes();
        let bundle = to_afm(&vis_obj, &attributes);

        let stacked = bundle.transformation.stacked_ids();
        for category in vis_obj.categories() {
            prop_assert_eq!(
                stacked.contains(category.display_form.as_str()),
                category.collection == Collection::Stack
            );
        }

        let restored = to_vis_obj(bundle.kind, &bundle.afm, &bundle.transformation, &[], &attributes)
            .expect("reverse conversion of a forward result");
        let before: Vec<Collection> = vis_obj.categories().map(|c| c.collection).collect();
        let after: Vec<Collection> = restored.categories().map(|c| c.collection).collect();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn proptest_pop_attribute_comes_from_first_date_category(
        vis_obj in arb_vis_obj(true),
        n in 1u32..=5,
    ) {
        let mut vis_obj = vis_obj;
        vis_obj.buckets.categories.insert(
            0,
            afm_bridge::model::CategoryItem {
                category: Category::new(AttributeKind::Date, Collection::Attribute, display_form_uri(n))
                    .with_attribute(attribute_uri(n)),
            },
        );

        let bundle = to_afm(&vis_obj, &attributes());
        let expected = display_form_uri(n);
        for measure in bundle.afm.measures.iter().filter(|m| m.is_pop()) {
            let pop_attribute = measure.definition.pop_attribute.as_ref().and_then(|p| p.id.as_deref());
            prop_assert_eq!(pop_attribute, Some(expected.as_str()));
        }
    }

    #[test]
    fn proptest_empty_lists_are_omitted(measures in prop::collection::vec(arb_measure(false), 0..4)) {
        let mut vis_obj = VisualizationObject::new(ChartKind::Table);
        for measure in measures {
            vis_obj = vis_obj.with_measure(measure);
        }
        let afm = serde_json::to_value(to_afm(&vis_obj, &attributes()).afm).unwrap();
        let object = afm.as_object().expect("AFM serializes to an object");
        prop_assert!(!object.contains_key("attributes"));
        prop_assert!(!object.contains_key("filters"));
        prop_assert_eq!(object.contains_key("measures"), !vis_obj.buckets.measures.is_empty());
    }
}
