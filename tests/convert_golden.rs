//! Golden-file tests for both conversion directions.
//!
//! Fixtures live in tests/fixtures/golden/. Wire shapes are compared as
//! `serde_json::Value` so key order in the fixture files does not matter.

use afm_bridge::convert::{AttributesMap, ExecutionBundle, to_afm, to_vis_obj};
use afm_bridge::model::{
    Afm, ChartKind, Collection, ElementSelection, Filter, ListAttributeFilter, ResultHeader,
    Transformation, VisualizationObject,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Load a golden fixture file from tests/fixtures/golden/
fn load_golden(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/golden")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load golden file {}: {e}", path.display()))
}

fn parse_golden<T: DeserializeOwned>(name: &str) -> T {
    serde_json::from_str(&load_golden(name))
        .unwrap_or_else(|e| panic!("Failed to parse golden file {name}: {e}"))
}

// =============================================================================
// Forward
// =============================================================================

#[test]
fn test_forward_matches_golden_execution() {
    let vis_obj: VisualizationObject = parse_golden("vis_obj_column_pop.json");
    let attributes: AttributesMap = parse_golden("attributes.json");
    let expected: Value = parse_golden("execution_column_pop.json");

    let bundle = to_afm(&vis_obj, &attributes);
    assert_eq!(serde_json::to_value(&bundle).unwrap(), expected);
}

#[test]
fn test_single_metric_example() {
    let vis_obj: VisualizationObject = serde_json::from_value(json!({
        "type": "bar",
        "buckets": {
            "measures": [{ "measure": {
                "type": "metric",
                "objectUri": "/gdc/md/p/obj/1",
                "showInPercent": false,
                "showPoP": false,
                "title": "M1",
                "measureFilters": []
            } }],
            "categories": [],
            "filters": []
        }
    }))
    .unwrap();

    let bundle = to_afm(&vis_obj, &AttributesMap::new());
    insta::assert_json_snapshot!(bundle, @r#"
    {
      "afm": {
        "measures": [
          {
            "id": "m1",
            "definition": {
              "baseObject": {
                "id": "/gdc/md/p/obj/1"
              }
            }
          }
        ]
      },
      "transformation": {
        "measures": [
          {
            "id": "m1",
            "title": "M1"
          }
        ]
      },
      "type": "bar"
    }
    "#);
}

#[test]
fn test_element_uris_reduce_to_ids_and_back() {
    let attributes: AttributesMap = [("/gdc/md/p/obj/1", "/gdc/md/p/obj/2")].into_iter().collect();
    let vis_obj = VisualizationObject::new(ChartKind::Table).with_filter(Filter::ListAttributeFilter(
        ListAttributeFilter::including(
            "/gdc/md/p/obj/1",
            "/gdc/md/p/obj/2",
            vec!["/gdc/md/p/obj/1?id=1".into(), "/gdc/md/p/obj/1?id=2".into()],
        ),
    ));

    let bundle = to_afm(&vis_obj, &attributes);
    let filter = bundle.afm.attribute_filters().next().expect("attribute filter");
    assert_eq!(filter.selection, ElementSelection::In(vec!["1".into(), "2".into()]));

    let restored = to_vis_obj(
        bundle.kind,
        &bundle.afm,
        &bundle.transformation,
        &[],
        &attributes,
    )
    .unwrap();
    assert_eq!(restored.buckets.filters, vis_obj.buckets.filters);
}

// =============================================================================
// Reverse
// =============================================================================

#[test]
fn test_reverse_restores_golden_vis_obj() {
    let bundle: ExecutionBundle = parse_golden("execution_column_pop.json");
    let attributes: AttributesMap = parse_golden("attributes.json");
    let expected: VisualizationObject = parse_golden("vis_obj_column_pop.json");

    let restored = to_vis_obj(
        bundle.kind,
        &bundle.afm,
        &bundle.transformation,
        &[],
        &attributes,
    )
    .unwrap();
    assert_eq!(restored, expected);
    assert_eq!(
        serde_json::to_value(&restored).unwrap(),
        parse_golden::<Value>("vis_obj_column_pop.json")
    );
}

#[test]
fn test_reverse_on_empty_afm_is_fully_populated() {
    let vis_obj = to_vis_obj(
        ChartKind::Bar,
        &Afm::default(),
        &Transformation::default(),
        &[],
        &AttributesMap::new(),
    )
    .unwrap();
    insta::assert_json_snapshot!(vis_obj, @r#"
    {
      "type": "bar",
      "buckets": {
        "measures": [],
        "categories": [],
        "filters": []
      }
    }
    "#);
}

#[test]
fn test_symbolic_ids_resolve_through_headers() {
    let afm: Afm = serde_json::from_value(json!({
        "attributes": [
            { "id": "label.owner.region", "type": "attribute" },
            { "id": "label.product.name", "type": "attribute" }
        ]
    }))
    .unwrap();
    let transformation: Transformation = serde_json::from_value(json!({
        "buckets": [{ "name": "stacks", "attributes": [{ "id": "label.product.name" }] }]
    }))
    .unwrap();
    let headers: Vec<ResultHeader> = parse_golden("headers_table.json");
    let attributes: AttributesMap = parse_golden("attributes.json");

    let vis_obj = to_vis_obj(ChartKind::Table, &afm, &transformation, &headers, &attributes).unwrap();
    let categories: Vec<_> = vis_obj.categories().collect();

    assert_eq!(categories[0].display_form, "/gdc/md/proj/obj/1026");
    assert_eq!(categories[0].attribute, None);
    assert_eq!(categories[0].collection, Collection::Attribute);

    assert_eq!(categories[1].display_form, "/gdc/md/proj/obj/952");
    assert_eq!(categories[1].attribute.as_deref(), Some("/gdc/md/proj/obj/949"));
    assert_eq!(categories[1].collection, Collection::Stack);
}
