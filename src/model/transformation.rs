//! Transformation: titles, formats, sorting and stacking for an AFM.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::SortDirection;

/// Name of the only bucket the converters understand.
pub const STACKS_BUCKET: &str = "stacks";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<MeasureMeta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buckets: Vec<TransformationBucket>,
}

impl Transformation {
    pub fn measure_meta(&self, id: &str) -> Option<&MeasureMeta> {
        self.measures.iter().find(|meta| meta.id == id)
    }

    /// First sorting entry on exactly this column.
    pub fn sort_for(&self, column: &str) -> Option<&SortItem> {
        self.sorting.iter().find(|item| item.column == column)
    }

    /// Ids listed in any bucket named [`STACKS_BUCKET`].
    pub fn stacked_ids(&self) -> HashSet<&str> {
        self.buckets
            .iter()
            .filter(|bucket| bucket.name == STACKS_BUCKET)
            .flat_map(|bucket| bucket.attributes.iter().map(|a| a.id.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureMeta {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortItem {
    /// Measure or attribute id.
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationBucket {
    pub name: String,
    pub attributes: Vec<BucketAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketAttribute {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json, to_value};

    #[test]
    fn test_empty_transformation_omits_every_key() {
        assert_eq!(to_value(Transformation::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_stacked_ids_only_come_from_stacks_buckets() {
        let transformation: Transformation = from_value(json!({
            "buckets": [
                { "name": "stacks", "attributes": [{ "id": "/gdc/md/p/obj/11" }] },
                { "name": "segments", "attributes": [{ "id": "/gdc/md/p/obj/12" }] }
            ]
        }))
        .unwrap();

        let stacked = transformation.stacked_ids();
        assert!(stacked.contains("/gdc/md/p/obj/11"));
        assert!(!stacked.contains("/gdc/md/p/obj/12"));
    }

    #[test]
    fn test_lookups_by_id() {
        let transformation: Transformation = from_value(json!({
            "measures": [{ "id": "m1", "title": "Revenue", "format": "#,##0" }],
            "sorting": [{ "column": "m1", "direction": "desc" }]
        }))
        .unwrap();

        let meta = transformation.measure_meta("m1").unwrap();
        assert_eq!(meta.title.as_deref(), Some("Revenue"));
        assert_eq!(meta.format.as_deref(), Some("#,##0"));
        assert!(transformation.measure_meta("m2").is_none());
        assert_eq!(
            transformation.sort_for("m1").map(|s| s.direction),
            Some(SortDirection::Desc)
        );
    }
}
