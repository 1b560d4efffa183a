//! Id scheme and string helpers shared by both directions.

use std::sync::LazyLock;

use regex::Regex;

/// Suffix appended to a base measure id to name its PoP companion.
pub const POP_ID_SUFFIX: &str = "_pop";

/// Suffix appended to a base measure title to name its PoP companion.
pub const POP_TITLE_SUFFIX: &str = " - previous year";

/// Namespace of fully qualified date granularities.
pub const GRANULARITY_PREFIX: &str = "GDC.time.";

static OBJECT_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/gdc/md/[^/\s]+/obj/[^/\s]+$").expect("static regex"));

/// Positional id of the measure at `index` (0-based): `m1`, `m2`, ...
pub fn measure_id(index: usize) -> String {
    format!("m{}", index + 1)
}

/// Id of the PoP companion of `base_id`.
pub fn pop_measure_id(base_id: &str) -> String {
    format!("{base_id}{POP_ID_SUFFIX}")
}

/// Title of the PoP companion of a measure titled `title`.
pub fn pop_title(title: &str) -> String {
    format!("{title}{POP_TITLE_SUFFIX}")
}

/// Element id carried by an element URI: everything after the last `=`.
///
/// `/gdc/md/p/obj/1?id=12` → `12`. A string without `=` is returned whole.
pub fn element_id(element_uri: &str) -> &str {
    element_uri.rsplit('=').next().unwrap_or(element_uri)
}

/// Element URI of `element` under `attribute`: `{attribute}?id={element}`.
pub fn element_uri(attribute: &str, element: &str) -> String {
    format!("{attribute}?id={element}")
}

/// Last `.`-separated segment of a granularity: `GDC.time.year` → `year`.
pub fn strip_granularity(granularity: &str) -> &str {
    granularity.rsplit('.').next().unwrap_or(granularity)
}

/// Re-qualify a bare granularity: `year` → `GDC.time.year`.
pub fn qualify_granularity(granularity: &str) -> String {
    if granularity.starts_with(GRANULARITY_PREFIX) {
        granularity.to_string()
    } else {
        format!("{GRANULARITY_PREFIX}{granularity}")
    }
}

/// True for a metadata object URI such as `/gdc/md/{project}/obj/{id}`.
pub fn is_object_uri(id: &str) -> bool {
    OBJECT_URI.is_match(id)
}
