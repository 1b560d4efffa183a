//! Result headers returned alongside an execution.

use serde::{Deserialize, Serialize};

/// Header describing one attribute of an execution result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultHeader {
    /// Symbolic id as used in the AFM.
    pub id: String,
    /// Display-form URI.
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
}

impl ResultHeader {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
            kind: "attrLabel".to_string(),
            title: String::new(),
        }
    }
}

/// URI of the first header with the given id.
pub fn uri_for<'a>(headers: &'a [ResultHeader], id: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|header| header.id == id)
        .map(|header| header.uri.as_str())
}
