//! Attribute ↔ display-form resolution.
//!
//! The forward converter maps an attribute URI to its display form; the
//! reverse converter asks the opposite question.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Resolves attributes to display forms and back.
pub trait Resolver {
    /// Display-form URI of the attribute `attribute`.
    fn display_form(&self, attribute: &str) -> Option<&str>;

    /// Attribute URI whose display form is `display_form`.
    fn attribute(&self, display_form: &str) -> Option<&str>;
}

/// Table of `{attributeUri: displayFormUri}`, as supplied by callers.
///
/// Keeps an inverse index so reverse lookups are O(1). When several
/// attributes share a display form, the lexicographically smallest
/// attribute wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct AttributesMap {
    display_forms: BTreeMap<String, String>,
    attributes: HashMap<String, String>,
}

impl AttributesMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attribute: impl Into<String>, display_form: impl Into<String>) {
        let attribute = attribute.into();
        let display_form = display_form.into();
        let previous = self
            .display_forms
            .insert(attribute.clone(), display_form.clone())
            .filter(|previous| *previous != display_form);
        if let Some(previous) = previous {
            if self.attributes.get(&previous) == Some(&attribute) {
                self.attributes.remove(&previous);
                let successor = self
                    .display_forms
                    .iter()
                    .find(|(_, df)| **df == previous)
                    .map(|(other, _)| other.clone());
                if let Some(successor) = successor {
                    self.attributes.insert(previous, successor);
                }
            }
        }
        self.attributes
            .entry(display_form)
            .and_modify(|existing| {
                if attribute < *existing {
                    *existing = attribute.clone();
                }
            })
            .or_insert(attribute);
    }

    pub fn len(&self) -> usize {
        self.display_forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_forms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.display_forms
            .iter()
            .map(|(attribute, display_form)| (attribute.as_str(), display_form.as_str()))
    }
}

impl Resolver for AttributesMap {
    fn display_form(&self, attribute: &str) -> Option<&str> {
        self.display_forms.get(attribute).map(String::as_str)
    }

    fn attribute(&self, display_form: &str) -> Option<&str> {
        self.attributes.get(display_form).map(String::as_str)
    }
}

impl<A: Into<String>, D: Into<String>> FromIterator<(A, D)> for AttributesMap {
    fn from_iter<T: IntoIterator<Item = (A, D)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (attribute, display_form) in iter {
            map.insert(attribute, display_form);
        }
        map
    }
}

impl From<BTreeMap<String, String>> for AttributesMap {
    fn from(entries: BTreeMap<String, String>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for AttributesMap {
    fn from(entries: HashMap<String, String>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<AttributesMap> for BTreeMap<String, String> {
    fn from(map: AttributesMap) -> Self {
        map.display_forms
    }
}
