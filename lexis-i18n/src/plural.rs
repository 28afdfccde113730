//! Plural Selection
//!
//! A plural set maps ascending numeric thresholds to strings. The form for
//! a number is the one under the largest threshold not above it:
//!
//! ```json
//! { "0": "no items", "1": "one item", "5": "many items" }
//! ```
//!
//! selects "one item" for 1 through 4 and "many items" from 5 on. Numbers
//! below the smallest threshold get the smallest threshold's form.

use crate::ResourceTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Threshold-keyed plural forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluralSet {
    forms: BTreeMap<i64, String>,
}

impl PluralSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a plural set from a tree leaf.
    ///
    /// The leaf must be a node whose children are all scalars keyed by
    /// non-negative integers in canonical decimal form (`"5"`, not `"05"`).
    /// Anything else yields `None`.
    pub fn from_tree(tree: &ResourceTree) -> Option<Self> {
        tree.as_node()?
            .iter()
            .map(|(key, child)| Some((parse_threshold(key)?, child.as_scalar()?.to_string())))
            .collect::<Option<BTreeMap<_, _>>>()
            .map(|forms| Self { forms })
    }

    /// Add a form, replacing any previous one at the same threshold.
    pub fn insert(&mut self, threshold: i64, form: impl Into<String>) {
        self.forms.insert(threshold, form.into());
    }

    /// Builder-style [`PluralSet::insert`].
    pub fn with(mut self, threshold: i64, form: impl Into<String>) -> Self {
        self.insert(threshold, form);
        self
    }

    /// Select the form for `number`. Empty sets select nothing.
    pub fn select(&self, number: i64) -> Option<&str> {
        self.forms
            .range(..=number)
            .next_back()
            .or_else(|| self.forms.iter().next())
            .map(|(_, form)| form.as_str())
    }

    /// Thresholds in ascending order.
    pub fn thresholds(&self) -> impl Iterator<Item = i64> + '_ {
        self.forms.keys().copied()
    }

    pub fn get(&self, threshold: i64) -> Option<&str> {
        self.forms.get(&threshold).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for PluralSet {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        Self {
            forms: iter.into_iter().map(|(t, s)| (t, s.into())).collect(),
        }
    }
}

fn parse_threshold(key: &str) -> Option<i64> {
    let threshold: i64 = key.parse().ok()?;
    (threshold >= 0 && threshold.to_string() == key).then_some(threshold)
}
