//! Placeholder Interpolation
//!
//! Translated strings carry `%name%` placeholders that are filled from a
//! [`Substitutions`] map.

use std::collections::BTreeMap;

/// Named values for `%name%` placeholders.
///
/// ```
/// use lexis_i18n::{Substitutions, interpolate};
///
/// let subs = Substitutions::new().with("name", "Ann").with("count", "3");
/// assert_eq!(
///     interpolate("Hello %name%, you have %count% items", &subs),
///     "Hello Ann, you have 3 items"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    /// Builder-style [`Substitutions::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Self::new();
        for (name, value) in iter {
            subs.insert(name, value);
        }
        subs
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Substitutions {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Replace `%name%` placeholders with their values.
///
/// A single left-to-right pass: inserted values are never scanned again,
/// placeholders without a value stay as they are, and a lone `%` is
/// copied through. Names may themselves contain `%`; when several names
/// match at the same position the longest wins.
pub fn interpolate(template: &str, substitutions: &Substitutions) -> String {
    if substitutions.is_empty() || !template.contains('%') {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replaced = substitutions
            .values
            .iter()
            .filter(|(name, _)| {
                after
                    .strip_prefix(name.as_str())
                    .is_some_and(|tail| tail.starts_with('%'))
            })
            .max_by_key(|(name, _)| name.len())
            .map(|(name, value)| (value.as_str(), &after[name.len() + 1..]));

        match replaced {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                // Not a placeholder; the closing '%' may open the next one
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
