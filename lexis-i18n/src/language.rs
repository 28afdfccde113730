//! Language Codes and Preference Lists
//!
//! Language codes are opaque to Lexis: they name resource files and cache
//! entries, nothing more. A [`LanguageList`] is the ordered fallback chain
//! tried during resolution.

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A single language code, e.g. `"en"` or `"en-us"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Trim and validate a code. Empty codes are rejected.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Err(I18nError::InvalidLanguage(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary subtag of a regional code (`"en"` for `"en-us"`), if
    /// the code has a region.
    pub fn base(&self) -> Option<LanguageCode> {
        self.0
            .split_once(['-', '_'])
            .map(|(base, _)| base)
            .filter(|base| !base.is_empty())
            .map(|base| Self(base.to_string()))
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = I18nError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// Ordered language preference list, most preferred first.
///
/// Parsed from a comma-delimited string. Entries are trimmed, empty entries
/// are skipped, and only the first occurrence of a repeated code is kept.
///
/// ```
/// use lexis_i18n::LanguageList;
///
/// let list = LanguageList::parse("fr, en,,fr");
/// assert_eq!(list.to_string(), "fr,en");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageList {
    codes: Vec<LanguageCode>,
}

impl LanguageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-delimited list such as `"fr,en"`.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .filter_map(|part| LanguageCode::parse(part).ok())
            .collect()
    }

    /// Build a list from an HTTP `Accept-Language` header.
    ///
    /// Entries are ordered by quality, highest first; entries of equal
    /// quality keep header order. Wildcards and `q=0` entries are dropped
    /// and tags are lowercased.
    ///
    /// ```
    /// use lexis_i18n::LanguageList;
    ///
    /// let list = LanguageList::from_accept_language("en;q=0.5, fr-CA, de;q=0.8");
    /// assert_eq!(list.to_string(), "fr-ca,de,en");
    /// ```
    pub fn from_accept_language(header: &str) -> Self {
        let mut entries: Vec<(LanguageCode, f32)> = header
            .split(',')
            .filter_map(|part| {
                let mut split = part.splitn(2, ';');
                let tag = split.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }

                let quality = split
                    .next()
                    .and_then(|q| q.trim().strip_prefix("q="))
                    .map(|q| q.trim().parse::<f32>().unwrap_or(0.0))
                    .unwrap_or(1.0);
                if quality <= 0.0 {
                    return None;
                }

                let code = LanguageCode::parse(&tag.to_lowercase()).ok()?;
                Some((code, quality))
            })
            .collect();

        // Stable, so equal qualities keep header order
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));

        entries.into_iter().map(|(code, _)| code).collect()
    }

    /// Append a code unless it is already present.
    pub fn push(&mut self, code: LanguageCode) -> bool {
        if self.contains(code.as_str()) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Insert each regional code's base language right after it, unless the
    /// base already appears in the list.
    ///
    /// `"en-us,fr"` becomes `"en-us,en,fr"`.
    pub fn with_base_languages(&self) -> Self {
        let mut expanded = Vec::with_capacity(self.codes.len() * 2);
        for code in &self.codes {
            expanded.push(code.clone());
            if let Some(base) = code.base() {
                if !self.contains(base.as_str()) && !expanded.contains(&base) {
                    expanded.push(base);
                }
            }
        }
        Self { codes: expanded }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c.as_str() == code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LanguageCode> {
        self.codes.iter()
    }

    pub fn first(&self) -> Option<&LanguageCode> {
        self.codes.first()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl FromIterator<LanguageCode> for LanguageList {
    fn from_iter<I: IntoIterator<Item = LanguageCode>>(iter: I) -> Self {
        let mut list = Self::new();
        for code in iter {
            list.push(code);
        }
        list
    }
}

impl<'a> IntoIterator for &'a LanguageList {
    type Item = &'a LanguageCode;
    type IntoIter = std::slice::Iter<'a, LanguageCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

impl FromStr for LanguageList {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Infallible> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for LanguageList {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for LanguageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(code.as_str())?;
        }
        Ok(())
    }
}
