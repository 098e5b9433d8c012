//! Language catalog: the ordered set of languages an installation edits in.
//!
//! Unlike a hardcoded language list, the catalog is supplied by the
//! installation's configuration and treated as read-only here. Every content
//! record is expected to carry one localization per catalog entry; the
//! orchestrator derives its fan-out targets from this set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A language code as configured for the installation (e.g. "tr", "en").
///
/// Codes are compared verbatim; normalization (trimming, lowercasing) happens
/// once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self(code.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// The ordered, deduplicated set of active language codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCatalog {
    codes: Vec<LanguageCode>,
}

impl LanguageCatalog {
    /// Build a catalog from configured codes, keeping first-seen order and
    /// dropping duplicates and empty entries.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = Vec::new();
        for code in codes {
            let code = LanguageCode::new(code);
            if code.as_str().is_empty() || seen.contains(&code) {
                continue;
            }
            seen.push(code);
        }
        Self { codes: seen }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.codes.contains(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageCode> {
        self.codes.iter()
    }

    /// Fan-out targets for a run: every catalog language except the source,
    /// in catalog order.
    pub fn targets(&self, source: &LanguageCode) -> Vec<LanguageCode> {
        self.codes
            .iter()
            .filter(|code| *code != source)
            .cloned()
            .collect()
    }
}
