//! Content record model: entities, per-language localization records, and the
//! per-kind field tables.
//!
//! Every entity kind enumerates its translatable fields once, in editing
//! order, in [`EntityKind::field_set`]. The orchestrator and the submission
//! encoder both iterate that table so field order stays consistent between
//! translation and the wire format.

use crate::catalog::{LanguageCatalog, LanguageCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of an in-memory content record.
///
/// Persisted records get a fresh id on load; the id only has to be unique
/// within the process, where the orchestrator uses it to track which records
/// have a translation run in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u64);

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The kind of content record being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Asset,
    Component,
    Page,
}

/// A translatable text field on a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Title,
    Excerpt,
    Description,
    Subdescription,
    Content,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
}

impl FieldName {
    /// Wire name used for submission keys.
    pub fn key(&self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::Excerpt => "excerpt",
            FieldName::Description => "description",
            FieldName::Subdescription => "subdescription",
            FieldName::Content => "content",
            FieldName::MetaTitle => "metaTitle",
            FieldName::MetaDescription => "metaDescription",
            FieldName::MetaKeywords => "metaKeywords",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether a field holds plain text or editor-produced markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Plain,
    Rich,
}

/// One entry in a kind's ordered field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub format: FieldFormat,
}

const fn plain(name: FieldName) -> FieldSpec {
    FieldSpec {
        name,
        format: FieldFormat::Plain,
    }
}

const fn rich(name: FieldName) -> FieldSpec {
    FieldSpec {
        name,
        format: FieldFormat::Rich,
    }
}

const ASSET_FIELDS: &[FieldSpec] = &[
    plain(FieldName::Title),
    rich(FieldName::Description),
    plain(FieldName::Subdescription),
];

// Subdescription lives on a component's nested assets, not the component
// itself.
const COMPONENT_FIELDS: &[FieldSpec] = &[
    plain(FieldName::Title),
    plain(FieldName::Excerpt),
    rich(FieldName::Description),
];

const PAGE_FIELDS: &[FieldSpec] = &[
    plain(FieldName::Title),
    plain(FieldName::Excerpt),
    rich(FieldName::Content),
    plain(FieldName::MetaTitle),
    plain(FieldName::MetaDescription),
    plain(FieldName::MetaKeywords),
];

impl EntityKind {
    /// The kind's translatable fields in editing order.
    pub fn field_set(&self) -> &'static [FieldSpec] {
        match self {
            EntityKind::Asset => ASSET_FIELDS,
            EntityKind::Component => COMPONENT_FIELDS,
            EntityKind::Page => PAGE_FIELDS,
        }
    }
}

/// One language's text fields for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationRecord {
    #[serde(rename = "languageCode")]
    pub language: LanguageCode,
    #[serde(default)]
    pub fields: HashMap<FieldName, String>,
}

impl LocalizationRecord {
    pub fn empty(language: LanguageCode) -> Self {
        Self {
            language,
            fields: HashMap::new(),
        }
    }

    /// Field value, or the empty string when the field was never set.
    pub fn get(&self, field: FieldName) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// True when every field in the kind's table is empty or whitespace.
    pub fn is_blank_for(&self, kind: EntityKind) -> bool {
        kind.field_set()
            .iter()
            .all(|spec| self.get(spec.name).trim().is_empty())
    }
}

/// A binary file attached to an entity, or a reference to one already stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileValue {
    Upload {
        file_name: String,
        #[serde(default)]
        content_type: Option<String>,
        data: Vec<u8>,
    },
    Existing {
        reference: String,
    },
}

/// A content record with one localization per configured language, an
/// optional file payload, and optionally nested sub-entities (a component's
/// assets).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedEntity {
    #[serde(skip, default = "EntityId::next")]
    id: EntityId,
    pub kind: EntityKind,
    #[serde(default)]
    pub localizations: Vec<LocalizationRecord>,
    #[serde(default)]
    pub nested: Vec<LocalizedEntity>,
    #[serde(default)]
    pub file: Option<FileValue>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub link: Option<String>,
}

impl LocalizedEntity {
    /// A fresh record with an empty localization per catalog language.
    pub fn new(kind: EntityKind, catalog: &LanguageCatalog) -> Self {
        let localizations = catalog
            .iter()
            .map(|code| LocalizationRecord::empty(code.clone()))
            .collect();
        Self {
            id: EntityId::next(),
            kind,
            localizations,
            nested: Vec::new(),
            file: None,
            sort_order: 0,
            link: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Bring a loaded record in line with the catalog: drop duplicate
    /// localizations (first one per language wins) and synthesize an empty
    /// record for every catalog language that has none. Applies to nested
    /// entities as well.
    pub fn ensure_catalog_languages(&mut self, catalog: &LanguageCatalog) {
        let mut seen: Vec<LanguageCode> = Vec::with_capacity(self.localizations.len());
        self.localizations.retain(|record| {
            if seen.contains(&record.language) {
                false
            } else {
                seen.push(record.language.clone());
                true
            }
        });

        for code in catalog.iter() {
            if !seen.contains(code) {
                self.localizations.push(LocalizationRecord::empty(code.clone()));
                seen.push(code.clone());
            }
        }

        for nested in &mut self.nested {
            nested.ensure_catalog_languages(catalog);
        }
    }

    pub fn localization(&self, language: &LanguageCode) -> Option<&LocalizationRecord> {
        self.localizations.iter().find(|r| &r.language == language)
    }

    pub fn localization_mut(&mut self, language: &LanguageCode) -> Option<&mut LocalizationRecord> {
        self.localizations
            .iter_mut()
            .find(|r| &r.language == language)
    }

    /// The record for a language, created empty when absent.
    pub fn ensure_language(&mut self, language: &LanguageCode) -> &mut LocalizationRecord {
        let idx = match self
            .localizations
            .iter()
            .position(|r| &r.language == language)
        {
            Some(idx) => idx,
            None => {
                self.localizations
                    .push(LocalizationRecord::empty(language.clone()));
                self.localizations.len() - 1
            }
        };
        &mut self.localizations[idx]
    }

    pub fn attach(&mut self, nested: LocalizedEntity) {
        self.nested.push(nested);
    }

    pub fn remove_nested(&mut self, id: EntityId) {
        self.nested.retain(|n| n.id != id);
    }
}
