//! Translation fan-out and submission encoding for multi-locale content records.
//!
//! The admin surface for pages, components, and media assets stores one set of
//! text fields per configured language. This crate provides the two pieces of
//! machinery those editing screens share:
//!
//! - [`orchestrator::TranslationOrchestrator`]: takes one language's filled-in
//!   fields and fans them out to every other configured language through an
//!   external translation service, tolerating failures independently per field
//!   and per language, then merges the successes back into the record.
//! - [`encoder`]: flattens a content record (files, per-language sub-records,
//!   nested sub-entities) into the indexed key/value list the multipart
//!   submission endpoint expects.

pub mod catalog;
pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod orchestrator;
pub mod sanitize;

pub use catalog::{LanguageCatalog, LanguageCode};
pub use client::{ClientError, TranslationClient};
pub use config::Config;
pub use error::{FieldFailure, TranslateError};
pub use model::{EntityKind, FieldName, LocalizationRecord, LocalizedEntity};
pub use notify::{Notifier, NotifyLevel, TracingNotifier};
pub use orchestrator::{RunSummary, TaskState, TranslationOrchestrator};
