//! Fan-out translation engine.
//!
//! One run takes a content record and a source language, sends every filled
//! field of the source localization to the translation service for every
//! other catalog language, and merges whatever came back. Target languages
//! run concurrently; fields within one language go out sequentially in the
//! kind's field order. A failed field is recorded and skipped, never allowed
//! to stop sibling fields, sibling languages, or attached records.
//!
//! The record passed in is exclusively owned by the call for its duration;
//! the per-record task board tells the UI to keep inputs disabled while a
//! run is in flight.

use crate::catalog::{LanguageCatalog, LanguageCode};
use crate::client::TranslationClient;
use crate::error::{FieldFailure, TranslateError};
use crate::metrics::TranslationMetrics;
use crate::model::{
    EntityId, EntityKind, FieldFormat, FieldName, FieldSpec, LocalizationRecord, LocalizedEntity,
};
use crate::notify::{Notifier, NotifyLevel};
use crate::sanitize::strip_markup;
use futures::future::{join_all, BoxFuture};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Where a record currently stands with respect to translation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
    Done,
}

/// Per-language outcome of one run.
#[derive(Debug, Clone)]
pub struct LanguageOutcome {
    pub language: LanguageCode,
    pub updated_fields: Vec<FieldName>,
    pub failed_fields: Vec<FailedField>,
}

/// A (field, language) attempt that produced no value.
#[derive(Debug, Clone)]
pub struct FailedField {
    pub field: FieldName,
    pub failure: FieldFailure,
}

/// What a run accomplished: one outcome per target language, plus the
/// summaries of any attached records translated along the way.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcomes: Vec<LanguageOutcome>,
    pub nested: Vec<RunSummary>,
}

impl RunSummary {
    pub fn languages_attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Languages that received at least one merged field.
    pub fn languages_updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !o.updated_fields.is_empty())
            .count()
    }

    pub fn fields_updated(&self) -> usize {
        self.outcomes.iter().map(|o| o.updated_fields.len()).sum()
    }

    pub fn field_failures(&self) -> usize {
        self.outcomes.iter().map(|o| o.failed_fields.len()).sum()
    }
}

/// A source field captured for sending: markup already stripped for rich
/// fields, blank fields filtered out.
struct OutboundField {
    spec: FieldSpec,
    text: String,
}

fn capture_outbound(kind: EntityKind, record: &LocalizationRecord) -> Vec<OutboundField> {
    kind.field_set()
        .iter()
        .filter_map(|spec| {
            let raw = record.get(spec.name);
            let text = match spec.format {
                FieldFormat::Plain => raw.trim().to_string(),
                FieldFormat::Rich => strip_markup(raw),
            };
            if text.is_empty() {
                None
            } else {
                Some(OutboundField { spec: *spec, text })
            }
        })
        .collect()
}

struct LanguageWork {
    language: LanguageCode,
    staged: Vec<(FieldName, String)>,
    failures: Vec<FailedField>,
}

/// Drives translation runs and owns the per-record task board.
pub struct TranslationOrchestrator {
    client: TranslationClient,
    catalog: LanguageCatalog,
    notifier: Arc<dyn Notifier>,
    tasks: Mutex<HashMap<EntityId, TaskState>>,
}

impl TranslationOrchestrator {
    pub fn new(
        client: TranslationClient,
        catalog: LanguageCatalog,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            catalog,
            notifier,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Current task state for a record. The UI keeps inputs disabled while
    /// this reports [`TaskState::Running`].
    pub fn task_state(&self, id: EntityId) -> TaskState {
        self.tasks
            .lock()
            .expect("task board lock")
            .get(&id)
            .copied()
            .unwrap_or(TaskState::Idle)
    }

    fn try_begin(&self, id: EntityId) -> bool {
        let mut tasks = self.tasks.lock().expect("task board lock");
        match tasks.get(&id) {
            Some(TaskState::Running) => false,
            _ => {
                tasks.insert(id, TaskState::Running);
                true
            }
        }
    }

    fn finish(&self, id: EntityId) {
        self.tasks
            .lock()
            .expect("task board lock")
            .insert(id, TaskState::Done);
    }

    /// Translate every filled field of the source localization into every
    /// other catalog language and merge the successes into the record.
    ///
    /// Returns an error only for the pre-flight conditions: unknown source
    /// language, nothing to translate, or a run already in flight for this
    /// record. Per-field failures are reported and collected in the summary.
    pub async fn translate(
        &self,
        entity: &mut LocalizedEntity,
        source: &LanguageCode,
    ) -> Result<RunSummary, TranslateError> {
        if !self.try_begin(entity.id()) {
            let err = TranslateError::TranslationInProgress;
            self.notifier.notify(NotifyLevel::Warning, &err.to_string());
            return Err(err);
        }

        let result = self.run(entity, source).await;
        self.finish(entity.id());

        match &result {
            Ok(summary) => self.notify_summary(summary),
            Err(err) => self.notifier.notify(NotifyLevel::Error, &err.to_string()),
        }

        result
    }

    async fn run(
        &self,
        entity: &mut LocalizedEntity,
        source: &LanguageCode,
    ) -> Result<RunSummary, TranslateError> {
        let kind = entity.kind;
        let outbound = {
            let record = entity
                .localization(source)
                .ok_or_else(|| TranslateError::SourceLanguageNotFound(source.clone()))?;
            capture_outbound(kind, record)
        };
        if outbound.is_empty() {
            return Err(TranslateError::NothingToTranslate(source.clone()));
        }

        TranslationMetrics::global().record_run();

        let targets = self.catalog.targets(source);
        for target in &targets {
            entity.ensure_language(target);
        }

        debug!(
            "fanning out {} fields from '{}' to {} languages",
            outbound.len(),
            source,
            targets.len()
        );

        let work = join_all(
            targets
                .iter()
                .map(|target| self.translate_language(&outbound, source, target)),
        )
        .await;

        let mut outcomes = Vec::with_capacity(work.len());
        for item in work {
            let updated_fields: Vec<FieldName> =
                item.staged.iter().map(|(field, _)| *field).collect();
            let record = entity.ensure_language(&item.language);
            for (field, value) in item.staged {
                record.set(field, value);
            }
            outcomes.push(LanguageOutcome {
                language: item.language,
                updated_fields,
                failed_fields: item.failures,
            });
        }

        let nested = join_all(
            entity
                .nested
                .iter_mut()
                .map(|nested| self.translate_nested(nested, source)),
        )
        .await
        .into_iter()
        .flatten()
        .collect();

        Ok(RunSummary { outcomes, nested })
    }

    /// Attached records run through the same fan-out, fire-all/wait-all. A
    /// nested record with nothing to translate is skipped; a nested failure
    /// never rolls back what the parent already merged.
    fn translate_nested<'a>(
        &'a self,
        entity: &'a mut LocalizedEntity,
        source: &'a LanguageCode,
    ) -> BoxFuture<'a, Option<RunSummary>> {
        Box::pin(async move {
            if !self.try_begin(entity.id()) {
                self.notifier.notify(
                    NotifyLevel::Warning,
                    "an attached record is still translating and was skipped",
                );
                return None;
            }

            let result = self.run(entity, source).await;
            self.finish(entity.id());

            result.ok()
        })
    }

    async fn translate_language(
        &self,
        outbound: &[OutboundField],
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> LanguageWork {
        let mut work = LanguageWork {
            language: target.clone(),
            staged: Vec::new(),
            failures: Vec::new(),
        };

        for field in outbound {
            match self.attempt_field(field, source, target).await {
                Ok(translated) => {
                    TranslationMetrics::global().record_field_translated();
                    work.staged.push((field.spec.name, translated));
                }
                Err(failure) => {
                    TranslationMetrics::global().record_field_failure();
                    self.notify_field_failure(field.spec.name, target, &failure);
                    work.failures.push(FailedField {
                        field: field.spec.name,
                        failure,
                    });
                }
            }
        }

        work
    }

    /// One attempt for one (field, language) pair. Rich fields were already
    /// reduced to plain text when the source snapshot was captured.
    async fn attempt_field(
        &self,
        field: &OutboundField,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> Result<String, FieldFailure> {
        TranslationMetrics::global().record_api_call();
        let result = match field.spec.format {
            FieldFormat::Plain => self.client.translate_text(&field.text, target, source).await,
            FieldFormat::Rich => self.client.translate_html(&field.text, target, source).await,
        };
        result.map_err(|err| FieldFailure::from_client(&err))
    }

    fn notify_field_failure(
        &self,
        field: FieldName,
        target: &LanguageCode,
        failure: &FieldFailure,
    ) {
        let message = if failure.is_service_unavailable() {
            format!(
                "the translation service is temporarily unavailable, '{}' was not translated into {}; try again later",
                field, target
            )
        } else {
            format!("could not translate '{}' into {}: {}", field, target, failure)
        };
        self.notifier.notify(NotifyLevel::Warning, &message);
    }

    fn notify_summary(&self, summary: &RunSummary) {
        if summary.languages_attempted() == 0 {
            self.notifier.notify(
                NotifyLevel::Info,
                "no other languages are configured, nothing to translate",
            );
        } else if summary.fields_updated() == 0 {
            self.notifier.notify(
                NotifyLevel::Error,
                "translation failed, no fields were updated; please try again",
            );
        } else if summary.field_failures() == 0
            && summary.languages_updated() == summary.languages_attempted()
        {
            self.notifier.notify(
                NotifyLevel::Info,
                &format!("{} languages updated", summary.languages_updated()),
            );
        } else {
            self.notifier.notify(
                NotifyLevel::Warning,
                &format!(
                    "updated {} of {} languages, some fields could not be translated; please review",
                    summary.languages_updated(),
                    summary.languages_attempted()
                ),
            );
        }
    }
}
