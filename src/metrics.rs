//! Translation run metrics and observability.
//!
//! Counts fan-out runs, service calls, and per-field outcomes so the
//! translation workload is visible without digging through logs.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global translation metrics singleton.
pub struct TranslationMetrics {
    /// Number of fan-out runs that passed the pre-flight guards
    runs_started: AtomicUsize,

    /// Number of calls made to the translation service
    api_calls: AtomicUsize,

    /// Number of field translations merged into a record
    fields_translated: AtomicUsize,

    /// Number of field translations that failed
    field_failures: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<TranslationMetrics> = OnceLock::new();

impl TranslationMetrics {
    fn new() -> Self {
        Self {
            runs_started: AtomicUsize::new(0),
            api_calls: AtomicUsize::new(0),
            fields_translated: AtomicUsize::new(0),
            field_failures: AtomicUsize::new(0),
        }
    }

    /// Get the global translation metrics instance.
    pub fn global() -> &'static TranslationMetrics {
        METRICS.get_or_init(TranslationMetrics::new)
    }

    /// Record a fan-out run passing its guards.
    pub fn record_run(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call to the translation service.
    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a field translation that was merged.
    pub fn record_field_translated(&self) {
        self.fields_translated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a field translation that failed.
    pub fn record_field_failure(&self) {
        self.field_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn runs_started(&self) -> usize {
        self.runs_started.load(Ordering::Relaxed)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn fields_translated(&self) -> usize {
        self.fields_translated.load(Ordering::Relaxed)
    }

    pub fn field_failures(&self) -> usize {
        self.field_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let translated = self.fields_translated();
        let failures = self.field_failures();
        let attempted = translated + failures;
        let field_success_rate = if attempted > 0 {
            (translated as f64 / attempted as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            runs_started: self.runs_started(),
            api_calls: self.api_calls(),
            fields_translated: translated,
            field_failures: failures,
            field_success_rate,
        }
    }

}

/// Snapshot of the current translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of fan-out runs started
    pub runs_started: usize,

    /// Number of translation service calls made
    pub api_calls: usize,

    /// Number of field translations merged
    pub fields_translated: usize,

    /// Number of field translations that failed
    pub field_failures: usize,

    /// Field success rate as a percentage (0-100)
    pub field_success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests use their own instances; the global is shared with every other
    // test in the binary and its counts are not predictable here.

    #[test]
    fn test_counters_increment() {
        let metrics = TranslationMetrics::new();

        metrics.record_run();
        metrics.record_api_call();
        metrics.record_api_call();
        metrics.record_field_translated();
        metrics.record_field_failure();

        assert_eq!(metrics.runs_started(), 1);
        assert_eq!(metrics.api_calls(), 2);
        assert_eq!(metrics.fields_translated(), 1);
        assert_eq!(metrics.field_failures(), 1);
    }

    #[test]
    fn test_report_success_rate() {
        let metrics = TranslationMetrics::new();

        metrics.record_field_translated();
        metrics.record_field_translated();
        metrics.record_field_translated();
        metrics.record_field_failure();

        let report = metrics.report();
        assert_eq!(report.fields_translated, 3);
        assert_eq!(report.field_failures, 1);
        assert!((report.field_success_rate - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_with_no_attempts() {
        let report = TranslationMetrics::new().report();
        assert_eq!(report.field_success_rate, 0.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = TranslationMetrics::new().report();
        let json = serde_json::to_string(&report).expect("serialize report");
        assert!(json.contains("field_success_rate"));
    }

    #[test]
    fn test_global_returns_singleton() {
        let a = TranslationMetrics::global();
        let b = TranslationMetrics::global();
        assert!(std::ptr::eq(a, b));
    }
}
