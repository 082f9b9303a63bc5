use serde::Serialize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared run state, passed by reference into every traversal unit. Counters
/// are atomic and the violation list is mutex-guarded, so unboundedly many
/// workers may append concurrently.
#[derive(Debug, Default)]
pub struct Aggregator {
    classes_checked: AtomicUsize,
    archives_checked: AtomicUsize,
    violations: Mutex<Vec<String>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_class(&self) {
        self.classes_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_archive(&self) {
        self.archives_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_violation(&self, text: String) {
        let mut violations = self.violations.lock().unwrap_or_else(|e| e.into_inner());
        violations.push(text);
    }

    pub fn classes_checked(&self) -> usize {
        self.classes_checked.load(Ordering::Relaxed)
    }

    pub fn archives_checked(&self) -> usize {
        self.archives_checked.load(Ordering::Relaxed)
    }

    /// Drains the collected violations. Call after the root join, when no
    /// workers are appending anymore.
    pub fn take_violations(&self) -> Vec<String> {
        let mut violations = self.violations.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *violations)
    }
}

/// Successful run summary, reported to the caller for logging/telemetry.
#[derive(Debug, Serialize)]
pub struct CheckSummary {
    pub root: String,
    pub rule_count: usize,
    pub classes_checked: usize,
    pub archives_checked: usize,
    pub duration_ms: u64,
}
