//! Capture service: the sink of record for every entry
//!
//! The service stores entries in arrival order, owns the registered rules
//! and the violation ledger, and decides per entry whether a violation
//! fails the log call or is recorded for later inspection.

mod queries;

use crate::entry::LogEntry;
use crate::errors::{LogSpyError, Result};
use crate::rules::LogRule;
use logspy_core_types::schema::DIAGNOSTICS_TARGET;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// How a rule violation is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationMode {
    /// Record the violation; the test inspects the ledger at the end
    #[default]
    DeferredFail,
    /// Reject the entry and fail the log call on the spot
    ImmediateFail,
}

impl ViolationMode {
    fn as_u8(self) -> u8 {
        match self {
            ViolationMode::DeferredFail => 0,
            ViolationMode::ImmediateFail => 1,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ViolationMode::ImmediateFail,
            _ => ViolationMode::DeferredFail,
        }
    }
}

/// Thread-safe store of captured entries, rules and violations
pub struct CaptureService {
    entries: RwLock<Vec<Arc<LogEntry>>>,
    rules: RwLock<Vec<Arc<dyn LogRule>>>,
    violations: Mutex<Vec<String>>,
    mode: AtomicU8,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CaptureService {
    pub fn new() -> Self {
        Self::with_mode(ViolationMode::default())
    }

    pub fn with_mode(mode: ViolationMode) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            rules: RwLock::new(Vec::new()),
            violations: Mutex::new(Vec::new()),
            mode: AtomicU8::new(mode.as_u8()),
        }
    }

    pub fn mode(&self) -> ViolationMode {
        ViolationMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    pub fn set_mode(&self, mode: ViolationMode) {
        self.mode.store(mode.as_u8(), Ordering::Release);
    }

    /// Register a rule; it applies to every entry added after this returns
    pub fn add_rule(&self, rule: impl LogRule + 'static) {
        self.add_shared_rule(Arc::new(rule));
    }

    /// Register a rule that is shared with other services
    pub fn add_shared_rule(&self, rule: Arc<dyn LogRule>) {
        let mut rules = write(&self.rules);
        rules.push(rule);
        tracing::debug!(target: DIAGNOSTICS_TARGET, rule_count = rules.len(), "rule registered");
    }

    /// Evaluate all rules against `entry`, then store it
    ///
    /// Rules run in registration order. Under `DeferredFail` every
    /// violation message is appended to the ledger and the entry is
    /// stored. Under `ImmediateFail` the entry is not stored.
    ///
    /// # Errors
    /// * `RuleViolation` - If any rule rejects the entry under `ImmediateFail`
    pub fn add_entry(&self, entry: Arc<LogEntry>) -> Result<()> {
        let mode = self.mode();
        let rules: Vec<Arc<dyn LogRule>> = read(&self.rules).clone();

        let found: Vec<String> = rules
            .iter()
            .filter(|rule| rule.is_violated_by(&entry))
            .map(|rule| rule.violation_message())
            .collect();

        if !found.is_empty() {
            match mode {
                ViolationMode::ImmediateFail => {
                    return Err(LogSpyError::RuleViolation { violations: found });
                }
                ViolationMode::DeferredFail => {
                    tracing::debug!(
                        target: DIAGNOSTICS_TARGET,
                        category = %entry.category,
                        count = found.len(),
                        "deferred rule violations recorded"
                    );
                    lock(&self.violations).extend(found);
                }
            }
        }

        write(&self.entries).push(entry);
        Ok(())
    }

    /// Drop all entries, rules and violations
    ///
    /// Safe to call while other threads are still logging; their entries
    /// land either before or after the clear.
    pub fn clear(&self) {
        let mut rules = write(&self.rules);
        let mut violations = lock(&self.violations);
        let mut entries = write(&self.entries);
        rules.clear();
        violations.clear();
        entries.clear();
        tracing::debug!(target: DIAGNOSTICS_TARGET, "capture cleared");
    }

    /// Snapshot of captured entries in arrival order
    pub fn entries(&self) -> Vec<Arc<LogEntry>> {
        read(&self.entries).clone()
    }

    /// Snapshot of recorded violation messages
    pub fn violations(&self) -> Vec<String> {
        lock(&self.violations).clone()
    }

    pub fn rule_count(&self) -> usize {
        read(&self.rules).len()
    }

    pub fn len(&self) -> usize {
        read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.entries).is_empty()
    }

    /// Assert that no rule violation has been recorded
    ///
    /// # Panics
    ///
    /// Panics listing every recorded violation
    pub fn assert_no_violations(&self) {
        let violations = self.violations();
        assert!(
            violations.is_empty(),
            "Some log rule was violated:\n{}",
            violations.join("\n")
        );
    }

    /// Assert that some entry's message contains `needle` (case-insensitive)
    ///
    /// # Panics
    ///
    /// Panics if no captured message contains `needle`
    pub fn assert_logged(&self, needle: &str) {
        let matches = self.by_message_contains(needle);
        assert!(
            !matches.is_empty(),
            "Expected a log message containing '{}' in {} captured entries",
            needle,
            self.len()
        );
    }
}

impl Default for CaptureService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CaptureService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureService")
            .field("entries", &self.len())
            .field("rules", &self.rule_count())
            .field("violations", &lock(&self.violations).len())
            .field("mode", &self.mode())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MaxLevelRule;
    use logspy_core_types::LogLevel;

    fn entry(level: LogLevel, message: &str) -> Arc<LogEntry> {
        Arc::new(LogEntry::new(level, "Tests", message))
    }

    #[test]
    fn test_mode_defaults_to_deferred() {
        let capture = CaptureService::new();
        assert_eq!(capture.mode(), ViolationMode::DeferredFail);

        capture.set_mode(ViolationMode::ImmediateFail);
        assert_eq!(capture.mode(), ViolationMode::ImmediateFail);
    }

    #[test]
    fn test_rule_added_later_does_not_touch_earlier_entries() {
        let capture = CaptureService::new();
        capture.add_entry(entry(LogLevel::Error, "before")).unwrap();

        capture.add_rule(MaxLevelRule::new(LogLevel::Warning));
        assert!(capture.violations().is_empty());

        capture.add_entry(entry(LogLevel::Error, "after")).unwrap();
        assert_eq!(capture.violations().len(), 1);
        assert_eq!(capture.len(), 2);
    }

    #[test]
    fn test_every_violated_rule_is_reported_in_order() {
        let capture = CaptureService::with_mode(ViolationMode::ImmediateFail);
        capture.add_rule(MaxLevelRule::new(LogLevel::Debug));
        capture.add_rule(MaxLevelRule::new(LogLevel::Information));

        let err = capture
            .add_entry(entry(LogLevel::Error, "too loud"))
            .unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert!(err.violations()[0].contains("'Debug'"));
        assert!(err.violations()[1].contains("'Information'"));
        assert!(capture.is_empty());
    }

    #[test]
    fn test_debug_output_summarizes_state() {
        let capture = CaptureService::new();
        let rendered = format!("{:?}", capture);
        assert!(rendered.contains("entries: 0"));
    }
}
