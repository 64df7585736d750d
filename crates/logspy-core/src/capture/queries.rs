//! Read-only queries over captured entries

use super::CaptureService;
use crate::entry::LogEntry;
use chrono::{DateTime, Duration, Utc};
use logspy_core_types::LogLevel;
use std::sync::Arc;

impl CaptureService {
    /// Entries logged at exactly `level`
    pub fn by_level(&self, level: LogLevel) -> Vec<Arc<LogEntry>> {
        self.filtered(|e| e.level == level)
    }

    /// Entries whose message contains `needle`, ignoring case
    pub fn by_message_contains(&self, needle: &str) -> Vec<Arc<LogEntry>> {
        let needle = needle.to_lowercase();
        self.filtered(|e| e.message.to_lowercase().contains(&needle))
    }

    /// Entries whose category equals `category`, ignoring case
    pub fn by_category(&self, category: &str) -> Vec<Arc<LogEntry>> {
        let category = category.to_lowercase();
        self.filtered(|e| e.category.to_lowercase() == category)
    }

    /// Entries stamped within `[start, end]`
    pub fn by_timestamp_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Arc<LogEntry>> {
        self.filtered(|e| e.timestamp >= start && e.timestamp <= end)
    }

    /// Entries carrying `correlation_id`
    pub fn by_correlation_id(&self, correlation_id: &str) -> Vec<Arc<LogEntry>> {
        self.filtered(|e| e.correlation_id == correlation_id)
    }

    /// Whether any Error entry was stamped no later than `reference + window`
    pub fn has_error_within(&self, window: Duration, reference: DateTime<Utc>) -> bool {
        let cutoff = reference + window;
        self.entries()
            .iter()
            .any(|e| e.level == LogLevel::Error && e.timestamp <= cutoff)
    }

    fn filtered(&self, predicate: impl Fn(&LogEntry) -> bool) -> Vec<Arc<LogEntry>> {
        self.entries()
            .into_iter()
            .filter(|e| predicate(e))
            .collect()
    }
}
