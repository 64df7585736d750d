//! Renderers from a captured entry to text
//!
//! Formatters are pure: they never fail and never touch the entry. They
//! run only when a sink is attached.

mod json;
mod minimal;
mod plain;
mod verbose;

pub use json::JsonLogFormatter;
pub use minimal::MinimalPlainTextLogFormatter;
pub use plain::PlainTextLogFormatter;
pub use verbose::VerbosePlainTextLogFormatter;

use crate::config::OutputFormat;
use crate::entry::LogEntry;
use std::sync::Arc;

/// Renders an entry for a sink
pub trait LogFormatter: Send + Sync {
    fn format(&self, entry: &LogEntry) -> String;
}

/// Formatter selected by `format` when none is configured explicitly
pub fn default_formatter(format: OutputFormat) -> Arc<dyn LogFormatter> {
    match format {
        OutputFormat::PlainText => Arc::new(PlainTextLogFormatter),
        OutputFormat::Json => Arc::new(JsonLogFormatter),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::entry::{ExceptionInfo, LogEntry, Properties};
    use chrono::{TimeZone, Utc};
    use logspy_core_types::{EventId, LogLevel};

    pub(crate) fn bare() -> LogEntry {
        LogEntry::new(LogLevel::Information, "Payments", "Payment success")
            .with_thread_id(4)
            .with_timestamp(Utc.with_ymd_and_hms(2025, 2, 23, 12, 34, 56).unwrap())
    }

    pub(crate) fn full() -> LogEntry {
        let mut properties = Properties::new();
        properties.insert("OrderId", 42);
        bare()
            .with_event_id(EventId::named(3, "Paid"))
            .with_correlation_id("corr-1")
            .with_task_id(Some(9))
            .with_trace(Some("t-1".to_string()), Some("s-1".to_string()))
            .with_scopes(vec!["Request".to_string(), "Checkout".to_string()])
            .with_properties(properties)
            .with_exception(ExceptionInfo::new("IoError", "disk gone"))
    }
}
