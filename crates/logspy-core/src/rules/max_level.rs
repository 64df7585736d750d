use crate::entry::LogEntry;
use crate::rules::LogRule;
use logspy_core_types::LogLevel;

/// Flags entries more severe than the configured ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLevelRule {
    ceiling: LogLevel,
}

impl MaxLevelRule {
    pub fn new(ceiling: LogLevel) -> Self {
        Self { ceiling }
    }
}

impl LogRule for MaxLevelRule {
    fn is_violated_by(&self, entry: &LogEntry) -> bool {
        entry.level > self.ceiling
    }

    fn violation_message(&self) -> String {
        format!(
            "Log level exceeded the maximum allowed level of '{}'.",
            self.ceiling
        )
    }
}
