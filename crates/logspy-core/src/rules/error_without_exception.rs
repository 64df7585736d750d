use crate::entry::LogEntry;
use crate::rules::LogRule;
use logspy_core_types::LogLevel;

/// Flags entries at or above `threshold` that carry no exception
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorWithoutExceptionRule {
    threshold: LogLevel,
}

impl ErrorWithoutExceptionRule {
    pub fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }
}

impl Default for ErrorWithoutExceptionRule {
    fn default() -> Self {
        Self::new(LogLevel::Error)
    }
}

impl LogRule for ErrorWithoutExceptionRule {
    fn is_violated_by(&self, entry: &LogEntry) -> bool {
        entry.level >= self.threshold && entry.exception.is_none()
    }

    fn violation_message(&self) -> String {
        format!(
            "Error-level log without an attached exception (level >= {}).",
            self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ExceptionInfo;

    #[test]
    fn test_below_threshold_is_fine() {
        let rule = ErrorWithoutExceptionRule::default();
        assert!(!rule.is_violated_by(&LogEntry::new(LogLevel::Warning, "c", "m")));
    }

    #[test]
    fn test_at_or_above_threshold_requires_exception() {
        let rule = ErrorWithoutExceptionRule::new(LogLevel::Error);
        assert!(rule.is_violated_by(&LogEntry::new(LogLevel::Error, "c", "m")));
        assert!(rule.is_violated_by(&LogEntry::new(LogLevel::Critical, "c", "m")));

        let with_exception = LogEntry::new(LogLevel::Critical, "c", "m")
            .with_exception(ExceptionInfo::new("IoError", "boom"));
        assert!(!rule.is_violated_by(&with_exception));
    }

    #[test]
    fn test_message_names_threshold() {
        let rule = ErrorWithoutExceptionRule::new(LogLevel::Warning);
        assert_eq!(
            rule.violation_message(),
            "Error-level log without an attached exception (level >= Warning)."
        );
    }
}
