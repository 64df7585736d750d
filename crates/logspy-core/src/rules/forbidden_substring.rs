use crate::entry::LogEntry;
use crate::rules::LogRule;

/// Flags messages containing a substring, ignoring case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenSubstringRule {
    substring: String,
    lowered: String,
}

impl ForbiddenSubstringRule {
    pub fn new(substring: impl Into<String>) -> Self {
        let substring = substring.into();
        Self {
            lowered: substring.to_lowercase(),
            substring,
        }
    }
}

impl LogRule for ForbiddenSubstringRule {
    fn is_violated_by(&self, entry: &LogEntry) -> bool {
        entry.message.to_lowercase().contains(&self.lowered)
    }

    fn violation_message(&self) -> String {
        format!("Message contains forbidden substring '{}'.", self.substring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logspy_core_types::LogLevel;

    #[test]
    fn test_substring_match_ignores_case() {
        let rule = ForbiddenSubstringRule::new("Forbidden");
        assert!(rule.is_violated_by(&LogEntry::new(LogLevel::Debug, "c", "a FORBIDDEN word")));
        assert!(!rule.is_violated_by(&LogEntry::new(LogLevel::Debug, "c", "allowed")));
    }
}
