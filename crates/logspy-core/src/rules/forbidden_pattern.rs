use crate::entry::LogEntry;
use crate::errors::{LogSpyError, Result};
use crate::rules::LogRule;
use regex::Regex;

/// Flags messages matching a regular expression
///
/// Options such as case-insensitivity are given as inline flags, e.g.
/// `(?i)forbidden`. Blank messages never match.
#[derive(Debug, Clone)]
pub struct ForbiddenPatternRule {
    regex: Regex,
}

impl ForbiddenPatternRule {
    /// Compile `pattern`
    ///
    /// # Errors
    /// * `InvalidPattern` - If `pattern` is not a valid regular expression
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| LogSpyError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl LogRule for ForbiddenPatternRule {
    fn is_violated_by(&self, entry: &LogEntry) -> bool {
        !entry.message.trim().is_empty() && self.regex.is_match(&entry.message)
    }

    fn violation_message(&self) -> String {
        format!(
            "Message matched forbidden regex pattern '{}'.",
            self.regex.as_str()
        )
    }
}
