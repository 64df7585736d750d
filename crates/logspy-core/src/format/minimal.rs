use crate::entry::LogEntry;
use crate::format::LogFormatter;

/// Level, category, message, plus correlation id and exception when present
///
/// `[Information] (Payments) Payment success [Corr=abc]`
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalPlainTextLogFormatter;

impl LogFormatter for MinimalPlainTextLogFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        let mut out = format!("[{}] ({}) {}", entry.level, entry.category, entry.message);

        if !entry.correlation_id.trim().is_empty() {
            out.push_str(&format!(" [Corr={}]", entry.correlation_id));
        }

        if let Some(exception) = &entry.exception {
            out.push_str(&format!("\nException: {}", exception));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_bare_entry_is_single_line() {
        let out = MinimalPlainTextLogFormatter.format(&fixtures::bare());
        assert_eq!(out, "[Information] (Payments) Payment success");
    }

    #[test]
    fn test_correlation_and_exception_are_appended() {
        let out = MinimalPlainTextLogFormatter.format(&fixtures::full());
        assert_eq!(
            out,
            "[Information] (Payments) Payment success [Corr=corr-1]\nException: IoError: disk gone"
        );
    }
}
