use crate::entry::LogEntry;
use crate::format::LogFormatter;
use serde_json::json;

/// One JSON object per entry carrying every field
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLogFormatter;

impl LogFormatter for JsonLogFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        serde_json::to_string(entry).unwrap_or_else(|err| {
            json!({
                "level": entry.level.as_str(),
                "category": entry.category,
                "message": entry.message,
                "format_error": err.to_string(),
            })
            .to_string()
        })
    }
}
