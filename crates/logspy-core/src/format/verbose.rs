use crate::entry::LogEntry;
use crate::format::LogFormatter;
use crate::state::display_value;
use chrono::SecondsFormat;

const SEPARATOR_WIDTH: usize = 50;

/// Multi-line dump of every field, ending with a separator line
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbosePlainTextLogFormatter;

impl LogFormatter for VerbosePlainTextLogFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        let mut out = String::new();

        // 2025-02-23T12:34:56.000000Z [Information] (Payments) message
        out.push_str(&format!(
            "{} [{}] ({}) {}\n",
            entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            entry.level,
            entry.category,
            entry.message
        ));

        if !entry.correlation_id.trim().is_empty() {
            out.push_str(&format!("CorrId: {}\n", entry.correlation_id));
        }
        let task = entry
            .task_id
            .map(|t| t.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&format!("Thread: {} (TaskId: {})\n", entry.thread_id, task));

        if let Some(trace_id) = entry.trace_id.as_deref().filter(|t| !t.trim().is_empty()) {
            out.push_str(&format!("TraceId: {}\n", trace_id));
            out.push_str(&format!(
                "SpanId:  {}\n",
                entry.span_id.as_deref().unwrap_or_default()
            ));
        }

        if !entry.scopes.is_empty() {
            out.push_str("Scopes:\n");
            for scope in &entry.scopes {
                out.push_str(&format!("  => {}\n", scope));
            }
        }

        if let Some(exception) = &entry.exception {
            out.push_str("Exception:\n");
            out.push_str(&format!("{}\n", exception));
        }

        if !entry.properties.is_empty() {
            out.push_str("Properties:\n");
            for (key, value) in entry.properties.iter() {
                out.push_str(&format!("  {}: {}\n", key, display_value(value)));
            }
        }

        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_bare_entry_reports_missing_task() {
        let out = VerbosePlainTextLogFormatter.format(&fixtures::bare());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "2025-02-23T12:34:56.000000Z [Information] (Payments) Payment success"
        );
        assert_eq!(lines[1], "Thread: 4 (TaskId: N/A)");
        assert_eq!(lines[2], "-".repeat(50));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_full_entry_dumps_everything() {
        let out = VerbosePlainTextLogFormatter.format(&fixtures::full());
        assert!(out.contains("CorrId: corr-1\n"));
        assert!(out.contains("Thread: 4 (TaskId: 9)\n"));
        assert!(out.contains("TraceId: t-1\nSpanId:  s-1\n"));
        assert!(out.contains("Scopes:\n  => Request\n  => Checkout\n"));
        assert!(out.contains("Exception:\nIoError: disk gone\n"));
        assert!(out.contains("Properties:\n  OrderId: 42\n"));
        assert!(out.ends_with(&format!("{}\n", "-".repeat(50))));
    }
}
