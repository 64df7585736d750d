use crate::entry::LogEntry;
use crate::format::LogFormatter;

/// Minimal output plus thread id, trace/span ids and a scopes line
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextLogFormatter;

impl LogFormatter for PlainTextLogFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        let mut out = format!("[{}] ({}) {}", entry.level, entry.category, entry.message);

        if !entry.correlation_id.is_empty() {
            out.push_str(&format!(" | CorrId: {}", entry.correlation_id));
        }

        out.push_str(&format!(" | Thread:{}", entry.thread_id));

        if let Some(trace_id) = entry.trace_id.as_deref().filter(|t| !t.is_empty()) {
            out.push_str(&format!(
                " | TraceId:{} SpanId:{}",
                trace_id,
                entry.span_id.as_deref().unwrap_or_default()
            ));
        }

        if !entry.scopes.is_empty() {
            out.push_str(&format!("\nScopes: {}", entry.scopes.join(" => ")));
        }

        if let Some(exception) = &entry.exception {
            out.push_str(&format!("\nException: {}", exception));
        }

        out
    }
}
