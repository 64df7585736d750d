//! Read-only view of the ambient distributed-trace context
//!
//! Loggers ask a [`TraceSource`] for the current trace and span ids when
//! building an entry. Sources only read; they never open or close spans.

use tracing_subscriber::registry::{LookupSpan, Registry};

/// Trace and span ids active at log time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceIds {
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
}

/// Supplies the current trace/span ids, if any
pub trait TraceSource: Send + Sync {
    fn current(&self) -> TraceIds;
}

/// Reports no trace context
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTraceSource;

impl TraceSource for NoTraceSource {
    fn current(&self) -> TraceIds {
        TraceIds::default()
    }
}

/// Reads the current `tracing` span
///
/// The span id is the current span; the trace id is the root of the
/// current span's scope when the active subscriber is built on a
/// `tracing_subscriber::Registry`, otherwise the current span itself.
/// Outside any span both ids are absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSpanSource;

pub(crate) fn format_trace_id(raw: u64) -> String {
    format!("{:032x}", raw)
}

pub(crate) fn format_span_id(raw: u64) -> String {
    format!("{:016x}", raw)
}

impl TraceSource for TracingSpanSource {
    fn current(&self) -> TraceIds {
        let span = tracing::Span::current();
        let Some(id) = span.id() else {
            return TraceIds::default();
        };

        let root = tracing::dispatcher::get_default(|dispatch| {
            let registry = dispatch.downcast_ref::<Registry>()?;
            let span = registry.span(&id)?;
            let root = span.scope().from_root().next()?;
            Some(root.id().into_u64())
        });

        TraceIds {
            trace_id: Some(format_trace_id(root.unwrap_or_else(|| id.into_u64()))),
            span_id: Some(format_span_id(id.into_u64())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_span_means_no_ids() {
        assert_eq!(TracingSpanSource.current(), TraceIds::default());
        assert_eq!(NoTraceSource.current(), TraceIds::default());
    }

    #[test]
    fn test_root_span_is_trace_id() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let root = tracing::info_span!("request");
            let _root = root.enter();
            let child = tracing::info_span!("handler");
            let _child = child.enter();

            let ids = TracingSpanSource.current();
            let root_raw = root.id().unwrap().into_u64();
            let child_raw = child.id().unwrap().into_u64();

            assert_eq!(ids.trace_id, Some(format_trace_id(root_raw)));
            assert_eq!(ids.span_id, Some(format_span_id(child_raw)));
        });
    }
}
