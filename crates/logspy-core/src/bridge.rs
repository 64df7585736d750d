//! Bridge from `tracing` events into the capture pipeline
//!
//! [`CaptureLayer`] is a `tracing_subscriber::Layer`. Every event it sees
//! becomes a log call on a logger from the wrapped [`LoggerFactory`], with
//! the event target as category. The `message` field becomes the message,
//! an `error` field recorded as `dyn Error` becomes the exception, and the
//! remaining fields become structured properties. Trace and span ids come
//! from the span the event was recorded in.
//!
//! Errors arrive type-erased, so a bridged exception carries only the
//! `dyn Error` tag. `ForbiddenExceptionTypeRule::forbid::<T>()` therefore
//! never matches an error logged through `tracing`; log it through a
//! [`StructuredLogger`] with `ExceptionInfo::from_error` to keep its type.

use crate::entry::ExceptionInfo;
use crate::errors::{LogSpyError, Result};
use crate::logger::{LoggerFactory, StructuredLogger};
use crate::state::LogState;
use crate::trace::{format_span_id, format_trace_id, TraceIds};
use logspy_core_types::schema::{DIAGNOSTICS_TARGET, FIELD_ERROR, FIELD_MESSAGE};
use logspy_core_types::LogLevel;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    exception: Option<ExceptionInfo>,
    fields: Vec<(String, Value)>,
}

impl FieldVisitor {
    fn record(&mut self, field: &Field, value: Value) {
        if field.name() == FIELD_MESSAGE {
            self.message = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record(field, Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        if field.name() == FIELD_ERROR && self.exception.is_none() {
            self.exception = Some(ExceptionInfo::from_dyn(value));
        } else {
            self.record(field, Value::String(value.to_string()));
        }
    }
}

fn map_level(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Information,
        Level::WARN => LogLevel::Warning,
        _ => LogLevel::Error,
    }
}

/// Layer that captures `tracing` events through a [`LoggerFactory`]
///
/// Events whose target starts with `logspy` are skipped so the crate's own
/// diagnostics never feed back into the capture. Bridged exceptions are
/// tagged `dyn Error` only, so `ForbiddenExceptionTypeRule::forbid::<T>()`
/// does not match them (see the module docs).
///
/// # Panics
///
/// Panics at the `tracing` call site if a rule rejects an event while the
/// capture service is in `ImmediateFail` mode.
pub struct CaptureLayer {
    factory: LoggerFactory,
    loggers: Mutex<HashMap<String, StructuredLogger>>,
}

impl CaptureLayer {
    pub fn new(factory: LoggerFactory) -> Self {
        Self {
            factory,
            loggers: Mutex::new(HashMap::new()),
        }
    }

    fn logger_for(&self, category: &str) -> StructuredLogger {
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        loggers
            .entry(category.to_string())
            .or_insert_with(|| self.factory.create_logger(category))
            .clone()
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(DIAGNOSTICS_TARGET) {
            return;
        }

        let logger = self.logger_for(metadata.target());
        let level = map_level(metadata.level());
        if !logger.is_enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let message = visitor.message.take().unwrap_or_default();
        let trace = event_trace_ids(event, &ctx);

        if let Err(err) = logger.try_log_traced(
            level,
            LogState::from(visitor.fields),
            visitor.exception,
            message,
            trace,
        ) {
            panic!("{}", err);
        }
    }
}

/// Trace ids of the span an event was recorded in
///
/// Read from the layer context, since the dispatcher is not reachable
/// through `Span::current()` while an event is being dispatched.
fn event_trace_ids<S>(event: &tracing::Event<'_>, ctx: &Context<'_, S>) -> TraceIds
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let Some(span) = ctx.event_span(event) else {
        return TraceIds::default();
    };
    let span_id = span.id().into_u64();
    let root_id = span
        .scope()
        .from_root()
        .next()
        .map(|root| root.id().into_u64())
        .unwrap_or(span_id);

    TraceIds {
        trace_id: Some(format_trace_id(root_id)),
        span_id: Some(format_span_id(span_id)),
    }
}

impl std::fmt::Debug for CaptureLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureLayer")
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

/// Install a global subscriber that routes every `tracing` event into
/// `factory`
///
/// # Errors
/// * `Init` - If a global subscriber is already set
pub fn install(factory: LoggerFactory) -> Result<()> {
    tracing_subscriber::registry()
        .with(CaptureLayer::new(factory))
        .try_init()
        .map_err(|err| LogSpyError::Init {
            reason: format!("failed to install subscriber: {}", err),
        })
}
