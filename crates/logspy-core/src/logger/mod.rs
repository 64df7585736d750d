//! Per-category loggers and the factory that configures them
//!
//! A [`LoggerFactory`] holds the shared pipeline: capture service, level
//! map, options, formatter, optional sink and trace source. Each
//! [`StructuredLogger`] it creates resolves its minimum level once and
//! then builds one [`LogEntry`] per enabled call, stamped with the ambient
//! correlation id, scopes, thread, task and trace ids.

mod macros;

use crate::capture::CaptureService;
use crate::config::{LevelMap, LoggerConfig, LoggerOptions};
use crate::context::{
    current_task_id, current_thread_id, CorrelationContext, ScopeGuard, ScopeStack,
};
use crate::entry::{ExceptionInfo, LogEntry};
use crate::errors::Result;
use crate::format::{default_formatter, LogFormatter};
use crate::sink::LogSink;
use crate::state::{render_scope_label, LogState};
use crate::trace::{TraceIds, TraceSource, TracingSpanSource};
use chrono::Utc;
use logspy_core_types::schema::DIAGNOSTICS_TARGET;
use logspy_core_types::{EventId, LogLevel};
use std::sync::Arc;

#[derive(Clone)]
struct Pipeline {
    capture: Arc<CaptureService>,
    options: LoggerOptions,
    formatter: Arc<dyn LogFormatter>,
    sink: Option<Arc<dyn LogSink>>,
    trace_source: Arc<dyn TraceSource>,
}

/// Creates loggers that all feed one capture service
#[derive(Clone)]
pub struct LoggerFactory {
    levels: LevelMap,
    pipeline: Arc<Pipeline>,
}

impl LoggerFactory {
    /// Factory with the default formatter for `options.output_format`, no
    /// sink, and trace ids read from the current `tracing` span
    pub fn new(capture: Arc<CaptureService>, levels: LevelMap, options: LoggerOptions) -> Self {
        Self {
            levels,
            pipeline: Arc::new(Pipeline {
                capture,
                formatter: default_formatter(options.output_format),
                options,
                sink: None,
                trace_source: Arc::new(TracingSpanSource),
            }),
        }
    }

    /// Factory built from a deserialized configuration
    ///
    /// # Errors
    /// * `MissingDefaultLevel` - If the level map has no `Default` entry
    pub fn from_config(capture: Arc<CaptureService>, config: &LoggerConfig) -> Result<Self> {
        let levels = config.level_map()?;
        tracing::debug!(
            target: DIAGNOSTICS_TARGET,
            default_level = %levels.default_level(),
            scopes_enabled = config.options.scopes_enabled,
            "logger factory configured"
        );
        Ok(Self::new(capture, levels, config.options))
    }

    /// Replace the formatter used for sink output
    pub fn with_formatter(mut self, formatter: impl LogFormatter + 'static) -> Self {
        Arc::make_mut(&mut self.pipeline).formatter = Arc::new(formatter);
        self
    }

    /// Mirror every captured entry to `sink`
    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        Arc::make_mut(&mut self.pipeline).sink = Some(Arc::new(sink));
        self
    }

    pub fn with_trace_source(mut self, source: impl TraceSource + 'static) -> Self {
        Arc::make_mut(&mut self.pipeline).trace_source = Arc::new(source);
        self
    }

    pub fn capture(&self) -> &Arc<CaptureService> {
        &self.pipeline.capture
    }

    pub fn options(&self) -> LoggerOptions {
        self.pipeline.options
    }

    /// Logger for `category`, with its minimum level resolved now
    pub fn create_logger(&self, category: impl Into<String>) -> StructuredLogger {
        let category: String = category.into();
        let min_level = self.levels.min_level_for(&category);
        StructuredLogger {
            category: category.into(),
            min_level,
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl std::fmt::Debug for LoggerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerFactory")
            .field("levels", &self.levels)
            .field("options", &self.pipeline.options)
            .field("sink", &self.pipeline.sink.is_some())
            .finish()
    }
}

/// Logging endpoint for one category
#[derive(Clone)]
pub struct StructuredLogger {
    category: Arc<str>,
    min_level: LogLevel,
    pipeline: Arc<Pipeline>,
}

impl StructuredLogger {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Whether a call at `level` would produce an entry
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && level >= self.min_level
    }

    /// Log `state`, rendering the message from the state itself
    ///
    /// # Errors
    /// * `RuleViolation` - If a rule rejects the entry under `ImmediateFail`
    pub fn try_log(
        &self,
        level: LogLevel,
        event_id: EventId,
        state: impl Into<LogState>,
        error: Option<ExceptionInfo>,
    ) -> Result<()> {
        self.try_log_with(level, event_id, state, error, |state, _| state.to_string())
    }

    /// Log `state`, rendering the message with `formatter`
    ///
    /// Nothing happens, and `formatter` is not called, when `level` is not
    /// enabled for this logger.
    ///
    /// # Errors
    /// * `RuleViolation` - If a rule rejects the entry under `ImmediateFail`
    pub fn try_log_with<S, F>(
        &self,
        level: LogLevel,
        event_id: EventId,
        state: S,
        error: Option<ExceptionInfo>,
        formatter: F,
    ) -> Result<()>
    where
        S: Into<LogState>,
        F: FnOnce(&LogState, Option<&ExceptionInfo>) -> String,
    {
        if !self.is_enabled(level) {
            return Ok(());
        }

        let state = state.into();
        let message = formatter(&state, error.as_ref());
        let trace = self.pipeline.trace_source.current();
        self.capture(level, event_id, &state, message, error, trace)
    }

    /// Log with trace ids resolved by the caller instead of the factory's
    /// trace source
    ///
    /// Used by the `tracing` bridge, which reads the event's span from the
    /// layer context.
    ///
    /// # Errors
    /// * `RuleViolation` - If a rule rejects the entry under `ImmediateFail`
    pub(crate) fn try_log_traced(
        &self,
        level: LogLevel,
        state: LogState,
        error: Option<ExceptionInfo>,
        message: String,
        trace: TraceIds,
    ) -> Result<()> {
        if !self.is_enabled(level) {
            return Ok(());
        }
        self.capture(level, EventId::default(), &state, message, error, trace)
    }

    fn capture(
        &self,
        level: LogLevel,
        event_id: EventId,
        state: &LogState,
        message: String,
        error: Option<ExceptionInfo>,
        trace: TraceIds,
    ) -> Result<()> {
        let entry = Arc::new(self.build_entry(level, event_id, state, message, error, trace));

        self.pipeline.capture.add_entry(Arc::clone(&entry))?;

        if let Some(sink) = &self.pipeline.sink {
            sink.write(&self.pipeline.formatter.format(&entry));
        }
        Ok(())
    }

    /// Like [`try_log`](Self::try_log), failing the caller on a violation
    ///
    /// # Panics
    ///
    /// Panics with the violation messages if a rule rejects the entry
    /// under `ImmediateFail`
    pub fn log(
        &self,
        level: LogLevel,
        event_id: EventId,
        state: impl Into<LogState>,
        error: Option<ExceptionInfo>,
    ) {
        if let Err(err) = self.try_log(level, event_id, state, error) {
            panic!("{}", err);
        }
    }

    /// Like [`try_log_with`](Self::try_log_with), failing the caller on a violation
    ///
    /// # Panics
    ///
    /// Panics with the violation messages if a rule rejects the entry
    /// under `ImmediateFail`
    pub fn log_with<S, F>(
        &self,
        level: LogLevel,
        event_id: EventId,
        state: S,
        error: Option<ExceptionInfo>,
        formatter: F,
    ) where
        S: Into<LogState>,
        F: FnOnce(&LogState, Option<&ExceptionInfo>) -> String,
    {
        if let Err(err) = self.try_log_with(level, event_id, state, error, formatter) {
            panic!("{}", err);
        }
    }

    /// Open a scope labelled from `state` until the guard is dropped
    ///
    /// Returns a no-op guard when scopes are disabled or the label is empty.
    pub fn begin_scope(&self, state: impl Into<LogState>) -> ScopeGuard {
        if !self.pipeline.options.scopes_enabled {
            return ScopeGuard::noop();
        }
        let state = state.into();
        let label = render_scope_label(Some(&state));
        if label.is_empty() {
            return ScopeGuard::noop();
        }
        ScopeStack::push(label)
    }

    fn build_entry(
        &self,
        level: LogLevel,
        event_id: EventId,
        state: &LogState,
        message: String,
        error: Option<ExceptionInfo>,
        trace: TraceIds,
    ) -> LogEntry {
        let scopes = if self.pipeline.options.scopes_enabled {
            ScopeStack::snapshot()
        } else {
            Vec::new()
        };
        let correlation_id = CorrelationContext::current_id()
            .map(|id| id.into_string())
            .unwrap_or_default();
        let mut entry = LogEntry::new(level, self.category.as_ref(), message)
            .with_event_id(event_id)
            .with_scopes(scopes)
            .with_properties(state.properties())
            .with_correlation_id(correlation_id)
            .with_thread_id(current_thread_id())
            .with_task_id(current_task_id())
            .with_trace(trace.trace_id, trace.span_id)
            .with_timestamp(Utc::now());
        if let Some(error) = error {
            entry = entry.with_exception(error);
        }
        entry
    }
}

impl std::fmt::Debug for StructuredLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredLogger")
            .field("category", &self.category)
            .field("min_level", &self.min_level)
            .finish()
    }
}
