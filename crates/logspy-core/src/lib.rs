//! LogSpy Core - in-memory log capture and assertion engine for tests
//!
//! This crate intercepts structured log output produced while a test runs,
//! keeps every entry in memory, and checks each one against user-registered
//! rules:
//! - Per-category loggers that stamp entries with correlation, scope,
//!   thread, task and trace metadata taken from the ambient context
//! - A thread-safe capture service with deferred or immediate rule failure
//! - Rule variants for common log policies (errors without an exception,
//!   forbidden categories, patterns, exception types, level ceilings)
//! - Formatters and sinks for mirroring captured entries to test output
//! - A `tracing` bridge so code using `tracing` macros is captured too
//!
//! # Async code
//!
//! Correlation and scope guards change the context of the current chain.
//! On a plain thread that is the thread itself. Inside an async runtime,
//! guards held across `.await` require the future to run under
//! [`ContextFutureExt::in_current_context`]; an unwrapped future shares its
//! worker thread's context with every sibling task polled there.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use logspy_core::config::{LevelMap, LoggerOptions};
//! use logspy_core::rules::ErrorWithoutExceptionRule;
//! use logspy_core::{log_error, CaptureService, LogLevel, LoggerFactory};
//!
//! let capture = Arc::new(CaptureService::new());
//! capture.add_rule(ErrorWithoutExceptionRule::new(LogLevel::Error));
//!
//! let factory = LoggerFactory::new(
//!     capture.clone(),
//!     LevelMap::new(LogLevel::Debug),
//!     LoggerOptions::default(),
//! );
//! let logger = factory.create_logger("Payments");
//!
//! log_error!(logger, "Payment {PaymentId} failed", 42);
//!
//! assert_eq!(capture.entries().len(), 1);
//! assert_eq!(capture.violations().len(), 1);
//! ```

pub mod bridge;
pub mod capture;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod entry;
pub mod errors;
pub mod format;
pub mod logger;
pub mod rules;
pub mod sink;
pub mod state;
pub mod trace;

// Re-export commonly used types
pub use capture::{CaptureService, ViolationMode};
pub use context::{AmbientContext, ContextFutureExt, CorrelationContext, ScopeStack};
pub use entry::{ExceptionInfo, LogEntry, Properties};
pub use errors::{ErrorKind, LogSpyError, Result};
pub use logger::{LoggerFactory, StructuredLogger};
pub use logspy_core_types::{CorrelationId, EventId, LogLevel};
pub use rules::LogRule;
pub use state::LogState;
