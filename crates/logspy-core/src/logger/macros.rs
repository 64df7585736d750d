//! Structured logging macros
//!
//! Each macro checks `is_enabled` first, so the template is not parsed and
//! no argument is evaluated for a disabled level. Arguments bind
//! positionally to the template's `{Name}` holes and must implement
//! `serde::Serialize`.

/// Log a message template at an explicit level
///
/// # Example
///
/// ```
/// # use std::sync::Arc;
/// # use logspy_core::config::{LevelMap, LoggerOptions};
/// # use logspy_core::{log_at, CaptureService, LogLevel, LoggerFactory};
/// let capture = Arc::new(CaptureService::new());
/// let factory = LoggerFactory::new(capture.clone(), LevelMap::new(LogLevel::Trace), LoggerOptions::default());
/// let logger = factory.create_logger("Orders");
///
/// log_at!(logger, LogLevel::Information, "Order {OrderId} shipped to {City}", 17, "Oslo");
///
/// let entry = &capture.entries()[0];
/// assert_eq!(entry.message, "Order 17 shipped to Oslo");
/// assert_eq!(entry.properties["city"], "Oslo");
/// ```
///
/// An error value is attached with `error = <expr>`, and an already built
/// `ExceptionInfo` with `exception = <expr>`:
///
/// ```
/// # use std::sync::Arc;
/// # use logspy_core::config::{LevelMap, LoggerOptions};
/// # use logspy_core::{log_at, CaptureService, LogLevel, LoggerFactory};
/// # let capture = Arc::new(CaptureService::new());
/// # let factory = LoggerFactory::new(capture.clone(), LevelMap::new(LogLevel::Trace), LoggerOptions::default());
/// # let logger = factory.create_logger("Orders");
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// log_at!(logger, LogLevel::Error, error = err, "Write failed");
///
/// assert!(capture.entries()[0].exception.is_some());
/// ```
///
/// # Panics
///
/// Panics if a rule rejects the entry while the capture service is in
/// `ImmediateFail` mode
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, error = $err:expr, $template:literal $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(
                level,
                $crate::EventId::default(),
                $crate::state::LogState::template(
                    $template,
                    vec![$($crate::state::to_property_value(&$arg)),*],
                ),
                Some($crate::ExceptionInfo::from(&$err)),
            );
        }
    }};
    ($logger:expr, $level:expr, exception = $info:expr, $template:literal $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            let info: $crate::ExceptionInfo = $info;
            logger.log(
                level,
                $crate::EventId::default(),
                $crate::state::LogState::template(
                    $template,
                    vec![$($crate::state::to_property_value(&$arg)),*],
                ),
                Some(info),
            );
        }
    }};
    ($logger:expr, $level:expr, $template:literal $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(
                level,
                $crate::EventId::default(),
                $crate::state::LogState::template(
                    $template,
                    vec![$($crate::state::to_property_value(&$arg)),*],
                ),
                None,
            );
        }
    }};
}

/// Log at `Trace`; see [`log_at!`]
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Trace, $($rest)+)
    };
}

/// Log at `Debug`; see [`log_at!`]
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Debug, $($rest)+)
    };
}

/// Log at `Information`; see [`log_at!`]
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Information, $($rest)+)
    };
}

/// Log at `Warning`; see [`log_at!`]
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Warning, $($rest)+)
    };
}

/// Log at `Error`; see [`log_at!`]
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Error, $($rest)+)
    };
}

/// Log at `Critical`; see [`log_at!`]
#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_at!($logger, $crate::LogLevel::Critical, $($rest)+)
    };
}
