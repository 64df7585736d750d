use logspy_core_types::ParseLevelError;
use thiserror::Error;

/// Result type alias using LogSpyError
pub type Result<T> = std::result::Result<T, LogSpyError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code so tests can assert on the kind
/// of failure rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // Configuration
    MissingDefaultLevel,
    InvalidLevel,
    InvalidPattern,
    InvalidConfig,

    // Integration/IO
    Io,
    Init,

    // Rule evaluation
    RuleViolation,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingDefaultLevel => "ERR_MISSING_DEFAULT_LEVEL",
            ErrorKind::InvalidLevel => "ERR_INVALID_LEVEL",
            ErrorKind::InvalidPattern => "ERR_INVALID_PATTERN",
            ErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ErrorKind::Io => "ERR_IO",
            ErrorKind::Init => "ERR_INIT",
            ErrorKind::RuleViolation => "ERR_RULE_VIOLATION",
        }
    }

    /// Configuration errors are fatal at construction time
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ErrorKind::MissingDefaultLevel
                | ErrorKind::InvalidLevel
                | ErrorKind::InvalidPattern
                | ErrorKind::InvalidConfig
        )
    }
}

/// Error taxonomy for LogSpy operations
#[derive(Error, Debug)]
pub enum LogSpyError {
    // ===== Configuration Errors =====
    /// Level map has no `Default` entry
    #[error("Log level configuration must contain a '{key}' entry")]
    MissingDefaultLevel { key: &'static str },

    /// Level name could not be parsed
    #[error("Invalid log level: {value}")]
    InvalidLevel { value: String },

    /// Rule pattern is not a valid regular expression
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Configuration document could not be read
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Integration Errors =====
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A runtime component could not be started, such as the global
    /// subscriber or a background sink worker
    #[error("Failed to initialize: {reason}")]
    Init { reason: String },

    // ===== Rule Evaluation =====
    /// One or more rules rejected an entry while in immediate-fail mode
    #[error("Immediate rule violation: {}", .violations.join("\n"))]
    RuleViolation { violations: Vec<String> },
}

impl LogSpyError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogSpyError::MissingDefaultLevel { .. } => ErrorKind::MissingDefaultLevel,
            LogSpyError::InvalidLevel { .. } => ErrorKind::InvalidLevel,
            LogSpyError::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            LogSpyError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            LogSpyError::Io(_) => ErrorKind::Io,
            LogSpyError::Init { .. } => ErrorKind::Init,
            LogSpyError::RuleViolation { .. } => ErrorKind::RuleViolation,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Violation messages carried by a `RuleViolation`; empty otherwise
    pub fn violations(&self) -> &[String] {
        match self {
            LogSpyError::RuleViolation { violations } => violations,
            _ => &[],
        }
    }
}

impl From<ParseLevelError> for LogSpyError {
    fn from(err: ParseLevelError) -> Self {
        LogSpyError::InvalidLevel {
            value: err.value().to_string(),
        }
    }
}

impl From<toml::de::Error> for LogSpyError {
    fn from(err: toml::de::Error) -> Self {
        LogSpyError::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logspy_core_types::LogLevel;

    #[test]
    fn test_rule_violation_display_joins_lines() {
        let err = LogSpyError::RuleViolation {
            violations: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "Immediate rule violation: first\nsecond");
        assert_eq!(err.violations().len(), 2);
        assert_eq!(err.code(), "ERR_RULE_VIOLATION");
    }

    #[test]
    fn test_parse_error_converts_to_invalid_level() {
        let parse_err = "shouting".parse::<LogLevel>().unwrap_err();
        let err: LogSpyError = parse_err.into();
        assert_eq!(err.kind(), ErrorKind::InvalidLevel);
        assert!(err.kind().is_configuration());
        assert!(err.violations().is_empty());
    }

    #[test]
    fn test_init_message_names_the_failed_component() {
        let err = LogSpyError::Init {
            reason: "failed to spawn sink worker: out of threads".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to initialize: failed to spawn sink worker: out of threads"
        );
        assert_eq!(err.code(), "ERR_INIT");
        assert!(!err.kind().is_configuration());
    }

    #[test]
    fn test_io_is_not_configuration() {
        let err: LogSpyError = std::io::Error::other("closed").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!err.kind().is_configuration());
    }
}
