//! Ordered severity scale for captured entries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log entry, ordered from least to most severe
///
/// `None` sits above every real severity. It is only meaningful as a
/// configured minimum, where it disables a category entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
    None,
}

impl LogLevel {
    /// All levels in ascending order
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Information,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::None,
    ];

    /// Canonical name, as rendered by formatters
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
            LogLevel::None => "None",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    value: String,
}

impl ParseLevelError {
    /// The rejected input
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level '{}'", self.value)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    /// Case-insensitive; accepts the short aliases `info`, `warn` and `fatal`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "information" | "info" => Ok(LogLevel::Information),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" | "fatal" => Ok(LogLevel::Critical),
            "none" => Ok(LogLevel::None),
            _ => Err(ParseLevelError {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ParseLevelError;

    fn try_from(value: String) -> Result<Self, ParseLevelError> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        for pair in LogLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_parse_accepts_aliases_and_case() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Information);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("Fatal".parse::<LogLevel>().unwrap(), LogLevel::Critical);
        assert_eq!(" error ".parse::<LogLevel>().unwrap(), LogLevel::Error);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.value(), "loud");
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for level in LogLevel::ALL {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&LogLevel::Warning).unwrap();
        assert_eq!(json, "\"Warning\"");

        let parsed: LogLevel = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(parsed, LogLevel::Information);
    }

    #[test]
    fn test_try_from_string() {
        assert_eq!(
            LogLevel::try_from("Critical".to_string()),
            Ok(LogLevel::Critical)
        );
        let err = LogLevel::try_from("silent".to_string()).unwrap_err();
        assert_eq!(err.value(), "silent");
    }
}
