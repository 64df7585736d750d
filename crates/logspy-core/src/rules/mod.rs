//! Rules evaluated against every captured entry
//!
//! A rule is a pure predicate over a [`LogEntry`] plus a fixed violation
//! message that reflects its configuration. Rules hold configuration only,
//! never per-entry state, so one instance can be shared across threads.

mod error_without_exception;
mod exception_type;
mod forbidden_category;
mod forbidden_pattern;
mod forbidden_substring;
mod max_level;

pub use error_without_exception::ErrorWithoutExceptionRule;
pub use exception_type::ForbiddenExceptionTypeRule;
pub use forbidden_category::ForbiddenCategoryRule;
pub use forbidden_pattern::ForbiddenPatternRule;
pub use forbidden_substring::ForbiddenSubstringRule;
pub use max_level::MaxLevelRule;

use crate::entry::LogEntry;

/// Predicate over a captured entry
pub trait LogRule: Send + Sync {
    /// Whether `entry` breaks this rule
    fn is_violated_by(&self, entry: &LogEntry) -> bool;

    /// Message recorded when the rule is broken
    fn violation_message(&self) -> String;
}
