use crate::entry::LogEntry;
use crate::rules::LogRule;

/// Flags entries whose exception carries a forbidden type tag
///
/// A tag matches the error's concrete type or any family it was declared
/// to belong to with `ExceptionInfo::with_kind`, which stands in for
/// subtype matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForbiddenExceptionTypeRule {
    forbidden: Vec<String>,
}

impl ForbiddenExceptionTypeRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbid errors of type `T`
    pub fn forbid<T: ?Sized + 'static>(self) -> Self {
        self.forbid_kind(std::any::type_name::<T>())
    }

    /// Forbid errors tagged with `kind`
    pub fn forbid_kind(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        if !self.forbidden.contains(&kind) {
            self.forbidden.push(kind);
        }
        self
    }
}

fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

impl LogRule for ForbiddenExceptionTypeRule {
    fn is_violated_by(&self, entry: &LogEntry) -> bool {
        let Some(exception) = &entry.exception else {
            return false;
        };
        self.forbidden.iter().any(|kind| exception.is_kind(kind))
    }

    fn violation_message(&self) -> String {
        let names: Vec<&str> = self.forbidden.iter().map(|k| short_name(k)).collect();
        format!(
            "An exception of forbidden type was logged: {}",
            names.join(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ExceptionInfo;
    use logspy_core_types::LogLevel;

    #[test]
    fn test_concrete_type_matches() {
        let rule = ForbiddenExceptionTypeRule::new().forbid::<std::io::Error>();
        let io = std::io::Error::other("gone");
        let entry =
            LogEntry::new(LogLevel::Error, "c", "m").with_exception(ExceptionInfo::from_error(&io));
        assert!(rule.is_violated_by(&entry));
    }

    #[test]
    fn test_declared_family_matches() {
        let rule = ForbiddenExceptionTypeRule::new().forbid_kind("TransientError");
        let entry = LogEntry::new(LogLevel::Error, "c", "m")
            .with_exception(ExceptionInfo::new("TimeoutError", "slow").with_kind("TransientError"));
        assert!(rule.is_violated_by(&entry));
    }

    #[test]
    fn test_no_exception_never_fires() {
        let rule = ForbiddenExceptionTypeRule::new().forbid::<std::io::Error>();
        assert!(!rule.is_violated_by(&LogEntry::new(LogLevel::Error, "c", "m")));
    }

    #[test]
    fn test_message_uses_short_names() {
        let rule = ForbiddenExceptionTypeRule::new()
            .forbid::<std::io::Error>()
            .forbid_kind("TransientError");
        assert_eq!(
            rule.violation_message(),
            "An exception of forbidden type was logged: Error,TransientError"
        );
    }
}
