use crate::entry::LogEntry;
use crate::rules::LogRule;

/// Flags entries whose category starts with a forbidden prefix
///
/// Prefix comparison ignores case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenCategoryRule {
    prefixes: Vec<String>,
}

impl ForbiddenCategoryRule {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        || text.to_lowercase().starts_with(&prefix.to_lowercase())
}

impl LogRule for ForbiddenCategoryRule {
    fn is_violated_by(&self, entry: &LogEntry) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| starts_with_ignore_case(&entry.category, prefix))
    }

    fn violation_message(&self) -> String {
        format!(
            "Category is forbidden. Forbidden categories: [{}].",
            self.prefixes.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logspy_core_types::LogLevel;

    #[test]
    fn test_prefix_match_ignores_case() {
        let rule = ForbiddenCategoryRule::new(["Legacy.Billing"]);
        let entry = LogEntry::new(LogLevel::Information, "legacy.billing.Invoices", "m");
        assert!(rule.is_violated_by(&entry));

        let other = LogEntry::new(LogLevel::Information, "Billing", "m");
        assert!(!rule.is_violated_by(&other));
    }

    #[test]
    fn test_empty_rule_never_fires() {
        let rule = ForbiddenCategoryRule::new(Vec::<String>::new());
        assert!(!rule.is_violated_by(&LogEntry::new(LogLevel::Error, "Any", "m")));
    }

    #[test]
    fn test_message_lists_prefixes() {
        let rule = ForbiddenCategoryRule::new(["A", "B"]);
        assert_eq!(
            rule.violation_message(),
            "Category is forbidden. Forbidden categories: [A, B]."
        );
    }
}
