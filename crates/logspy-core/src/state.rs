//! Log call state and message templates
//!
//! The state handed to a log call is either a sequence of named structured
//! values (optionally paired with the message template they were bound
//! from) or an opaque renderable value. Property extraction and message
//! rendering are pure functions over that variant.

use crate::entry::Properties;
use logspy_core_types::schema::NULL_VALUE_TEXT;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// State passed to a log call
#[derive(Debug, Clone, PartialEq)]
pub enum LogState {
    /// Named structured values, in the order they were supplied
    Fields(StructuredFields),
    /// Anything else, already rendered to text
    Opaque(String),
}

impl LogState {
    /// Bind `args` positionally to the holes of `template`
    pub fn template(template: &str, args: Vec<Value>) -> Self {
        LogState::Fields(MessageTemplate::parse(template).bind(args))
    }

    /// Structured properties carried by this state
    ///
    /// Opaque state carries none. Later duplicates of a key overwrite
    /// earlier ones.
    pub fn properties(&self) -> Properties {
        match self {
            LogState::Fields(fields) => fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            LogState::Opaque(_) => Properties::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LogState::Fields(fields) => fields.is_empty(),
            LogState::Opaque(text) => text.is_empty(),
        }
    }
}

impl fmt::Display for LogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogState::Fields(fields) => write!(f, "{}", fields),
            LogState::Opaque(text) => f.write_str(text),
        }
    }
}

impl From<&str> for LogState {
    fn from(text: &str) -> Self {
        LogState::Opaque(text.to_string())
    }
}

impl From<String> for LogState {
    fn from(text: String) -> Self {
        LogState::Opaque(text)
    }
}

impl From<StructuredFields> for LogState {
    fn from(fields: StructuredFields) -> Self {
        LogState::Fields(fields)
    }
}

impl<K: Into<String>> From<Vec<(K, Value)>> for LogState {
    fn from(pairs: Vec<(K, Value)>) -> Self {
        LogState::Fields(StructuredFields::new(pairs))
    }
}

/// Ordered key/value pairs, optionally rendered through a template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredFields {
    template: Option<MessageTemplate>,
    values: Vec<Value>,
    fields: Vec<(String, Value)>,
}

impl StructuredFields {
    pub fn new<K: Into<String>>(pairs: Vec<(K, Value)>) -> Self {
        Self {
            template: None,
            values: Vec::new(),
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn template(&self) -> Option<&MessageTemplate> {
        self.template.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.template.is_none()
    }
}

impl fmt::Display for StructuredFields {
    /// Templates render with their bound values; bare fields render as
    /// `key: value` pairs joined by `, `
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.template {
            Some(template) => f.write_str(&template.render(&self.values)),
            None => {
                let rendered: Vec<String> = self
                    .fields
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, display_value(v)))
                    .collect();
                f.write_str(&rendered.join(", "))
            }
        }
    }
}

// ========== Templates ==========

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Hole { name: String, raw: String },
}

/// Parsed message template such as `"User {UserId} logged in"`
///
/// `{{` and `}}` escape literal braces. A hole may carry a format or
/// alignment suffix (`{Elapsed:0.00}`, `{Name,10}`); the suffix is not part
/// of the property name. An unterminated `{` is kept as literal text.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => match raw[start..].find('}') {
                    Some(len) => {
                        let hole = &raw[start..start + len + 1];
                        let inner = &hole[1..hole.len() - 1];
                        let name = inner
                            .split([':', ','])
                            .next()
                            .unwrap_or_default()
                            .trim()
                            .to_string();
                        if !literal.is_empty() {
                            segments.push(Segment::Literal(std::mem::take(&mut literal)));
                        }
                        segments.push(Segment::Hole {
                            name,
                            raw: hole.to_string(),
                        });
                        while let Some(&(idx, _)) = chars.peek() {
                            if idx > start + len {
                                break;
                            }
                            chars.next();
                        }
                    }
                    None => literal.push('{'),
                },
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The template text as written
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Hole names in order of appearance
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Hole { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render with `values` bound positionally; unbound holes stay verbatim
    pub fn render(&self, values: &[Value]) -> String {
        let mut out = String::with_capacity(self.raw.len());
        let mut position = 0;
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Hole { raw, .. } => {
                    match values.get(position) {
                        Some(value) => out.push_str(&display_value(value)),
                        None => out.push_str(raw),
                    }
                    position += 1;
                }
            }
        }
        out
    }

    /// Pair hole names with `args`; surplus arguments are dropped
    pub fn bind(self, args: Vec<Value>) -> StructuredFields {
        let fields = self
            .names()
            .zip(args.iter())
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        StructuredFields {
            template: Some(self),
            values: args,
            fields,
        }
    }
}

// ========== Values ==========

/// Render a structured value the way it appears inside a message
///
/// Strings render without quotes and null renders as `(null)`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => NULL_VALUE_TEXT.to_string(),
        other => other.to_string(),
    }
}

/// Convert any serializable argument into a structured value
///
/// Values that fail to serialize fall back to null rather than failing the
/// log call.
pub fn to_property_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Render scope state as a label
///
/// Bare key/value state renders as `key: value` pairs joined by `, `,
/// anything else uses its string form, and absent state renders empty.
pub fn render_scope_label(state: Option<&LogState>) -> String {
    state.map(|s| s.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_template_binds_names_positionally() {
        let state = LogState::template(
            "User {UserId} logged in from {IPAddress}",
            vec![Value::from(123), Value::from("10.0.0.1")],
        );

        assert_eq!(state.to_string(), "User 123 logged in from 10.0.0.1");
        let props = state.properties();
        assert_eq!(props["userid"], Value::from(123));
        assert_eq!(props["IPAddress"], Value::from("10.0.0.1"));
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let template = MessageTemplate::parse("{{literal}} {Value}");
        assert_eq!(template.names().collect::<Vec<_>>(), vec!["Value"]);
        assert_eq!(template.render(&[Value::from(5)]), "{literal} 5");
    }

    #[test]
    fn test_format_suffix_is_not_part_of_name() {
        let template = MessageTemplate::parse("took {Elapsed:0.00}ms for {Name,10}");
        assert_eq!(
            template.names().collect::<Vec<_>>(),
            vec!["Elapsed", "Name"]
        );
    }

    #[test]
    fn test_missing_arguments_keep_hole_text() {
        let template = MessageTemplate::parse("{A} and {B}");
        assert_eq!(template.render(&[Value::from("x")]), "x and {B}");
    }

    #[test]
    fn test_unterminated_brace_is_literal() {
        let template = MessageTemplate::parse("open { brace");
        assert_eq!(template.names().count(), 0);
        assert_eq!(template.render(&[]), "open { brace");
    }

    #[test]
    fn test_surplus_arguments_are_ignored() {
        let fields =
            MessageTemplate::parse("only {One}").bind(vec![Value::from(1), Value::from(2)]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.to_string(), "only 1");
    }

    #[test]
    fn test_scope_label_rendering() {
        let mapping = LogState::from(vec![
            ("OrderId", Value::from(7)),
            ("Region", Value::from("eu")),
        ]);
        assert_eq!(render_scope_label(Some(&mapping)), "OrderId: 7, Region: eu");
        assert_eq!(render_scope_label(Some(&LogState::from("plain"))), "plain");
        assert_eq!(render_scope_label(None), "");
    }

    #[test]
    fn test_null_renders_as_placeholder() {
        assert_eq!(display_value(&Value::Null), "(null)");
    }

    #[test]
    fn test_opaque_state_has_no_properties() {
        assert!(LogState::from("text").properties().is_empty());
    }

    proptest! {
        #[test]
        fn prop_plain_text_renders_unchanged(text in "[a-zA-Z0-9 .,:;!?-]{0,40}") {
            let template = MessageTemplate::parse(&text);
            prop_assert_eq!(template.render(&[]), text);
        }

        #[test]
        fn prop_every_hole_binds_its_argument(names in proptest::collection::vec("[A-Z][a-z]{0,8}", 1..5)) {
            let raw = names.iter().map(|n| format!("{{{}}}", n)).collect::<Vec<_>>().join(" ");
            let args: Vec<Value> = (0..names.len() as i64).map(Value::from).collect();
            let fields = MessageTemplate::parse(&raw).bind(args);

            prop_assert_eq!(fields.len(), names.len());
            for ((name, value), index) in fields.iter().zip(0i64..) {
                prop_assert_eq!(name, names[index as usize].as_str());
                prop_assert_eq!(value, &Value::from(index));
            }
        }
    }
}
