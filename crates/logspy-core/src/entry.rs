//! Captured log entry model
//!
//! A `LogEntry` is built exactly once per enabled log call and is never
//! mutated afterwards. The capture service and sinks share it behind an
//! `Arc`.

use chrono::{DateTime, Utc};
use logspy_core_types::{EventId, LogLevel};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// One captured log record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub event_id: EventId,
    pub message: String,
    pub exception: Option<ExceptionInfo>,
    pub category: String,
    /// Open scopes at log time, outermost first
    pub scopes: Vec<String>,
    pub properties: Properties,
    pub timestamp: DateTime<Utc>,
    /// Empty when no correlation scope was open
    pub correlation_id: String,
    pub thread_id: u64,
    pub task_id: Option<u64>,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
}

impl LogEntry {
    /// Create an entry stamped with the current time and no ambient metadata
    pub fn new(level: LogLevel, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            event_id: EventId::default(),
            message: message.into(),
            exception: None,
            category: category.into(),
            scopes: Vec::new(),
            properties: Properties::new(),
            timestamp: Utc::now(),
            correlation_id: String::new(),
            thread_id: 0,
            task_id: None,
            trace_id: None,
            span_id: None,
        }
    }

    pub fn with_event_id(mut self, event_id: EventId) -> Self {
        self.event_id = event_id;
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn with_thread_id(mut self, thread_id: u64) -> Self {
        self.thread_id = thread_id;
        self
    }

    pub fn with_task_id(mut self, task_id: Option<u64>) -> Self {
        self.task_id = task_id;
        self
    }

    pub fn with_trace(mut self, trace_id: Option<String>, span_id: Option<String>) -> Self {
        self.trace_id = trace_id;
        self.span_id = span_id;
        self
    }
}

// ========== Exceptions ==========

/// Snapshot of an error value attached to a log call
///
/// Rust has no runtime subtype relation between error types, so each
/// snapshot carries a set of type tags: the concrete type name it was
/// captured from plus any "supertype" tags declared with
/// [`ExceptionInfo::with_kind`]. Type-based rules match against these tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionInfo {
    type_name: String,
    message: String,
    kinds: Vec<String>,
    causes: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            kinds: vec![type_name.clone()],
            type_name,
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Capture an error, tagging it with its concrete type
    pub fn from_error<E: std::error::Error + 'static>(err: &E) -> Self {
        Self::new(std::any::type_name::<E>(), err.to_string()).with_causes(err.source())
    }

    /// Capture a type-erased error; only message text is available
    pub fn from_dyn(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::new(
            std::any::type_name::<dyn std::error::Error>(),
            err.to_string(),
        )
        .with_causes(err.source())
    }

    fn with_causes(mut self, mut source: Option<&(dyn std::error::Error + 'static)>) -> Self {
        while let Some(err) = source {
            self.causes.push(err.to_string());
            source = err.source();
        }
        self
    }

    /// Declare an additional type tag (e.g. a family this error belongs to)
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    /// Declare `T` as a supertype tag of this error
    pub fn with_kind_of<T: ?Sized + 'static>(self) -> Self {
        self.with_kind(std::any::type_name::<T>())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// All type tags, concrete type first
    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    /// Messages of the source chain, nearest first
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.is_kind(std::any::type_name::<T>())
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)?;
        for cause in &self.causes {
            write!(f, "\n ---> {}", cause)?;
        }
        Ok(())
    }
}

impl<E: std::error::Error + 'static> From<&E> for ExceptionInfo {
    fn from(err: &E) -> Self {
        Self::from_error(err)
    }
}

// ========== Properties ==========

/// Structured properties of an entry
///
/// Keys compare case-insensitively; writing an existing key replaces its
/// value (and spelling) in place, so insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, Value)>,
}

fn keys_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || (!a.is_ascii() && a.to_lowercase() == b.to_lowercase())
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| keys_match(k, &key)) {
            Some(slot) => *slot = (key, value),
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| keys_match(k, key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl std::ops::Index<&str> for Properties {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the key is not present
    fn index(&self, key: &str) -> &Value {
        match self.get(key) {
            Some(value) => value,
            None => panic!("property '{}' not present", key),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
