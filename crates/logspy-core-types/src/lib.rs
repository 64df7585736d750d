//! Core value types shared across LogSpy facilities
//!
//! This crate provides the leaf types used by the capture engine and by
//! anything that wants to talk about captured entries without pulling in
//! the engine itself:
//!
//! - **Severity**: `LogLevel`, an ordered severity scale
//! - **Event identity**: `EventId`, a numeric id with an optional name
//! - **Correlation**: `CorrelationId`, an opaque id tying entries together
//! - **Schema constants**: canonical field keys and diagnostic targets

pub mod correlation;
pub mod event;
pub mod level;
pub mod schema;

pub use correlation::CorrelationId;
pub use event::EventId;
pub use level::{LogLevel, ParseLevelError};
