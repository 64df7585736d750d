//! Destinations for formatted entries
//!
//! A sink receives one formatted string per captured entry. Sinks never
//! fail the log call: write errors are swallowed (and reported through
//! `tracing` diagnostics where useful). Dropping a sink releases whatever
//! it holds.

mod background;
mod memory;
mod test_output;
mod writer;

pub use background::BackgroundSink;
pub use memory::MemorySink;
pub use test_output::TestOutputSink;
pub use writer::{FileSink, WriterSink};

/// Accepts formatted log text
pub trait LogSink: Send + Sync {
    fn write(&self, text: &str);
}

impl<S: LogSink + ?Sized> LogSink for std::sync::Arc<S> {
    fn write(&self, text: &str) {
        (**self).write(text)
    }
}
