use logspy_core::config::{LevelMap, LoggerOptions};
use logspy_core::sink::MemorySink;
use logspy_core::trace::NoTraceSource;
use logspy_core::{CaptureService, LogLevel, LoggerFactory, StructuredLogger};
use std::sync::Arc;

/// Capture service plus a factory that logs everything from Trace up
#[allow(dead_code)]
pub fn setup() -> (Arc<CaptureService>, LoggerFactory) {
    setup_with(LevelMap::new(LogLevel::Trace), LoggerOptions::default())
}

#[allow(dead_code)]
pub fn setup_with(
    levels: LevelMap,
    options: LoggerOptions,
) -> (Arc<CaptureService>, LoggerFactory) {
    let capture = Arc::new(CaptureService::new());
    let factory =
        LoggerFactory::new(capture.clone(), levels, options).with_trace_source(NoTraceSource);
    (capture, factory)
}

/// Logger for `category` plus its capture service
#[allow(dead_code)]
pub fn logger(category: &str) -> (Arc<CaptureService>, StructuredLogger) {
    let (capture, factory) = setup();
    (capture, factory.create_logger(category))
}

/// Factory whose sink output is kept in memory
#[allow(dead_code)]
pub fn setup_with_memory_sink(
    options: LoggerOptions,
) -> (Arc<CaptureService>, LoggerFactory, Arc<MemorySink>) {
    let (capture, factory) = setup_with(LevelMap::new(LogLevel::Trace), options);
    let sink = Arc::new(MemorySink::new());
    (capture, factory.with_sink(sink.clone()), sink)
}
