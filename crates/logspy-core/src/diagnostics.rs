//! Subscriber setup for the crate's own diagnostics
//!
//! LogSpy reports rule registration, clears, configuration and sink
//! failures through `tracing` under the `logspy` target. This module
//! installs a process-wide subscriber for viewing them.

use logspy_core_types::schema::DIAGNOSTICS_TARGET;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Diagnostic output profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output at debug level
    Development,
    /// JSON output at info level
    Production,
    /// Bare registry; use with [`crate::bridge::CaptureLayer`] in tests
    Test,
}

static INIT_ONCE: Once = Once::new();

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", DIAGNOSTICS_TARGET, default_level)))
}

/// Install the diagnostics subscriber for `profile`
///
/// Only the first call in a process has any effect. If another global
/// subscriber is already installed the call does nothing.
///
/// # Example
///
/// ```
/// use logspy_core::diagnostics::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter("debug"))
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter("info"))
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
        if installed.is_err() {
            tracing::debug!(target: DIAGNOSTICS_TARGET, ?profile, "global subscriber already set");
        }
    });
}
