//! Logging utilities
//!
//! Thin wrapper over the `log` facade. The library only emits through the
//! facade; binaries and integration tests opt into `env_logger` via [`init`].

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system.
///
/// Safe to call more than once; subsequent calls are ignored so tests can
/// initialize independently.
pub fn init() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
