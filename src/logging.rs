//! Tracing installation for Kawa applications.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INSTALLED: Once = Once::new();

/// Installs the process-wide tracing subscriber (idempotent).
///
/// The filter honors `RUST_LOG` and defaults to `info`. Embedders that
/// already install their own subscriber can skip this; a second install
/// attempt is reported and otherwise ignored.
pub fn init() {
    INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_err()
        {
            eprintln!("kawa: tracing subscriber was already initialized");
        }
    });
}
