//! Logging utilities and structured logging support

use std::sync::Once;

pub use log::{debug, info, warn, error, trace};

static INIT: Once = Once::new();

/// Initialize the logging system
///
/// Honours `RUST_LOG`; falls back to `info` when it is unset. Subsequent calls
/// are ignored.
pub fn init() {
    init_with_filter(None);
}

/// Initialize the logging system with an explicit `env_logger` filter string
/// (e.g. `"surface_ui=debug"`).
pub fn init_with_filter(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        // try_init: a test harness or host application may own the logger already
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
