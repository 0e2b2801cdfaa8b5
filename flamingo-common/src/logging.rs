//! Tracing subscriber setup

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level. Calling this more than once
/// is harmless; later calls leave the first subscriber in place and return
/// `false`.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    match &config.file {
        Some(path) => match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.with_ansi(false).with_writer(std::sync::Mutex::new(file)))
                .try_init()
                .is_ok(),
            Err(e) => {
                let installed = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
                    .is_ok();
                tracing::warn!(
                    "Could not open log file {}: {}, logging to stdout",
                    path.display(),
                    e
                );
                installed
            }
        },
        None => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .is_ok(),
    }
}
