// src/logging.rs
//! tracing-subscriber setup for binaries and embedders
//!
//! `RUST_LOG` wins over the configured filter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;

/// Install a fmt subscriber. Idempotent; later calls are no-ops.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.as_str()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .ok();
}
