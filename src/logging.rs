// ABOUTME: Structured logging setup built on tracing-subscriber
// ABOUTME: Environment-driven log filtering with a readable default
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging from the environment.
///
/// Honors `RUST_LOG` when set; defaults to `info` otherwise.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_from_env() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}
