// SPDX-License-Identifier: MIT

//! Structured logging setup for host applications.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging with env-filter support.
///
/// Host applications call this once at startup. Safe to call again (e.g. from
/// multiple tests); subsequent calls are no-ops.
pub fn init() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fittrack_client=debug".parse().expect("valid directive"))
                .add_directive("info".parse().expect("valid directive")),
        )
        .with(format)
        .try_init();
}
