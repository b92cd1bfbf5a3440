//! Logging initialisation for snaphome binaries.
//!
//! Call [`init_tracing`] once at process startup.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `RUST_LOG` | Log filter (falls back to the level passed to [`init_tracing`]). |
//! | `SNAPHOME_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |
//!
//! # Example
//!
//! ```rust,no_run
//! snaphome_runtime::telemetry::init_tracing("info");
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "SNAPHOME_LOG_FORMAT";

/// Install the global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG` when it is set and valid, `default_level`
/// otherwise.  Output is compact human-readable text unless
/// `SNAPHOME_LOG_FORMAT=json`.
pub fn init_tracing(default_level: &str) {
    let env_filter = build_filter(default_level);

    if json_requested() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn json_requested() -> bool {
    std::env::var(LOG_FORMAT_ENV).as_deref() == Ok("json")
}
