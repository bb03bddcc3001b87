//! # scout-telemetry
//!
//! Process-wide logging for the scouting dashboard.
//!
//! Every binary calls one of the `init_*` functions once at startup. The
//! filter comes from `RUST_LOG` when set; otherwise the given default level
//! applies. Initialization is idempotent: a second call (or a subscriber
//! installed by a test harness) is left in place.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LEVEL: &str = "info";

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install a human-readable subscriber at the default level.
///
/// Returns `true` if this call installed the global subscriber.
pub fn init_telemetry(service: &str) -> bool {
    init_with_level(service, DEFAULT_LEVEL)
}

/// Install a human-readable subscriber with `level` as the default filter.
///
/// Log lines go to stderr so they never interleave with rendered results.
pub fn init_with_level(service: &str, level: &str) -> bool {
    let installed = fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(service, "telemetry initialized");
    }
    installed
}

/// Install a JSON subscriber, one object per line on stderr.
pub fn init_json(service: &str) -> bool {
    let installed = fmt()
        .json()
        .with_env_filter(filter(DEFAULT_LEVEL))
        .with_current_span(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(service, "telemetry initialized");
    }
    installed
}
