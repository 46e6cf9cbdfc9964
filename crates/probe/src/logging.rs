//! Tracing subscriber setup.
//!
//! Framework code only emits events; a test binary opts in to seeing them by
//! calling one of these once. `RUST_LOG` wins over the default filter.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,amo_probe=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Human-readable output on stderr
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}

/// One JSON object per event on stderr, for CI log collection
pub fn init_json_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
        .is_ok()
}

/// Output captured by the test harness; safe to call from every test
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_test_tracing();
        init_test_tracing();
        assert!(!init_tracing());
    }
}
