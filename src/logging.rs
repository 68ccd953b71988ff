//! Diagnostic logging setup for the `burnnote` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the binary.  Events carry redacted ids and outcomes, never
//! plaintext, passphrases, or keys.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "BURNNOTE_LOG";

/// Filter used when `BURNNOTE_LOG` is unset or invalid.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "burnnote=debug"
    } else {
        "warn"
    }
}

/// Install the global stderr subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level() {
        assert_eq!(default_directive(true), "burnnote=debug");
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}
