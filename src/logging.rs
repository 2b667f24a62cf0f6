//! Tracing setup and privacy helpers.
//!
//! Detailed per-submission logs are dev-only. Activation requires BOTH:
//!   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
//!   - SLEEP_DEV_LOG=1
//!
//! Free text from the form is never logged; [`anon_hash`] gives a short stable id instead.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "SLEEP_DEV_LOG";
pub const DEFAULT_LOG_FILTER: &str = "sleep_disorder_predictor=info,assess=debug,warn";

fn is_dev_env() -> bool {
    cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        )
}

/// SLEEP_DEV_LOG=1 AND dev env.
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    on && is_dev_env()
}

/// Install a compact fmt subscriber for the standalone binaries.
/// `RUST_LOG` wins over [`DEFAULT_LOG_FILTER`]. Safe to call more than once.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

/// First 6 bytes of SHA-256 as hex.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("slept badly, nightmares");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("slept badly, nightmares"));
        assert_ne!(a, anon_hash("slept well"));
        // sha256("") = e3b0c442 98fc...
        assert_eq!(anon_hash(""), "e3b0c44298fc");
    }

    #[serial_test::serial]
    #[test]
    fn dev_log_needs_flag() {
        std::env::remove_var(ENV_DEV_LOG);
        assert!(!dev_logging_enabled());

        std::env::set_var(ENV_DEV_LOG, "1");
        // unit tests run as debug builds
        assert_eq!(dev_logging_enabled(), is_dev_env());
        std::env::remove_var(ENV_DEV_LOG);
    }
}
