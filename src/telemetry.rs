//! Opt-in tracing setup for hosts without a subscriber of their own.
//!
//! The crate only emits `tracing` events; collecting them is the embedding
//! application's job. Hosts that just want console output can enable the
//! `telemetry` feature and call [`init_default_tracing`] once at startup,
//! everyone else wires their own subscriber and filters.

/// Installs a compact fmt subscriber, honoring `RUST_LOG` with an `info`
/// fallback. Only active with the `telemetry` feature.
///
/// Returns `true` when this call installed the global subscriber, `false`
/// when the feature is disabled or the host already set one.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
