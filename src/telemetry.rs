//! Tracing setup for hosts embedding `chart-kernel`.
//!
//! Measure passes log through `tracing`; nothing is printed unless the host
//! installs a subscriber. Hosts without their own subscriber can opt into
//! `init_default_tracing` through the `telemetry` feature.

/// Installs a compact `tracing` subscriber filtered by `RUST_LOG`
/// (defaulting to `info`, or `chart_kernel=debug` style directives).
///
/// Returns `false` when the feature is disabled or a global subscriber is
/// already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
