//! Development-time tracing for the `outpaths` and `pkggen` binaries.
//!
//! Diagnostics go to stderr so they never mix with generated output on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// `outpaths` stays quiet unless something is wrong.
pub const QUIET: &str = "warn";
/// `pkggen` also reports each package it creates.
pub const PROGRESS: &str = "pkggen=info,warn";

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set and parseable; otherwise `default_directives` apply.
///
/// ```bash
/// RUST_LOG=outpaths=debug outpaths resolve BET --set in_file=/data/T1w.nii.gz
/// ```
pub fn init(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new(QUIET));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
