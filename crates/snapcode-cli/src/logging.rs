//! Log output setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `-v` raises the snapcode crates to
/// `debug` and `-vv` to `trace`; everything else stays at `warn`.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,snapcode=debug,snapcode_serializer=debug",
        _ => "warn,snapcode=trace,snapcode_serializer=trace",
    }
}
