//! stderr logging via `env_logger`. `RUST_LOG` wins over `-v`.

use env_logger::Env;

/// Map `-v` repetitions to a default filter.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global logger. Safe to call more than once.
pub fn init(verbosity: u8) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(verbosity)))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
