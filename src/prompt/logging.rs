//! Logging setup for the command-line tool
//!
//! The library only emits `tracing` events (parser recoveries at debug level).
//! Binaries call [`init_logging`] to print them on stderr, keeping stdout free
//! for prompt output.

use tracing_subscriber::EnvFilter;

use crate::prompt::config::PromptConfig;

fn filter_from_config(config: &PromptConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.name())
}

/// Install a stderr subscriber at the configured level.
///
/// If a global subscriber is already set the call does nothing.
pub fn init_logging(config: &PromptConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
