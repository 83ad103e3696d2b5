use crate::cli::{actions::Action, commands, dispatch::handler, globals::GlobalArgs, telemetry};
use anyhow::Result;

/// Start the CLI: parse arguments, initialize telemetry, and resolve the
/// action plus process-wide configuration.
///
/// # Errors
///
/// Returns an error if argument resolution or telemetry setup fails.
pub fn start() -> Result<(Action, GlobalArgs)> {
    let matches = commands::new().get_matches();

    let verbosity_level = match matches.get_one::<u8>("verbosity").map_or(0, |&v| v) {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    telemetry::init(Some(verbosity_level))?;

    let globals = GlobalArgs::from_matches(&matches)?;
    let action = handler(&matches)?;

    Ok((action, globals))
}
