use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Install the global subscriber.
///
/// While the full-screen UI owns the terminal, events go to `log_file` (or
/// nowhere when none is given); otherwise they go to stderr.
pub fn init_logging(verbose: bool, tui: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,flight_mileage_map={}", default_level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    match (tui, log_file) {
        (_, Some(path)) => {
            let file = File::create(path)?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        (true, None) => registry.init(),
        (false, None) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}
