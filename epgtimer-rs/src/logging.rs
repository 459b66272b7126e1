//! Diagnostic logging to stderr.
//!
//! stdout carries rendered data only, so every log line goes to stderr.
//! Call sites use the `log` macros, which are bridged into `tracing`.

use std::io;

use chrono::Local;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence. Otherwise `verbose` selects `debug`, and
/// `level` (from the config file) is used as is.
pub fn init_logging(level: &str, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(verbose)
            .with_level(true)
            .with_file(false)
            .with_line_number(false)
            .with_timer(LocalTimeTimer),
    );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to set default subscriber: {}", e))?;

    tracing_log::LogTracer::init()
        .map_err(|e| format!("Failed to initialize LogTracer: {}", e))?;

    Ok(())
}

/// Local time, microsecond precision.
#[derive(Debug, Clone, Copy)]
struct LocalTimeTimer;

impl fmt::time::FormatTime for LocalTimeTimer {
    fn format_time(&self, w: &mut fmt::format::Writer) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.6f"))
    }
}
