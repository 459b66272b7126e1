//! epgtimer: manage EpgTimer recording rules and browse EMWUI data from the
//! command line.

use std::process::ExitCode;

use clap::Parser;
use log::debug;

use epgtimer::commands;
use epgtimer::config::{load_config, Settings};
use epgtimer::context::Cli;
use epgtimer::logging::init_logging;
use epgtimer::AppError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config_path, config) = match load_config(cli.global.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => return report(&AppError::from(e), None),
    };

    if let Err(e) = init_logging(config.log_level(), cli.global.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match &config_path {
        Some(path) => debug!("Loaded config from {}", path.display()),
        None => debug!("No config file, using defaults"),
    }

    let settings = match Settings::resolve(&cli.global, &config) {
        Ok(settings) => settings,
        Err(e) => return report(&AppError::from(e), None),
    };

    match commands::dispatch(&cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, Some(&settings)),
    }
}

/// Print the error and its hint once, on stderr.
fn report(error: &AppError, settings: Option<&Settings>) -> ExitCode {
    eprintln!("Error: {}", error);
    if let Some(hint) = error.hint(settings) {
        eprintln!();
        eprintln!("{}", hint);
    }
    ExitCode::FAILURE
}
