use std::env;
use std::process::ExitCode;

use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

mod audio;
mod config;
mod controller;
mod input;
mod library;
mod playlist;
mod runtime;

fn init_logging(log: &crate::config::LogSettings) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let (settings, config_problem) = runtime::load_settings();
    init_logging(&settings.log);
    if let Some(msg) = config_problem {
        warn!("{msg}");
    }

    match runtime::run(settings, env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
