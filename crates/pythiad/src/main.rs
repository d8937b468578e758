//! Binary entrypoint for the Python source-analysis daemon.

use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use pythia_engine::PythonJediEngine;
use pythiad::{DaemonOptions, serve, telemetry};

fn main() -> ExitCode {
    let options = DaemonOptions::parse();

    let cache_directory = match options.prepare_cache_directory() {
        Ok(path) => path,
        Err(error) => return startup_failure(&error),
    };
    let _telemetry = match telemetry::initialise(&cache_directory) {
        Ok(handle) => handle,
        Err(error) => return startup_failure(&error),
    };

    info!(
        cache_directory = %cache_directory.display(),
        extra_folders = ?options.extra_folders(),
        complete_function_params = %options.function_params(),
        "daemon started"
    );

    let engine = PythonJediEngine::new()
        .with_cache_directory(&cache_directory)
        .with_search_paths(options.extra_folders().to_vec());

    let stdin = io::stdin();
    let reader = BufReader::new(stdin.lock());
    let stdout = io::stdout();
    let writer = stdout.lock();

    match serve(reader, writer, &engine, options.function_params()) {
        Ok(cause) => {
            info!(%cause, "daemon stopped");
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!(%error, "daemon aborted");
            ExitCode::FAILURE
        }
    }
}

/// Reports a pre-telemetry failure on stderr, the only channel available
/// before the log file is open.
fn startup_failure(error: &dyn std::error::Error) -> ExitCode {
    writeln!(io::stderr().lock(), "pythiad: {error}").ok();
    ExitCode::FAILURE
}
