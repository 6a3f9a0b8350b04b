mod cli;
mod clipboard;
mod config;
mod logging;
mod scene;
mod selector;
mod utils;
mod workflow;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

fn main() -> ExitCode {
    // Daemon mode is an early exit and must run before clap sees argv.
    match clipboard::check_and_run_daemon_if_requested() {
        Ok(true) => return ExitCode::SUCCESS,
        Ok(false) => {}
        Err(e) => {
            eprintln!("Clipboard daemon failed: {e:#}");
            return ExitCode::FAILURE;
        }
    }

    let _args = cli::Cli::parse();

    let script_name = config::binary_stem();
    let settings = match config::load_settings(&config::settings_path(&script_name)) {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not up yet; report on stderr and bail.
            eprintln!("A fatal error has occurred: {e:#}");
            pause_for_exit();
            return ExitCode::FAILURE;
        }
    };

    let guard = match logging::init(&settings.logging, &script_name) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("A fatal error has occurred: {e:#}");
            pause_for_exit();
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Script: \"{script_name}\" | Version: {} | Host: \"{}\"",
        env!("CARGO_PKG_VERSION"),
        logging::hostname_string()
    );

    let start = Instant::now();
    let code = match workflow::run() {
        Ok(()) => {
            tracing::info!(
                "Execution completed in {}.",
                utils::format_duration(start.elapsed())
            );
            0
        }
        Err(e) => exit_code_for(&e),
    };

    // Flush the log file before the final pause.
    drop(guard);
    pause_for_exit();
    ExitCode::from(code)
}

/// Map a run failure to its exit code, logging it on the way out.
/// 130 mirrors the shell convention for an interrupted foreground job.
fn exit_code_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<selector::SelectError>() {
        Some(selector::SelectError::Interrupted) => {
            tracing::warn!("Operation interrupted by user.");
            130
        }
        _ => {
            tracing::error!("A fatal error has occurred: {error:#}");
            1
        }
    }
}

/// Keep a double-clicked console window readable until acknowledged.
fn pause_for_exit() {
    print!("Press Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
