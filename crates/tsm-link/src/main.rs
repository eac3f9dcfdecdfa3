//! ts-modules-postinstall - registers source packages in the ts_modules side
//! directory.
//!
//! This is the main entry point for the ts-modules-postinstall binary.

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod linker;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    // Parse CLI arguments; usage errors exit with 1 like every other failure
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute the command
    let result = match &cli.command {
        Some(Commands::Add(args)) => commands::add::run(args, &cli),
        Some(Commands::Remove(args)) => commands::remove::run(args, &cli),
        Some(Commands::List(args)) => commands::list::run(args, &cli),
        None => commands::postinstall::run(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(1)
        }
    }
}
