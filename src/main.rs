// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! tsm - inspect how module specifiers resolve through the ts_modules side
//! directory
//!
//! This is the main entry point for the tsm CLI/REPL.
//!
//! ## Features
//!
//! - One-shot resolution of a specifier through the `require` chain or the
//!   asynchronous `import` hook
//! - Interactive REPL with completion of registered package names

mod repl;
mod session;

use owo_colors::OwoColorize;
use session::{DEFAULT_PARENT, Mode, Session};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tsm_loader::{LoaderConfig, find_project_root};

/// Parsed command line
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    specifier: Option<String>,
    esm: bool,
    from: Option<PathBuf>,
}

/// What the command line asks for
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Help,
    Version,
    Run(Options),
}

/// Main entry point - uses tokio runtime for the asynchronous import hook.
#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Action::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Action::Version) => {
            print_version();
            return ExitCode::SUCCESS;
        }
        Ok(Action::Run(options)) => options,
        Err(message) => {
            eprintln!("{}: {}", "Error".red().bold(), message);
            eprintln!("Use {} for usage information", "--help".cyan());
            return ExitCode::FAILURE;
        }
    };

    let session = match build_session(&options) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match options.specifier {
        Some(specifier) if options.esm => run_hook(&session, &specifier).await,
        Some(specifier) => run_require(&session, &specifier),
        None => run_repl(session),
    }
}

fn parse_args(args: &[String]) -> Result<Action, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Action::Help),
            "-v" | "--version" => return Ok(Action::Version),
            "--esm" => options.esm = true,
            "--from" => match iter.next() {
                Some(parent) => options.from = Some(PathBuf::from(parent)),
                None => return Err(format!("{} requires an argument", "--from".cyan())),
            },
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("unknown option '{}'", arg.cyan()));
            }
            _ if options.specifier.is_some() => {
                return Err(format!("unexpected argument '{}'", arg.cyan()));
            }
            _ => options.specifier = Some(arg.clone()),
        }
    }

    Ok(Action::Run(options))
}

/// Load the project configuration, start logging and set up the chains.
fn build_session(options: &Options) -> tsm_loader::Result<Session> {
    let cwd = env::current_dir()?;
    let config = LoaderConfig::load_from(&find_project_root(&cwd), env::vars())?;

    let filter = EnvFilter::try_new(&config.loglevel).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let parent = cwd.join(DEFAULT_PARENT);
    let mut session = Session::new(config, parent);
    if let Some(from) = &options.from {
        session.set_parent(tsm_loader::path::normalize(&cwd.join(from)));
    }
    if options.esm {
        session.set_mode(Mode::Import);
    }
    Ok(session)
}

/// Start the interactive REPL
fn run_repl(session: Session) -> ExitCode {
    match repl::Repl::new(session) {
        Ok(mut repl) => {
            if let Err(e) = repl.run() {
                eprintln!("{}: {:?}", "REPL Error".red().bold(), e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}: Failed to initialize REPL: {:?}",
                "Error".red().bold(),
                e
            );
            ExitCode::FAILURE
        }
    }
}

/// Resolve a specifier through the `require` chain.
fn run_require(session: &Session, specifier: &str) -> ExitCode {
    match session.resolve(specifier) {
        Ok(resolved) => {
            println!("{}", resolved);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve a specifier through the asynchronous `import` hook.
async fn run_hook(session: &Session, specifier: &str) -> ExitCode {
    match session.resolve_hook(specifier).await {
        Ok(resolution) => {
            println!("{}", resolution.url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "\n  {} v{}\n",
        "ts-modules resolution inspector".white().bold(),
        version.yellow()
    );

    println!("{}", "USAGE:".white().bold());
    println!("    {} [OPTIONS] [SPECIFIER]", "tsm".green());
    println!();

    println!("{}", "OPTIONS:".white().bold());
    println!("    {:20} {}", "-h, --help".cyan(), "Print this help message");
    println!("    {:20} {}", "-v, --version".cyan(), "Print version information");
    println!("    {:20} {}", "--esm".cyan(), "Resolve as an import instead of a require");
    println!(
        "    {:20} {}",
        "--from <PARENT>".cyan(),
        "Module (or directory) the request is made from"
    );
    println!();

    println!("{}", "ARGUMENTS:".white().bold());
    println!("    {:20} {}", "[SPECIFIER]".cyan(), "Module specifier to resolve");
    println!();

    println!("{}", "EXAMPLES:".white().bold());
    println!(
        "    {}                       # Start interactive REPL",
        "tsm".green()
    );
    println!(
        "    {} {}                # Resolve like require()",
        "tsm".green(),
        "lodash".dimmed()
    );
    println!(
        "    {} {} {}          # Resolve like import",
        "tsm".green(),
        "--esm".cyan(),
        "widget".dimmed()
    );
    println!();
}

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    println!("{} {}", "tsm".bright_cyan().bold(), version.yellow());
    println!("{} {}", "tsm-loader".dimmed(), tsm_loader::VERSION.dimmed());
}
