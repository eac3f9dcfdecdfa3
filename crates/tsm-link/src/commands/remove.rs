//! Remove command implementation.

use owo_colors::OwoColorize;

use crate::cli::{Cli, RemoveArgs};
use crate::commands::CommandContext;
use crate::error::Result;
use crate::linker;

/// Run the remove command.
pub fn run(args: &RemoveArgs, cli: &Cli) -> Result<()> {
    let ctx = CommandContext::new(cli)?;
    let removed = linker::unpublish(&ctx.side_dir(), &args.package)?;

    if ctx.quiet {
        return Ok(());
    }

    if removed {
        println!("{} {}", "Removed".green(), args.package.cyan());
    } else {
        println!(
            "{} {} in {}",
            "Nothing registered as".yellow(),
            args.package.cyan(),
            ctx.side_dir().path().display()
        );
    }

    Ok(())
}
