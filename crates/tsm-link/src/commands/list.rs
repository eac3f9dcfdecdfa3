//! List command implementation.

use owo_colors::OwoColorize;

use crate::cli::{Cli, ListArgs};
use crate::commands::CommandContext;
use crate::error::Result;
use crate::linker;

/// Run the list command.
pub fn run(args: &ListArgs, cli: &Cli) -> Result<()> {
    let ctx = CommandContext::new(cli)?;
    let side_dir = ctx.side_dir();
    let packages = linker::entries(&side_dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&packages)?);
        return Ok(());
    }

    if packages.is_empty() {
        println!(
            "{} {}",
            "No packages registered in".yellow(),
            side_dir.path().display()
        );
        return Ok(());
    }

    println!("{}", side_dir.path().display().to_string().cyan().bold());
    for package in &packages {
        let target = package
            .target
            .as_ref()
            .map(|t| t.display().to_string())
            .unwrap_or_else(|| "(not a link)".to_string());

        if package.dangling {
            println!(
                "  {} {} {} {}",
                package.name.red(),
                "->".dimmed(),
                target,
                "(missing)".red()
            );
        } else {
            println!("  {} {} {}", package.name.green(), "->".dimmed(), target);
        }
    }

    Ok(())
}
