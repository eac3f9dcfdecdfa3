//! Add command implementation.

use crate::cli::{AddArgs, Cli};
use crate::commands::CommandContext;
use crate::error::Result;

/// Run the add command.
pub fn run(args: &AddArgs, cli: &Cli) -> Result<()> {
    let ctx = CommandContext::new(cli)?;
    ctx.register(&args.package, &args.entry)?;
    Ok(())
}
