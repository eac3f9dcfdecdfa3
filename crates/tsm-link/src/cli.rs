//! CLI argument parsing for ts-modules-postinstall.
//!
//! With no subcommand the tool registers the current package, which is what
//! a `postinstall` script wants.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Register source packages in the ts_modules side directory
#[derive(Parser, Debug)]
#[command(name = "ts-modules-postinstall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root holding the side directory (default: discovered from
    /// the current directory)
    #[arg(long, global = true, env = "TS_MODULES_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a package under an explicit name
    Add(AddArgs),

    /// Remove a package from the side directory
    #[command(alias = "rm", alias = "unlink")]
    Remove(RemoveArgs),

    /// List registered packages
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Name the package is imported by
    #[arg(value_name = "PACKAGE_NAME")]
    pub package: String,

    /// Path to the source entry (file or directory), relative to the
    /// current directory
    #[arg(value_name = "RELATIVE_PATH_TO_TS_ENTRY")]
    pub entry: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    /// Package to remove
    #[arg(value_name = "PACKAGE_NAME")]
    pub package: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_postinstall() {
        let cli = Cli::try_parse_from(["ts-modules-postinstall"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_add_arguments() {
        let cli =
            Cli::try_parse_from(["ts-modules-postinstall", "add", "widget", "./src/index.ts"])
                .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.package, "widget");
                assert_eq!(args.entry, PathBuf::from("./src/index.ts"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_add_requires_both_arguments() {
        assert!(Cli::try_parse_from(["ts-modules-postinstall", "add", "widget"]).is_err());
        assert!(Cli::try_parse_from(["ts-modules-postinstall", "bogus"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ts-modules-postinstall", "list", "--json", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::List(ListArgs { json: true }))));
    }
}
