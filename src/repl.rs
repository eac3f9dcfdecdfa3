// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Interactive REPL: every line is a specifier to resolve.

use crate::session::{Mode, Session};
use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};
use std::borrow::Cow;
use std::path::PathBuf;

/// REPL configuration constants
const HISTORY_FILE: &str = ".tsm_history";
const MAX_HISTORY_SIZE: usize = 1000;

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Mode,
    From,
    Entries,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let input = input.trim();
        let rest = input.strip_prefix('.')?;

        let parts: Vec<&str> = rest.splitn(2, char::is_whitespace).collect();
        let cmd = parts.first()?.to_lowercase();
        let arg = parts.get(1).map(|a| a.trim()).filter(|a| !a.is_empty());

        match cmd.as_str() {
            "help" | "h" | "?" => Some((ReplCommand::Help, arg)),
            "exit" | "quit" | "q" => Some((ReplCommand::Exit, arg)),
            "clear" | "cls" => Some((ReplCommand::Clear, arg)),
            "version" | "v" => Some((ReplCommand::Version, arg)),
            "mode" | "m" => Some((ReplCommand::Mode, arg)),
            "from" | "f" => Some((ReplCommand::From, arg)),
            "entries" | "ls" => Some((ReplCommand::Entries, arg)),
            _ => None,
        }
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".mode cjs|esm", "Resolve like require() or like import"),
            (".from <path>", "Resolve from another module or directory"),
            (".entries", "List packages in the side directory"),
        ]
    }
}

/// Completion and hints over side-directory package names
struct TsmHelper {
    packages: Vec<String>,
}

impl TsmHelper {
    fn new(packages: Vec<String>) -> Self {
        Self { packages }
    }

    fn candidates<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let commands = ReplCommand::all_commands()
            .iter()
            .map(|(cmd, _)| cmd.split_whitespace().next().unwrap_or(*cmd));
        let packages = self.packages.iter().map(String::as_str);

        commands
            .chain(packages)
            .filter(move |candidate| candidate.starts_with(word))
    }
}

/// Start of the word under the cursor; specifiers only break on whitespace
fn word_start(line: &str) -> usize {
    line.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

impl Completer for TsmHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = word_start(&line[..pos]);
        let word = &line[start..pos];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches: Vec<Pair> = self
            .candidates(word)
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate[word.len()..].to_string(),
            })
            .collect();

        Ok((pos, matches))
    }
}

impl Hinter for TsmHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }

        let word = &line[word_start(line)..];
        if word.len() < 2 {
            return None;
        }

        self.candidates(word)
            .find(|candidate| candidate.len() > word.len())
            .map(|candidate| (&candidate[word.len()..]).dimmed().to_string())
    }
}

impl Highlighter for TsmHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let trimmed = line.trim_start();
        if ReplCommand::parse(trimmed).is_some() {
            Cow::Owned(line.magenta().to_string())
        } else if self.packages.iter().any(|p| p == trimmed.trim_end()) {
            Cow::Owned(line.green().to_string())
        } else {
            Cow::Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for TsmHelper {}

impl Helper for TsmHelper {}

/// The interactive resolution REPL
pub struct Repl {
    session: Session,
    editor: Editor<TsmHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(session: Session) -> rustyline::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(MAX_HISTORY_SIZE)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(TsmHelper::new(session.package_names())));

        // Determine history file path
        let history_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ts-modules")
            .join(HISTORY_FILE);

        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        // Load history
        let _ = editor.load_history(&history_path);

        Ok(Self {
            session,
            editor,
            history_path,
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> rustyline::Result<()> {
        self.print_banner();

        loop {
            let prompt = self.format_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    self.resolve_and_print(trimmed);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        let _ = self.editor.save_history(&self.history_path);
        Ok(())
    }

    fn print_banner(&self) {
        println!();
        println!(
            "  {} {} {}",
            "ts-modules resolution inspector".white().bold(),
            "v".dimmed(),
            env!("CARGO_PKG_VERSION").bright_yellow()
        );
        println!(
            "  {} {}",
            "Side directory:".dimmed(),
            self.session.config().side_directory().path().display()
        );
        println!(
            "  {} {} {}",
            "Type".dimmed(),
            ".help".cyan(),
            "for available commands".dimmed()
        );
        println!();
    }

    fn format_prompt(&self) -> String {
        format!(
            "{} ",
            format!("tsm({})>", self.session.mode()).bright_green().bold()
        )
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Exit => return CommandResult::Exit,
            ReplCommand::Clear => print!("\x1B[2J\x1B[H"),
            ReplCommand::Version => self.print_version(),
            ReplCommand::Mode => match arg.map(Mode::parse) {
                Some(Some(mode)) => {
                    self.session.set_mode(mode);
                    println!("{} {}", "Mode:".dimmed(), mode.cyan());
                }
                Some(None) => print_usage(".mode", "expects cjs or esm"),
                None => println!("{} {}", "Mode:".dimmed(), self.session.mode().cyan()),
            },
            ReplCommand::From => match arg {
                Some(path) => self.change_parent(path),
                None => println!(
                    "{} {}",
                    "Resolving from".dimmed(),
                    self.session.parent().display()
                ),
            },
            ReplCommand::Entries => self.print_entries(),
        }
        CommandResult::Continue
    }

    fn change_parent(&mut self, path: &str) {
        let base = self
            .session
            .parent()
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        let parent = tsm_loader::path::normalize(&base.join(path));
        self.session.set_parent(parent);
        println!(
            "{} {}",
            "Resolving from".dimmed(),
            self.session.parent().display().cyan()
        );
    }

    fn print_entries(&mut self) {
        let names = self.session.package_names();
        if names.is_empty() {
            println!("{}", "No packages registered".yellow());
        }
        for name in &names {
            println!("  {}", name.green());
        }
        if let Some(helper) = self.editor.helper_mut() {
            helper.packages = names;
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "REPL Commands:".white().bold());
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!("  {:16} {}", cmd.cyan(), desc.dimmed());
        }

        println!();
        println!(
            "  {}",
            "Any other input is resolved as a module specifier.".dimmed()
        );
        println!();
        println!("{}", "Keyboard Shortcuts:".white().bold());
        println!();
        println!("  {:16} {}", "Ctrl+C".yellow(), "Cancel current input".dimmed());
        println!("  {:16} {}", "Ctrl+D".yellow(), "Exit REPL".dimmed());
        println!("  {:16} {}", "Tab".yellow(), "Complete package names".dimmed());
        println!();
    }

    fn print_version(&self) {
        println!();
        println!(
            "{}: {}",
            "tsm".bright_cyan().bold(),
            env!("CARGO_PKG_VERSION").yellow()
        );
        println!("{}: {}", "tsm-loader".dimmed(), tsm_loader::VERSION);
        println!();
    }

    fn resolve_and_print(&self, specifier: &str) {
        match self.session.resolve(specifier) {
            Ok(resolved) => println!("{}", resolved.green()),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

fn print_usage(command: &str, message: &str) {
    eprintln!(
        "{}: {} {}",
        "Error".red().bold(),
        command.cyan(),
        message.dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_command_parse() {
        assert!(matches!(
            ReplCommand::parse(".help"),
            Some((ReplCommand::Help, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".exit"),
            Some((ReplCommand::Exit, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".mode esm"),
            Some((ReplCommand::Mode, Some("esm")))
        ));
        assert!(matches!(
            ReplCommand::parse(".from  ../lib/app.js "),
            Some((ReplCommand::From, Some("../lib/app.js")))
        ));
        assert!(ReplCommand::parse("widget").is_none());
        // Relative specifiers are not commands
        assert!(ReplCommand::parse("./widget").is_none());
        assert!(ReplCommand::parse("../widget").is_none());
    }

    #[test]
    fn test_candidates() {
        let helper = TsmHelper::new(vec!["@acme/widget".to_string(), "widget".to_string()]);

        let found: Vec<&str> = helper.candidates("wid").collect();
        assert_eq!(found, vec!["widget"]);

        let found: Vec<&str> = helper.candidates("@ac").collect();
        assert_eq!(found, vec!["@acme/widget"]);

        let found: Vec<&str> = helper.candidates(".mo").collect();
        assert_eq!(found, vec![".mode"]);
    }

    #[test]
    fn test_word_start() {
        assert_eq!(word_start("widget"), 0);
        assert_eq!(word_start(".mode es"), 6);
    }

    #[test]
    fn test_word_start_after_wide_space() {
        let line = "widget\u{3000}wi";
        let start = word_start(line);
        assert!(line.is_char_boundary(start));
        assert_eq!(&line[start..], "wi");
    }

    #[test]
    fn test_hint_after_wide_space() {
        let helper = TsmHelper::new(vec!["widget".to_string()]);
        let line = "a\u{3000}wid";
        let start = word_start(line);
        let found: Vec<&str> = helper.candidates(&line[start..]).collect();
        assert_eq!(found, vec!["widget"]);
    }
}
