//! Interactive session.
//!
//! The shell keeps one store open, so undo and redo work across commands.
//! Lines are split like a POSIX shell would for quoting (`'...'`, `"..."`
//! and backslash escapes) and then parsed with the same clap definitions as
//! the command line.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use qsheet_core::Storage;
use qsheet_ingest::SheetSource;

use crate::cli::SheetCommand;
use crate::commands::{Output, Session};
use crate::summary::render;

const PROMPT: &str = "qsheet> ";

#[derive(Parser)]
#[command(
    name = "qsheet",
    no_binary_name = true,
    disable_version_flag = true,
    subcommand_required = true
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Sheet(SheetCommand),

    /// Undo the last change.
    Undo,

    /// Redo the last undone change.
    Redo,

    /// Filter `list` by a query. Without a query the filter is cleared.
    Search { query: Vec<String> },

    /// Show the undo position.
    History,

    /// Leave the shell.
    #[command(visible_alias = "quit")]
    Exit,
}

/// Read commands from `input` until `exit` or end of input.
///
/// Command errors are printed and the session continues; only I/O errors on
/// `input` or `out` end the loop early.
pub async fn run<S, Src, R, W>(session: &mut Session<S, Src>, mut input: R, out: &mut W) -> Result<()>
where
    S: Storage,
    Src: SheetSource,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Question sheet shell. Type `help` for commands, `exit` to leave.")?;
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let tokens = match tokenize(&line) {
            Ok(tokens) if tokens.is_empty() => continue,
            Ok(tokens) => tokens,
            Err(error) => {
                writeln!(out, "error: {error}")?;
                continue;
            }
        };

        let command = match ShellLine::try_parse_from(tokens) {
            Ok(parsed) => parsed.command,
            Err(error) => {
                write!(out, "{}", error.render())?;
                continue;
            }
        };

        let output = match command {
            ShellCommand::Exit => break,
            ShellCommand::Undo => session.undo(),
            ShellCommand::Redo => session.redo(),
            ShellCommand::History => session.history(),
            ShellCommand::Search { query } => session.search(query.join(" ")),
            ShellCommand::Sheet(command) => match session.execute(command).await {
                Ok(output) => output,
                Err(error) => {
                    writeln!(out, "error: {error}")?;
                    continue;
                }
            },
        };
        print_to(out, &output)?;
    }
    Ok(())
}

fn print_to<W: Write>(out: &mut W, output: &Output) -> std::io::Result<()> {
    writeln!(out, "{}", render(output))
}

/// Split a command line into words.
fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => bail!("unterminated single quote"),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c) => current.push(c),
                            None => bail!("unterminated double quote"),
                        },
                        Some(c) => current.push(c),
                        None => bail!("unterminated double quote"),
                    }
                }
            }
            '\\' => {
                in_token = true;
                if let Some(c) = chars.next() {
                    current.push(c);
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(
            tokenize("  toggle topic-1\tsub-1 q-3\n").unwrap(),
            vec!["toggle", "topic-1", "sub-1", "q-3"]
        );
    }

    #[test]
    fn quotes_group_words() {
        assert_eq!(
            tokenize(r#"add-topic "Dynamic Programming""#).unwrap(),
            vec!["add-topic", "Dynamic Programming"]
        );
        assert_eq!(
            tokenize("add-topic 'Bit \"Tricks\"'").unwrap(),
            vec!["add-topic", "Bit \"Tricks\""]
        );
    }

    #[test]
    fn empty_quotes_are_a_token() {
        assert_eq!(tokenize("add-topic \"\"").unwrap(), vec!["add-topic", ""]);
    }

    #[test]
    fn escapes_are_literal() {
        assert_eq!(
            tokenize(r#"search a\ b "c\"d""#).unwrap(),
            vec!["search", "a b", "c\"d"]
        );
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(tokenize("add-topic \"Graphs").is_err());
    }

    #[test]
    fn shell_commands_parse() {
        let parsed = ShellLine::try_parse_from(["quit"]).unwrap();
        assert!(matches!(parsed.command, ShellCommand::Exit));

        let parsed = ShellLine::try_parse_from(["search", "two", "sum"]).unwrap();
        let ShellCommand::Search { query } = parsed.command else {
            panic!("expected search");
        };
        assert_eq!(query.join(" "), "two sum");

        let parsed = ShellLine::try_parse_from(["stats"]).unwrap();
        assert!(matches!(
            parsed.command,
            ShellCommand::Sheet(SheetCommand::Stats)
        ));
    }
}
