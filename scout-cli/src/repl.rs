//! Interactive session over a built [`Dashboard`].

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::dashboard::{Action, Dashboard, OutputFormat};

/// Top-N used when `top` is given no count.
pub const DEFAULT_TOP_N: usize = 5;
/// Largest top-N the shell accepts.
pub const MAX_TOP_N: usize = 20;

const HELP: &str = "\
Commands:
  player <name>          stats for the first player whose name contains <name>
  top <metric> [n]       top n players by a metric (default 5, at most 20)
  ask <question>         ask the scouting reports
  metrics                list rankable metrics
  status                 show what was loaded
  help                   show this message
  quit                   leave the session
Anything else is asked of the scouting reports.";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Action),
    Help,
    Quit,
}

/// Parse one input line. Blank lines parse to `None`.
///
/// # Errors
///
/// Returns a usage message for malformed commands.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "metrics" => Command::Run(Action::Metrics),
        "status" => Command::Run(Action::Status),
        "player" if rest.is_empty() => return Err("usage: player <name>".to_string()),
        "player" => Command::Run(Action::Player { name: rest.to_string() }),
        "ask" if rest.is_empty() => return Err("usage: ask <question>".to_string()),
        "ask" => Command::Run(Action::Ask { question: rest.to_string() }),
        "top" => {
            let mut parts = rest.split_whitespace();
            let Some(metric) = parts.next() else {
                return Err("usage: top <metric> [n]".to_string());
            };
            let top_n = match parts.next() {
                None => DEFAULT_TOP_N,
                Some(n) => parse_top_n(n)?,
            };
            if parts.next().is_some() {
                return Err("usage: top <metric> [n]".to_string());
            }
            Command::Run(Action::Top { metric: metric.to_string(), top_n })
        }
        _ => Command::Run(Action::Ask { question: line.to_string() }),
    };
    Ok(Some(command))
}

/// Parse a top-N count in `1..=MAX_TOP_N`.
///
/// # Errors
///
/// Returns a message naming the accepted range.
pub fn parse_top_n(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if (1..=MAX_TOP_N).contains(&n) => Ok(n),
        _ => Err(format!("n must be a whole number from 1 to {MAX_TOP_N}, got '{raw}'")),
    }
}

/// Read commands until `quit` or end of input, printing each result.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read.
pub async fn run(dashboard: &Dashboard, format: OutputFormat) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("{}\n", dashboard.run(&Action::Status, OutputFormat::Text).await);
    println!("Type `help` for commands.");

    loop {
        let line = match editor.readline("scout> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = editor.add_history_entry(line.trim());

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Run(action))) => {
                debug!(?action, "running action");
                println!("{}", dashboard.run(&action, format).await);
            }
            Err(usage) => println!("{usage}"),
        }
    }
    Ok(())
}
