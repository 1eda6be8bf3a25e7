// lineedit-core - Command history, color markup and cursor tracking for line editors
// Copyright (C) 2025  lineedit-core contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lineedit_core::{Config, CrosstermSink, RecordingSink, Session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LINEEDIT_LOG";

#[derive(Debug, Parser)]
#[command(name = "lineedit", version, about = "Inspect line-editor history and tracked output")]
struct Cli {
    /// Config file (defaults to <config dir>/lineedit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History file (overrides config and LINEEDIT_HISTORY_FILE)
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,

    /// Entries kept when saving history; negative means unlimited
    #[arg(long, global = true, allow_hyphen_values = true)]
    history_length: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read or modify the history file
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Write text with color markup and report cursor and scroll
    Render {
        /// Text to write; understands \e \n \r \t \a \b and \\
        text: String,
        #[arg(long, default_value_t = 80)]
        width: u16,
        #[arg(long, default_value_t = 24)]
        height: u16,
        /// Starting column
        #[arg(long, default_value_t = 0)]
        x: u16,
        /// Starting row
        #[arg(long, default_value_t = 0)]
        y: u16,
        /// Write to the terminal instead of recording
        #[arg(long)]
        live: bool,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    /// Print all entries, oldest first
    List,
    /// Append a line and save
    Add { line: String },
    /// Incremental search from the newest entry
    Search {
        query: String,
        /// Search toward newer entries, starting from the oldest
        #[arg(long)]
        forward: bool,
        /// Repeat the search this many times
        #[arg(long, default_value_t = 1)]
        repeat: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref());
    if let Some(file) = cli.history_file {
        config.history_file = file;
    }
    if let Some(length) = cli.history_length {
        config.history_length = length;
    }
    tracing::debug!(?config, "resolved config");

    let mut session = Session::new(&config);
    match cli.command {
        Command::History { action } => run_history(&mut session, action),
        Command::Render { text, width, height, x, y, live } => {
            run_render(&mut session, &unescape(&text), (width, height), (x, y), live)
        }
    }
}

fn run_history(session: &mut Session, action: HistoryAction) -> anyhow::Result<()> {
    session.load_history();
    match action {
        HistoryAction::List => {
            for (i, entry) in session.history.entries().enumerate() {
                println!("{:>5}  {}", i + 1, entry.text());
            }
        }
        HistoryAction::Add { line } => {
            session.history.add(&line);
            session.save_history().with_context(|| {
                format!("failed to save history to {}", session.history_file().display())
            })?;
        }
        HistoryAction::Search { query, forward, repeat } => {
            if forward {
                session.history.set_cursor(0);
            }
            let mut found = String::new();
            for _ in 0..repeat.max(1) {
                found = if forward {
                    session.history.forward_search(&query)
                } else {
                    session.history.reverse_search(&query)
                };
            }
            if found.is_empty() {
                println!("(no history)");
            } else {
                println!("{:>5}  {found}", session.history.cursor() + 1);
            }
        }
    }
    Ok(())
}

fn run_render(
    session: &mut Session,
    text: &str,
    (width, height): (u16, u16),
    (x, y): (u16, u16),
    live: bool,
) -> anyhow::Result<()> {
    if live {
        let mut sink = CrosstermSink::stdout();
        let outcome = session.write(&mut sink, text).context("terminal write failed")?;
        eprintln!();
        eprintln!("cursor: {:?}  scroll: {}", outcome.cursor, outcome.scroll);
        return Ok(());
    }

    let mut sink = RecordingSink::new(width, height).at(x, y);
    let outcome = session.write(&mut sink, text)?;
    for (word, chunk) in sink.records() {
        println!("{word:#06x}  {chunk:?}");
    }
    println!("cursor: {:?}  scroll: {}", outcome.cursor, outcome.scroll);
    Ok(())
}

/// Expand the backslash escapes accepted on the command line.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('e') => out.push('\x1b'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unescape_expands_known_sequences() {
        assert_eq!(unescape(r"\e[31mred\e[0m\n"), "\x1b[31mred\x1b[0m\n");
        assert_eq!(unescape(r"a\tb\\c"), "a\tb\\c");
    }

    #[test]
    fn unescape_keeps_unknown_and_trailing_backslash() {
        assert_eq!(unescape(r"\q\"), "\\q\\");
    }

    #[test]
    fn cli_parses_negative_history_length() {
        let cli = Cli::try_parse_from(["lineedit", "--history-length", "-1", "history", "list"])
            .unwrap();
        assert_eq!(cli.history_length, Some(-1));
        assert!(matches!(cli.command, Command::History { action: HistoryAction::List }));
    }

    #[test]
    fn cli_render_defaults_to_standard_terminal() {
        let cli = Cli::try_parse_from(["lineedit", "render", "hi"]).unwrap();
        let Command::Render { width, height, live, .. } = cli.command else {
            panic!("expected render");
        };
        assert_eq!((width, height, live), (80, 24, false));
    }
}
