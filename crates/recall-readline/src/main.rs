use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tokio::sync::mpsc;

use recall_core::{FilteringHistory, HistoryStore, InMemoryHistoryStore};
use recall_infrastructure::FileHistoryStore;

mod config;
use config::ConfigRoot;

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/help".to_string(),
                "/history".to_string(),
                "/describe-pr".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Opens the configured history file, falling back to an in-memory store
/// when the filesystem is unavailable.
fn open_backing(config: &ConfigRoot) -> Arc<dyn HistoryStore> {
    let store = match &config.history.path {
        Some(path) => FileHistoryStore::new(path),
        None => FileHistoryStore::default_location(),
    };

    match store {
        Ok(store) => Arc::new(store),
        Err(err) => {
            eprintln!(
                "{}",
                format!("History file unavailable ({}); history will not persist", err).yellow()
            );
            Arc::new(InMemoryHistoryStore::new())
        }
    }
}

/// Builds the instruction block the PR-description automation sends through
/// the input channel. Deliberately shaped like the tool's other prompt
/// templates: imperative preamble plus a numbered step list.
fn build_pr_description_instructions() -> String {
    [
        "Generate a comprehensive PR description for my current branch changes. Follow these steps:",
        "",
        "1. Discover the changes: find the base branch and the list of changed files.",
        "2. Analyze the code: read the modified files and summarize what changed and why.",
        "3. Generate a structured description with summary, changes, and test notes.",
        "4. Create a markdown file with the final description.",
        "5. Make it review-ready.",
    ]
    .join("\n")
}

/// Routes automation-generated text through the same input path as typed
/// lines. The guard keeps it out of persistent history on every exit path.
fn dispatch_generated(history: &FilteringHistory, input: &str) {
    let _guard = history.automated();

    if let Err(err) = history.store_string(input) {
        eprintln!("{}", format!("History error: {}", err).red());
    }

    println!("{}", "[automation] dispatching generated instructions".bright_magenta());
    for line in input.lines() {
        println!("{}", format!("| {}", line).bright_black());
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  {}        Show this help", "/help".bright_cyan());
    println!("  {}     Show recalled user history", "/history".bright_cyan());
    println!(
        "  {} Inject generated PR instructions through the input channel",
        "/describe-pr".bright_cyan()
    );
    println!("  {}         Exit the REPL", "quit".bright_cyan());
}

fn show_history(history: &FilteringHistory) {
    for item in history.load_history_strings() {
        match item {
            Ok(entry) => {
                for line in entry.lines() {
                    println!("  {}", line.green());
                }
            }
            Err(err) => {
                eprintln!("{}", format!("History error: {}", err).red());
                break;
            }
        }
    }
}

/// The main entry point for the Recall readline REPL.
///
/// Sets up a rustyline-based REPL that:
/// 1. Loads optional configuration from ~/.recall/config.toml
/// 2. Wraps the history file in the filtering decorator
/// 3. Preloads the line editor with recalled user entries
/// 4. Persists every accepted line through the filter
/// 5. Demonstrates automation injecting generated instructions without
///    polluting history
#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigRoot::load().unwrap_or_else(|err| {
        eprintln!(
            "{}",
            format!("Config error: {:#}. Using defaults.", err).yellow()
        );
        ConfigRoot::default()
    });

    let backing = open_backing(&config);
    let history = Arc::new(FilteringHistory::with_classifier(
        backing,
        config.classifier(),
    ));

    // Channel through which automation injects text into the input path
    let (inject_tx, mut inject_rx) = mpsc::channel::<String>(8);

    // Handle injected input in the background, like typed input would be
    let injector_history = Arc::clone(&history);
    let injector = tokio::spawn(async move {
        while let Some(input) = inject_rx.recv().await {
            dispatch_generated(&injector_history, &input);
        }
    });

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    // Preload the line editor with previously recalled user entries
    for item in history.load_history_strings() {
        match item {
            Ok(entry) => {
                let _ = rl.add_history_entry(entry);
            }
            Err(err) => {
                eprintln!("{}", format!("History error: {}", err).red());
                break;
            }
        }
    }

    println!("{}", "=== Recall REPL ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/help' for commands, '/describe-pr' to watch automation inject input, or 'quit' to exit."
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                // Handle quit command
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                // Skip empty lines
                if trimmed.is_empty() {
                    continue;
                }

                // Record the line: rustyline for in-session recall, the
                // filtering decorator for persistence
                let _ = rl.add_history_entry(&line);
                if let Err(err) = history.store_string(&line) {
                    eprintln!("{}", format!("History error: {}", err).red());
                }

                match trimmed {
                    "/help" => print_help(),
                    "/history" => show_history(&history),
                    "/describe-pr" => {
                        println!("{}", "Preparing PR description automation...".bright_black());
                        let tx = inject_tx.clone();
                        tokio::spawn(async move {
                            let instructions = build_pr_description_instructions();
                            let _ = tx.send(instructions).await;
                        });
                    }
                    _ if trimmed.starts_with('/') => {
                        println!("{}", "Unknown command".bright_black());
                    }
                    _ => {
                        // No agent backend is wired up here; the input was
                        // still recorded through the filter
                        println!("{}", format!("> {}", trimmed).green());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Drop the channel to signal shutdown
    drop(inject_tx);

    // Wait for the injector to finish
    let _ = injector.await;

    Ok(())
}
