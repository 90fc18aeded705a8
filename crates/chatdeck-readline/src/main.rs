use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use chatdeck_application::HistoryController;
use chatdeck_core::SessionStore;
use chatdeck_infrastructure::export_file::{export_to_dir, import_from_file};
use chatdeck_infrastructure::{ConfigService, FileHistorySlot};
use chatdeck_interaction::build_gateway;

mod commands;
mod display;

use commands::{COMMANDS, Command};

#[derive(Parser)]
#[command(name = "chatdeck")]
#[command(about = "chatdeck - terminal chat client with durable multi-session history", long_about = None)]
struct Cli {
    /// Config file to read instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where conversations are persisted
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Completion endpoint, overriding config and environment
    #[arg(long)]
    endpoint: Option<String>,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _)| name.to_string()).collect(),
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

        if line.starts_with('/') && !line.contains(' ') {
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

type ChatEditor = Editor<CliHelper, DefaultHistory>;

/// Logs go to stderr so they never interleave with the transcript.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_help() {
    println!("{}", "Type a message to chat, or one of:".bright_black());
    for (name, about) in COMMANDS {
        println!("  {}  {}", format!("{name:<9}").bright_cyan(), about);
    }
    println!("  {}  {}", format!("{:<9}", "quit").bright_cyan(), "leave chatdeck");
}

fn confirm(rl: &mut ChatEditor, question: &str) -> bool {
    match rl.readline(&format!("{question} (y/N) ")) {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn print_current(controller: &HistoryController) {
    if let Some(session) = controller.current_session() {
        display::print_transcript(&session);
    }
}

/// Runs every command except sending a turn.
fn run_command(
    command: Command,
    controller: &HistoryController,
    rl: &mut ChatEditor,
) -> chatdeck_core::Result<()> {
    match command {
        Command::New => {
            controller.new_session()?;
            println!("{}", "Started a new conversation".bright_green());
        }
        Command::History => {
            let view = controller.view();
            let current_id = view.current_session.as_ref().map(|s| s.id.as_str());
            display::print_sessions(&view.sessions, current_id);
        }
        Command::Switch(target) => {
            let sessions = controller.sessions();
            let Some(session) = commands::resolve_target(&sessions, &target) else {
                println!("{}", format!("No conversation matches '{target}'").yellow());
                return Ok(());
            };
            if let Some(session) = controller.switch_session(&session.id)? {
                display::print_transcript(&session);
            }
        }
        Command::Delete(target) => {
            let sessions = controller.sessions();
            let Some(session) = commands::resolve_target(&sessions, &target) else {
                println!("{}", format!("No conversation matches '{target}'").yellow());
                return Ok(());
            };
            if confirm(rl, &format!("Delete '{}'?", session.title)) {
                controller.delete_session(&session.id)?;
                println!("{}", format!("Deleted '{}'", session.title).bright_green());
            }
        }
        Command::Clear => {
            if confirm(rl, "Delete all conversations?") {
                controller.clear_all()?;
                println!("{}", "History cleared".bright_green());
            }
        }
        Command::Export(dir) => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let path = export_to_dir(controller.store(), &dir)?;
            println!("{}", format!("Exported to {}", path.display()).bright_green());
        }
        Command::Import(path) => {
            let history = import_from_file(controller.store(), &path)?;
            controller.reload()?;
            println!(
                "{}",
                format!("Imported {} conversations", history.sessions.len()).bright_green()
            );
            print_current(controller);
        }
        Command::Stats => {
            for line in display::stats_lines(&controller.stats()) {
                println!("{line}");
            }
        }
        Command::Help => print_help(),
        Command::Usage(usage) => println!("{}", format!("Usage: {usage}").yellow()),
        Command::Unknown(name) => {
            println!("{}", format!("Unknown command {name}, try /help").bright_black())
        }
        Command::Send(_) | Command::Quit => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // ===== Configuration =====
    let mut config = ConfigService::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.gateway.endpoint = Some(endpoint);
    }
    if let Some(path) = &cli.history_file {
        config.storage.history_file = Some(path.to_string_lossy().into_owned());
    }

    // ===== Backend Initialization =====
    let history_path = ConfigService::history_file(&config)?;
    tracing::info!("Using history file {}", history_path.display());
    let store = Arc::new(SessionStore::new(Arc::new(FileHistorySlot::new(history_path))));
    let gateway =
        build_gateway(&config.gateway).context("failed to set up the completion gateway")?;
    let controller = HistoryController::new(
        store,
        gateway,
        Duration::from_secs(config.gateway.timeout_secs),
    )?;

    // ===== REPL Setup =====
    let mut rl: ChatEditor = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== chatdeck ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();
    print_current(&controller);

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let Some(command) = commands::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());

                match command {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Send(text) => {
                        println!("{}", "Thinking...".bright_black());
                        match controller.send_user_turn(&text).await {
                            Ok(reply) => display::print_message(&reply),
                            Err(e) => display::print_send_failure(&e),
                        }
                    }
                    command => {
                        if let Err(e) = run_command(command, &controller, &mut rl) {
                            eprintln!("{}", format!("Error: {e}").red());
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
