//! # taskdesk
//!
//! A small terminal to-do list manager. Tasks carry a short description, an
//! optional category, deadline and priority, and a done flag. They live in
//! memory and are saved to / loaded from a JSON file on demand.
//!
//! ## Usage
//!
//! ### Interactive Menu
//!
//! Run without arguments for the numbered menu:
//!
//! ```bash
//! taskdesk
//! # or explicitly
//! taskdesk menu
//! ```
//!
//! The menu starts with an empty list; pick `8` to open the task file and `7`
//! to save it.
//!
//! ### Full-screen UI
//!
//! ```bash
//! taskdesk ui
//! ```
//!
//! *   `a`: Add task
//! *   `Space`: Toggle done
//! *   `d`: Delete selected task
//! *   `s`: Switch between deadline and priority order
//! *   `/`: Search by name (`Esc` clears)
//! *   `w` / `o`: Save / open the task file
//! *   `D`: Delete all tasks
//! *   `q`: Quit
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! taskdesk add "Buy milk" --category home --deadline 2025-12-01 --priority high
//! taskdesk list --by priority
//! taskdesk done 2 --by priority
//! taskdesk remove 1
//! taskdesk search milk
//! taskdesk clear --force
//! ```
//!
//! Row numbers refer to the listing with the same `--by` order.
//!
//! ## Data Storage
//!
//! The task file is `./tasks.txt` unless `--file` or the `TASKS_DB`
//! environment variable says otherwise.
//!
//! ## Logging
//!
//! Diagnostics go to stderr. Set `TASKDESK_LOG` (e.g. `TASKDESK_LOG=debug`)
//! or pass `-v`.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskdesk::commands::*;
use taskdesk::menu::Menu;
use taskdesk::storage::db_path;
use taskdesk::store::{SortKey, TaskStore};
use taskdesk::tui::run_tui;

const LOG_ENV: &str = "TASKDESK_LOG";

#[derive(Parser)]
#[command(name = "taskdesk")]
#[command(about = "Simple terminal to-do list manager", long_about = None)]
struct Cli {
    /// Task file (defaults to $TASKS_DB, then ./tasks.txt)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task description, at most 30 characters (quoted if it has spaces)
        description: String,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
        /// Deadline in YYYY-MM-DD
        #[arg(short, long)]
        deadline: Option<String>,
        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// List tasks
    List {
        /// Sort order
        #[arg(short, long, value_enum, default_value_t = SortKey::Deadline)]
        by: SortKey,
    },
    /// Toggle a task between done and not done
    Done {
        /// Row number from `list`
        index: usize,
        /// Order the row number refers to
        #[arg(short, long, value_enum, default_value_t = SortKey::Deadline)]
        by: SortKey,
    },
    /// Remove a task
    Remove {
        /// Row number from `list`
        index: usize,
        /// Order the row number refers to
        #[arg(short, long, value_enum, default_value_t = SortKey::Deadline)]
        by: SortKey,
    },
    /// Search tasks by description
    Search {
        query: String,
    },
    /// Delete all tasks
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Open the numbered menu
    Menu,
    /// Open interactive TUI
    Ui,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

/// Installs the stderr subscriber.
///
/// The TUI owns the terminal, so it only gets logs when `TASKDESK_LOG` is set.
fn init_logging(verbose: bool, tui: bool) {
    let filter = if verbose {
        EnvFilter::new("taskdesk=debug")
    } else {
        match EnvFilter::try_from_env(LOG_ENV) {
            Ok(filter) => filter,
            Err(_) if tui => return,
            Err(_) => EnvFilter::new("warn"),
        }
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, matches!(cli.command, Some(Commands::Ui)));
    let path = db_path(cli.file);

    match cli.command {
        Some(Commands::Add { description, category, deadline, priority }) => cmd_add(&path, description, category, deadline, priority, false),
        Some(Commands::List { by }) => cmd_list(&path, by),
        Some(Commands::Done { index, by }) => cmd_done(&path, index, by, false),
        Some(Commands::Remove { index, by }) => cmd_remove(&path, index, by, false),
        Some(Commands::Search { query }) => cmd_search(&path, query),
        Some(Commands::Clear { force }) => cmd_clear(&path, force),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "taskdesk", &mut io::stdout());
        }
        Some(Commands::Ui) => {
            if let Err(e) = run_tui(&path) {
                eprintln!("Error running TUI: {}", e);
            }
        }
        Some(Commands::Menu) | None => {
            let mut store = TaskStore::new();
            let stdin = io::stdin();
            let mut menu = Menu::new(&mut store, &path, stdin.lock(), io::stdout());
            if let Err(e) = menu.run() {
                eprintln!("Error running menu: {}", e);
            }
        }
    }
}
