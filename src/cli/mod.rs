pub mod backup;
pub mod browse;
pub mod entry;
pub mod export;
pub mod init;
pub mod load;
pub mod show;
pub mod status;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::Result;
use crate::render::TerminalRenderer;
use crate::session::Session;
use crate::settings::{load_settings, Settings};
use crate::storage::SqliteStorage;

pub(crate) type CliSession = Session<SqliteStorage, TerminalRenderer<std::io::Stdout>>;

/// Open the configured database, creating the data directory on first use.
pub(crate) fn open_storage(settings: &Settings) -> Result<SqliteStorage> {
    std::fs::create_dir_all(&settings.data_dir)?;
    SqliteStorage::open(&settings.db_path())
}

/// Open the configured ledger for a one-shot command, printing to stdout.
pub(crate) fn open_session() -> Result<CliSession> {
    let settings = load_settings();
    let storage = open_storage(&settings)?;
    Session::open(
        storage,
        TerminalRenderer::new(std::io::stdout()),
        &settings.currency_suffix,
    )
}

#[derive(Parser)]
#[command(name = "kakeibo", about = "Personal expense ledger with a running total and category breakdown.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up kakeibo: choose a data directory and initialize the database.
    Init {
        /// Path for kakeibo data (default: ~/Documents/kakeibo)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Record an expense, then show the table and breakdown.
    Add {
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Category label, e.g. 'Food'
        #[arg(long)]
        category: String,
        /// Short description
        #[arg(long)]
        memo: String,
        /// Amount, e.g. 1200 or 45.50
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },
    /// Delete an expense by ID, then show the table and breakdown.
    Delete {
        /// Expense ID (shown in `kakeibo list`)
        id: i64,
    },
    /// Show all expenses with the running total.
    List,
    /// Show the category breakdown.
    Chart,
    /// Show the expense table and the category breakdown.
    Show,
    /// Write the ledger to a file or stdout.
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Output path (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Switch to an existing kakeibo data directory.
    Load {
        /// Path to data directory containing kakeibo.db
        path: String,
    },
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/kakeibo-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Interactive dashboard (default when no command is given).
    Browse,
    /// Show the current data directory and ledger summary.
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}
