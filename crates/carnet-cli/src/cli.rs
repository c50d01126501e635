//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use carnet_core::models::{Theme, TransactionKind};

/// Carnet - Track spending, budgets and savings goals
#[derive(Parser)]
#[command(name = "carnet")]
#[command(about = "Self-hosted personal finance organizer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "carnet.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable; same-origin only when omitted)
        #[arg(long = "allowed-origin")]
        allowed_origins: Vec<String>,
    },

    /// Show database and assistant status
    Status,

    /// Suggest a category for a description
    Suggest {
        /// Transaction description
        description: String,

        /// Amount (sign ignored)
        #[arg(short, long, default_value = "0")]
        amount: f64,
    },

    /// Teach the classifier that a description belongs to a category
    Learn {
        /// Transaction description
        description: String,

        /// Category to associate with its words
        #[arg(short, long)]
        category: String,
    },

    /// Manage transactions (list, add, delete, summary)
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage monthly budgets (list, set, delete)
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Show spending advice for a month
    Advice {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Manage savings objectives (list, add, contribute, delete)
    Objectives {
        #[command(subcommand)]
        action: Option<ObjectivesAction>,
    },

    /// Replace transactions or objectives with the rows of a CSV file
    Import {
        /// What the file holds
        #[arg(value_enum)]
        kind: CsvKind,

        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export transactions or objectives to CSV
    Export {
        /// What to export
        #[arg(value_enum)]
        kind: CsvKind,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        // Month window for transactions; everything when neither is given
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Ask the assistant a question (needs OPENAI_API_KEY)
    Ask {
        /// Question, in any language
        question: String,
    },

    /// Show or change the UI theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

/// Month window selection; both default to the current month
#[derive(clap::Args, Clone, Copy, Debug, Default)]
pub struct PeriodArgs {
    /// Year (e.g. 2025)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month (1-12)
    #[arg(long)]
    pub month: Option<u32>,
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions of a month
    List {
        #[command(flatten)]
        period: PeriodArgs,

        /// Case-insensitive description search
        #[arg(short, long)]
        search: Option<String>,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a transaction (category suggested when omitted)
    Add {
        /// Transaction description
        description: String,

        /// Amount (sign ignored; follows --kind)
        #[arg(short, long)]
        amount: f64,

        /// Dépense or Revenu
        #[arg(short, long, default_value = "Dépense")]
        kind: TransactionKind,

        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Category (suggested from the description if omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text category used with --category Autre
        #[arg(long)]
        custom: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },

    /// Income, expense and balance per month of a year
    Summary {
        /// Year (default current year)
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// Show budgets of a month with their usage
    List {
        #[command(flatten)]
        period: PeriodArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a budget, or replace the cap of an existing one
    Set {
        /// Category
        category: String,

        /// Monthly cap
        amount: f64,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ObjectivesAction {
    /// List objectives with progress
    List,

    /// Add an objective
    Add {
        /// Objective name
        name: String,

        /// Target amount
        target: f64,

        /// Amount already saved
        #[arg(long)]
        saved: Option<f64>,
    },

    /// Add to (or withdraw from, when negative) the saved amount
    Contribute {
        /// Objective ID
        id: i64,

        /// Amount to add
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },

    /// Delete an objective
    Delete {
        /// Objective ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Store a theme (light or dark)
    Set { theme: Theme },

    /// Switch between light and dark
    Toggle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CsvKind {
    Transactions,
    Objectives,
}
