//! Carnet CLI - Personal finance organizer
//!
//! Usage:
//!   carnet init                          Initialize database
//!   carnet transactions add "IGA" -a 42  Record an expense (category suggested)
//!   carnet budgets set Alimentation 400  Cap a category for the current month
//!   carnet serve --port 3000             Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                static_dir.as_deref(),
                allowed_origins,
            )
            .await
        }
        Commands::Status => commands::cmd_status(&cli.db),
        Commands::Suggest {
            description,
            amount,
        } => {
            let ledger = commands::open_ledger(&cli.db)?;
            commands::cmd_suggest(&ledger, &description, amount)
        }
        Commands::Learn {
            description,
            category,
        } => {
            let mut ledger = commands::open_ledger(&cli.db)?;
            commands::cmd_learn(&mut ledger, &description, &category)
        }
        Commands::Transactions { action } => {
            let mut ledger = commands::open_ledger(&cli.db)?;
            match action {
                None => commands::cmd_transactions_list(&ledger, None, None, None, None, false),
                Some(TransactionsAction::List {
                    period,
                    search,
                    category,
                    json,
                }) => commands::cmd_transactions_list(
                    &ledger,
                    period.year,
                    period.month,
                    search.as_deref(),
                    category.as_deref(),
                    json,
                ),
                Some(TransactionsAction::Add {
                    description,
                    amount,
                    kind,
                    date,
                    category,
                    custom,
                }) => commands::cmd_transactions_add(
                    &mut ledger,
                    kind,
                    &description,
                    amount,
                    date,
                    category.as_deref(),
                    custom.as_deref(),
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&mut ledger, id)
                }
                Some(TransactionsAction::Summary { year }) => {
                    commands::cmd_transactions_summary(&ledger, year)
                }
            }
        }
        Commands::Budgets { action } => {
            let mut ledger = commands::open_ledger(&cli.db)?;
            match action {
                None => commands::cmd_budgets_list(&ledger, None, None, false),
                Some(BudgetsAction::List { period, json }) => {
                    commands::cmd_budgets_list(&ledger, period.year, period.month, json)
                }
                Some(BudgetsAction::Set {
                    category,
                    amount,
                    period,
                }) => commands::cmd_budgets_set(
                    &mut ledger,
                    &category,
                    amount,
                    period.year,
                    period.month,
                ),
                Some(BudgetsAction::Delete { id }) => commands::cmd_budgets_delete(&mut ledger, id),
            }
        }
        Commands::Advice { period } => {
            let ledger = commands::open_ledger(&cli.db)?;
            commands::cmd_advice(&ledger, period.year, period.month)
        }
        Commands::Objectives { action } => {
            let mut ledger = commands::open_ledger(&cli.db)?;
            match action {
                None | Some(ObjectivesAction::List) => commands::cmd_objectives_list(&ledger),
                Some(ObjectivesAction::Add {
                    name,
                    target,
                    saved,
                }) => commands::cmd_objectives_add(&mut ledger, &name, target, saved),
                Some(ObjectivesAction::Contribute { id, delta }) => {
                    commands::cmd_objectives_contribute(&mut ledger, id, delta)
                }
                Some(ObjectivesAction::Delete { id }) => {
                    commands::cmd_objectives_delete(&mut ledger, id)
                }
            }
        }
        Commands::Import { kind, file } => {
            let mut ledger = commands::open_ledger(&cli.db)?;
            match kind {
                CsvKind::Transactions => commands::cmd_import_transactions(&mut ledger, &file),
                CsvKind::Objectives => commands::cmd_import_objectives(&mut ledger, &file),
            }
        }
        Commands::Export {
            kind,
            output,
            period,
        } => {
            let ledger = commands::open_ledger(&cli.db)?;
            match kind {
                CsvKind::Transactions => commands::cmd_export_transactions(
                    &ledger,
                    output.as_deref(),
                    period.year,
                    period.month,
                ),
                CsvKind::Objectives => commands::cmd_export_objectives(&ledger, output.as_deref()),
            }
        }
        Commands::Ask { question } => commands::cmd_ask(&question).await,
        Commands::Theme { action } => {
            let ledger = commands::open_ledger(&cli.db)?;
            match action {
                None => commands::cmd_theme_show(&ledger),
                Some(ThemeAction::Set { theme }) => commands::cmd_theme_set(&ledger, theme),
                Some(ThemeAction::Toggle) => commands::cmd_theme_toggle(&ledger),
            }
        }
    }
}
