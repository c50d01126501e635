//! Init command and shared utilities
//!
//! This module contains:
//! - `open_ledger` - Shared utility to open the database and load the ledger
//! - `period_filter` - Month window from optional `--year`/`--month`
//! - `cmd_init` - Initialize the database

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use carnet_core::models::Period;
use carnet_core::{Database, Ledger, TransactionFilter};

/// Open the SQLite file, creating it when missing
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Open the database and load every collection
pub fn open_ledger(db_path: &Path) -> Result<Ledger> {
    let db = open_db(db_path)?;
    Ok(Ledger::open(Arc::new(db)))
}

/// Month window from optional year and month, defaulting to the current month
pub fn period_filter(year: Option<i32>, month: Option<u32>) -> Result<TransactionFilter> {
    let current = Period::current();
    let period = Period::new(year.unwrap_or(current.year), month.unwrap_or(current.month))?;
    Ok(TransactionFilter::new(period))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let ledger = open_ledger(db_path)?;
    println!(
        "   {} transactions, {} budgets, {} objectives",
        ledger.transactions().len(),
        ledger.budgets().len(),
        ledger.objectives().len()
    );

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record a transaction: carnet transactions add \"IGA\" --amount 42.50");
    println!("  2. Set a budget: carnet budgets set Alimentation 400");
    println!("  3. Start web UI: carnet serve");

    Ok(())
}
