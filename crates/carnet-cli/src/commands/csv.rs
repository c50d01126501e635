//! CSV import/export command implementations

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use carnet_core::{ImportSummary, Ledger};

use super::period_filter;

fn report_import(summary: Option<ImportSummary>, what: &str) {
    match summary {
        Some(summary) => println!("✅ Replaced {} with {} row(s)", what, summary.imported),
        None => println!("File has no data rows; {} left unchanged", what),
    }
}

pub fn cmd_import_transactions(ledger: &mut Ledger, file: &Path) -> Result<()> {
    println!("📥 Importing transactions from {}...", file.display());
    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let summary = ledger.import_transactions(reader)?;
    report_import(summary, "transactions");
    Ok(())
}

pub fn cmd_import_objectives(ledger: &mut Ledger, file: &Path) -> Result<()> {
    println!("📥 Importing objectives from {}...", file.display());
    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let summary = ledger.import_objectives(reader)?;
    report_import(summary, "objectives");
    Ok(())
}

fn write_output(csv: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, csv).with_context(|| format!("Failed to write {}", path.display()))?;
            let rows = csv.lines().count().saturating_sub(1);
            eprintln!("✅ Exported {} row(s) to {}", rows, path.display());
        }
        None => print!("{}", csv),
    }
    Ok(())
}

/// Without `year`/`month` every transaction is exported
pub fn cmd_export_transactions(
    ledger: &Ledger,
    output: Option<&Path>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let csv = if year.is_some() || month.is_some() {
        ledger.export_transactions(Some(&period_filter(year, month)?))?
    } else {
        ledger.export_transactions(None)?
    };
    write_output(&csv, output)
}

pub fn cmd_export_objectives(ledger: &Ledger, output: Option<&Path>) -> Result<()> {
    let csv = ledger.export_objectives()?;
    write_output(&csv, output)
}
