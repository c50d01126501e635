//! Budget and advice command implementations

use anyhow::Result;
use carnet_core::budget::{format_money, UsageLevel};
use carnet_core::models::NewBudget;
use carnet_core::{Ledger, UpsertOutcome};

use super::period_filter;

fn level_marker(level: UsageLevel) -> &'static str {
    match level {
        UsageLevel::None => "·",
        UsageLevel::Ok => "🟢",
        UsageLevel::Warn => "🟠",
        UsageLevel::Crit => "🔴",
    }
}

pub fn cmd_budgets_list(
    ledger: &Ledger,
    year: Option<i32>,
    month: Option<u32>,
    json: bool,
) -> Result<()> {
    let filter = period_filter(year, month)?;
    let report = ledger.budget_report(&filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.rows.is_empty() {
        println!("No budgets for {}. Set one with:", report.period);
        println!("  carnet budgets set Alimentation 400");
        return Ok(());
    }

    println!();
    println!("💰 Budgets {}", report.period);
    println!("   ─────────────────────────────────────────────────────────────");

    for row in &report.rows {
        println!(
            "   {} {:<16} │ {:>12} / {:<12} │ {:>8} (#{})",
            level_marker(row.state.level),
            row.budget.category,
            format_money(row.spent),
            format_money(row.budget.amount),
            row.state.label,
            row.budget.id
        );
    }

    if let Some(banner) = &report.banner {
        println!();
        println!("   {}", banner.message);
    }
    Ok(())
}

pub fn cmd_budgets_set(
    ledger: &mut Ledger,
    category: &str,
    amount: f64,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let period = period_filter(year, month)?.period;
    let outcome = ledger.upsert_budget(NewBudget {
        category: category.to_string(),
        amount,
        month: period.month,
        year: period.year,
    })?;

    match outcome {
        UpsertOutcome::Created(id) => {
            println!("✅ Budget {} {} for {} (#{})", category, format_money(amount), period, id)
        }
        UpsertOutcome::Replaced(id) => println!(
            "✅ Budget #{} for {} now capped at {}",
            id,
            period,
            format_money(amount)
        ),
    }
    Ok(())
}

pub fn cmd_budgets_delete(ledger: &mut Ledger, id: i64) -> Result<()> {
    ledger.remove_budget(id)?;
    println!("🗑️  Deleted budget #{}", id);
    Ok(())
}

pub fn cmd_advice(ledger: &Ledger, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let filter = period_filter(year, month)?;
    let advice = ledger.advice(&filter);

    if advice.is_empty() {
        println!("No spending recorded for {}.", filter.period);
        return Ok(());
    }

    println!();
    println!("🧭 Advice {}", filter.period);
    println!("   ─────────────────────────────────────────────────────────────");

    if !advice.top_spenders.is_empty() {
        println!("   Top spending:");
        for (i, top) in advice.top_spenders.iter().enumerate() {
            println!("     {}. {} ({})", i + 1, top.category, format_money(top.spent));
        }
    }

    if !advice.over_budget.is_empty() {
        println!("   Over budget:");
        for over in &advice.over_budget {
            println!(
                "     🔴 {}: {} / {} (+{})",
                over.category,
                format_money(over.spent),
                format_money(over.cap),
                format_money(over.overage)
            );
        }
    }

    if !advice.actions.is_empty() {
        println!("   Actions:");
        for action in &advice.actions {
            println!("     • {}", action);
        }
    }
    Ok(())
}
