//! Transaction command implementations

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use carnet_core::budget::format_money;
use carnet_core::models::TransactionKind;
use carnet_core::{Ledger, TransactionInput};

use super::{colored_amount, period_filter, truncate};

pub fn cmd_transactions_list(
    ledger: &Ledger,
    year: Option<i32>,
    month: Option<u32>,
    search: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut filter = period_filter(year, month)?;
    if let Some(search) = search {
        filter = filter.with_search(search);
    }
    if let Some(category) = category {
        filter = filter.with_category(category);
    }

    let transactions = ledger.filtered(&filter);
    let balance = carnet_core::stores::balance(&transactions);

    if json {
        let out = serde_json::json!({
            "period": filter.period,
            "transactions": transactions,
            "balance": balance,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if transactions.is_empty() {
        println!("No transactions for {}. Add one with:", filter.period);
        println!("  carnet transactions add \"Description\" --amount 12.50");
        return Ok(());
    }

    println!();
    println!("📝 Transactions {}", filter.period);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &transactions {
        println!(
            "   {} │ {:>14} │ {:<14} │ {} (#{})",
            tx.date,
            colored_amount(tx.amount),
            truncate(&tx.category, 14),
            truncate(&tx.description, 32),
            tx.id
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Balance: {}", colored_amount(balance));
    Ok(())
}

/// Record a transaction; without `category` the suggestion is used and
/// shown, and the commit follows the same learning rule as the web form.
pub fn cmd_transactions_add(
    ledger: &mut Ledger,
    kind: TransactionKind,
    description: &str,
    amount: f64,
    date: Option<NaiveDate>,
    category: Option<&str>,
    custom: Option<&str>,
) -> Result<()> {
    let suggestion = ledger.suggest(description, amount);
    let category = match category {
        Some(category) => category.to_string(),
        None => {
            println!(
                "   💡 Suggested category: {} ({:.0}%)",
                suggestion.category,
                suggestion.score * 100.0
            );
            suggestion.category.clone()
        }
    };

    let tx = ledger.commit_transaction(TransactionInput {
        kind,
        description: description.to_string(),
        amount,
        date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
        category,
        custom_category: custom.map(str::to_string),
        suggestion: Some(suggestion),
        edit_id: None,
    })?;

    println!(
        "✅ {} {} │ {} │ {} (#{})",
        tx.kind,
        colored_amount(tx.amount),
        tx.category,
        tx.date,
        tx.id
    );
    Ok(())
}

pub fn cmd_transactions_delete(ledger: &mut Ledger, id: i64) -> Result<()> {
    ledger.delete_transaction(id)?;
    println!("🗑️  Deleted transaction #{}", id);
    Ok(())
}

pub fn cmd_transactions_summary(ledger: &Ledger, year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let months = ledger.annual_summary(year);

    println!();
    println!("📅 Summary {}", year);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Month │ {:>14} │ {:>14} │ {:>14}", "Income", "Expense", "Balance");

    let mut total = 0.0;
    for m in &months {
        total += m.balance;
        println!(
            "   {:>5} │ {:>14} │ {:>14} │ {:>14}",
            m.month,
            format_money(m.income),
            format_money(m.expense),
            format_money(m.balance)
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Year balance: {}", colored_amount(total));
    Ok(())
}
