//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `assistant` - Assistant question (ask)
//! - `budgets` - Budget commands (list, set, delete) and advice
//! - `classifier` - Category suggestion and learning
//! - `csv` - CSV import/export commands
//! - `objectives` - Savings objective commands
//! - `preferences` - Theme commands
//! - `serve` - Web server command
//! - `shared` - Init command and shared utilities (open_ledger, period_filter)
//! - `status` - Status command
//! - `transactions` - Transaction commands (list, add, delete, summary)

pub mod assistant;
pub mod budgets;
pub mod classifier;
pub mod csv;
pub mod objectives;
pub mod preferences;
pub mod serve;
pub mod shared;
pub mod status;
pub mod transactions;

// Re-export command functions for main.rs
pub use assistant::*;
pub use budgets::*;
pub use classifier::*;
pub use csv::*;
pub use objectives::*;
pub use preferences::*;
pub use serve::*;
pub use shared::*;
pub use status::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Colour a signed amount: red for expenses, green for income
pub fn colored_amount(amount: f64) -> String {
    let text = carnet_core::budget::format_money(amount);
    if amount < 0.0 {
        format!("\x1b[31m{}\x1b[0m", text)
    } else {
        format!("\x1b[32m+{}\x1b[0m", text)
    }
}
