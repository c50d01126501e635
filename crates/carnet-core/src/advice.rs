//! Savings advice for a month of transactions
//!
//! Stateless: derived from the filtered transactions and the budgets of the
//! same window, recomputed on every request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::budget::{normalize_category, spent_by_category};
use crate::models::{Budget, Period, Transaction};

/// How many top spending categories to report
pub const TOP_SPENDERS: usize = 3;

/// Share of a positive balance suggested for savings
const SAVINGS_SHARE: f64 = 0.2;

/// Smallest savings transfer suggested
const MIN_SAVINGS_TRANSFER: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSpender {
    pub category: String,
    pub spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overage {
    pub category: String,
    pub spent: f64,
    pub cap: f64,
    pub overage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Cut an over-budget category back under its cap
    Reduce { category: String, amount: f64 },
    /// Renegotiate the most expensive category
    Negotiate { category: String },
    /// Put a weekly cap on the second most expensive category
    WeeklyCap { category: String },
    /// Move part of a positive balance to savings
    Save { amount: i64 },
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reduce { category, amount } => write!(
                f,
                "Réduire {} d’environ {} $ pour revenir sous le budget.",
                category,
                amount.round() as i64
            ),
            Self::Negotiate { category } => write!(
                f,
                "Négocier ou substituer dans \"{}\" (catégorie la plus coûteuse ce mois-ci).",
                category
            ),
            Self::WeeklyCap { category } => write!(
                f,
                "Fixer un plafond hebdo pour \"{}\" (enveloppe cash/compte séparé).",
                category
            ),
            Self::Save { amount } => write!(
                f,
                "Transférer {} $ vers un objectif d’épargne (20% du solde).",
                amount
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub top_spenders: Vec<TopSpender>,
    /// Largest overage first
    pub over_budget: Vec<Overage>,
    pub recommendations: Vec<Recommendation>,
    /// Rendered recommendation texts, same order
    pub actions: Vec<String>,
}

impl Advice {
    /// Nothing to report
    pub fn is_empty(&self) -> bool {
        self.top_spenders.is_empty() && self.over_budget.is_empty() && self.actions.is_empty()
    }
}

/// Categories whose net total over the set is negative, largest first
pub fn top_spenders(transactions: &[Transaction], limit: usize) -> Vec<TopSpender> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for tx in transactions {
        let entry = totals.entry(tx.category.as_str()).or_insert_with(|| {
            order.push(tx.category.as_str());
            0.0
        });
        *entry += tx.amount;
    }

    let mut spenders: Vec<TopSpender> = order
        .into_iter()
        .filter_map(|category| {
            let total = totals.get(category).copied().unwrap_or(0.0);
            (total < 0.0).then(|| TopSpender {
                category: category.to_string(),
                spent: total.abs(),
            })
        })
        .collect();

    spenders.sort_by(|a, b| b.spent.total_cmp(&a.spent));
    spenders.truncate(limit);
    spenders
}

/// Budgets of the window whose spending exceeds a positive cap
pub fn over_budget(budgets: &[Budget], period: Period, transactions: &[Transaction]) -> Vec<Overage> {
    let spent = spent_by_category(transactions);

    let mut overages: Vec<Overage> = budgets
        .iter()
        .filter(|b| b.year == period.year && b.month == period.month)
        .filter_map(|b| {
            let used = spent
                .get(&normalize_category(&b.category))
                .copied()
                .unwrap_or(0.0);
            (b.amount > 0.0 && used > b.amount).then(|| Overage {
                category: b.category.clone(),
                spent: used,
                cap: b.amount,
                overage: used - b.amount,
            })
        })
        .collect();

    overages.sort_by(|a, b| b.overage.total_cmp(&a.overage));
    overages
}

/// Build the advice for one window
pub fn advise(budgets: &[Budget], period: Period, transactions: &[Transaction]) -> Advice {
    let top = top_spenders(transactions, TOP_SPENDERS);
    let over = over_budget(budgets, period, transactions);
    let balance: f64 = transactions.iter().map(|t| t.amount).sum();

    let mut recommendations: Vec<Recommendation> = over
        .iter()
        .map(|o| Recommendation::Reduce {
            category: o.category.clone(),
            amount: o.overage,
        })
        .collect();

    if let Some(first) = top.first() {
        recommendations.push(Recommendation::Negotiate {
            category: first.category.clone(),
        });
    }
    if let Some(second) = top.get(1) {
        recommendations.push(Recommendation::WeeklyCap {
            category: second.category.clone(),
        });
    }
    if balance > 0.0 {
        let amount = ((balance * SAVINGS_SHARE).floor() as i64).max(MIN_SAVINGS_TRANSFER);
        recommendations.push(Recommendation::Save { amount });
    }

    let actions = recommendations.iter().map(ToString::to_string).collect();

    Advice {
        top_spenders: top,
        over_budget: over,
        recommendations,
        actions,
    }
}
