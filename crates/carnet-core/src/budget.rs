//! Budget usage aggregation and the alert banner
//!
//! Spending is matched to budgets by normalized category (trimmed,
//! lowercased); only expenses count.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Budget, Period, Transaction};

/// Usage ratio at which a budget starts warning
pub const WARN_THRESHOLD: f64 = 0.8;

/// Usage ratio above which a budget is exceeded
pub const CRIT_THRESHOLD: f64 = 1.0;

/// Category used when a transaction has none
const DEFAULT_CATEGORY: &str = "Autre";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    /// No positive cap
    None,
    Ok,
    Warn,
    Crit,
}

impl UsageLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Crit => "crit",
        }
    }
}

impl std::fmt::Display for UsageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageState {
    pub level: UsageLevel,
    pub label: String,
    pub ratio: f64,
}

/// Classify `spent` against `cap`
pub fn usage_state(spent: f64, cap: f64) -> UsageState {
    if cap <= 0.0 {
        return UsageState {
            level: UsageLevel::None,
            label: "—".to_string(),
            ratio: 0.0,
        };
    }

    let ratio = spent / cap;
    if ratio < WARN_THRESHOLD {
        UsageState {
            level: UsageLevel::Ok,
            label: "OK".to_string(),
            ratio,
        }
    } else if ratio <= CRIT_THRESHOLD {
        UsageState {
            level: UsageLevel::Warn,
            label: format!("{}%", percent(ratio)),
            ratio,
        }
    } else {
        UsageState {
            level: UsageLevel::Crit,
            label: "Dépassé".to_string(),
            ratio,
        }
    }
}

/// Rounded percentage of a ratio (half away from zero)
pub fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

/// Matching key for budget categories
pub fn normalize_category(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_lowercase()
    } else {
        trimmed.to_lowercase()
    }
}

/// Sum of absolute expense amounts per normalized category
pub fn spent_by_category(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut spent: HashMap<String, f64> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        *spent.entry(normalize_category(&tx.category)).or_insert(0.0) += tx.amount.abs();
    }
    spent
}

/// One budget row of the usage table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUsage {
    pub budget: Budget,
    pub spent: f64,
    pub state: UsageState,
    /// Progress bar fill, 0..=100
    pub progress_pct: f64,
}

/// Budgets of `period` with their spending, sorted by category name
///
/// `transactions` is the (already filtered) set to measure against.
pub fn budget_usage(budgets: &[Budget], period: Period, transactions: &[Transaction]) -> Vec<BudgetUsage> {
    let spent = spent_by_category(transactions);

    let mut rows: Vec<BudgetUsage> = budgets
        .iter()
        .filter(|b| b.year == period.year && b.month == period.month)
        .map(|b| {
            let used = spent
                .get(&normalize_category(&b.category))
                .copied()
                .unwrap_or(0.0);
            let state = usage_state(used, b.amount);
            let progress_pct = if b.amount > 0.0 {
                (state.ratio * 100.0).min(100.0)
            } else {
                0.0
            };
            BudgetUsage {
                budget: b.clone(),
                spent: used,
                state,
                progress_pct,
            }
        })
        .collect();

    rows.sort_by(|a, b| compare_categories(&a.budget.category, &b.budget.category));
    rows
}

/// Case-insensitive, accent-insensitive ordering of category names
pub(crate) fn compare_categories(a: &str, b: &str) -> std::cmp::Ordering {
    crate::classifier::normalize(a)
        .cmp(&crate::classifier::normalize(b))
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub category: String,
    pub level: UsageLevel,
    pub ratio: f64,
    pub spent: f64,
    pub cap: f64,
}

/// Summary line shown above the budget table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBanner {
    /// `Crit` if any entry is exceeded, otherwise `Warn`
    pub severity: UsageLevel,
    pub message: String,
    /// Exceeded entries first, then warnings
    pub entries: Vec<AlertEntry>,
}

/// Build the banner from usage rows; `None` when nothing warns
pub fn alert_banner(usage: &[BudgetUsage]) -> Option<AlertBanner> {
    let alerts = usage
        .iter()
        .filter(|u| matches!(u.state.level, UsageLevel::Warn | UsageLevel::Crit))
        .map(|u| AlertEntry {
            category: u.budget.category.clone(),
            level: u.state.level,
            ratio: u.state.ratio,
            spent: u.spent,
            cap: u.budget.amount,
        });

    let (mut entries, warnings): (Vec<_>, Vec<_>) =
        alerts.partition(|a| a.level == UsageLevel::Crit);
    if entries.is_empty() && warnings.is_empty() {
        return None;
    }

    let severity = if entries.is_empty() {
        UsageLevel::Warn
    } else {
        UsageLevel::Crit
    };
    entries.extend(warnings);

    let title = match severity {
        UsageLevel::Crit => "⚠️ Dépassement budget",
        _ => "⚠️ Attention budget",
    };
    let details = entries
        .iter()
        .map(|a| {
            format!(
                "{} ({}% • {}/{})",
                a.category,
                percent(a.ratio),
                format_money(a.spent),
                format_money(a.cap)
            )
        })
        .collect::<Vec<_>>()
        .join(" • ");

    Some(AlertBanner {
        severity,
        message: format!("{} — {}", title, details),
        entries,
    })
}

/// French-style amount: narrow no-break space between thousands, decimal
/// comma, at most two decimals, trailing currency sign.
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    let units = cents / 100;
    let frac = cents % 100;

    let digits = units.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{202F}');
        }
        grouped.push(ch);
    }

    let decimals = match frac {
        0 => String::new(),
        f if f % 10 == 0 => format!(",{}", f / 10),
        f => format!(",{:02}", f),
    };

    format!("{}{}{} $", sign, grouped, decimals)
}
