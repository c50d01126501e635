//! Domain models for Carnet
//!
//! Persisted records use French field names
//! (`type`, `montant`, `categorie`, ...) so existing exports load unchanged.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed spending categories
///
/// Declaration order is the classifier's tie-break priority: when two
/// categories reach the same score, the one listed first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Logement,
    Alimentation,
    Transport,
    #[serde(rename = "Santé", alias = "Sante")]
    Sante,
    Loisirs,
    Abonnements,
    Shopping,
    Salaire,
    Autre,
}

impl Category {
    /// All categories in tie-break priority order
    pub const ALL: [Category; 9] = [
        Self::Logement,
        Self::Alimentation,
        Self::Transport,
        Self::Sante,
        Self::Loisirs,
        Self::Abonnements,
        Self::Shopping,
        Self::Salaire,
        Self::Autre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logement => "Logement",
            Self::Alimentation => "Alimentation",
            Self::Transport => "Transport",
            Self::Sante => "Santé",
            Self::Loisirs => "Loisirs",
            Self::Abonnements => "Abonnements",
            Self::Shopping => "Shopping",
            Self::Salaire => "Salaire",
            Self::Autre => "Autre",
        }
    }

    /// Position in the tie-break priority list
    pub fn priority(&self) -> usize {
        Self::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::ALL.len())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logement" | "housing" => Ok(Self::Logement),
            "alimentation" | "food" => Ok(Self::Alimentation),
            "transport" => Ok(Self::Transport),
            "santé" | "sante" | "health" => Ok(Self::Sante),
            "loisirs" | "leisure" => Ok(Self::Loisirs),
            "abonnements" | "subscriptions" => Ok(Self::Abonnements),
            "shopping" => Ok(Self::Shopping),
            "salaire" | "salary" => Ok(Self::Salaire),
            "autre" | "other" => Ok(Self::Autre),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TransactionKind {
    #[default]
    #[serde(rename = "Dépense", alias = "expense", alias = "Depense")]
    Expense,
    #[serde(rename = "Revenu", alias = "income")]
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "Dépense",
            Self::Income => "Revenu",
        }
    }

    /// Apply the sign convention: expenses are negative, income positive
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            Self::Expense => -amount.abs(),
            Self::Income => amount.abs(),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dépense" | "depense" | "expense" => Ok(Self::Expense),
            "revenu" | "income" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A committed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    /// Negative = expense, positive = income
    #[serde(rename = "montant")]
    pub amount: f64,
    pub date: NaiveDate,
    /// A fixed category name, or free text chosen under "Autre"
    #[serde(rename = "categorie")]
    pub category: String,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// A monthly spending cap for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    #[serde(rename = "categorie")]
    pub category: String,
    /// Monthly cap
    #[serde(rename = "montant")]
    pub amount: f64,
    /// 1..=12
    #[serde(rename = "mois")]
    pub month: u32,
    #[serde(rename = "annee")]
    pub year: i32,
}

impl Budget {
    pub fn period(&self) -> Option<Period> {
        Period::new(self.year, self.month).ok()
    }
}

/// A budget to be created or to replace an existing cap
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    #[serde(alias = "categorie")]
    pub category: String,
    #[serde(alias = "montant")]
    pub amount: f64,
    #[serde(alias = "mois")]
    pub month: u32,
    #[serde(alias = "annee")]
    pub year: i32,
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "cible")]
    pub target: f64,
    #[serde(rename = "epargne")]
    pub saved: f64,
}

impl Objective {
    /// Fraction of the target already saved (0 when the target is not positive)
    pub fn progress(&self) -> f64 {
        if self.target <= 0.0 {
            0.0
        } else {
            self.saved / self.target
        }
    }
}

/// A savings goal to be created
#[derive(Debug, Clone, Deserialize)]
pub struct NewObjective {
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(alias = "cible")]
    pub target: f64,
    #[serde(default, alias = "epargne")]
    pub saved: Option<f64>,
}

/// A calendar month window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Validation(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// The window containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current local month
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Classifier output: a category and a confidence in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: String,
    pub score: f64,
}

impl Suggestion {
    pub fn hint(&self) -> SuggestionHint {
        if self.score >= 0.6 {
            SuggestionHint::Confident
        } else if self.score >= 0.35 {
            SuggestionHint::Uncertain
        } else {
            SuggestionHint::Weak
        }
    }
}

/// Coarse confidence bucket shown next to a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionHint {
    Confident,
    Uncertain,
    Weak,
}

/// UI colour scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
