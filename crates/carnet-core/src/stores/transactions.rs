//! Transaction collection, filtering and summaries

use std::collections::{BTreeSet, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Period, Transaction, TransactionKind};
use crate::storage::{self, KeyValueStore, TRANSACTIONS_KEY};

/// Filter value meaning "every category"
pub const ALL_CATEGORIES: &str = "Toutes";

/// Month window with optional description search and exact category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub period: Period,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            search: None,
            category: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.is_empty() && category != ALL_CATEGORIES).then_some(category);
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if !self.period.contains(tx.date) {
            return false;
        }
        if let Some(search) = &self.search {
            if !tx
                .description
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        match &self.category {
            Some(category) => &tx.category == category,
            None => true,
        }
    }
}

/// One month of the annual summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: u32,
    pub income: f64,
    /// Absolute value of expenses
    pub expense: f64,
    pub balance: f64,
}

/// Net signed total of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    items: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new(items: Vec<Transaction>) -> Self {
        Self { items }
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self::new(storage::load_or_default(store, TRANSACTIONS_KEY))
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        storage::save_json(store, TRANSACTIONS_KEY, &self.items)
    }

    pub fn all(&self) -> &[Transaction] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Transaction> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn max_id(&self) -> Option<i64> {
        self.items.iter().map(|t| t.id).max()
    }

    pub fn insert(&mut self, tx: Transaction) {
        self.items.push(tx);
    }

    /// Replace the record with the same id, keeping its position
    pub fn update(&mut self, tx: Transaction) -> Result<()> {
        let slot = self
            .items
            .iter_mut()
            .find(|t| t.id == tx.id)
            .ok_or_else(|| Error::NotFound(format!("transaction {}", tx.id)))?;
        *slot = tx;
        Ok(())
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    pub fn replace_all(&mut self, items: Vec<Transaction>) {
        self.items = items;
    }

    pub fn filter(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.items
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Category names in use, sorted
    pub fn categories(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|t| t.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Twelve rows of income, expense and balance for `year`
    pub fn annual_summary(&self, year: i32) -> Vec<MonthSummary> {
        (1..=12)
            .map(|month| {
                let in_month = self
                    .items
                    .iter()
                    .filter(|t| t.date.year() == year && t.date.month() == month);

                let (mut income, mut expense) = (0.0, 0.0);
                for tx in in_month {
                    match tx.kind {
                        TransactionKind::Income => income += tx.amount,
                        TransactionKind::Expense => expense += tx.amount.abs(),
                    }
                }

                MonthSummary {
                    month,
                    income,
                    expense,
                    balance: income - expense,
                }
            })
            .collect()
    }

    /// Years present in the data
    pub fn years(&self) -> BTreeSet<i32> {
        self.items.iter().map(|t| t.date.year()).collect()
    }
}

/// Sum of signed amounts
pub fn balance(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|t| t.amount).sum()
}

/// Net signed total per exact category, largest absolute total first
pub fn category_recap(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for tx in transactions {
        let entry = totals.entry(tx.category.as_str()).or_insert_with(|| {
            order.push(tx.category.as_str());
            0.0
        });
        *entry += tx.amount;
    }

    let mut recap: Vec<CategoryTotal> = order
        .into_iter()
        .map(|category| CategoryTotal {
            category: category.to_string(),
            total: totals.get(category).copied().unwrap_or(0.0),
        })
        .collect();
    recap.sort_by(|a, b| b.total.abs().total_cmp(&a.total.abs()));
    recap
}

/// Years with data plus the six most recent calendar years, newest first
pub fn available_years(data_years: &BTreeSet<i32>, current_year: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = data_years.clone();
    years.extend((0..6).map(|i| current_year - i));
    years.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(id: i64, description: &str, amount: f64, date: (i32, u32, u32), category: &str) -> Transaction {
        Transaction {
            id,
            kind: if amount < 0.0 {
                TransactionKind::Expense
            } else {
                TransactionKind::Income
            },
            description: description.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category: category.to_string(),
        }
    }

    fn sample() -> TransactionStore {
        TransactionStore::new(vec![
            tx(1, "IGA épicerie", -45.0, (2025, 3, 2), "Alimentation"),
            tx(2, "Salaire mars", 2500.0, (2025, 3, 1), "Salaire"),
            tx(3, "STM passe", -94.0, (2025, 3, 3), "Transport"),
            tx(4, "Metro", -30.0, (2025, 4, 1), "Alimentation"),
            tx(5, "Resto", -20.0, (2024, 3, 9), "Alimentation"),
        ])
    }

    #[test]
    fn test_filter_by_period() {
        let store = sample();
        let march = TransactionFilter::new(Period::new(2025, 3).unwrap());
        let ids: Vec<_> = store.filter(&march).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_search_and_category() {
        let store = sample();
        let filter = TransactionFilter::new(Period::new(2025, 3).unwrap()).with_search("ÉPICERIE");
        // case-insensitive, but accents still matter
        assert_eq!(store.filter(&filter).len(), 1);

        let filter = TransactionFilter::new(Period::new(2025, 3).unwrap())
            .with_category("Transport");
        assert_eq!(store.filter(&filter)[0].id, 3);

        let filter = TransactionFilter::new(Period::new(2025, 3).unwrap())
            .with_category(ALL_CATEGORIES);
        assert!(filter.category.is_none());
    }

    #[test]
    fn test_balance() {
        let store = sample();
        let march = store.filter(&TransactionFilter::new(Period::new(2025, 3).unwrap()));
        assert_eq!(balance(&march), 2500.0 - 45.0 - 94.0);
    }

    #[test]
    fn test_update_and_remove() {
        let mut store = sample();
        let mut edited = store.get(3).unwrap().clone();
        edited.description = "STM mensuel".into();
        store.update(edited).unwrap();
        assert_eq!(store.all()[2].description, "STM mensuel");

        assert!(store.remove(3));
        assert!(!store.remove(3));
        assert_eq!(store.len(), 4);

        let missing = tx(99, "x", -1.0, (2025, 1, 1), "Autre");
        assert!(matches!(store.update(missing), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_annual_summary() {
        let summary = sample().annual_summary(2025);
        assert_eq!(summary.len(), 12);
        assert_eq!(summary[2].income, 2500.0);
        assert_eq!(summary[2].expense, 139.0);
        assert_eq!(summary[2].balance, 2361.0);
        assert_eq!(summary[3].expense, 30.0);
        assert_eq!(summary[0].balance, 0.0);
    }

    #[test]
    fn test_category_recap_sorted_by_magnitude() {
        let store = sample();
        let march = store.filter(&TransactionFilter::new(Period::new(2025, 3).unwrap()));
        let recap = category_recap(&march);
        assert_eq!(recap[0].category, "Salaire");
        assert_eq!(recap[1].category, "Transport");
        assert_eq!(recap[2].total, -45.0);
    }

    #[test]
    fn test_available_years() {
        let store = sample();
        let years = available_years(&store.years(), 2026);
        assert_eq!(years, vec![2026, 2025, 2024, 2023, 2022, 2021]);

        let old: BTreeSet<i32> = [2015].into_iter().collect();
        let years = available_years(&old, 2026);
        assert_eq!(years.last(), Some(&2015));
        assert_eq!(years.len(), 7);
    }

    #[test]
    fn test_categories_distinct() {
        assert_eq!(
            sample().categories(),
            vec!["Alimentation", "Salaire", "Transport"]
        );
    }
}
