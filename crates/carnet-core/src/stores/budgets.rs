//! Monthly budget caps, one per (year, month, category)

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::IdGenerator;
use crate::budget::{compare_categories, normalize_category};
use crate::error::{Error, Result};
use crate::models::{Budget, NewBudget, Period};
use crate::storage::{self, KeyValueStore, BUDGETS_KEY};

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "id", rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created(i64),
    Replaced(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            Self::Created(id) | Self::Replaced(id) => *id,
        }
    }
}

fn validate_cap(cap: f64) -> Result<()> {
    if !cap.is_finite() || cap < 0.0 {
        return Err(Error::Validation(format!(
            "Budget amount must be a non-negative number, got {}",
            cap
        )));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(Error::Validation("Budget category is required".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct BudgetStore {
    items: Vec<Budget>,
}

impl BudgetStore {
    pub fn new(items: Vec<Budget>) -> Self {
        Self { items }
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self::new(storage::load_or_default(store, BUDGETS_KEY))
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        storage::save_json(store, BUDGETS_KEY, &self.items)
    }

    pub fn all(&self) -> &[Budget] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_id(&self) -> Option<i64> {
        self.items.iter().map(|b| b.id).max()
    }

    /// Budgets of one month, sorted by category name
    pub fn for_period(&self, period: Period) -> Vec<Budget> {
        let mut budgets: Vec<Budget> = self
            .items
            .iter()
            .filter(|b| b.year == period.year && b.month == period.month)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| compare_categories(&a.category, &b.category));
        budgets
    }

    /// Add a budget, or replace the cap (and category spelling) of the
    /// existing one for the same month and normalized category.
    pub fn upsert(&mut self, input: NewBudget, ids: &mut IdGenerator) -> Result<UpsertOutcome> {
        Period::new(input.year, input.month)?;
        validate_cap(input.amount)?;
        validate_category(&input.category)?;

        let key = normalize_category(&input.category);
        if let Some(existing) = self.items.iter_mut().find(|b| {
            b.year == input.year && b.month == input.month && normalize_category(&b.category) == key
        }) {
            existing.amount = input.amount;
            existing.category = input.category;
            debug!(id = existing.id, "Replaced budget");
            return Ok(UpsertOutcome::Replaced(existing.id));
        }

        let id = ids.next_id();
        self.items.push(Budget {
            id,
            category: input.category,
            amount: input.amount,
            month: input.month,
            year: input.year,
        });
        debug!(id, "Created budget");
        Ok(UpsertOutcome::Created(id))
    }

    /// Change the cap, and optionally the category, of a budget by id
    pub fn update(&mut self, id: i64, cap: f64, category: Option<String>) -> Result<Budget> {
        validate_cap(cap)?;
        if let Some(category) = &category {
            validate_category(category)?;
        }

        let index = self
            .items
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| Error::NotFound(format!("budget {}", id)))?;

        if let Some(category) = &category {
            let (year, month) = (self.items[index].year, self.items[index].month);
            let key = normalize_category(category);
            let taken = self.items.iter().any(|b| {
                b.id != id && b.year == year && b.month == month && normalize_category(&b.category) == key
            });
            if taken {
                return Err(Error::Validation(format!(
                    "A budget for '{}' already exists in {:04}-{:02}",
                    category.trim(),
                    year,
                    month
                )));
            }
        }

        let budget = &mut self.items[index];
        budget.amount = cap;
        if let Some(category) = category {
            budget.category = category;
        }
        Ok(budget.clone())
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|b| b.id != id);
        self.items.len() != before
    }
}
