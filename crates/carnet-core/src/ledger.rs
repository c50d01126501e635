//! Ledger: the finances workspace as one unit
//!
//! Owns every collection, the classifier and the id generator over a single
//! key-value backend. Each mutating call applies its change in memory, then
//! writes the affected collection back. A failed write is returned as
//! `Error::Persistence` and the in-memory change is kept.

use std::io::Read;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::advice::{self, Advice};
use crate::budget::{self, AlertBanner, BudgetUsage};
use crate::classifier::{self, Classifier};
use crate::error::{Error, Result};
use crate::export;
use crate::import;
use crate::models::{
    Budget, Category, NewBudget, NewObjective, Objective, Period, Suggestion, Theme, Transaction,
    TransactionKind,
};
use crate::storage::KeyValueStore;
use crate::stores::{
    self, BudgetStore, CategoryTotal, IdGenerator, MonthSummary, ObjectiveStore,
    TransactionFilter, TransactionStore, UpsertOutcome,
};

/// A transaction as entered in the form
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInput {
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: TransactionKind,
    pub description: String,
    /// Sign is ignored; it follows `kind`
    #[serde(alias = "montant")]
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(alias = "categorie")]
    pub category: String,
    /// Free-text category used when `category` is "Autre"
    #[serde(default, alias = "categorie_libre")]
    pub custom_category: Option<String>,
    /// Suggestion that was shown while typing, if any
    #[serde(default)]
    pub suggestion: Option<Suggestion>,
    /// Transaction being edited; `None` creates a new one
    #[serde(default)]
    pub edit_id: Option<i64>,
}

impl TransactionInput {
    /// Category after applying the free-text override
    pub fn final_category(&self) -> String {
        let custom = self.custom_category.as_deref().map(str::trim).unwrap_or("");
        if self.category == Category::Autre.as_str() && !custom.is_empty() {
            custom.to_string()
        } else if self.category.trim().is_empty() {
            Category::Autre.as_str().to_string()
        } else {
            self.category.clone()
        }
    }
}

/// Usage rows of a window plus the alert banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    pub period: Period,
    pub rows: Vec<BudgetUsage>,
    pub banner: Option<AlertBanner>,
}

/// Rows taken from an imported file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
}

pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    transactions: TransactionStore,
    budgets: BudgetStore,
    objectives: ObjectiveStore,
    classifier: Classifier,
    ids: IdGenerator,
}

impl Ledger {
    /// Load every collection from `store`
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let transactions = TransactionStore::load(store.as_ref());
        let budgets = BudgetStore::load(store.as_ref());
        let objectives = ObjectiveStore::load(store.as_ref());
        let classifier = Classifier::load(store.as_ref());

        let mut ids = IdGenerator::new();
        for id in [transactions.max_id(), budgets.max_id(), objectives.max_id()]
            .into_iter()
            .flatten()
        {
            ids.observe(id);
        }

        info!(
            transactions = transactions.len(),
            budgets = budgets.len(),
            objectives = objectives.len(),
            learned_tokens = classifier.learned().len(),
            "Ledger loaded"
        );

        Self {
            store,
            transactions,
            budgets,
            objectives,
            classifier,
            ids,
        }
    }

    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    pub fn budgets(&self) -> &BudgetStore {
        &self.budgets
    }

    pub fn objectives(&self) -> &ObjectiveStore {
        &self.objectives
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    // ---- classification -------------------------------------------------

    pub fn suggest(&self, description: &str, amount: f64) -> Suggestion {
        self.classifier.suggest(description, amount.abs())
    }

    /// Teach the classifier directly; returns the number of tokens stored
    pub fn learn(&mut self, description: &str, category: &str) -> Result<usize> {
        if category.trim().is_empty() {
            return Err(Error::Validation("Category is required".into()));
        }
        self.classifier
            .learn(description, category, self.store.as_ref())
    }

    // ---- transactions ---------------------------------------------------

    /// Create or edit a transaction from form input
    ///
    /// The amount sign follows the kind. When the input carries the
    /// suggestion that was shown, the classifier learns from the final
    /// category if the user corrected it or the suggestion was confident.
    pub fn commit_transaction(&mut self, input: TransactionInput) -> Result<Transaction> {
        if input.description.trim().is_empty() {
            return Err(Error::Validation("Description is required".into()));
        }
        if !input.amount.is_finite() {
            return Err(Error::Validation("Amount must be a number".into()));
        }
        if let Some(id) = input.edit_id {
            if self.transactions.get(id).is_none() {
                return Err(Error::NotFound(format!("Transaction {}", id)));
            }
        }

        let category = input.final_category();

        if classifier::should_learn(input.suggestion.as_ref(), &input.description, &category) {
            // Learning failures never block the commit
            if let Err(e) = self
                .classifier
                .learn(&input.description, &category, self.store.as_ref())
            {
                warn!(error = %e, "Failed to persist learned tokens");
            }
        }

        let tx = Transaction {
            id: match input.edit_id {
                Some(id) => id,
                None => self.ids.next_id(),
            },
            kind: input.kind,
            description: input.description,
            amount: input.kind.signed(input.amount),
            date: input.date,
            category,
        };

        if input.edit_id.is_some() {
            self.transactions.update(tx.clone())?;
            debug!(id = tx.id, "Transaction updated");
        } else {
            self.transactions.insert(tx.clone());
            debug!(id = tx.id, "Transaction created");
        }

        self.transactions.save(self.store.as_ref())?;
        Ok(tx)
    }

    pub fn delete_transaction(&mut self, id: i64) -> Result<()> {
        if !self.transactions.remove(id) {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        self.transactions.save(self.store.as_ref())
    }

    pub fn filtered(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.transactions.filter(filter)
    }

    pub fn balance(&self, filter: &TransactionFilter) -> f64 {
        stores::balance(&self.filtered(filter))
    }

    pub fn category_recap(&self, filter: &TransactionFilter) -> Vec<CategoryTotal> {
        stores::category_recap(&self.filtered(filter))
    }

    pub fn annual_summary(&self, year: i32) -> Vec<MonthSummary> {
        self.transactions.annual_summary(year)
    }

    pub fn available_years(&self) -> Vec<i32> {
        stores::available_years(&self.transactions.years(), Local::now().year())
    }

    /// Fixed categories followed by free-text ones in use
    pub fn categories(&self) -> Vec<String> {
        let mut all: Vec<String> = Category::ALL.iter().map(|c| c.as_str().to_string()).collect();
        for used in self.transactions.categories() {
            if !all.contains(&used) {
                all.push(used);
            }
        }
        all
    }

    // ---- budgets --------------------------------------------------------

    pub fn budgets_for(&self, period: Period) -> Vec<Budget> {
        self.budgets.for_period(period)
    }

    pub fn upsert_budget(&mut self, input: NewBudget) -> Result<UpsertOutcome> {
        let outcome = self.budgets.upsert(input, &mut self.ids)?;
        self.budgets.save(self.store.as_ref())?;
        Ok(outcome)
    }

    pub fn update_budget(&mut self, id: i64, cap: f64, category: Option<String>) -> Result<Budget> {
        let budget = self.budgets.update(id, cap, category)?;
        self.budgets.save(self.store.as_ref())?;
        Ok(budget)
    }

    pub fn remove_budget(&mut self, id: i64) -> Result<()> {
        if !self.budgets.remove(id) {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        self.budgets.save(self.store.as_ref())
    }

    /// Usage of the filter's window, measured against the filtered set
    pub fn budget_report(&self, filter: &TransactionFilter) -> BudgetReport {
        let rows = budget::budget_usage(self.budgets.all(), filter.period, &self.filtered(filter));
        let banner = budget::alert_banner(&rows);
        BudgetReport {
            period: filter.period,
            rows,
            banner,
        }
    }

    pub fn advice(&self, filter: &TransactionFilter) -> Advice {
        advice::advise(self.budgets.all(), filter.period, &self.filtered(filter))
    }

    // ---- objectives -----------------------------------------------------

    pub fn add_objective(&mut self, input: NewObjective) -> Result<Objective> {
        let objective = self.objectives.add(input, &mut self.ids)?;
        self.objectives.save(self.store.as_ref())?;
        Ok(objective)
    }

    pub fn edit_objective(&mut self, id: i64, name: String, target: f64, saved: f64) -> Result<Objective> {
        let objective = self.objectives.edit(id, name, target, saved)?;
        self.objectives.save(self.store.as_ref())?;
        Ok(objective)
    }

    /// Add `delta` to the saved amount; `None` when `delta` is zero or not a number
    pub fn contribute(&mut self, id: i64, delta: f64) -> Result<Option<Objective>> {
        let updated = self.objectives.contribute(id, delta)?;
        if updated.is_some() {
            self.objectives.save(self.store.as_ref())?;
        }
        Ok(updated)
    }

    pub fn remove_objective(&mut self, id: i64) -> Result<()> {
        if !self.objectives.remove(id) {
            return Err(Error::NotFound(format!("Objective {}", id)));
        }
        self.objectives.save(self.store.as_ref())
    }

    // ---- CSV ------------------------------------------------------------

    /// Replace all transactions with the file's rows
    pub fn import_transactions<R: Read>(&mut self, reader: R) -> Result<Option<ImportSummary>> {
        let today = Local::now().date_naive();
        let Some(items) = import::parse_transactions_csv(reader, &mut self.ids, today)? else {
            return Ok(None);
        };
        let imported = items.len();
        self.transactions.replace_all(items);
        info!(imported, "Transactions imported");
        self.transactions.save(self.store.as_ref())?;
        Ok(Some(ImportSummary { imported }))
    }

    /// Replace all objectives with the file's rows
    pub fn import_objectives<R: Read>(&mut self, reader: R) -> Result<Option<ImportSummary>> {
        let Some(items) = import::parse_objectives_csv(reader, &mut self.ids)? else {
            return Ok(None);
        };
        let imported = items.len();
        self.objectives.replace_all(items);
        info!(imported, "Objectives imported");
        self.objectives.save(self.store.as_ref())?;
        Ok(Some(ImportSummary { imported }))
    }

    /// All transactions, or only those matching `filter`
    pub fn export_transactions(&self, filter: Option<&TransactionFilter>) -> Result<String> {
        match filter {
            Some(f) => export::transactions_to_csv(&self.filtered(f)),
            None => export::transactions_to_csv(self.transactions.all()),
        }
    }

    pub fn export_objectives(&self) -> Result<String> {
        export::objectives_to_csv(self.objectives.all())
    }

    // ---- preferences ----------------------------------------------------

    pub fn theme(&self) -> Theme {
        stores::load_theme(self.store.as_ref())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        stores::save_theme(self.store.as_ref(), theme)
    }

    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}
