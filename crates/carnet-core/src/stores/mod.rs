//! In-memory collections backed by the key-value store
//!
//! Each store loads its whole collection once and writes it back after every
//! mutation. A failed write leaves the in-memory state as mutated.

use chrono::Utc;

mod budgets;
mod objectives;
mod preferences;
mod transactions;

pub use budgets::{BudgetStore, UpsertOutcome};
pub use objectives::ObjectiveStore;
pub use preferences::{load_theme, save_theme};
pub use transactions::{
    available_years, balance, category_recap, CategoryTotal, MonthSummary, TransactionFilter,
    TransactionStore, ALL_CATEGORIES,
};

/// Creation-time identifiers (milliseconds since epoch), strictly increasing
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure future ids stay above `id`
    pub fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
    }

    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last + 1);
        self.last = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = IdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_observe_skips_past_existing_ids() {
        let mut ids = IdGenerator::new();
        let far = Utc::now().timestamp_millis() + 1_000_000;
        ids.observe(far);
        assert_eq!(ids.next_id(), far + 1);
    }
}
