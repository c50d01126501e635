//! Savings goals

use super::IdGenerator;
use crate::error::{Error, Result};
use crate::models::{NewObjective, Objective};
use crate::storage::{self, KeyValueStore, OBJECTIVES_KEY};

fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::Validation(format!("{} must be a number", field)));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("Objective name is required".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ObjectiveStore {
    items: Vec<Objective>,
}

impl ObjectiveStore {
    pub fn new(items: Vec<Objective>) -> Self {
        Self { items }
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self::new(storage::load_or_default(store, OBJECTIVES_KEY))
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        storage::save_json(store, OBJECTIVES_KEY, &self.items)
    }

    pub fn all(&self) -> &[Objective] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_id(&self) -> Option<i64> {
        self.items.iter().map(|o| o.id).max()
    }

    pub fn add(&mut self, input: NewObjective, ids: &mut IdGenerator) -> Result<Objective> {
        validate_name(&input.name)?;
        validate_amount("target", input.target)?;
        let saved = input.saved.unwrap_or(0.0);
        validate_amount("saved", saved)?;

        let objective = Objective {
            id: ids.next_id(),
            name: input.name,
            target: input.target,
            saved,
        };
        self.items.push(objective.clone());
        Ok(objective)
    }

    /// Overwrite name, target and saved amount
    pub fn edit(&mut self, id: i64, name: String, target: f64, saved: f64) -> Result<Objective> {
        validate_name(&name)?;
        validate_amount("target", target)?;
        validate_amount("saved", saved)?;

        let objective = self.find_mut(id)?;
        objective.name = name;
        objective.target = target;
        objective.saved = saved;
        Ok(objective.clone())
    }

    /// Add `delta` to the saved amount, never going below zero.
    /// A zero or non-finite delta changes nothing and returns `None`.
    pub fn contribute(&mut self, id: i64, delta: f64) -> Result<Option<Objective>> {
        let objective = self.find_mut(id)?;
        if !delta.is_finite() || delta == 0.0 {
            return Ok(None);
        }
        objective.saved = (objective.saved + delta).max(0.0);
        Ok(Some(objective.clone()))
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|o| o.id != id);
        self.items.len() != before
    }

    pub fn replace_all(&mut self, items: Vec<Objective>) {
        self.items = items;
    }

    fn find_mut(&mut self, id: i64) -> Result<&mut Objective> {
        self.items
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::NotFound(format!("objective {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(name: &str, target: f64) -> NewObjective {
        NewObjective {
            name: name.to_string(),
            target,
            saved: None,
        }
    }

    #[test]
    fn test_add_defaults_saved_to_zero() {
        let mut store = ObjectiveStore::default();
        let mut ids = IdGenerator::new();
        let created = store.add(goal("Voyage", 2000.0), &mut ids).unwrap();
        assert_eq!(created.saved, 0.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_requires_name() {
        let mut store = ObjectiveStore::default();
        let mut ids = IdGenerator::new();
        assert!(matches!(
            store.add(goal(" ", 10.0), &mut ids),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_contribute_clamps_at_zero() {
        let mut store = ObjectiveStore::default();
        let mut ids = IdGenerator::new();
        let id = store.add(goal("Voyage", 2000.0), &mut ids).unwrap().id;

        let o = store.contribute(id, 150.0).unwrap().unwrap();
        assert_eq!(o.saved, 150.0);

        let o = store.contribute(id, -500.0).unwrap().unwrap();
        assert_eq!(o.saved, 0.0);
    }

    #[test]
    fn test_contribute_ignores_zero_and_nan() {
        let mut store = ObjectiveStore::default();
        let mut ids = IdGenerator::new();
        let id = store.add(goal("Voyage", 2000.0), &mut ids).unwrap().id;

        assert_eq!(store.contribute(id, 0.0).unwrap(), None);
        assert_eq!(store.contribute(id, f64::NAN).unwrap(), None);
        assert!(matches!(
            store.contribute(id + 1, 5.0),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_edit_and_remove() {
        let mut store = ObjectiveStore::default();
        let mut ids = IdGenerator::new();
        let id = store.add(goal("Voyage", 2000.0), &mut ids).unwrap().id;

        let o = store.edit(id, "Japon".into(), 3000.0, 120.0).unwrap();
        assert_eq!(o.name, "Japon");
        assert_eq!(o.saved, 120.0);

        assert!(store.edit(id, "Japon".into(), f64::INFINITY, 0.0).is_err());
        assert!(store.remove(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_edit_requires_name() {
        let mut store = ObjectiveStore::default();
        let mut ids = IdGenerator::new();
        let id = store.add(goal("Voyage", 2000.0), &mut ids).unwrap().id;

        assert!(matches!(
            store.edit(id, "   ".into(), 2000.0, 0.0),
            Err(Error::Validation(_))
        ));
        assert_eq!(store.all()[0].name, "Voyage");
        assert!(store.is_empty());
    }
}
