//! Integration tests for carnet-core
//!
//! These tests exercise whole workflows over the SQLite-backed store:
//! commit → learn → suggest, CSV round trips, and the budget report.

use std::sync::Arc;

use carnet_core::{
    budget::UsageLevel,
    db::Database,
    ledger::{Ledger, TransactionInput},
    models::{Category, NewBudget, NewObjective, Period, TransactionKind},
    stores::TransactionFilter,
};
use chrono::NaiveDate;
use tempfile::TempDir;

fn open_ledger(dir: &TempDir) -> (Arc<Database>, Ledger) {
    let path = dir.path().join("carnet.db");
    let db = Arc::new(Database::new(path.to_str().unwrap()).expect("Failed to open database"));
    let ledger = Ledger::open(db.clone());
    (db, ledger)
}

fn expense(description: &str, amount: f64, day: u32, category: &str) -> TransactionInput {
    TransactionInput {
        kind: TransactionKind::Expense,
        description: description.to_string(),
        amount,
        date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        category: category.to_string(),
        custom_category: None,
        suggestion: None,
        edit_id: None,
    }
}

fn march() -> TransactionFilter {
    TransactionFilter::new(Period::new(2025, 3).unwrap())
}

// =============================================================================
// Classifier workflow
// =============================================================================

#[test]
fn test_commit_learn_suggest_workflow() {
    let dir = TempDir::new().unwrap();
    let (db, mut ledger) = open_ledger(&dir);

    // Nothing known yet: heuristic fallback
    let shown = ledger.suggest("Fromagerie Hamel", 32.0);
    assert_eq!(shown.category, Category::Autre.as_str());

    // The user corrects it; the correction is learned
    let mut form = expense("Fromagerie Hamel", 32.0, 8, "Alimentation");
    form.suggestion = Some(shown);
    ledger.commit_transaction(form).unwrap();

    // A fresh session over the same file sees the learned tokens
    drop(ledger);
    let ledger = Ledger::open(db);
    let again = ledger.suggest("FROMAGERIE hamel", 28.0);
    assert_eq!(again.category, "Alimentation");
    assert_eq!(again.score, 0.95);
}

#[test]
fn test_confident_suggestion_is_reinforced() {
    let dir = TempDir::new().unwrap();
    let (_, mut ledger) = open_ledger(&dir);

    let shown = ledger.suggest("Salaire Employeur Mars", 3200.0);
    assert_eq!(shown.category, "Salaire");
    assert!(shown.score >= 0.6);

    let mut form = expense("Salaire Employeur Mars", 3200.0, 1, "Salaire");
    form.kind = TransactionKind::Income;
    form.suggestion = Some(shown);
    let tx = ledger.commit_transaction(form).unwrap();
    assert_eq!(tx.amount, 3200.0);

    assert_eq!(ledger.classifier().learned().get("employeur"), Some("Salaire"));
}

// =============================================================================
// Budget workflow
// =============================================================================

#[test]
fn test_budget_report_warn_then_crit() {
    let dir = TempDir::new().unwrap();
    let (_, mut ledger) = open_ledger(&dir);

    ledger
        .upsert_budget(NewBudget {
            category: "Alimentation".into(),
            amount: 300.0,
            month: 3,
            year: 2025,
        })
        .unwrap();
    ledger
        .commit_transaction(expense("IGA", 290.0, 3, "Alimentation"))
        .unwrap();

    let report = ledger.budget_report(&march());
    let row = &report.rows[0];
    assert_eq!(row.state.level, UsageLevel::Warn);
    assert_eq!(row.state.label, "97%");
    let banner = report.banner.expect("warning banner");
    assert!(banner.message.starts_with("⚠️ Attention budget"));

    ledger
        .commit_transaction(expense("Metro", 20.0, 9, "alimentation "))
        .unwrap();

    let report = ledger.budget_report(&march());
    let row = &report.rows[0];
    assert_eq!(row.state.level, UsageLevel::Crit);
    assert_eq!(row.state.label, "Dépassé");
    assert_eq!(row.progress_pct, 100.0);
    assert_eq!(report.banner.unwrap().severity, UsageLevel::Crit);

    let advice = ledger.advice(&march());
    assert_eq!(advice.over_budget.len(), 1);
    assert!(advice.actions[0].starts_with("Réduire Alimentation"));
}

#[test]
fn test_upsert_never_grows_budget_count() {
    let dir = TempDir::new().unwrap();
    let (_, mut ledger) = open_ledger(&dir);

    let budget = |category: &str, amount: f64| NewBudget {
        category: category.into(),
        amount,
        month: 3,
        year: 2025,
    };

    let first = ledger.upsert_budget(budget("Transport", 100.0)).unwrap();
    let second = ledger.upsert_budget(budget(" transport ", 150.0)).unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(ledger.budgets().len(), 1);
    assert_eq!(ledger.budgets().all()[0].amount, 150.0);
}

// =============================================================================
// CSV workflow
// =============================================================================

#[test]
fn test_csv_round_trip_between_files() {
    let source_dir = TempDir::new().unwrap();
    let (_, mut source) = open_ledger(&source_dir);

    source
        .commit_transaction(expense("Café, croissant", 6.5, 2, "Alimentation"))
        .unwrap();
    source
        .commit_transaction(expense("Loyer \"mars\"", 950.0, 1, "Logement"))
        .unwrap();
    source
        .add_objective(NewObjective {
            name: "Fonds d'urgence".into(),
            target: 3000.0,
            saved: Some(400.0),
        })
        .unwrap();

    let tx_csv = source.export_transactions(None).unwrap();
    let obj_csv = source.export_objectives().unwrap();

    let target_dir = TempDir::new().unwrap();
    let (_, mut target) = open_ledger(&target_dir);
    target.import_transactions(tx_csv.as_bytes()).unwrap().unwrap();
    target.import_objectives(obj_csv.as_bytes()).unwrap().unwrap();

    assert_eq!(target.transactions().all(), source.transactions().all());
    assert_eq!(target.objectives().all(), source.objectives().all());
    assert_eq!(target.balance(&march()), -956.5);
}

#[test]
fn test_imported_ids_stay_unique() {
    let dir = TempDir::new().unwrap();
    let (_, mut ledger) = open_ledger(&dir);

    let far_future = chrono::Utc::now().timestamp_millis() + 60_000;
    let csv = format!(
        "id,type,description,montant,date,categorie\n{},Dépense,Bus,3,2025-03-02,Transport\n",
        far_future
    );
    ledger.import_transactions(csv.as_bytes()).unwrap();

    let created = ledger
        .commit_transaction(expense("Taxi", 20.0, 3, "Transport"))
        .unwrap();
    assert!(created.id > far_future);
}
