//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use carnet_core::ai::{AssistantRelay, ChatResponse};
use carnet_core::config::SearchConfig;
use carnet_core::models::{Category, Theme, TransactionKind};
use carnet_core::{ChatMessage, Ledger, MemoryStore, MockBackend, WebSearchClient};
use tempfile::TempDir;

use crate::cli::{BudgetsAction, Cli, Commands, CsvKind, ObjectivesAction, TransactionsAction};
use crate::commands::{self, truncate};

fn setup_test_ledger() -> Ledger {
    Ledger::open(Arc::new(MemoryStore::new()))
}

fn march_2025(day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 3, day)
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_transactions_add() {
    let cli = Cli::try_parse_from([
        "carnet",
        "--db",
        "test.db",
        "transactions",
        "add",
        "Paie mars",
        "--amount",
        "2500",
        "--kind",
        "Revenu",
        "--date",
        "2025-03-01",
    ])
    .unwrap();

    assert_eq!(cli.db.to_str(), Some("test.db"));
    match cli.command {
        Commands::Transactions {
            action:
                Some(TransactionsAction::Add {
                    description,
                    amount,
                    kind,
                    date,
                    category,
                    ..
                }),
        } => {
            assert_eq!(description, "Paie mars");
            assert_eq!(amount, 2500.0);
            assert_eq!(kind, TransactionKind::Income);
            assert_eq!(date, march_2025(1));
            assert!(category.is_none());
        }
        _ => panic!("expected transactions add"),
    }
}

#[test]
fn test_parse_negative_contribution() {
    let cli = Cli::try_parse_from(["carnet", "objectives", "contribute", "7", "-50"]).unwrap();
    match cli.command {
        Commands::Objectives {
            action: Some(ObjectivesAction::Contribute { id, delta }),
        } => {
            assert_eq!(id, 7);
            assert_eq!(delta, -50.0);
        }
        _ => panic!("expected objectives contribute"),
    }
}

#[test]
fn test_parse_budget_set_with_period() {
    let cli = Cli::try_parse_from([
        "carnet",
        "budgets",
        "set",
        "Transport",
        "120",
        "--year",
        "2025",
        "--month",
        "3",
    ])
    .unwrap();
    match cli.command {
        Commands::Budgets {
            action: Some(BudgetsAction::Set { period, .. }),
        } => {
            assert_eq!(period.year, Some(2025));
            assert_eq!(period.month, Some(3));
        }
        _ => panic!("expected budgets set"),
    }
}

#[test]
fn test_parse_rejects_unknown_kind_and_theme() {
    assert!(Cli::try_parse_from(["carnet", "import", "budgets", "--file", "x.csv"]).is_err());
    assert!(Cli::try_parse_from(["carnet", "theme", "set", "sepia"]).is_err());
    assert!(Cli::try_parse_from(["carnet", "transactions", "add", "X", "-a", "1", "-k", "Don"]).is_err());

    let cli = Cli::try_parse_from(["carnet", "export", "objectives"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Export {
            kind: CsvKind::Objectives,
            output: None,
            ..
        }
    ));
}

#[test]
fn test_default_db_path() {
    let cli = Cli::try_parse_from(["carnet", "status"]).unwrap();
    assert_eq!(cli.db.to_str(), Some("carnet.db"));
    assert!(!cli.verbose);
}

// ========== Shared Utility Tests ==========

#[test]
fn test_truncate_counts_characters() {
    assert_eq!(truncate("Épicerie", 20), "Épicerie");
    assert_eq!(truncate("Épicerie du quartier", 10), "Épiceri...");
}

#[test]
fn test_period_filter() {
    let filter = commands::period_filter(Some(2024), Some(12)).unwrap();
    assert_eq!(filter.period.year, 2024);
    assert_eq!(filter.period.month, 12);

    assert!(commands::period_filter(Some(2024), Some(0)).is_err());
    assert!(commands::period_filter(None, None).is_ok());
}

#[test]
fn test_open_ledger_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("carnet.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    let mut ledger = commands::open_ledger(&path).unwrap();
    commands::cmd_objectives_add(&mut ledger, "Vélo", 600.0, None).unwrap();
    drop(ledger);

    let ledger = commands::open_ledger(&path).unwrap();
    assert_eq!(ledger.objectives().len(), 1);
    assert!(commands::cmd_status(&path).is_ok());
}

// ========== Classifier Command Tests ==========

#[test]
fn test_cmd_learn_then_suggest() {
    let mut ledger = setup_test_ledger();

    commands::cmd_learn(&mut ledger, "Fromagerie Hamel", "Alimentation").unwrap();
    assert!(commands::cmd_suggest(&ledger, "fromagerie", 20.0).is_ok());
    assert_eq!(ledger.suggest("fromagerie", 20.0).category, "Alimentation");
}

#[test]
fn test_cmd_learn_blank_category_fails() {
    let mut ledger = setup_test_ledger();
    assert!(commands::cmd_learn(&mut ledger, "Fromagerie", " ").is_err());
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_transactions_add_uses_suggestion() {
    let mut ledger = setup_test_ledger();

    commands::cmd_transactions_add(
        &mut ledger,
        TransactionKind::Income,
        "Salaire Employeur Mars",
        3200.0,
        march_2025(1),
        None,
        None,
    )
    .unwrap();

    let tx = &ledger.transactions().all()[0];
    assert_eq!(tx.category, Category::Salaire.as_str());
    assert_eq!(tx.amount, 3200.0);

    // Confident suggestion kept: its words are learned
    assert_eq!(ledger.classifier().learned().get("employeur"), Some("Salaire"));
}

#[test]
fn test_cmd_transactions_add_override_is_learned() {
    let mut ledger = setup_test_ledger();

    commands::cmd_transactions_add(
        &mut ledger,
        TransactionKind::Expense,
        "Fromagerie Hamel",
        32.0,
        march_2025(8),
        Some("Alimentation"),
        None,
    )
    .unwrap();

    assert_eq!(ledger.suggest("fromagerie hamel", 10.0).category, "Alimentation");
}

#[test]
fn test_cmd_transactions_add_custom_category() {
    let mut ledger = setup_test_ledger();

    commands::cmd_transactions_add(
        &mut ledger,
        TransactionKind::Expense,
        "Cadeau anniversaire",
        45.0,
        march_2025(12),
        Some("Autre"),
        Some("Cadeaux"),
    )
    .unwrap();

    assert_eq!(ledger.transactions().all()[0].category, "Cadeaux");
}

#[test]
fn test_cmd_transactions_add_rejects_blank_description() {
    let mut ledger = setup_test_ledger();

    let result = commands::cmd_transactions_add(
        &mut ledger,
        TransactionKind::Expense,
        "  ",
        10.0,
        march_2025(1),
        Some("Autre"),
        None,
    );
    assert!(result.is_err());
    assert!(ledger.transactions().is_empty());
}

#[test]
fn test_cmd_transactions_list_and_delete() {
    let mut ledger = setup_test_ledger();
    commands::cmd_transactions_add(
        &mut ledger,
        TransactionKind::Expense,
        "IGA",
        40.0,
        march_2025(4),
        Some("Alimentation"),
        None,
    )
    .unwrap();

    assert!(commands::cmd_transactions_list(&ledger, Some(2025), Some(3), None, None, false).is_ok());
    assert!(commands::cmd_transactions_list(&ledger, Some(2025), Some(3), Some("iga"), None, true).is_ok());
    assert!(commands::cmd_transactions_list(&ledger, Some(2025), Some(13), None, None, false).is_err());
    assert!(commands::cmd_transactions_summary(&ledger, Some(2025)).is_ok());

    let id = ledger.transactions().all()[0].id;
    commands::cmd_transactions_delete(&mut ledger, id).unwrap();
    assert!(ledger.transactions().is_empty());
    assert!(commands::cmd_transactions_delete(&mut ledger, id).is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budgets_set_replaces_cap() {
    let mut ledger = setup_test_ledger();

    commands::cmd_budgets_set(&mut ledger, "Transport", 100.0, Some(2025), Some(3)).unwrap();
    commands::cmd_budgets_set(&mut ledger, "transport", 150.0, Some(2025), Some(3)).unwrap();

    assert_eq!(ledger.budgets().len(), 1);
    assert_eq!(ledger.budgets().all()[0].amount, 150.0);
    assert!(commands::cmd_budgets_set(&mut ledger, "Transport", -1.0, Some(2025), Some(3)).is_err());
}

#[test]
fn test_cmd_budgets_list_and_advice() {
    let mut ledger = setup_test_ledger();
    commands::cmd_budgets_set(&mut ledger, "Alimentation", 100.0, Some(2025), Some(3)).unwrap();
    commands::cmd_transactions_add(
        &mut ledger,
        TransactionKind::Expense,
        "Metro",
        130.0,
        march_2025(9),
        Some("Alimentation"),
        None,
    )
    .unwrap();

    assert!(commands::cmd_budgets_list(&ledger, Some(2025), Some(3), false).is_ok());
    assert!(commands::cmd_budgets_list(&ledger, Some(2025), Some(3), true).is_ok());
    assert!(commands::cmd_advice(&ledger, Some(2025), Some(3)).is_ok());
    assert!(commands::cmd_advice(&ledger, Some(2025), Some(4)).is_ok());

    let id = ledger.budgets().all()[0].id;
    commands::cmd_budgets_delete(&mut ledger, id).unwrap();
    assert!(ledger.budgets().is_empty());
}

// ========== Objective Command Tests ==========

#[test]
fn test_cmd_objectives_flow() {
    let mut ledger = setup_test_ledger();

    commands::cmd_objectives_add(&mut ledger, "Vacances", 1000.0, Some(100.0)).unwrap();
    let id = ledger.objectives().all()[0].id;

    commands::cmd_objectives_contribute(&mut ledger, id, 150.0).unwrap();
    assert_eq!(ledger.objectives().all()[0].saved, 250.0);

    // Withdrawals never go below zero
    commands::cmd_objectives_contribute(&mut ledger, id, -1000.0).unwrap();
    assert_eq!(ledger.objectives().all()[0].saved, 0.0);

    commands::cmd_objectives_contribute(&mut ledger, id, 0.0).unwrap();
    assert!(commands::cmd_objectives_list(&ledger).is_ok());

    commands::cmd_objectives_delete(&mut ledger, id).unwrap();
    assert!(ledger.objectives().is_empty());
    assert!(commands::cmd_objectives_contribute(&mut ledger, id, 10.0).is_err());
}

// ========== CSV Command Tests ==========

#[test]
fn test_cmd_export_then_import() {
    let dir = TempDir::new().unwrap();
    let tx_path = dir.path().join("transactions.csv");
    let obj_path = dir.path().join("objectifs.csv");

    let mut source = setup_test_ledger();
    commands::cmd_transactions_add(
        &mut source,
        TransactionKind::Expense,
        "Café, croissant",
        6.5,
        march_2025(2),
        Some("Alimentation"),
        None,
    )
    .unwrap();
    commands::cmd_objectives_add(&mut source, "Fonds d'urgence", 3000.0, Some(400.0)).unwrap();

    commands::cmd_export_transactions(&source, Some(&tx_path), None, None).unwrap();
    commands::cmd_export_objectives(&source, Some(&obj_path)).unwrap();

    let mut target = setup_test_ledger();
    commands::cmd_import_transactions(&mut target, &tx_path).unwrap();
    commands::cmd_import_objectives(&mut target, &obj_path).unwrap();

    assert_eq!(target.transactions().all(), source.transactions().all());
    assert_eq!(target.objectives().all(), source.objectives().all());
}

#[test]
fn test_cmd_export_filtered_window() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mars.csv");

    let mut ledger = setup_test_ledger();
    for (day, month) in [(2, 3), (5, 4)] {
        commands::cmd_transactions_add(
            &mut ledger,
            TransactionKind::Expense,
            "Bus",
            3.5,
            NaiveDate::from_ymd_opt(2025, month, day),
            Some("Transport"),
            None,
        )
        .unwrap();
    }

    commands::cmd_export_transactions(&ledger, Some(&path), Some(2025), Some(3)).unwrap();
    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(csv.lines().count(), 2);
}

#[test]
fn test_cmd_import_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut ledger = setup_test_ledger();

    let result = commands::cmd_import_transactions(&mut ledger, &dir.path().join("absent.csv"));
    assert!(result.is_err());
}

#[test]
fn test_cmd_import_header_only_keeps_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vide.csv");
    std::fs::write(&path, "id,nom,cible,epargne\n").unwrap();

    let mut ledger = setup_test_ledger();
    commands::cmd_objectives_add(&mut ledger, "Vélo", 600.0, None).unwrap();
    commands::cmd_import_objectives(&mut ledger, &path).unwrap();

    assert_eq!(ledger.objectives().len(), 1);
}

// ========== Theme Command Tests ==========

#[test]
fn test_cmd_theme() {
    let ledger = setup_test_ledger();
    assert_eq!(ledger.theme(), Theme::Light);

    commands::cmd_theme_set(&ledger, Theme::Dark).unwrap();
    assert_eq!(ledger.theme(), Theme::Dark);

    commands::cmd_theme_toggle(&ledger).unwrap();
    assert_eq!(ledger.theme(), Theme::Light);
    assert!(commands::cmd_theme_show(&ledger).is_ok());
}

// ========== Assistant Command Tests ==========

fn relay_with(backend: MockBackend) -> AssistantRelay {
    let search = WebSearchClient::new(SearchConfig::default()).unwrap();
    AssistantRelay::new(Arc::new(backend), Arc::new(search), "gpt-4o-mini")
}

#[tokio::test]
async fn test_ask_sends_system_prompt() {
    let backend =
        MockBackend::scripted([ChatResponse::single(ChatMessage::assistant("Bonjour !"))]);
    let relay = relay_with(backend.clone());

    let answer = commands::ask(&relay, "Salut").await.unwrap();
    assert_eq!(answer, "Bonjour !");

    let requests = backend.requests();
    let messages = &requests[0].messages;
    assert_eq!(messages[0].role, "system");
    assert_eq!(
        messages[0].content.as_deref(),
        Some(carnet_core::ai::DEFAULT_SYSTEM_PROMPT)
    );
    assert_eq!(messages[1].content.as_deref(), Some("Salut"));
}

#[tokio::test]
async fn test_ask_propagates_empty_response() {
    let relay = relay_with(MockBackend::scripted([ChatResponse { choices: vec![] }]));

    let err = commands::ask(&relay, "Salut").await.unwrap_err();
    assert!(err.to_string().contains("Aucun choix"));
}
