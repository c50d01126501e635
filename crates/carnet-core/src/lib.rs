//! Carnet Core Library
//!
//! Shared functionality for the Carnet personal finance organizer:
//! - Key-value persistence (SQLite file or in-process map)
//! - Category classifier with learned tokens
//! - Budget usage, alert banner and advice
//! - Transaction, budget and objective stores
//! - CSV import/export
//! - Assistant relay with a web-search tool

pub mod advice;
pub mod ai;
pub mod budget;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod ledger;
pub mod models;
pub mod search;
pub mod storage;
pub mod stores;
pub mod tools;

/// Test utilities including mock chat-completion and search servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advice::{Advice, Overage, Recommendation, TopSpender};
pub use ai::{AssistantRelay, ChatBackend, ChatMessage, MockBackend, OpenAIBackend};
pub use budget::{AlertBanner, BudgetUsage, UsageLevel, UsageState};
pub use classifier::{Classifier, LearnedTokens};
pub use config::{AssistantConfig, SearchConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use ledger::{BudgetReport, ImportSummary, Ledger, TransactionInput};
pub use models::{
    Budget, Category, NewBudget, NewObjective, Objective, Period, Suggestion, SuggestionHint,
    Theme, Transaction, TransactionKind,
};
pub use search::{SearchOutcome, SearchRequest, TimeRange, WebSearch, WebSearchClient};
pub use storage::{KeyValueStore, MemoryStore};
pub use stores::{CategoryTotal, MonthSummary, TransactionFilter, UpsertOutcome};
