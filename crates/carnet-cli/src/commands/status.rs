//! Status command implementation

use std::fs;
use std::path::Path;

use anyhow::Result;
use carnet_core::config::AssistantConfig;

use super::open_ledger;

pub fn cmd_status(db_path: &Path) -> Result<()> {
    println!();
    println!("📊 Carnet Status");
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }

        match open_ledger(db_path) {
            Ok(ledger) => {
                println!();
                println!("   Transactions: {}", ledger.transactions().len());
                println!("   Budgets: {}", ledger.budgets().len());
                println!("   Objectives: {}", ledger.objectives().len());
                println!("   Learned words: {}", ledger.classifier().learned().len());
                println!("   Theme: {}", ledger.theme());
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let assistant = AssistantConfig::from_env();
    println!();
    if assistant.api_key.is_some() {
        println!("   🤖 Assistant: ENABLED ({} via {})", assistant.model, assistant.base_url);
    } else {
        println!("   ⚠️  Assistant: DISABLED (OPENAI_API_KEY not set)");
    }

    let search = &assistant.search;
    let search_key = match search.provider.as_str() {
        "tavily" => search.tavily_api_key.is_some(),
        "serpapi" => search.serpapi_key.is_some(),
        _ => false,
    };
    if search_key {
        println!("   🔎 Web search: {}", search.provider);
    } else {
        println!("   ⚠️  Web search: {} (no API key)", search.provider);
    }

    println!();
    Ok(())
}
