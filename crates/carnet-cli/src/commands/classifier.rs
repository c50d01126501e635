//! Category suggestion and learning commands

use anyhow::Result;
use carnet_core::models::SuggestionHint;
use carnet_core::Ledger;

pub fn cmd_suggest(ledger: &Ledger, description: &str, amount: f64) -> Result<()> {
    let suggestion = ledger.suggest(description, amount);

    let marker = match suggestion.hint() {
        SuggestionHint::Confident => "✅",
        SuggestionHint::Uncertain => "🤔",
        SuggestionHint::Weak => "❔",
    };
    println!(
        "{} {} ({:.0}%)",
        marker,
        suggestion.category,
        suggestion.score * 100.0
    );
    Ok(())
}

pub fn cmd_learn(ledger: &mut Ledger, description: &str, category: &str) -> Result<()> {
    let count = ledger.learn(description, category)?;
    if count == 0 {
        println!("Nothing learned: no word of 3 letters or more in \"{}\"", description);
    } else {
        println!("✅ Learned {} word(s) for {}", count, category);
    }
    Ok(())
}
