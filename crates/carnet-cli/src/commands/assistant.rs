//! Assistant command implementation

use anyhow::Result;
use carnet_core::ai::{AssistantRelay, ChatMessage, DEFAULT_SYSTEM_PROMPT};
use carnet_core::config::AssistantConfig;

/// Ask one question with the default system prompt; returns the answer text
pub async fn ask(relay: &AssistantRelay, question: &str) -> Result<String> {
    let messages = vec![
        ChatMessage::system(DEFAULT_SYSTEM_PROMPT),
        ChatMessage::user(question),
    ];
    let answer = relay.respond(messages).await?;
    Ok(answer.text().unwrap_or_default().to_string())
}

pub async fn cmd_ask(question: &str) -> Result<()> {
    let relay = AssistantRelay::from_config(&AssistantConfig::from_env())?;
    println!("🤖 Asking {}...", relay.model());

    let answer = ask(&relay, question).await?;
    println!();
    println!("{}", answer);
    Ok(())
}
