//! Chat-completion backend abstraction and the assistant relay
//!
//! # Architecture
//!
//! - `ChatBackend` trait: one chat-completion round trip
//! - `OpenAIBackend`: hosted chat-completion API over HTTPS
//! - `MockBackend`: scripted responses for tests
//! - `AssistantRelay`: runs the tool-call loop between the model and web search
//!
//! # Usage
//!
//! ```rust,ignore
//! let relay = AssistantRelay::from_config(&AssistantConfig::from_env())?;
//! let reply = relay.respond(vec![ChatMessage::user("Quel est le taux directeur ?")]).await?;
//! println!("{}", reply.content.unwrap_or_default());
//! ```

mod mock;
mod openai;
pub mod relay;
pub mod types;

pub use mock::MockBackend;
pub use openai::OpenAIBackend;
pub use relay::{AssistantRelay, ASSISTANT_TEMPERATURE, DEFAULT_SYSTEM_PROMPT};
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// A chat-completion provider
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one request and return the raw response
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Host this backend talks to (for logging)
    fn host(&self) -> &str;
}
