//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use carnet_core::config::AssistantConfig;
use carnet_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Carnet web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let assistant = AssistantConfig::from_env();
    if assistant.api_key.is_some() {
        println!(
            "   🤖 Assistant: {} via {} (search: {})",
            assistant.model, assistant.base_url, assistant.search.provider
        );
    } else {
        println!("   💡 Tip: Set OPENAI_API_KEY to enable the assistant");
    }

    if allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    println!();

    let db = open_db(db_path)?;
    let config = ServerConfig { allowed_origins };
    let static_dir = static_dir.and_then(Path::to_str);

    carnet_server::serve(Arc::new(db), host, port, static_dir, config).await
}
