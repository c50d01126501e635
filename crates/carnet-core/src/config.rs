//! Environment-driven configuration for the assistant and web search
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`: chat-completion credential (assistant disabled without it)
//! - `OPENAI_BASE_URL`: chat-completion host (default: https://api.openai.com)
//! - `OPENAI_MODEL`: model name (default: gpt-4o-mini)
//! - `CARNET_UPSTREAM_TIMEOUT_SECS`: timeout for every upstream call (default: 60)
//! - `SEARCH_PROVIDER`: `tavily` or `serpapi` (default: tavily)
//! - `TAVILY_API_KEY` / `SERPAPI_KEY`: search credentials
//! - `TAVILY_BASE_URL` / `SERPAPI_BASE_URL`: provider hosts

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SEARCH_PROVIDER: &str = "tavily";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// Web search provider settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Lowercased provider name; validated when a search runs
    pub provider: String,
    pub tavily_api_key: Option<String>,
    pub serpapi_key: Option<String>,
    pub tavily_base_url: String,
    pub serpapi_base_url: String,
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_SEARCH_PROVIDER.to_string(),
            tavily_api_key: None,
            serpapi_key: None,
            tavily_base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            serpapi_base_url: DEFAULT_SERPAPI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            provider: get("SEARCH_PROVIDER")
                .map(|p| p.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_SEARCH_PROVIDER.to_string()),
            tavily_api_key: get("TAVILY_API_KEY"),
            serpapi_key: get("SERPAPI_KEY"),
            tavily_base_url: get("TAVILY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TAVILY_BASE_URL.to_string()),
            serpapi_base_url: get("SERPAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SERPAPI_BASE_URL.to_string()),
            timeout: timeout_from(&get),
        }
    }
}

/// Chat-completion settings plus the search tool it drives
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub search: SearchConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            search: SearchConfig::default(),
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: timeout_from(&get),
            search: SearchConfig::from_lookup(&lookup),
        }
    }

    /// Override the chat-completion host
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

fn timeout_from<F>(get: &F) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match get("CARNET_UPSTREAM_TIMEOUT_SECS") {
        Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
            warn!(value = %raw, "Invalid CARNET_UPSTREAM_TIMEOUT_SECS, using default");
            DEFAULT_TIMEOUT_SECS
        }),
        None => DEFAULT_TIMEOUT_SECS,
    };
    Duration::from_secs(secs)
}
