//! Web search providers (Tavily, SerpAPI)
//!
//! Configuration problems (missing credential, unknown provider) are not
//! errors: they come back as [`SearchOutcome::Error`] so the model can read
//! them. Network and provider failures are returned as `Err`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::{Error, Result};

pub const DEFAULT_MAX_RESULTS: u32 = 5;
pub const MIN_RESULTS: u32 = 1;
pub const MAX_RESULTS: u32 = 10;

/// Recency window for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// Tavily `time_range` value
    pub fn tavily(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// SerpAPI `tbs` value
    pub fn serpapi_tbs(&self) -> &'static str {
        match self {
            Self::Day => "qdr:d",
            Self::Week => "qdr:w",
            Self::Month => "qdr:m",
            Self::Year => "qdr:y",
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d1" | "day" => Ok(Self::Day),
            "d7" | "w1" | "week" => Ok(Self::Week),
            "d30" | "m1" | "month" => Ok(Self::Month),
            "y1" | "year" => Ok(Self::Year),
            _ => Err(format!("Unknown time range: {}", s)),
        }
    }
}

/// A normalized search call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    /// Always within 1..=10
    pub max_results: u32,
    pub time_range: Option<TimeRange>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: DEFAULT_MAX_RESULTS,
            time_range: None,
        }
    }

    pub fn with_max_results(mut self, n: u32) -> Self {
        self.max_results = n.clamp(MIN_RESULTS, MAX_RESULTS);
        self
    }

    pub fn with_time_range(mut self, range: Option<TimeRange>) -> Self {
        self.time_range = range;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// What the `web_search` tool hands back to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Results {
        provider: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer: Option<String>,
        results: Vec<SearchHit>,
    },
    Error {
        error: String,
    },
}

impl SearchOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

/// Web search seam used by the assistant relay
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome>;
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiResult>,
}

#[derive(Debug, Deserialize)]
struct SerpApiResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

/// HTTP client for the configured provider
#[derive(Clone)]
pub struct WebSearchClient {
    http_client: Client,
    config: SearchConfig,
}

impl WebSearchClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SearchConfig::from_env())
    }

    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    async fn tavily(&self, key: &str, request: &SearchRequest) -> Result<SearchOutcome> {
        let mut body = json!({
            "query": request.query,
            "max_results": request.max_results,
            "include_answer": true,
            "include_images": false,
        });
        if let Some(range) = request.time_range {
            body["time_range"] = json!(range.tavily());
        }

        let response = self
            .http_client
            .post(format!(
                "{}/search",
                self.config.tavily_base_url.trim_end_matches('/')
            ))
            .header("X-Tavily-Api-Key", key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Tavily error {}: {}", status, body)));
        }

        let data: TavilyResponse = response.json().await?;
        Ok(SearchOutcome::Results {
            provider: "tavily".to_string(),
            answer: data.answer,
            results: data
                .results
                .into_iter()
                .map(|r| SearchHit {
                    title: r.title,
                    url: r.url,
                    snippet: r.content,
                })
                .collect(),
        })
    }

    async fn serpapi(&self, key: &str, request: &SearchRequest) -> Result<SearchOutcome> {
        let num = request.max_results.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("engine", "google"),
            ("q", request.query.as_str()),
            ("api_key", key),
            ("hl", "fr"),
            ("num", num.as_str()),
        ];
        if let Some(range) = request.time_range {
            params.push(("tbs", range.serpapi_tbs()));
        }

        let response = self
            .http_client
            .get(format!(
                "{}/search.json",
                self.config.serpapi_base_url.trim_end_matches('/')
            ))
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("SerpAPI error {}: {}", status, body)));
        }

        let data: SerpApiResponse = response.json().await?;
        Ok(SearchOutcome::Results {
            provider: "serpapi".to_string(),
            answer: None,
            results: data
                .organic_results
                .into_iter()
                .take(request.max_results as usize)
                .map(|r| SearchHit {
                    title: r.title,
                    url: r.link,
                    snippet: r.snippet,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl WebSearch for WebSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        debug!(
            provider = %self.config.provider,
            query = %request.query,
            max_results = request.max_results,
            "Running web search"
        );

        match self.config.provider.as_str() {
            "tavily" => match self.config.tavily_api_key.as_deref() {
                Some(key) => self.tavily(key, request).await,
                None => {
                    warn!("Web search requested without TAVILY_API_KEY");
                    Ok(SearchOutcome::error("TAVILY_API_KEY manquant"))
                }
            },
            "serpapi" => match self.config.serpapi_key.as_deref() {
                Some(key) => self.serpapi(key, request).await,
                None => {
                    warn!("Web search requested without SERPAPI_KEY");
                    Ok(SearchOutcome::error("SERPAPI_KEY manquant"))
                }
            },
            other => Ok(SearchOutcome::error(format!(
                "SEARCH_PROVIDER inconnu: {}",
                other
            ))),
        }
    }
}
