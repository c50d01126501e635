//! Tool definitions exposed to the chat model
//!
//! Only one tool exists: `web_search`, which the assistant relay executes
//! against the configured search provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::ai::ToolDefinition;
use crate::search::{SearchRequest, TimeRange, DEFAULT_MAX_RESULTS, MAX_RESULTS, MIN_RESULTS};

pub const WEB_SEARCH_TOOL: &str = "web_search";

const WEB_SEARCH_DESCRIPTION: &str =
    "Effectue une recherche web et renvoie des résultats résumés avec liens.";

/// Arguments of the `web_search` tool
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WebSearchParams {
    #[schemars(description = "Requête de recherche")]
    pub query: String,

    #[serde(rename = "maxResults", default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Nombre maximum de résultats (1 à 10, 5 par défaut)")]
    pub max_results: Option<f64>,

    #[serde(rename = "timeRange", default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Fenêtre temporelle (ex: \"d7\", \"d30\", \"y1\") si supporté")]
    pub time_range: Option<String>,
}

impl WebSearchParams {
    /// Read the model's raw JSON arguments
    ///
    /// Models sometimes send malformed JSON or wrong types; anything that
    /// cannot be read is treated as absent rather than failing the turn.
    pub fn from_arguments(raw: &str) -> Self {
        let value: Value = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw).unwrap_or_else(|e| {
                warn!(error = %e, "Malformed web_search arguments, using defaults");
                Value::Null
            })
        };

        let field = |name: &str| value.get(name);

        Self {
            query: field("query")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            max_results: field("maxResults").and_then(|v| {
                v.as_f64()
                    .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
            }),
            time_range: field("timeRange")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Normalize into a provider request
    pub fn into_request(self) -> SearchRequest {
        let max_results = self
            .max_results
            .filter(|n| n.is_finite())
            .map(|n| n.round().clamp(MIN_RESULTS as f64, MAX_RESULTS as f64) as u32)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        let time_range = self.time_range.as_deref().and_then(|raw| {
            raw.parse::<TimeRange>()
                .map_err(|e| warn!("{}, searching without time range", e))
                .ok()
        });

        SearchRequest::new(self.query)
            .with_max_results(max_results)
            .with_time_range(time_range)
    }
}

/// Convenience wrapper over [`WebSearchParams::from_arguments`]
pub fn parse_arguments(raw: &str) -> SearchRequest {
    WebSearchParams::from_arguments(raw).into_request()
}

/// The `web_search` function definition sent with the first model call
pub fn web_search_tool() -> ToolDefinition {
    let mut parameters: Value = schemars::schema_for!(WebSearchParams).into();
    if let Some(obj) = parameters.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    ToolDefinition::function(WEB_SEARCH_TOOL, WEB_SEARCH_DESCRIPTION, parameters)
}
