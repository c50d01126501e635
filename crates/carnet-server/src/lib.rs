//! Carnet Web Server
//!
//! Axum-based REST API for the Carnet personal finance organizer.
//!
//! Security features:
//! - Restrictive CORS policy (same-origin unless origins are configured)
//! - Static security headers on every response
//! - Sanitized error responses for internal failures

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use carnet_core::ai::AssistantRelay;
use carnet_core::config::AssistantConfig;
use carnet_core::storage::KeyValueStore;
use carnet_core::Ledger;

mod handlers;

/// Maximum CSV upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    /// `None` when no chat-completion key is configured
    pub relay: Option<AssistantRelay>,
    pub config: ServerConfig,
}

impl AppState {
    /// Lock the ledger for the duration of one request
    pub fn ledger(&self) -> Result<MutexGuard<'_, Ledger>, AppError> {
        self.ledger
            .lock()
            .map_err(|_| AppError::internal("Ledger lock poisoned"))
    }
}

/// Create the application router
pub fn create_router(
    store: Arc<dyn KeyValueStore>,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    let relay = match AssistantRelay::from_config(&AssistantConfig::from_env()) {
        Ok(relay) => Some(relay),
        Err(e) => {
            info!("ℹ️  Assistant not configured ({}); /api/assistant will report it", e);
            None
        }
    };
    create_router_with_relay(store, static_dir, config, relay)
}

/// Create the application router with an explicit relay (for testing)
pub fn create_router_with_relay(
    store: Arc<dyn KeyValueStore>,
    static_dir: Option<&str>,
    config: ServerConfig,
    relay: Option<AssistantRelay>,
) -> Router {
    let state = Arc::new(AppState {
        ledger: Mutex::new(Ledger::open(store)),
        relay,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Assistant
        .route("/assistant", post(handlers::ask_assistant))
        // Classifier
        .route("/suggest", post(handlers::suggest))
        .route("/learn", post(handlers::learn))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            put(handlers::update_transaction).delete(handlers::delete_transaction),
        )
        .route("/categories", get(handlers::list_categories))
        .route("/years", get(handlers::list_years))
        .route("/summary/year", get(handlers::annual_summary))
        .route("/summary/categories", get(handlers::category_summary))
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::upsert_budget),
        )
        .route("/budgets/usage", get(handlers::budget_usage))
        .route(
            "/budgets/:id",
            put(handlers::update_budget).delete(handlers::delete_budget),
        )
        .route("/advice", get(handlers::get_advice))
        // Objectives
        .route(
            "/objectives",
            get(handlers::list_objectives).post(handlers::create_objective),
        )
        .route(
            "/objectives/:id",
            put(handlers::update_objective).delete(handlers::delete_objective),
        )
        .route(
            "/objectives/:id/contribute",
            post(handlers::contribute_objective),
        )
        // CSV
        .route("/export/transactions", get(handlers::export_transactions))
        .route("/export/objectives", get(handlers::export_objectives))
        .route("/import/transactions", post(handlers::import_transactions))
        .route("/import/objectives", post(handlers::import_objectives))
        // Preferences
        .route("/theme", get(handlers::get_theme).put(handlers::set_theme));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    // CSP: same-origin scripts, inline styles allowed
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    store: Arc<dyn KeyValueStore>,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if host != "127.0.0.1" && host != "localhost" {
        warn!("⚠️  Listening on {} without authentication - keep it on a trusted network", host);
    }

    let app = create_router(store, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        use carnet_core::Error as CoreError;

        let err = err.into();
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::Validation(msg)) => Self::bad_request(msg),
            Some(CoreError::NotFound(msg)) => Self::not_found(&format!("{} not found", msg)),
            // Assistant failures are surfaced verbatim
            Some(
                CoreError::Config(msg) | CoreError::Upstream(msg) | CoreError::EmptyResponse(msg),
            ) => Self::internal(msg),
            Some(CoreError::Http(e)) => Self::internal(&e.to_string()),
            _ => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(err),
            },
        }
    }
}
