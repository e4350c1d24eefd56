//! # GreenPrint HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Health check
//! - `GET  /countries` - Recognized countries
//! - `GET  /activities` - Activity catalogue (keys, labels, categories)
//! - `POST /assess` - Stateless one-shot assessment
//! - `POST /sessions` - Create an assessment session
//! - `POST /sessions/{id}/inputs` - Record quantities
//! - `GET  /sessions/{id}/result` - Assessment outcome as JSON
//! - `GET  /sessions/{id}/report` - Plain-text report
//! - `DELETE /sessions/{id}` - Drop the session
//!
//! ## Session Isolation
//!
//! Each session id maps to one `Assessment`; nothing is shared between
//! sessions except the read-only reference tables loaded at startup.
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `GREENPRINT_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `GREENPRINT_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `GREENPRINT_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `greenprint::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    activities_handler, assess_handler, countries_handler, create_session_handler,
    delete_session_handler, health_handler, record_inputs_handler, session_report_handler,
    session_result_handler,
};
#[allow(unused_imports)]
pub use types::{
    AckResponse, ActivitiesResponse, ActivityJson, AssessRequest, AssessResponse,
    CountriesResponse, CreateSessionRequest, HealthResponse, InputsRequest, SessionResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use greenprint_core::{Assessment, GreenprintError, ReferenceData};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: read-only reference tables plus per-id sessions.
#[derive(Clone)]
pub struct AppState {
    /// Reference tables, loaded once at startup and never mutated.
    pub reference: Arc<ReferenceData>,
    /// Isolated per-user sessions, keyed by session id.
    pub sessions: Arc<RwLock<BTreeMap<u64, Assessment>>>,
    /// Monotonic session id source.
    next_session_id: Arc<AtomicU64>,
}

impl AppState {
    /// Create new app state around loaded reference data.
    #[must_use]
    pub fn new(reference: ReferenceData) -> Self {
        Self {
            reference: Arc::new(reference),
            sessions: Arc::new(RwLock::new(BTreeMap::new())),
            next_session_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Store a session and return its freshly allocated id.
    pub async fn insert_session(&self, assessment: Assessment) -> u64 {
        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        self.sessions.write().await.insert(session_id, assessment);
        session_id
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `GREENPRINT_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("GREENPRINT_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (GREENPRINT_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in GREENPRINT_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No GREENPRINT_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set GREENPRINT_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/countries", get(handlers::countries_handler))
        .route("/activities", get(handlers::activities_handler))
        .route("/assess", post(handlers::assess_handler))
        .route("/sessions", post(handlers::create_session_handler))
        .route("/sessions/{id}/inputs", post(handlers::record_inputs_handler))
        .route("/sessions/{id}/result", get(handlers::session_result_handler))
        .route("/sessions/{id}/report", get(handlers::session_report_handler))
        .route("/sessions/{id}", delete(handlers::delete_session_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, reference: ReferenceData) -> Result<(), GreenprintError> {
    let state = AppState::new(reference);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GreenprintError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("GreenPrint HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| GreenprintError::IoError(format!("Server error: {}", e)))
}
