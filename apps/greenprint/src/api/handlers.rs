//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Error mapping follows the engine's taxonomy: configuration problems
//! (unknown country, invalid quantity, unknown activity key) are client
//! errors; an unknown session id is 404; gaps in reference data never
//! produce an error at all.

use super::{
    AppState,
    types::{
        AckResponse, ActivitiesResponse, AssessRequest, AssessResponse, CountriesResponse,
        CreateSessionRequest, HealthResponse, InputsRequest, SessionResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use greenprint_core::{Assessment, DEFAULT_TOP_ACTIVITIES};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CATALOGUE HANDLERS
// =============================================================================

/// List recognized countries (the factor table's columns, sorted).
pub async fn countries_handler(State(state): State<AppState>) -> impl IntoResponse {
    let countries = state
        .reference
        .factors
        .countries()
        .into_iter()
        .map(str::to_string)
        .collect();
    (StatusCode::OK, Json(CountriesResponse { countries }))
}

/// List the activities input is collected for.
pub async fn activities_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(ActivitiesResponse::default()))
}

// =============================================================================
// ONE-SHOT ASSESS HANDLER
// =============================================================================

/// Stateless assessment: country + quantities in, outcome out.
pub async fn assess_handler(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> impl IntoResponse {
    let inputs = match request.to_inputs() {
        Ok(inputs) => inputs,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AssessResponse::error(format!("Invalid input: {}", e))),
            );
        }
    };

    let top_n = request.top.unwrap_or(DEFAULT_TOP_ACTIVITIES);
    match greenprint_core::assess(&inputs, &request.country, &state.reference, top_n) {
        Ok(outcome) => (StatusCode::OK, Json(AssessResponse::success(outcome))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AssessResponse::error(format!("Assessment failed: {}", e))),
        ),
    }
}

// =============================================================================
// SESSION HANDLERS
// =============================================================================

/// Create an isolated assessment session.
pub async fn create_session_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    let assessment = match Assessment::new(&request.country, &state.reference.factors) {
        Ok(a) => match request.visitor {
            Some(name) => a.with_visitor(name),
            None => a,
        },
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(SessionResponse::error(format!(
                    "Cannot create session: {}",
                    e
                ))),
            );
        }
    };

    let session_id = state.insert_session(assessment).await;
    tracing::info!(session_id, "session created");
    (StatusCode::OK, Json(SessionResponse::success(session_id)))
}

/// Record quantities into a session.
pub async fn record_inputs_handler(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
    Json(request): Json<InputsRequest>,
) -> impl IntoResponse {
    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&session_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(AckResponse::error("Unknown session")),
        );
    };

    let pairs = request
        .quantities
        .iter()
        .map(|(key, &quantity)| (key.as_str(), quantity));
    match session.record_inputs(pairs) {
        Ok(()) => (StatusCode::OK, Json(AckResponse::success())),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AckResponse::error(format!("Invalid input: {}", e))),
        ),
    }
}

/// Compute the session's assessment outcome.
pub async fn session_result_handler(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;
    let Some(session) = sessions.get(&session_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(AssessResponse::error("Unknown session")),
        );
    };

    match session.compute(&state.reference, DEFAULT_TOP_ACTIVITIES) {
        Ok(outcome) => (StatusCode::OK, Json(AssessResponse::success(outcome))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AssessResponse::error(format!("Assessment failed: {}", e))),
        ),
    }
}

/// Render the session's plain-text report.
pub async fn session_report_handler(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;
    let Some(session) = sessions.get(&session_id) else {
        return (StatusCode::NOT_FOUND, "Unknown session\n".to_string());
    };

    match session.report(&state.reference, DEFAULT_TOP_ACTIVITIES) {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Report failed: {}\n", e),
        ),
    }
}

/// Drop a session.
pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> impl IntoResponse {
    let mut sessions = state.sessions.write().await;
    if sessions.remove(&session_id).is_some() {
        tracing::info!(session_id, "session deleted");
        (StatusCode::OK, Json(AckResponse::success()))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(AckResponse::error("Unknown session")),
        )
    }
}
