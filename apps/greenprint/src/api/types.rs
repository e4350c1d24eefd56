//! # API Request/Response Types
//!
//! JSON structures for the HTTP API. Responses carry an explicit
//! `success` flag plus an optional error message, so clients never have
//! to infer failure from a missing field.

use greenprint_core::{Activity, ActivityInputs, AssessmentOutcome, GreenprintError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CATALOGUE RESPONSES
// =============================================================================

/// Recognized countries, sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
}

/// One activity the assessment collects input for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityJson {
    pub key: Activity,
    pub label: String,
    pub category: String,
}

impl From<Activity> for ActivityJson {
    fn from(activity: Activity) -> Self {
        Self {
            key: activity,
            label: activity.label().to_string(),
            category: activity.category().name().to_string(),
        }
    }
}

/// The full activity catalogue, in input-form order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityJson>,
}

impl Default for ActivitiesResponse {
    fn default() -> Self {
        Self {
            activities: Activity::ALL.iter().copied().map(ActivityJson::from).collect(),
        }
    }
}

// =============================================================================
// ASSESS REQUEST/RESPONSE
// =============================================================================

/// One-shot stateless assessment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessRequest {
    pub country: String,
    #[serde(default)]
    pub visitor: Option<String>,
    /// Activity wire key → monthly quantity.
    #[serde(default)]
    pub quantities: BTreeMap<String, f64>,
    /// Number of top emitters to return (default 10).
    #[serde(default)]
    pub top: Option<usize>,
}

impl AssessRequest {
    /// Validate quantities at the API boundary.
    pub fn to_inputs(&self) -> Result<ActivityInputs, GreenprintError> {
        ActivityInputs::from_pairs(
            self.quantities
                .iter()
                .map(|(key, &quantity)| (key.as_str(), quantity)),
        )
    }
}

/// Assessment outcome response (also used for session results).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessResponse {
    pub success: bool,
    pub outcome: Option<AssessmentOutcome>,
    pub error: Option<String>,
}

impl AssessResponse {
    pub fn success(outcome: AssessmentOutcome) -> Self {
        Self {
            success: true,
            outcome: Some(outcome),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SESSION REQUEST/RESPONSE
// =============================================================================

/// Session creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub country: String,
    #[serde(default)]
    pub visitor: Option<String>,
}

/// Session creation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session_id: Option<u64>,
    pub error: Option<String>,
}

impl SessionResponse {
    pub fn success(session_id: u64) -> Self {
        Self {
            success: true,
            session_id: Some(session_id),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            error: Some(msg.into()),
        }
    }
}

/// Quantity recording request for an existing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsRequest {
    /// Activity wire key → monthly quantity.
    pub quantities: BTreeMap<String, f64>,
}

/// Quantity recording / session deletion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl AckResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activities_catalogue_is_complete() {
        let response = ActivitiesResponse::default();
        assert_eq!(response.activities.len(), Activity::ALL.len());
        assert_eq!(response.activities[0].key, Activity::DomesticFlight);
        assert_eq!(response.activities[0].category, "Transport");
    }

    #[test]
    fn assess_request_validates_quantities() {
        let request = AssessRequest {
            country: "Germany".to_string(),
            visitor: None,
            quantities: BTreeMap::from([("electricity_used".to_string(), -5.0)]),
            top: None,
        };
        assert!(request.to_inputs().is_err());
    }

    #[test]
    fn assess_request_accepts_wire_keys() {
        let request: AssessRequest = serde_json::from_str(
            r#"{"country":"Germany","quantities":{"electricity_used":100.0}}"#,
        )
        .expect("deserialize");
        let inputs = request.to_inputs().expect("valid");
        assert_eq!(inputs.get(Activity::Electricity), 100.0);
    }
}
