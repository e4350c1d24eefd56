//! # API Key Gate
//!
//! Optional bearer-token protection for the HTTP surface.
//!
//! When `GREENPRINT_API_KEY` is set, every endpoint except the health
//! probe requires that key in the `Authorization` header (with or
//! without a `Bearer ` prefix). When it is unset the server is open;
//! router construction logs that loudly so it cannot go unnoticed.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

// =============================================================================
// KEY CONFIGURATION
// =============================================================================

/// The configured API key, if any.
///
/// An empty `GREENPRINT_API_KEY` counts as unset; an empty key would
/// make the padded comparison accept an empty header.
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("GREENPRINT_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
}

/// Whether a presented key matches the configured one.
///
/// Both keys are copied into equal-width buffers before the `ct_eq`,
/// so the comparison touches the same number of bytes regardless of
/// where they first differ or how long either key is. The length check
/// happens after the comparison for the same reason.
fn key_matches(presented: &str, expected: &str) -> bool {
    let presented = presented.as_bytes();
    let expected = expected.as_bytes();

    let width = presented.len().max(expected.len());
    let mut lhs = vec![0u8; width];
    let mut rhs = vec![0u8; width];
    lhs[..presented.len()].copy_from_slice(presented);
    rhs[..expected.len()].copy_from_slice(expected);

    let content_equal: bool = lhs.ct_eq(&rhs).into();
    content_equal && presented.len() == expected.len()
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Reject requests that do not carry the configured API key.
///
/// No-op when no key is configured. `/health` always passes so probes
/// and load balancers do not need credentials.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = get_api_key_from_env() else {
        return Ok(next.run(request).await);
    };

    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let verdict = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value))
    {
        Some(key) if key_matches(key, &expected) => Ok(()),
        Some(_) => Err("key_mismatch"),
        None => Err("no_credentials"),
    };

    match verdict {
        Ok(()) => Ok(next.run(request).await),
        Err(reason) => {
            tracing::warn!(
                path = %request.uri().path(),
                reason,
                "rejected unauthorized request"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
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
    fn key_matches_exact_key_only() {
        assert!(key_matches("sesame", "sesame"));
        assert!(!key_matches("sesame!", "sesame"));
        assert!(!key_matches("sesame", "sesame!"));
        assert!(!key_matches("sesamf", "sesame"));
    }

    #[test]
    fn key_matches_rejects_empty_presented_key() {
        assert!(!key_matches("", "sesame"));
    }

    #[test]
    fn empty_env_key_disables_auth() {
        // SAFETY: This is a unit test running in isolation.
        unsafe { std::env::remove_var("GREENPRINT_API_KEY") };
        assert!(get_api_key_from_env().is_none());
    }
}
