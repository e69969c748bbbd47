use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::env;

/// Environment variable holding the bearer token.
pub const API_KEY_ENV: &str = "SCRIPTGATE_API_KEY";

/// Reject requests without `Authorization: Bearer $SCRIPTGATE_API_KEY`.
///
/// Only installed when `server.require_api_key` is set. A missing key in the
/// environment is a server misconfiguration, not a client error.
pub async fn api_key_auth(req: Request<Body>, next: Next) -> Response {
    let expected = match env::var(API_KEY_ENV) {
        Ok(v) if !v.is_empty() => v,
        _ => {
            tracing::error!("{} is not set but an API key is required", API_KEY_ENV);
            return reject(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured");
        }
    };

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if bearer_matches(header, &expected) {
        next.run(req).await
    } else {
        reject(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

fn bearer_matches(header: Option<&str>, expected: &str) -> bool {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected)
}

fn reject(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "ok": false,
            "error": error
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_must_match_exactly() {
        assert!(bearer_matches(Some("Bearer s3cret"), "s3cret"));
        assert!(!bearer_matches(Some("Bearer s3cret "), "s3cret"));
        assert!(!bearer_matches(Some("bearer s3cret"), "s3cret"));
        assert!(!bearer_matches(Some("s3cret"), "s3cret"));
        assert!(!bearer_matches(None, "s3cret"));
    }
}
