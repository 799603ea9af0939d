// rest/auth.rs — optional bearer-token check for the task routes.
//
// When `api_token` is configured every task request must carry
// `Authorization: Bearer <token>`. Token issuance is out of scope; the
// requester identity used to default task ownership comes from config.

use axum::http::{header, HeaderMap};

use super::error::ApiError;
use crate::config::ServerConfig;

/// Check credentials and return the requester id.
pub fn authorize(config: &ServerConfig, headers: &HeaderMap) -> Result<String, ApiError> {
    let Some(expected) = config.api_token.as_deref().filter(|t| !t.is_empty()) else {
        // Auth disabled — trusted local use.
        return Ok(config.default_user_id.clone());
    };

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    if token != expected {
        return Err(ApiError::Unauthorized("Invalid token".to_string()));
    }

    Ok(config.default_user_id.clone())
}
