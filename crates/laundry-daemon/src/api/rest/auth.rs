//! Bearer token check
//!
//! `Authorization: Bearer <token>` must match a configured token. Browsers
//! cannot set headers on an `EventSource`, so `?access_token=` is accepted
//! as well. With no tokens configured every request passes.

use super::state::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Query, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenQuery {
    access_token: Option<String>,
}

/// Middleware rejecting requests without a known token
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.tokens.is_empty() {
        return Ok(next.run(request).await);
    }

    let known = presented_token(&request).map(|token| state.tokens.contains(&token));
    match known {
        Some(true) => Ok(next.run(request).await),
        Some(false) => {
            tracing::warn!(path = %request.uri().path(), "Rejected unknown token");
            Err(ApiError::Unauthorized)
        }
        None => Err(ApiError::Unauthorized),
    }
}

/// Bearer header first, then the percent-decoded `access_token` query value
fn presented_token(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(request.uri())
            .ok()?
            .0
            .access_token
    })
}
