use crate::jwt::JwtSettings;
use crate::routing_utils::UnauthorizedResponse;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{debug, warn};

/// Middleware which only lets a request through to its handler if it carries a bearer token
/// signed with our key for our issuer and audience. The token's claims are attached to the
/// request extensions for handlers that want them.
pub async fn require_bearer_token(
    State(jwt): State<Arc<JwtSettings>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        debug!("Request to protected route had no bearer token");
        return UnauthorizedResponse.into_response();
    };

    match jwt.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(validation_err) => {
            warn!("Rejected bearer token: {validation_err}");
            UnauthorizedResponse.into_response()
        }
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = auth_header.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
