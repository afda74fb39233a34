use crate::domain::account::driven_ports::TokenIssuer;
use crate::domain::account::driving_ports::{AccountPort, LoginError};
use crate::routing_utils::{BasicErrorResponse, GenericErrorResponse, Json};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::post;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(login))]
/// Defines the OpenAPI documentation for the accounts API
pub struct AccountsApi;
/// Constant used to group account endpoints in OpenAPI documentation
pub const ACCOUNT_API_GROUP: &str = "Accounts";

/// Builds a router for the account routes, all of which are open to anonymous callers
pub fn account_routes() -> Router<Arc<SharedData>> {
    Router::new().route(
        "/accounts/login",
        post(
            |State(app_state): AppState, Json(login_request): Json<dto::account::LoginRequest>| async move {
                let account_service = domain::account::AccountService {};

                login(login_request, &account_service, app_state.jwt.as_ref())
            },
        ),
    )
}

#[utoipa::path(
    post,
    path = "/accounts/login",
    tag = ACCOUNT_API_GROUP,
    request_body = dto::account::LoginRequest,
    responses(
        (status = 200, description = "Credentials were accepted, the body is a signed JWT", body = String,
            example = json!("eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.e30.c2lnbmF0dXJl")),
        (status = 401, description = "Credentials were not accepted"),
        (status = 500, description = "A token could not be issued", body = BasicErrorResponse),
    ),
)]
/// Exchanges a username and password for a bearer token
fn login(
    login_request: dto::account::LoginRequest,
    account_service: &impl AccountPort,
    token_issuer: &impl TokenIssuer,
) -> Result<Json<String>, ErrorResponse> {
    let credentials = domain::account::LoginCredentials::from(login_request);
    info!("Received {credentials}");

    match account_service.login(&credentials, token_issuer) {
        Ok(token) => Ok(Json(token)),
        Err(LoginError::InvalidCredentials) => Err(StatusCode::UNAUTHORIZED.into()),
        Err(LoginError::TokenFailure(cause)) => Err(GenericErrorResponse(cause).into()),
    }
}
