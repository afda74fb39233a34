pub mod account;
pub mod auth_guard;
pub mod item;
pub mod swagger_main;


use crate::SharedData;
use crate::jwt::JwtSettings;
use axum::Router;
use axum::middleware;
use axum::routing::{MethodRouter, get};
use std::sync::Arc;

/// Who may call a route. Protection is declared next to each route registration so
/// handlers never check tokens themselves.
pub enum Access {
    Anonymous,
    BearerToken,
}

impl Access {
    /// Wraps [route] in the bearer token check if this access level requires one
    pub fn guard(
        self,
        route: MethodRouter<Arc<SharedData>>,
        jwt: &Arc<JwtSettings>,
    ) -> MethodRouter<Arc<SharedData>> {
        match self {
            Self::Anonymous => route,
            Self::BearerToken => route.route_layer(middleware::from_fn_with_state(
                jwt.clone(),
                auth_guard::require_bearer_token,
            )),
        }
    }
}

/// Assembles every route the service exposes
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let jwt = shared_data.jwt.clone();

    Router::new()
        .route("/", Access::Anonymous.guard(get(hello), &jwt))
        .merge(item::item_routes(&jwt))
        .merge(account::account_routes())
        .merge(swagger_main::build_documentation())
        .with_state(shared_data)
}

async fn hello() -> &'static str {
    "Hello World from Minimal API!"
}
