use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct BasicErrorResponse {
    #[schema(example = "not_found")]
    pub error_code: String,
    #[schema(example = "The requested item could not be found.")]
    pub error_description: String,
    pub extra_info: Option<String>,
}

impl BasicErrorResponse {
    pub fn new(error_code: &str, error_description: &str) -> Self {
        BasicErrorResponse {
            error_code: error_code.into(),
            error_description: error_description.into(),
            extra_info: None,
        }
    }

    /// Pairs this body with an HTTP status to produce a full response
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, axum::Json(self)).into_response()
    }
}

/// Response type for failures nobody could have anticipated, such as losing the database.
/// The cause is logged rather than sent to the client.
pub struct GenericErrorResponse(pub anyhow::Error);

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Unexpected failure while handling a request: {:#}", self.0);
        BasicErrorResponse::new(
            "internal_error",
            "Could not access data to complete your request",
        )
        .with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Response type for a lookup that matched nothing
pub struct NotFoundResponse;

impl IntoResponse for NotFoundResponse {
    fn into_response(self) -> Response {
        BasicErrorResponse::new("not_found", "The requested item could not be found.")
            .with_status(StatusCode::NOT_FOUND)
    }
}

/// Response type for requests to protected routes that lack an acceptable bearer token
pub struct UnauthorizedResponse;

impl IntoResponse for UnauthorizedResponse {
    fn into_response(self) -> Response {
        let mut response = BasicErrorResponse::new(
            "unauthorized",
            "A valid bearer token is required to access this resource.",
        )
        .with_status(StatusCode::UNAUTHORIZED);
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            header::HeaderValue::from_static("Bearer"),
        );

        response
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        BasicErrorResponse {
            error_code: "invalid_json".into(),
            error_description: "The passed request body contained malformed or unreadable JSON."
                .into(),
            extra_info: Some(self.parse_problem),
        }
        .with_status(StatusCode::BAD_REQUEST)
    }
}
