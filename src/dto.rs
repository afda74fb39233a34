pub mod account;
pub mod item;

use crate::routing_utils::BasicErrorResponse;
use utoipa::OpenApi;

/// Registers the request and response bodies of the API with the OpenAPI document
#[derive(OpenApi)]
#[openapi(components(schemas(item::TodoItem, account::LoginRequest, BasicErrorResponse)))]
pub struct OpenApiSchemas;
