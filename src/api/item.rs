use crate::api::Access;
use crate::domain::item::driving_ports::{ItemError, ItemPort};
use crate::external_connections::ExternalConnectivity;
use crate::jwt::JwtSettings;
use crate::routing_utils::{
    BasicErrorResponse, GenericErrorResponse, Json, NotFoundResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{ErrorResponse, IntoResponse, Response};
use axum::routing::{delete, get};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(list_items, create_item, get_item, update_item, delete_item))]
/// Defines the OpenAPI documentation for the items API
pub struct ItemsApi;
/// Constant used to group item endpoints in OpenAPI documentation
pub const ITEM_API_GROUP: &str = "Items";

/// Adds routes under "/items" to the application router. Listing, creating, and deleting
/// need a bearer token, fetching and updating a single item do not.
pub fn item_routes(jwt: &Arc<JwtSettings>) -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/items",
            Access::BearerToken.guard(
                get(|State(app_state): AppState| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let item_service = domain::item::ItemService {};

                    list_items(&mut ext_cxn, &item_service).await
                })
                .post(
                    |State(app_state): AppState, Json(new_item): Json<dto::item::TodoItem>| async move {
                        let mut ext_cxn = app_state.ext_cxn.clone();
                        let item_service = domain::item::ItemService {};

                        create_item(new_item, &mut ext_cxn, &item_service).await
                    },
                ),
                jwt,
            ),
        )
        .route(
            "/items/:item_id",
            get(
                |State(app_state): AppState, Path(item_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let item_service = domain::item::ItemService {};

                    get_item(item_id, &mut ext_cxn, &item_service).await
                },
            )
            .put(
                |State(app_state): AppState,
                 Path(item_id): Path<i32>,
                 Json(update): Json<dto::item::TodoItem>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let item_service = domain::item::ItemService {};

                    update_item(item_id, update, &mut ext_cxn, &item_service).await
                },
            )
            .merge(Access::BearerToken.guard(
                delete(
                    |State(app_state): AppState, Path(item_id): Path<i32>| async move {
                        let mut ext_cxn = app_state.ext_cxn.clone();
                        let item_service = domain::item::ItemService {};

                        delete_item(item_id, &mut ext_cxn, &item_service).await
                    },
                ),
                jwt,
            )),
        )
}

/// Turns item failures into HTTP responses. A missing item on update or delete is
/// reported as 400 rather than 404, matching what existing clients expect.
struct ItemErrorResponse(ItemError);

impl IntoResponse for ItemErrorResponse {
    fn into_response(self) -> Response {
        match self.0 {
            ItemError::AlreadyExists(_) => BasicErrorResponse::new(
                "already_exists",
                "Item with the same Id already exists.",
            )
            .with_status(StatusCode::BAD_REQUEST),
            ItemError::DoesNotExist(_) => BasicErrorResponse::new(
                "does_not_exist",
                "No item exists with the given Id.",
            )
            .with_status(StatusCode::BAD_REQUEST),
            ItemError::PortError(err) => GenericErrorResponse(err).into_response(),
        }
    }
}

impl From<ItemError> for ItemErrorResponse {
    fn from(value: ItemError) -> Self {
        Self(value)
    }
}

#[utoipa::path(
    get,
    path = "/items",
    tag = ITEM_API_GROUP,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Every stored item, ordered by ID", body = [dto::item::TodoItem]),
        (status = 401, description = "Missing or invalid bearer token", body = BasicErrorResponse),
        (status = 500, description = "Items could not be read", body = BasicErrorResponse),
    ),
)]
/// Retrieves every item on the list
async fn list_items(
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<Json<Vec<dto::item::TodoItem>>, ErrorResponse> {
    info!("Listing all items");
    let item_reader = persistence::db_item_driven_ports::DbItemReader;

    let items = item_service
        .all_items(&mut *ext_cxn, &item_reader)
        .await
        .map_err(GenericErrorResponse)?;

    Ok(Json(
        items.into_iter().map(dto::item::TodoItem::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/items",
    tag = ITEM_API_GROUP,
    security(("bearer" = [])),
    request_body = dto::item::TodoItem,
    responses(
        (status = 201, description = "Item was created", body = dto::item::TodoItem,
            headers(("Location" = String, description = "Where the new item can be fetched"))),
        (status = 400, description = "An item with the same ID already exists, or the body was malformed", body = BasicErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = BasicErrorResponse),
        (status = 500, description = "Item could not be stored", body = BasicErrorResponse),
    ),
)]
/// Creates an item with a caller-chosen ID
async fn create_item(
    new_item: dto::item::TodoItem,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<Response, ErrorResponse> {
    let domain_item = domain::item::TodoItem::from(new_item);
    info!("Creating {domain_item}");
    let item_writer = persistence::db_item_driven_ports::DbItemWriter;

    let created = item_service
        .create_item(&domain_item, &mut *ext_cxn, &item_writer)
        .await
        .map_err(ItemErrorResponse::from)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/items/{}", created.id))],
        Json(dto::item::TodoItem::from(created)),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = ITEM_API_GROUP,
    params(("item_id" = i32, Path, description = "ID of the item to fetch")),
    responses(
        (status = 200, description = "The requested item", body = dto::item::TodoItem),
        (status = 404, description = "No item has that ID", body = BasicErrorResponse),
        (status = 500, description = "Item could not be read", body = BasicErrorResponse),
    ),
)]
/// Retrieves a single item
async fn get_item(
    item_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<Json<dto::item::TodoItem>, ErrorResponse> {
    info!("Fetching item {item_id}");
    let item_reader = persistence::db_item_driven_ports::DbItemReader;

    let item = item_service
        .item_by_id(item_id, &mut *ext_cxn, &item_reader)
        .await
        .map_err(GenericErrorResponse)?;

    match item {
        Some(item) => Ok(Json(dto::item::TodoItem::from(item))),
        None => Err(NotFoundResponse.into()),
    }
}

#[utoipa::path(
    put,
    path = "/items/{item_id}",
    tag = ITEM_API_GROUP,
    params(("item_id" = i32, Path, description = "ID of the item to update")),
    request_body(content = dto::item::TodoItem, description = "New title and completion state. The ID in the body is ignored."),
    responses(
        (status = 200, description = "The item as it is now stored", body = dto::item::TodoItem),
        (status = 400, description = "No item has that ID, or the body was malformed", body = BasicErrorResponse),
        (status = 500, description = "Item could not be updated", body = BasicErrorResponse),
    ),
)]
/// Overwrites the title and completion state of an item
async fn update_item(
    item_id: i32,
    update: dto::item::TodoItem,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<Json<dto::item::TodoItem>, ErrorResponse> {
    info!("Updating item {item_id}");
    let domain_update = domain::item::UpdateItem::from(update);
    let item_writer = persistence::db_item_driven_ports::DbItemWriter;

    let update_result = item_service
        .update_item(item_id, &domain_update, &mut *ext_cxn, &item_writer)
        .await;
    match update_result {
        Ok(updated) => Ok(Json(dto::item::TodoItem::from(updated))),
        Err(item_err) => {
            if let ItemError::DoesNotExist(_) = item_err {
                info!("Tried to update missing item {item_id}");
            }
            Err(ItemErrorResponse(item_err).into())
        }
    }
}

#[utoipa::path(
    delete,
    path = "/items/{item_id}",
    tag = ITEM_API_GROUP,
    security(("bearer" = [])),
    params(("item_id" = i32, Path, description = "ID of the item to delete")),
    responses(
        (status = 204, description = "Item was deleted"),
        (status = 400, description = "No item has that ID", body = BasicErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = BasicErrorResponse),
        (status = 500, description = "Item could not be deleted", body = BasicErrorResponse),
    ),
)]
/// Deletes an item
async fn delete_item(
    item_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    item_service: &impl ItemPort,
) -> Result<StatusCode, ErrorResponse> {
    info!("Deleting item {item_id}");
    let item_writer = persistence::db_item_driven_ports::DbItemWriter;

    item_service
        .delete_item(item_id, &mut *ext_cxn, &item_writer)
        .await
        .map_err(ItemErrorResponse::from)?;

    Ok(StatusCode::NO_CONTENT)
}
