use super::test_util::prepare_db_and_test;
use crate::domain::item::driven_ports::{ItemReader, ItemWriter};
use crate::domain::item::test_util::item;
use crate::domain::item::UpdateItem;
use crate::jwt::test_util::test_settings;
use crate::persistence::ExternalConnectivity;
use crate::persistence::db_item_driven_ports::{DbItemReader, DbItemWriter};
use crate::routing_utils::BasicErrorResponse;
use crate::{SharedData, api, dto};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde::de::DeserializeOwned;
use speculoos::prelude::*;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

fn router_for(db: PgPool) -> Router {
    api::build_router(Arc::new(SharedData {
        ext_cxn: ExternalConnectivity::new(db),
        jwt: Arc::new(test_settings()),
    }))
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request_body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json)
        }
        None => Body::empty(),
    };

    router
        .clone()
        .oneshot(request.body(request_body).expect("request should build"))
        .await
        .expect("router should be infallible")
}

async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

async fn log_in(router: &Router) -> String {
    let response = send(
        router,
        Method::POST,
        "/accounts/login",
        None,
        Some(r#"{"username":"Winston","password":"123"}"#.to_owned()),
    )
    .await;
    assert_eq!(StatusCode::OK, response.status());

    read_json(response).await
}

fn item_json(id: i32, title: &str, is_completed: bool) -> String {
    format!(r#"{{"id":{id},"title":"{title}","isCompleted":{is_completed}}}"#)
}

#[test]
fn db_writer_rejects_duplicate_ids() {
    prepare_db_and_test(|db| async move {
        let mut ext_cxn = ExternalConnectivity::new(db);
        let original = item(1, "Buy milk", false);

        let first = DbItemWriter.insert_item(&original, &mut ext_cxn).await;
        let second = DbItemWriter
            .insert_item(&item(1, "Walk dog", true), &mut ext_cxn)
            .await;

        assert_that!(first).is_ok().is_some().is_equal_to(&original);
        assert_that!(second).is_ok().is_none();

        let stored = DbItemReader.item_by_id(1, &mut ext_cxn).await;
        assert_that!(stored).is_ok().is_some().is_equal_to(&original);
    });
}

#[test]
fn db_reader_lists_items_in_id_order() {
    prepare_db_and_test(|db| async move {
        let mut ext_cxn = ExternalConnectivity::new(db);
        for todo in [item(3, "c", false), item(1, "a", true), item(2, "b", false)] {
            DbItemWriter
                .insert_item(&todo, &mut ext_cxn)
                .await
                .expect("insert should work");
        }

        let items = DbItemReader
            .all_items(&mut ext_cxn)
            .await
            .expect("listing should work");
        let ids: Vec<i32> = items.iter().map(|todo| todo.id).collect();

        assert_eq!(vec![1, 2, 3], ids);
    });
}

#[test]
fn db_writer_updates_and_deletes_only_existing_items() {
    prepare_db_and_test(|db| async move {
        let mut ext_cxn = ExternalConnectivity::new(db);
        let update = UpdateItem {
            title: "Buy oat milk".to_owned(),
            is_completed: true,
        };

        let missing_update = DbItemWriter.update_item(5, &update, &mut ext_cxn).await;
        assert_that!(missing_update).is_ok().is_none();
        let missing_delete = DbItemWriter.delete_item(5, &mut ext_cxn).await;
        assert_that!(missing_delete).is_ok().is_false();

        DbItemWriter
            .insert_item(&item(5, "Buy milk", false), &mut ext_cxn)
            .await
            .expect("insert should work");

        let updated = DbItemWriter.update_item(5, &update, &mut ext_cxn).await;
        assert_that!(updated)
            .is_ok()
            .is_some()
            .is_equal_to(&item(5, "Buy oat milk", true));

        let deleted = DbItemWriter.delete_item(5, &mut ext_cxn).await;
        assert_that!(deleted).is_ok().is_true();
        let stored = DbItemReader.item_by_id(5, &mut ext_cxn).await;
        assert_that!(stored).is_ok().is_none();
    });
}

#[test]
fn item_lifecycle_over_http() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db);
        let token = log_in(&router).await;

        let created = send(
            &router,
            Method::POST,
            "/items",
            Some(&token),
            Some(item_json(1, "Buy milk", false)),
        )
        .await;
        assert_eq!(StatusCode::CREATED, created.status());
        assert_eq!(
            Some("/items/1"),
            created
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
        );

        let fetched = send(&router, Method::GET, "/items/1", None, None).await;
        assert_eq!(StatusCode::OK, fetched.status());
        let fetched: dto::item::TodoItem = read_json(fetched).await;
        assert_eq!("Buy milk", fetched.title);
        assert!(!fetched.is_completed);

        let listed = send(&router, Method::GET, "/items", Some(&token), None).await;
        assert_eq!(StatusCode::OK, listed.status());
        let listed: Vec<dto::item::TodoItem> = read_json(listed).await;
        assert_eq!(1, listed.len());

        let updated = send(
            &router,
            Method::PUT,
            "/items/1",
            None,
            Some(item_json(99, "Buy oat milk", true)),
        )
        .await;
        assert_eq!(StatusCode::OK, updated.status());
        let updated: dto::item::TodoItem = read_json(updated).await;
        assert_eq!(1, updated.id);
        assert_eq!("Buy oat milk", updated.title);
        assert!(updated.is_completed);

        let deleted = send(&router, Method::DELETE, "/items/1", Some(&token), None).await;
        assert_eq!(StatusCode::NO_CONTENT, deleted.status());

        let gone = send(&router, Method::GET, "/items/1", None, None).await;
        assert_eq!(StatusCode::NOT_FOUND, gone.status());
    });
}

#[test]
fn conflicting_writes_are_bad_requests() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db);
        let token = log_in(&router).await;

        let first = send(
            &router,
            Method::POST,
            "/items",
            Some(&token),
            Some(item_json(7, "Buy milk", false)),
        )
        .await;
        assert_eq!(StatusCode::CREATED, first.status());

        let duplicate = send(
            &router,
            Method::POST,
            "/items",
            Some(&token),
            Some(item_json(7, "Walk dog", false)),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, duplicate.status());
        let duplicate: BasicErrorResponse = read_json(duplicate).await;
        assert_eq!("already_exists", duplicate.error_code);

        let missing_update = send(
            &router,
            Method::PUT,
            "/items/8",
            None,
            Some(item_json(8, "Nothing", false)),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, missing_update.status());

        let missing_delete = send(&router, Method::DELETE, "/items/8", Some(&token), None).await;
        assert_eq!(StatusCode::BAD_REQUEST, missing_delete.status());
        let missing_delete: BasicErrorResponse = read_json(missing_delete).await;
        assert_eq!("does_not_exist", missing_delete.error_code);
    });
}

#[test]
fn deleting_requires_a_token() {
    prepare_db_and_test(|db| async move {
        let router = router_for(db);

        let response = send(&router, Method::DELETE, "/items/1", None, None).await;
        assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    });
}
