use crate::domain;
use crate::domain::item::{TodoItem, UpdateItem};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query, query_as};

#[derive(FromRow)]
struct TodoItemRow {
    id: i32,
    title: String,
    is_completed: bool,
}

impl From<TodoItemRow> for domain::item::TodoItem {
    fn from(value: TodoItemRow) -> Self {
        TodoItem {
            id: value.id,
            title: value.title,
            is_completed: value.is_completed,
        }
    }
}

pub struct DbItemReader;

impl domain::item::driven_ports::ItemReader for DbItemReader {
    async fn all_items(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let items: Vec<TodoItem> = query_as::<_, TodoItemRow>(
            "SELECT ti.id, ti.title, ti.is_completed FROM todo_item ti ORDER BY ti.id",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all todo items")?
        .into_iter()
        .map(TodoItem::from)
        .collect();

        Ok(items)
    }

    async fn item_by_id(
        &self,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let item = query_as::<_, TodoItemRow>(
            "SELECT ti.id, ti.title, ti.is_completed FROM todo_item ti WHERE ti.id = $1",
        )
        .bind(item_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to fetch a todo item by ID")?;

        Ok(item.map(TodoItem::from))
    }
}

pub struct DbItemWriter;

impl domain::item::driven_ports::ItemWriter for DbItemWriter {
    async fn insert_item(
        &self,
        item: &TodoItem,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        // The primary key decides whether the ID is taken, so concurrent creates can't both win
        let inserted = query_as::<_, TodoItemRow>(
            "INSERT INTO todo_item(id, title, is_completed) VALUES ($1, $2, $3)
             ON CONFLICT (id) DO NOTHING
             RETURNING id, title, is_completed",
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(item.is_completed)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo item into the database")?;

        Ok(inserted.map(TodoItem::from))
    }

    async fn update_item(
        &self,
        item_id: i32,
        update: &UpdateItem,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let updated = query_as::<_, TodoItemRow>(
            "UPDATE todo_item SET title = $1, is_completed = $2 WHERE id = $3
             RETURNING id, title, is_completed",
        )
        .bind(&update.title)
        .bind(update.is_completed)
        .bind(item_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a todo item in the database")?;

        Ok(updated.map(TodoItem::from))
    }

    async fn delete_item(
        &self,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let delete_result = query("DELETE FROM todo_item WHERE id = $1")
            .bind(item_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo item from the database")?;

        Ok(delete_result.rows_affected() > 0)
    }
}
