use crate::domain::item::driven_ports::{ItemReader, ItemWriter};
use crate::domain::item::driving_ports::ItemError;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use derive_more::Display;

/// A single entry on the to-do list. The ID is chosen by whoever creates the item.
#[derive(PartialEq, Eq, Debug, Clone, Display)]
#[display("item {} \"{}\"", id, title)]
pub struct TodoItem {
    pub id: i32,
    pub title: String,
    pub is_completed: bool,
}

/// The parts of an item that can change after it's created
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct UpdateItem {
    pub title: String,
    pub is_completed: bool,
}

pub mod driven_ports {
    use super::*;

    pub trait ItemReader {
        /// Every stored item, ordered by ID
        async fn all_items(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;
        async fn item_by_id(
            &self,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;
    }

    pub trait ItemWriter {
        /// Stores a new item. Returns [None] without writing anything if an item
        /// with the same ID is already stored.
        async fn insert_item(
            &self,
            item: &TodoItem,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;

        /// Overwrites the title and completion flag of an item, returning the stored
        /// result or [None] if no item has the given ID.
        async fn update_item(
            &self,
            item_id: i32,
            update: &UpdateItem,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;

        /// Removes an item, returning false if there was nothing to remove
        async fn delete_item(
            &self,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum ItemError {
        #[error("An item with ID {0} already exists.")]
        AlreadyExists(i32),
        #[error("Item {0} does not exist.")]
        DoesNotExist(i32),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait ItemPort {
        async fn all_items(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            item_read: &impl ItemReader,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;
        async fn item_by_id(
            &self,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            item_read: &impl ItemReader,
        ) -> Result<Option<TodoItem>, anyhow::Error>;
        async fn create_item(
            &self,
            item: &TodoItem,
            ext_cxn: &mut impl ExternalConnectivity,
            item_write: &impl ItemWriter,
        ) -> Result<TodoItem, ItemError>;
        async fn update_item(
            &self,
            item_id: i32,
            update: &UpdateItem,
            ext_cxn: &mut impl ExternalConnectivity,
            item_write: &impl ItemWriter,
        ) -> Result<TodoItem, ItemError>;
        async fn delete_item(
            &self,
            item_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            item_write: &impl ItemWriter,
        ) -> Result<(), ItemError>;
    }
}

pub struct ItemService {}

impl driving_ports::ItemPort for ItemService {
    async fn all_items(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        item_read: &impl ItemReader,
    ) -> Result<Vec<TodoItem>, anyhow::Error> {
        item_read
            .all_items(&mut *ext_cxn)
            .await
            .context("listing all items")
    }

    async fn item_by_id(
        &self,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        item_read: &impl ItemReader,
    ) -> Result<Option<TodoItem>, anyhow::Error> {
        item_read
            .item_by_id(item_id, &mut *ext_cxn)
            .await
            .context("fetching an item by ID")
    }

    async fn create_item(
        &self,
        item: &TodoItem,
        ext_cxn: &mut impl ExternalConnectivity,
        item_write: &impl ItemWriter,
    ) -> Result<TodoItem, ItemError> {
        let inserted = item_write
            .insert_item(item, &mut *ext_cxn)
            .await
            .context("creating an item")?;

        inserted.ok_or(ItemError::AlreadyExists(item.id))
    }

    async fn update_item(
        &self,
        item_id: i32,
        update: &UpdateItem,
        ext_cxn: &mut impl ExternalConnectivity,
        item_write: &impl ItemWriter,
    ) -> Result<TodoItem, ItemError> {
        let updated = item_write
            .update_item(item_id, update, &mut *ext_cxn)
            .await
            .context("updating an item")?;

        updated.ok_or(ItemError::DoesNotExist(item_id))
    }

    async fn delete_item(
        &self,
        item_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        item_write: &impl ItemWriter,
    ) -> Result<(), ItemError> {
        let removed = item_write
            .delete_item(item_id, &mut *ext_cxn)
            .await
            .context("deleting an item")?;

        if removed {
            Ok(())
        } else {
            Err(ItemError::DoesNotExist(item_id))
        }
    }
}
