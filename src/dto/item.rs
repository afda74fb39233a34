use crate::domain;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO for a to-do item, used both for request bodies and responses
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
pub struct TodoItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = false)]
    pub is_completed: bool,
}

impl From<domain::item::TodoItem> for TodoItem {
    fn from(value: domain::item::TodoItem) -> Self {
        TodoItem {
            id: value.id,
            title: value.title,
            is_completed: value.is_completed,
        }
    }
}

impl From<TodoItem> for domain::item::TodoItem {
    fn from(value: TodoItem) -> Self {
        domain::item::TodoItem {
            id: value.id,
            title: value.title,
            is_completed: value.is_completed,
        }
    }
}

/// The ID in an update body is ignored, items keep the ID they were created with
impl From<TodoItem> for domain::item::UpdateItem {
    fn from(value: TodoItem) -> Self {
        domain::item::UpdateItem {
            title: value.title,
            is_completed: value.is_completed,
        }
    }
}
