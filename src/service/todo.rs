//! Todo use cases. Field bounds are checked on the request DTOs; there are no cross-row rules.

use crate::error::AppError;
use crate::model::{NewTodo, Page, Timestamps, Todo, TodoCreate, TodoUpdate};
use crate::store::TodoStore;
use std::sync::Arc;

const RESOURCE: &str = "Todo";

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        TodoService { store }
    }

    pub async fn create(&self, input: TodoCreate) -> Result<Todo, AppError> {
        let todo = NewTodo {
            title: input.title,
            description: input.description,
            completed: input.completed,
            timestamps: Timestamps::now(),
        };
        let created = self.store.create(todo).await?;
        tracing::info!(id = created.id, "todo created");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Todo, AppError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE, id))
    }

    /// Newest first; `completed` filters exactly when given.
    pub async fn list(&self, page: Page, completed: Option<bool>) -> Result<Vec<Todo>, AppError> {
        Ok(self.store.list(page, completed).await?)
    }

    pub async fn update(&self, id: i64, patch: TodoUpdate) -> Result<Todo, AppError> {
        tracing::debug!(id, "update todo");
        let mut todo = self.get_by_id(id).await?;
        // Explicit nulls for required fields are rejected by TodoUpdate::validate; ignore them here.
        if let Some(Some(title)) = patch.title {
            todo.title = title;
        }
        if let Some(description) = patch.description {
            todo.description = description;
        }
        if let Some(Some(completed)) = patch.completed {
            todo.completed = completed;
        }
        todo.timestamps.touch();
        let updated = self.store.update(&todo).await?;
        tracing::info!(id, "todo updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let todo = self.get_by_id(id).await?;
        self.store.delete(&todo).await?;
        tracing::info!(id, "todo deleted");
        Ok(())
    }
}
