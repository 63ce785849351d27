//! Shared application state for all routes.

use crate::service::{ProfileService, TodoService};
use crate::store::{MemoryProfileStore, MemoryTodoStore, PgProfileStore, PgTodoStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileService,
    pub todos: TodoService,
    /// `None` when running on the in-memory store.
    pub pool: Option<PgPool>,
    pub app_name: Arc<str>,
}

impl AppState {
    pub fn postgres(pool: PgPool, app_name: &str) -> Self {
        AppState {
            profiles: ProfileService::new(Arc::new(PgProfileStore::new(pool.clone()))),
            todos: TodoService::new(Arc::new(PgTodoStore::new(pool.clone()))),
            pool: Some(pool),
            app_name: app_name.into(),
        }
    }

    pub fn in_memory(app_name: &str) -> Self {
        AppState {
            profiles: ProfileService::new(Arc::new(MemoryProfileStore::new())),
            todos: TodoService::new(Arc::new(MemoryTodoStore::new())),
            pool: None,
            app_name: app_name.into(),
        }
    }
}
