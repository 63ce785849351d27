//! Persistence gateways: one async trait per resource, with PostgreSQL and in-memory implementations.

mod memory;
mod postgres;
mod schema;

pub use memory::{MemoryProfileStore, MemoryTodoStore};
pub use postgres::{PgProfileStore, PgTodoStore};
pub use schema::{ensure_database_exists, ensure_tables};

use crate::error::StoreError;
use crate::model::{NewProfile, NewTodo, Page, Profile, Todo};
use async_trait::async_trait;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert and return the stored row. Fails with `StoreError::UniqueViolation` on a taken username.
    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Profile>, StoreError>;

    /// Exact, case-sensitive match.
    async fn get_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError>;

    /// True if another profile holds `username`. `exclude_id` skips that row.
    async fn username_exists(&self, username: &str, exclude_id: Option<i64>) -> Result<bool, StoreError>;

    /// Case-insensitive substring match on username, ordered by username ascending.
    async fn search_by_username(&self, query: &str, page: Page) -> Result<Vec<Profile>, StoreError>;

    /// All profiles, newest first.
    async fn list(&self, page: Page) -> Result<Vec<Profile>, StoreError>;

    /// Persist every field of `profile` (matched by id) and return the stored row.
    async fn update(&self, profile: &Profile) -> Result<Profile, StoreError>;

    async fn delete(&self, profile: &Profile) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn create(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError>;

    /// Newest first, optionally restricted to one `completed` value.
    async fn list(&self, page: Page, completed: Option<bool>) -> Result<Vec<Todo>, StoreError>;

    async fn update(&self, todo: &Todo) -> Result<Todo, StoreError>;

    async fn delete(&self, todo: &Todo) -> Result<(), StoreError>;
}
