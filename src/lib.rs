//! Profile API: layered CRUD backend for profiles and todos.
//!
//! Requests flow handler → service (validation, uniqueness, conflict translation) → store.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Settings, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use routes::{app_router, common_routes_with_ready, profile_routes, todo_routes};
pub use service::{ProfileService, ProfileValidator, TodoService};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, MemoryProfileStore, MemoryTodoStore, PgProfileStore, PgTodoStore, ProfileStore, TodoStore};
