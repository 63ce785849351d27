//! Todo routes.

use crate::handlers::todo::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn todo_routes(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(list).post(create))
        .route(
            "/todos/:id",
            get(read).patch(update).delete(delete_handler),
        )
        .with_state(state)
}
