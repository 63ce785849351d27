//! Profile routes.

use crate::handlers::profile::{create, delete as delete_handler, list, read, read_by_username, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn profile_routes(state: AppState) -> Router {
    Router::new()
        .route("/profiles", get(list).post(create))
        .route("/profiles/by-username/:username", get(read_by_username))
        .route(
            "/profiles/:id",
            get(read).patch(update).delete(delete_handler),
        )
        .with_state(state)
}
