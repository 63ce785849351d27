//! OpenAPI document served at `/openapi.json`.

use crate::handlers::{profile, todo};
use crate::model::{Profile, ProfileCreate, ProfileUpdate, Timestamps, Todo, TodoCreate, TodoUpdate};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Profile API",
        description = "CRUD backend for user profiles and todos"
    ),
    paths(
        profile::create,
        profile::list,
        profile::read,
        profile::read_by_username,
        profile::update,
        profile::delete,
        todo::create,
        todo::list,
        todo::read,
        todo::update,
        todo::delete,
    ),
    components(schemas(Profile, ProfileCreate, ProfileUpdate, Timestamps, Todo, TodoCreate, TodoUpdate)),
    tags(
        (name = "profiles", description = "User profiles with unique usernames"),
        (name = "todos", description = "Todo items")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/profiles",
            "/profiles/{id}",
            "/profiles/by-username/{username}",
            "/todos",
            "/todos/{id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
