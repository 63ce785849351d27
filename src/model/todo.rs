//! Todo entity and its create/update payloads.

use super::{check_max_len, check_min_len, double_option, not_null, Timestamps};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TITLE_MIN_LEN: usize = 1;
pub const TITLE_MAX_LEN: usize = 200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub timestamps: Timestamps,
}

impl NewTodo {
    pub fn into_todo(self, id: i64) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            timestamps: self.timestamps,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct TodoCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl TodoCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        check_title(&self.title)
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct TodoUpdate {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<bool>)]
    pub completed: Option<Option<bool>>,
}

impl TodoUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = not_null("title", &self.title)? {
            check_title(title)?;
        }
        not_null("completed", &self.completed)?;
        Ok(())
    }
}

fn check_title(title: &str) -> Result<(), AppError> {
    check_min_len("title", title, TITLE_MIN_LEN)?;
    check_max_len("title", title, TITLE_MAX_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_completed_to_false() {
        let create: TodoCreate = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert!(!create.completed);
        assert!(create.description.is_none());
        assert!(create.validate().is_ok());
    }

    #[test]
    fn title_bounds() {
        let empty = TodoCreate { title: String::new(), ..Default::default() };
        assert!(empty.validate().is_err());
        let long = TodoCreate { title: "t".repeat(TITLE_MAX_LEN + 1), ..Default::default() };
        assert!(long.validate().is_err());
        let max = TodoCreate { title: "t".repeat(TITLE_MAX_LEN), ..Default::default() };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn update_rejects_null_for_required_fields() {
        let update: TodoUpdate = serde_json::from_str(r#"{"completed": null}"#).unwrap();
        assert!(update.validate().is_err());
        let update: TodoUpdate = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(update.validate().is_err());
        let update: TodoUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert!(update.validate().is_ok());
        assert_eq!(update.description, Some(None));
    }
}
