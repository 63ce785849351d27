//! Entities, request DTOs and paging shared by the service and HTTP layers.

mod page;
mod profile;
mod timestamps;
mod todo;

pub use page::{Page, DEFAULT_LIMIT, MAX_LIMIT};
pub use profile::{NewProfile, Profile, ProfileCreate, ProfileUpdate, USERNAME_MAX_LEN};
pub use timestamps::Timestamps;
pub use todo::{NewTodo, Todo, TodoCreate, TodoUpdate};

use crate::error::AppError;
use serde::{Deserialize, Deserializer};

/// Deserialize a field that may be absent, `null`, or set.
/// Use with `#[serde(default)]`: absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub(crate) fn check_min_len(field: &str, value: &str, min: usize) -> Result<(), AppError> {
    if value.chars().count() < min {
        return Err(AppError::Validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    Ok(())
}

/// Reject an explicit `null` for a field that is not nullable.
pub(crate) fn not_null<'a, T>(field: &str, value: &'a Option<Option<T>>) -> Result<Option<&'a T>, AppError> {
    match value {
        None => Ok(None),
        Some(None) => Err(AppError::Validation(format!("{} cannot be null", field))),
        Some(Some(v)) => Ok(Some(v)),
    }
}
