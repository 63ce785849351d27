//! HTTP handlers for profiles and todos, plus query/path parsing shared by both.

pub mod profile;
pub mod todo;

use crate::error::AppError;
use crate::model::Page;
use std::collections::HashMap;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

fn parse_u32(params: &HashMap<String, String>, key: &str) -> Result<Option<u32>, AppError> {
    params
        .get(key)
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| {
                AppError::Validation(format!("{} must be a non-negative integer", key))
            })
        })
        .transpose()
}

/// `skip` (default 0) and `limit` (default and maximum 100) from the query string.
fn parse_page(params: &HashMap<String, String>) -> Result<Page, AppError> {
    Page::new(parse_u32(params, "skip")?, parse_u32(params, "limit")?)
}

fn parse_bool(params: &HashMap<String, String>, key: &str) -> Result<Option<bool>, AppError> {
    params
        .get(key)
        .map(|v| match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(AppError::Validation(format!("{} must be a boolean", key))),
        })
        .transpose()
}
