//! Typed errors and HTTP mapping.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures reported by a persistence gateway.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write was rejected by a uniqueness constraint.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("database: {0}")]
    Db(sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                let constraint = db.constraint().unwrap_or("unique").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Db(e)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Store(_) | AppError::Db(_) | AppError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, Clone, Debug)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Request path; filled in by [`attach_error_path`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "unhandled error");
            "An internal server error occurred".to_string()
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
            self.to_string()
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
                path: None,
            },
        };
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Middleware: re-render `AppError` bodies with the path of the request that failed.
pub async fn attach_error_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut response = next.run(req).await;
    let Some(mut body) = response.extensions_mut().remove::<ErrorBody>() else {
        return response;
    };
    body.error.path = Some(path);
    let bytes = match serde_json::to_vec(&body) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "failed to re-encode error body");
            return response;
        }
    };
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = [
            (AppError::not_found("Profile", 7), StatusCode::NOT_FOUND),
            (AppError::Validation("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Conflict("taken".into()), StatusCode::CONFLICT),
            (AppError::BadRequest("nope".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Store(StoreError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_and_code().0, status, "{err}");
        }
    }

    #[test]
    fn not_found_message_names_resource_and_id() {
        let err = AppError::not_found("Todo", 42);
        assert_eq!(err.to_string(), "Todo with id 42 not found");
    }

    #[test]
    fn non_constraint_sqlx_error_stays_generic() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Db(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn internal_errors_hide_details() {
        let response = AppError::Store(StoreError::Unavailable("secret dsn".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.extensions().get::<ErrorBody>().unwrap();
        assert_eq!(body.error.code, "internal_error");
        assert_eq!(body.error.message, "An internal server error occurred");
    }

    #[test]
    fn path_is_omitted_until_middleware_fills_it() {
        let response = AppError::not_found("Profile", 1).into_response();
        let body = response.extensions().get::<ErrorBody>().unwrap();
        assert!(body.error.path.is_none());
        let json = serde_json::to_value(body).unwrap();
        assert!(json["error"].get("path").is_none());
    }
}
