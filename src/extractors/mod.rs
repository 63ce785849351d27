//! Request extractors that reject with `AppError` so failures share the error envelope.

mod json;
pub use json::ApiJson;
