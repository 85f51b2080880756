use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::app_error::AppError;

/// `axum::Json` whose rejections become `AppError::InvalidInput`, so malformed
/// bodies get the same JSON error shape as every other 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}
