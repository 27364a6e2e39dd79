use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` for request bodies, rejecting with the app's JSON error body
/// instead of axum's plain-text one.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
