//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract. Every
//! response uses the uniform envelope: `{ "success": true, ...payload }` on
//! success, `{ "success": false, "message": ... }` on error.

mod achievements;
mod chat;
mod courses;
mod progress;
mod search;

pub use achievements::*;
pub use chat::*;
pub use courses::*;
pub use progress::*;
pub use search::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success response envelope. The payload's fields are flattened alongside
/// `success` rather than nested under a data key.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}
