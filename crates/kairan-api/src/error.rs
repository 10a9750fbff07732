//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

impl From<kairan_core::Error> for ApiError {
  fn from(e: kairan_core::Error) -> Self {
    use kairan_core::Error as E;
    match e {
      E::PostNotFound(..) | E::MessageNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      E::ThreadFull(_) => ApiError::Conflict(e.to_string()),
      E::EmptyField(_)
      | E::PinFormat
      | E::PinGuessable
      | E::UnknownBlock(_)
      | E::UnknownCategory(_) => ApiError::BadRequest(e.to_string()),
    }
  }
}
