// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use catalog_orders::StoreError;

use crate::web::envelope;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("unauthorized: {0}")]
  Auth(String),

  #[error("{0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Store Error: {0}")]
  Store(#[from] StoreError),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Notification Error: {0}")]
  Notification(String),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_)
      | AppError::Store(_)
      | AppError::Sqlx(_)
      | AppError::Notification(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      // Log the full error; clients only see a generic reason.
      tracing::error!(application_error = %self, "Responding with error");
      return envelope::respond_failure(status, "internal server error");
    }
    tracing::warn!(application_error = %self, "Responding with error");
    envelope::respond_failure(status, &self.to_string())
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
