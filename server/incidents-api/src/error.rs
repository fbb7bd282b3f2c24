//! Structured error types for the incidents API.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::types::ErrorOutput;

/// A value outside one of the closed enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
  pub kind: &'static str,
  pub value: String,
  pub expected: &'static str,
}

impl UnknownVariant {
  pub fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
    Self {
      kind,
      value: value.to_string(),
      expected,
    }
  }
}

/// Failure at the persistence boundary.
#[derive(Debug, Error)]
pub enum StorageError {
  /// Connectivity, constraint or decode failure reported by the driver.
  #[error("storage: {0}")]
  Database(#[from] sqlx_core::Error),

  /// No further incident ids can be assigned.
  #[error("storage: incident id sequence exhausted")]
  IdsExhausted,
}

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation: {reason}")]
  Validation { field: Option<String>, reason: String },

  #[error("incident {id} not found")]
  NotFound { id: i32 },

  #[error(transparent)]
  Storage(#[from] StorageError),
}

impl ApiError {
  pub fn validation(field: &str, reason: impl Into<String>) -> Self {
    Self::Validation {
      field: Some(field.to_string()),
      reason: reason.into(),
    }
  }

  pub fn status_code(&self) -> StatusCode {
    match self {
      Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
      Self::NotFound { .. } => StatusCode::NOT_FOUND,
      Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

// Every extractor rejection is a malformed request, reported as 422.

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Validation {
      field: None,
      reason: rejection.body_text(),
    }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::Validation {
      field: None,
      reason: rejection.body_text(),
    }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::validation("id", rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    let body = match self {
      Self::Validation { field, reason } => {
        tracing::debug!(field = field.as_deref().unwrap_or("-"), %reason, "rejected request");
        match field {
          Some(field) => ErrorOutput::new(reason).with_field(field),
          None => ErrorOutput::new(reason),
        }
      }
      Self::NotFound { id } => {
        tracing::debug!(id, "incident not found");
        ErrorOutput::new(format!("incident {} not found", id))
      }
      Self::Storage(e) => {
        tracing::error!(error = %e, "storage failure");
        ErrorOutput::new("internal server error")
      }
    };

    (status, Json(body)).into_response()
  }
}
