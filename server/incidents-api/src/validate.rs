//! Convert raw request payloads into validated domain input.
//!
//! Checks are structural only: field presence (handled by deserialization),
//! description length, and membership of the closed enumerations.

use crate::error::ApiError;
use crate::types::*;

/// Inclusive bounds on description length, counted in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 1;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

/// Validate a create request. Any status the client sent was already dropped.
pub fn new_incident(raw: CreateIncidentRequest) -> Result<NewIncident, ApiError> {
  let len = raw.description.chars().count();
  if len < DESCRIPTION_MIN_CHARS {
    return Err(ApiError::validation("description", "must not be empty"));
  }
  if len > DESCRIPTION_MAX_CHARS {
    return Err(ApiError::validation(
      "description",
      format!("must be at most {} characters, got {}", DESCRIPTION_MAX_CHARS, len),
    ));
  }

  let source = raw
    .source
    .parse::<IncidentSource>()
    .map_err(|e| ApiError::validation("source", e.to_string()))?;

  Ok(NewIncident {
    description: raw.description,
    source,
  })
}

pub fn status(raw: &str) -> Result<IncidentStatus, ApiError> {
  raw
    .parse::<IncidentStatus>()
    .map_err(|e| ApiError::validation("status", e.to_string()))
}

/// An absent `status` parameter means no filtering; a present one must be valid.
pub fn status_filter(query: &ListQuery) -> Result<Option<IncidentStatus>, ApiError> {
  query.status.as_deref().map(status).transpose()
}
