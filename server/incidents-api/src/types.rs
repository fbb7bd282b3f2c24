//! Core types for the incidents API (domain model + JSON contracts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownVariant;

// ---------------------------------------------------------------------------
// Closed enumerations
// ---------------------------------------------------------------------------

/// Lifecycle stage of an incident. Any stage may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
  Open,
  InProgress,
  Resolved,
  Closed,
}

impl IncidentStatus {
  pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Open => "open",
      Self::InProgress => "in_progress",
      Self::Resolved => "resolved",
      Self::Closed => "closed",
    }
  }
}

impl FromStr for IncidentStatus {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|v| v.as_str() == s)
      .ok_or_else(|| UnknownVariant::new("status", s, "open, in_progress, resolved, closed"))
  }
}

impl fmt::Display for IncidentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Who reported the incident. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSource {
  Operator,
  Monitoring,
  Partner,
}

impl IncidentSource {
  pub const ALL: [Self; 3] = [Self::Operator, Self::Monitoring, Self::Partner];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Operator => "operator",
      Self::Monitoring => "monitoring",
      Self::Partner => "partner",
    }
  }
}

impl FromStr for IncidentSource {
  type Err = UnknownVariant;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|v| v.as_str() == s)
      .ok_or_else(|| UnknownVariant::new("source", s, "operator, monitoring, partner"))
  }
}

impl fmt::Display for IncidentSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ---------------------------------------------------------------------------
// Domain records
// ---------------------------------------------------------------------------

/// A stored incident. `id` and `created_at` are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
  pub id: i32,
  pub description: String,
  pub status: IncidentStatus,
  pub source: IncidentSource,
  pub created_at: DateTime<Utc>,
}

/// Validated input for creating an incident. Status is always `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
  pub description: String,
  pub source: IncidentSource,
}

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the client sends)
// ---------------------------------------------------------------------------

// Enum-valued fields arrive as plain strings and are parsed in `validate`, so
// an unknown value is reported against its field. Unknown fields are ignored.

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIncidentRequest {
  pub description: String,
  pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
  pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
  pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct IncidentResponse {
  pub id: i32,
  pub description: String,
  pub status: IncidentStatus,
  pub source: IncidentSource,
  pub created_at: DateTime<Utc>,
}

impl From<Incident> for IncidentResponse {
  fn from(incident: Incident) -> Self {
    Self {
      id: incident.id,
      description: incident.description,
      status: incident.status,
      source: incident.source,
      created_at: incident.created_at,
    }
  }
}

/// Structured error body for every non-2xx response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}
