//! HTTP handlers for the incidents API.
//!
//! Each handler validates its input completely before calling the service, and
//! is the only place service results become status codes.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{CreateIncidentRequest, IncidentResponse, ListQuery, UpdateStatusRequest};
use crate::validate;

pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
  Json(json!({
    "message": state.settings.app_name,
    "version": state.settings.app_version,
  }))
}

pub async fn health() -> &'static str {
  "ok"
}

pub async fn create_incident(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IncidentResponse>), ApiError> {
  let Json(payload) = payload?;
  let new = validate::new_incident(payload)?;

  let incident = state.service.create_incident(new).await?;
  tracing::info!(id = incident.id, source = %incident.source, "incident created");

  Ok((StatusCode::CREATED, Json(incident.into())))
}

pub async fn list_incidents(
  State(state): State<Arc<AppState>>,
  query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<IncidentResponse>>, ApiError> {
  let Query(query) = query?;
  let status = validate::status_filter(&query)?;

  let incidents = state.service.list_incidents(status).await?;
  tracing::debug!(count = incidents.len(), filter = ?status, "listed incidents");

  Ok(Json(incidents.into_iter().map(IncidentResponse::from).collect()))
}

pub async fn update_incident_status(
  State(state): State<Arc<AppState>>,
  id: Result<Path<i32>, PathRejection>,
  payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<IncidentResponse>, ApiError> {
  let Path(id) = id?;
  let Json(payload) = payload?;
  let status = validate::status(&payload.status)?;

  let incident = state
    .service
    .update_incident_status(id, status)
    .await?
    .ok_or(ApiError::NotFound { id })?;
  tracing::info!(id, status = %incident.status, "incident status updated");

  Ok(Json(incident.into()))
}
