//! Use-case layer between the HTTP handlers and the repository.

use std::sync::Arc;

use crate::error::StorageError;
use crate::repository::IncidentRepository;
use crate::types::{Incident, IncidentStatus, NewIncident};

#[derive(Clone)]
pub struct IncidentService {
  repository: Arc<dyn IncidentRepository>,
}

impl IncidentService {
  pub fn new(repository: Arc<dyn IncidentRepository>) -> Self {
    Self { repository }
  }

  pub async fn create_incident(&self, new: NewIncident) -> Result<Incident, StorageError> {
    self.repository.create(new).await
  }

  pub async fn list_incidents(
    &self,
    status: Option<IncidentStatus>,
  ) -> Result<Vec<Incident>, StorageError> {
    self.repository.list(status).await
  }

  pub async fn get_incident(&self, id: i32) -> Result<Option<Incident>, StorageError> {
    self.repository.get_by_id(id).await
  }

  /// Returns `Ok(None)` without touching storage further when `id` is unknown.
  ///
  /// The fetch and the update are separate statements. That is safe only while
  /// incidents cannot be deleted; with a delete, switch to a single
  /// `UPDATE ... RETURNING` and treat zero rows as not found.
  pub async fn update_incident_status(
    &self,
    id: i32,
    status: IncidentStatus,
  ) -> Result<Option<Incident>, StorageError> {
    let incident = match self.repository.get_by_id(id).await? {
      Some(incident) => incident,
      None => return Ok(None),
    };

    self.repository.update_status(incident, status).await.map(Some)
  }
}
