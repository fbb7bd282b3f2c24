//! In-process incident store.
//!
//! Mirrors the PostgreSQL repository's observable behavior: ids start at 1 and
//! are never reused, `created_at` never goes backwards, listings are newest
//! first. Contents are lost when the process exits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StorageError;
use crate::repository::IncidentRepository;
use crate::types::{Incident, IncidentStatus, NewIncident};

#[derive(Debug, Default)]
struct Store {
  last_id: i32,
  last_created_at: Option<DateTime<Utc>>,
  rows: Vec<Incident>,
}

#[derive(Debug, Default)]
pub struct MemoryIncidentRepository {
  store: Mutex<Store>,
}

impl MemoryIncidentRepository {
  pub fn new() -> Self {
    Self::default()
  }

  fn store(&self) -> MutexGuard<'_, Store> {
    self.store.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[async_trait]
impl IncidentRepository for MemoryIncidentRepository {
  async fn create(&self, new: NewIncident) -> Result<Incident, StorageError> {
    let mut store = self.store();

    let now = Utc::now();
    let created_at = match store.last_created_at {
      Some(last) if last > now => last,
      _ => now,
    };
    let id = store.last_id.checked_add(1).ok_or(StorageError::IdsExhausted)?;
    store.last_id = id;
    store.last_created_at = Some(created_at);

    let incident = Incident {
      id,
      description: new.description,
      status: IncidentStatus::Open,
      source: new.source,
      created_at,
    };
    store.rows.push(incident.clone());
    Ok(incident)
  }

  async fn list(&self, status: Option<IncidentStatus>) -> Result<Vec<Incident>, StorageError> {
    let store = self.store();
    let mut incidents: Vec<Incident> = store
      .rows
      .iter()
      .filter(|i| status.map_or(true, |s| i.status == s))
      .cloned()
      .collect();
    incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(incidents)
  }

  async fn get_by_id(&self, id: i32) -> Result<Option<Incident>, StorageError> {
    Ok(self.store().rows.iter().find(|i| i.id == id).cloned())
  }

  async fn update_status(
    &self,
    incident: Incident,
    status: IncidentStatus,
  ) -> Result<Incident, StorageError> {
    let mut store = self.store();
    let row = store
      .rows
      .iter_mut()
      .find(|i| i.id == incident.id)
      .ok_or(StorageError::Database(sqlx_core::Error::RowNotFound))?;
    row.status = status;
    Ok(row.clone())
  }
}
