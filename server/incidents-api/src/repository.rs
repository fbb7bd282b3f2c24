//! Persistence for incidents.
//!
//! `IncidentRepository` is the seam between the service and storage. The
//! PostgreSQL implementation expects the `incidents` table and the
//! `incident_status` / `incident_source` enum types from
//! `migrations/0001_create_incidents.sql` to exist already.

use async_trait::async_trait;
use std::str::FromStr;
use sqlx_core::from_row::FromRow;
use sqlx_core::query_as::query_as;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgRow, Postgres};

use crate::error::{StorageError, UnknownVariant};
use crate::types::{Incident, IncidentSource, IncidentStatus, NewIncident};

#[async_trait]
pub trait IncidentRepository: Send + Sync {
  /// Insert a new incident with status `open`; returns the stored record.
  async fn create(&self, new: NewIncident) -> Result<Incident, StorageError>;

  /// All incidents, most recent first, optionally restricted to one status.
  async fn list(&self, status: Option<IncidentStatus>) -> Result<Vec<Incident>, StorageError>;

  async fn get_by_id(&self, id: i32) -> Result<Option<Incident>, StorageError>;

  /// Persist a new status for `incident` and return the re-read record.
  async fn update_status(
    &self,
    incident: Incident,
    status: IncidentStatus,
  ) -> Result<Incident, StorageError>;
}

/// Repository over a PostgreSQL connection pool.
///
/// Reads run directly on the pool. Writes run inside a transaction that is
/// committed before returning; an early return drops it and rolls back.
#[derive(Clone)]
pub struct PgIncidentRepository {
  pool: PgPool,
}

impl PgIncidentRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl IncidentRepository for PgIncidentRepository {
  async fn create(&self, new: NewIncident) -> Result<Incident, StorageError> {
    let mut tx = self.pool.begin().await?;

    let incident = query_as::<Postgres, Incident>(
      r#"
      INSERT INTO incidents (description, status, source)
      VALUES ($1, $2::incident_status, $3::incident_source)
      RETURNING id, description, status::text AS status, source::text AS source, created_at
      "#,
    )
    .bind(new.description)
    .bind(IncidentStatus::Open.as_str())
    .bind(new.source.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(incident)
  }

  async fn list(&self, status: Option<IncidentStatus>) -> Result<Vec<Incident>, StorageError> {
    let incidents = match status {
      Some(status) => {
        query_as::<Postgres, Incident>(
          r#"
          SELECT id, description, status::text AS status, source::text AS source, created_at
          FROM incidents
          WHERE status = $1::incident_status
          ORDER BY created_at DESC, id DESC
          "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?
      }
      None => {
        query_as::<Postgres, Incident>(
          r#"
          SELECT id, description, status::text AS status, source::text AS source, created_at
          FROM incidents
          ORDER BY created_at DESC, id DESC
          "#,
        )
        .fetch_all(&self.pool)
        .await?
      }
    };

    Ok(incidents)
  }

  async fn get_by_id(&self, id: i32) -> Result<Option<Incident>, StorageError> {
    let incident = query_as::<Postgres, Incident>(
      r#"
      SELECT id, description, status::text AS status, source::text AS source, created_at
      FROM incidents
      WHERE id = $1
      "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(incident)
  }

  async fn update_status(
    &self,
    incident: Incident,
    status: IncidentStatus,
  ) -> Result<Incident, StorageError> {
    let mut tx = self.pool.begin().await?;

    // RowNotFound if the row vanished between fetch and update.
    let updated = query_as::<Postgres, Incident>(
      r#"
      UPDATE incidents
      SET status = $2::incident_status
      WHERE id = $1
      RETURNING id, description, status::text AS status, source::text AS source, created_at
      "#,
    )
    .bind(incident.id)
    .bind(status.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(updated)
  }
}

impl<'r> FromRow<'r, PgRow> for Incident {
  fn from_row(row: &'r PgRow) -> Result<Self, sqlx_core::Error> {
    let status: String = row.try_get("status")?;
    let source: String = row.try_get("source")?;

    Ok(Self {
      id: row.try_get("id")?,
      description: row.try_get("description")?,
      status: decode_enum::<IncidentStatus>("status", &status)?,
      source: decode_enum::<IncidentSource>("source", &source)?,
      created_at: row.try_get("created_at")?,
    })
  }
}

/// Parse a stored enum label; a label outside the closed set is a column decode error.
fn decode_enum<T>(column: &str, raw: &str) -> Result<T, sqlx_core::Error>
where
  T: FromStr<Err = UnknownVariant>,
{
  raw.parse::<T>().map_err(|e| sqlx_core::Error::ColumnDecode {
    index: column.to_string(),
    source: Box::new(e),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_enum_accepts_stored_labels() {
    for status in IncidentStatus::ALL {
      assert_eq!(decode_enum::<IncidentStatus>("status", status.as_str()).unwrap(), status);
    }
    for source in IncidentSource::ALL {
      assert_eq!(decode_enum::<IncidentSource>("source", source.as_str()).unwrap(), source);
    }
  }

  #[test]
  fn unknown_stored_status_is_column_decode_error() {
    match decode_enum::<IncidentStatus>("status", "archived") {
      Err(sqlx_core::Error::ColumnDecode { index, source }) => {
        assert_eq!(index, "status");
        assert!(source.to_string().contains("archived"), "{}", source);
      }
      other => panic!("expected ColumnDecode, got {:?}", other),
    }
  }

  #[test]
  fn unknown_stored_source_is_storage_error() {
    // Labels from a schema that stores member names instead of values.
    let err = decode_enum::<IncidentSource>("source", "MONITORING").unwrap_err();
    let err = StorageError::from(err);
    assert!(
      matches!(&err, StorageError::Database(sqlx_core::Error::ColumnDecode { index, .. }) if index == "source"),
      "unexpected error: {:?}",
      err
    );
  }
}
