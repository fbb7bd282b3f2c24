//! Repository tests against a live PostgreSQL database.
//!
//! Ignored by default. Run with a database that has
//! `migrations/0001_create_incidents.sql` applied:
//!
//!   DATABASE_URL=postgres://... cargo test -p incidents-api --test postgres -- --ignored
//!
//! Tests share the table, so each one only asserts on the rows it created.

use incidents_api::{
  IncidentRepository, IncidentSource, IncidentStatus, NewIncident, PgIncidentRepository,
  StorageError,
};
use sqlx_postgres::PgPoolOptions;

async fn repository() -> PgIncidentRepository {
  let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a migrated database");
  let pool = PgPoolOptions::new()
    .max_connections(2)
    .connect(&url)
    .await
    .expect("connect to DATABASE_URL");
  PgIncidentRepository::new(pool)
}

/// Description unique to this test run, so concurrent tests don't collide.
fn tagged(test: &str, n: usize) -> String {
  let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
  format!("{} #{} @{}", test, n, nanos)
}

fn new(description: String, source: IncidentSource) -> NewIncident {
  NewIncident { description, source }
}

#[tokio::test]
#[ignore = "needs DATABASE_URL with the incidents schema"]
async fn create_stores_open_incident_with_storage_fields() {
  let repo = repository().await;
  let description = tagged("create", 0);
  let created = repo
    .create(new(description.clone(), IncidentSource::Monitoring))
    .await
    .unwrap();

  assert!(created.id > 0);
  assert_eq!(created.description, description);
  assert_eq!(created.status, IncidentStatus::Open);
  assert_eq!(created.source, IncidentSource::Monitoring);
  assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
#[ignore = "needs DATABASE_URL with the incidents schema"]
async fn list_is_newest_first_and_filters_on_status() {
  let repo = repository().await;
  let mut ids = Vec::new();
  for (n, source) in IncidentSource::ALL.into_iter().enumerate() {
    let created = repo.create(new(tagged("list", n), source)).await.unwrap();
    ids.push(created.id);
  }
  let resolved = ids[1];
  repo
    .update_status(repo.get_by_id(resolved).await.unwrap().unwrap(), IncidentStatus::Resolved)
    .await
    .unwrap();

  let ours = |incidents: Vec<incidents_api::Incident>| -> Vec<i32> {
    incidents
      .into_iter()
      .map(|i| i.id)
      .filter(|id| ids.contains(id))
      .collect()
  };

  let all = repo.list(None).await.unwrap();
  for pair in all.windows(2) {
    assert!(
      (pair[0].created_at, pair[0].id) > (pair[1].created_at, pair[1].id),
      "list must be ordered by created_at DESC, id DESC"
    );
  }
  assert_eq!(ours(all), vec![ids[2], ids[1], ids[0]]);

  assert_eq!(
    ours(repo.list(Some(IncidentStatus::Open)).await.unwrap()),
    vec![ids[2], ids[0]]
  );
  assert_eq!(
    ours(repo.list(Some(IncidentStatus::Resolved)).await.unwrap()),
    vec![resolved]
  );
}

#[tokio::test]
#[ignore = "needs DATABASE_URL with the incidents schema"]
async fn update_status_changes_only_status() {
  let repo = repository().await;
  let created = repo
    .create(new(tagged("update", 0), IncidentSource::Partner))
    .await
    .unwrap();

  let updated = repo
    .update_status(created.clone(), IncidentStatus::InProgress)
    .await
    .unwrap();

  assert_eq!(updated.status, IncidentStatus::InProgress);
  assert_eq!(updated.id, created.id);
  assert_eq!(updated.description, created.description);
  assert_eq!(updated.source, created.source);
  assert_eq!(updated.created_at, created.created_at);
  assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(updated));
}

#[tokio::test]
#[ignore = "needs DATABASE_URL with the incidents schema"]
async fn update_status_of_missing_row_is_row_not_found() {
  let repo = repository().await;
  let mut ghost = repo
    .create(new(tagged("missing", 0), IncidentSource::Operator))
    .await
    .unwrap();
  // Serial ids are never negative, so this row cannot exist.
  ghost.id = -1;

  let err = repo
    .update_status(ghost, IncidentStatus::Closed)
    .await
    .unwrap_err();
  assert!(
    matches!(err, StorageError::Database(sqlx_core::Error::RowNotFound)),
    "unexpected error: {:?}",
    err
  );
}

#[tokio::test]
#[ignore = "needs DATABASE_URL with the incidents schema"]
async fn get_by_id_of_missing_row_is_none() {
  let repo = repository().await;
  assert_eq!(repo.get_by_id(-1).await.unwrap(), None);
}
