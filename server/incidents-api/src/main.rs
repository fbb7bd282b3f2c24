//! Binary entrypoint for the incidents API.

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use incidents_api::{
  AppState, IncidentRepository, IncidentService, MemoryIncidentRepository, PgIncidentRepository,
  Settings, StorageBackend,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenvy::dotenv().ok();
  let settings = Settings::from_env()?;
  init_tracing(settings.debug);

  let repository: Arc<dyn IncidentRepository> = match settings.storage {
    StorageBackend::Postgres => {
      let pool = sqlx_postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;
      tracing::info!(max_connections = settings.max_connections, "connected to the database");
      Arc::new(PgIncidentRepository::new(pool))
    }
    StorageBackend::Memory => {
      tracing::warn!("using in-memory storage; incidents are lost on exit");
      Arc::new(MemoryIncidentRepository::new())
    }
  };

  let addr = settings.bind_addr();
  tracing::info!(
    name = %settings.app_name,
    version = %settings.app_version,
    "incidents-api listening on http://{}",
    addr
  );

  let state = Arc::new(AppState::new(IncidentService::new(repository), settings));
  let app = incidents_api::app(state);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

fn init_tracing(debug: bool) {
  let default_level = if debug { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt().with_env_filter(filter).init();
}
