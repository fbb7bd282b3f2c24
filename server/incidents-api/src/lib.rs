//! Incidents API
//!
//! HTTP service that records incidents, lists them (newest first, optionally
//! filtered by status) and moves them through their status lifecycle.
//! Binds to 127.0.0.1 by default.
//!
//! Request flow: handler validates input → `IncidentService` →
//! `IncidentRepository` (PostgreSQL or in-memory).

pub mod config;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod repository;
pub mod service;
pub mod state;
pub mod types;
pub mod validate;

use axum::routing::{get, patch};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Settings, StorageBackend};
pub use error::{ApiError, StorageError};
pub use memory::MemoryIncidentRepository;
pub use repository::{IncidentRepository, PgIncidentRepository};
pub use service::IncidentService;
pub use state::AppState;
pub use types::{Incident, IncidentSource, IncidentStatus, NewIncident};

/// Build the router with all routes and layers attached.
pub fn app(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(handlers::root))
    .route("/health", get(handlers::health))
    .route(
      "/incidents",
      get(handlers::list_incidents).post(handlers::create_incident),
    )
    .route(
      "/incidents/",
      get(handlers::list_incidents).post(handlers::create_incident),
    )
    .route("/incidents/:id/status", patch(handlers::update_incident_status))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
