//! Shared application state handed to every handler.

use crate::config::Settings;
use crate::service::IncidentService;

pub struct AppState {
  pub service: IncidentService,
  pub settings: Settings,
}

impl AppState {
  pub fn new(service: IncidentService, settings: Settings) -> Self {
    Self { service, settings }
  }
}
