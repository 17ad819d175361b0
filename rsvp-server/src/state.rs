//! Shared application state for the HTTP server.

use std::sync::Arc;

use rsvp::service::RsvpService;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RsvpService>,
}

impl AppState {
    pub fn new(service: RsvpService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
