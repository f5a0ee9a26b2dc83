//! Shared application state.

use std::sync::Arc;

use crate::service::CtfService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CtfService>,
    /// Scoreboard rows returned when the request gives no `limit`.
    pub scoreboard_limit: Option<usize>,
}

impl AppState {
    pub fn new(service: Arc<CtfService>) -> Self {
        Self {
            service,
            scoreboard_limit: None,
        }
    }

    pub fn with_scoreboard_limit(mut self, limit: Option<usize>) -> Self {
        self.scoreboard_limit = limit;
        self
    }
}
