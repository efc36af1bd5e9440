//! Explicitly owned application context handed to every flow.

use crate::features::{auth::state::AuthState, backend::Backend};
use std::sync::Arc;

/// Backend plus auth state for one client session.
#[derive(Clone)]
pub struct AppContext {
    backend: Arc<dyn Backend>,
    auth: AuthState,
}

impl AppContext {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            auth: AuthState::default(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    #[must_use]
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }
}
