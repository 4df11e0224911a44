//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::auth::TokenCodec;
use crate::config::Settings;
use crate::store::{ApplicationStore, UserStore, VacancyStore};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Runtime configuration
    pub settings: Settings,

    /// Token issuer and verifier, keyed by the configured secret
    pub tokens: TokenCodec,

    /// User account store (has internal locking)
    pub users: UserStore,

    /// Job vacancy store (has internal locking)
    pub vacancies: VacancyStore,

    /// Job application store (has internal locking)
    pub applications: ApplicationStore,
}

impl AppState {
    /// Create new application state from loaded settings
    pub fn new(settings: Settings) -> Self {
        let tokens = TokenCodec::new(&settings.auth);

        Self {
            settings,
            tokens,
            users: UserStore::new(),
            vacancies: VacancyStore::new(),
            applications: ApplicationStore::new(),
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
