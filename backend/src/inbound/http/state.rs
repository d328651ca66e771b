//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! the driving ports, so they can be exercised against mocks without I/O.

use std::sync::Arc;

use crate::domain::ports::{UserRecordsCommand, UserRecordsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users_query: Arc<dyn UserRecordsQuery>,
    pub users_command: Arc<dyn UserRecordsCommand>,
}

impl HttpState {
    /// Bundle the read and write ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use user_registry::domain::UserRecordManager;
    /// use user_registry::inbound::http::state::HttpState;
    /// use user_registry::outbound::persistence::InMemoryUserRepository;
    ///
    /// let manager = Arc::new(UserRecordManager::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(manager.clone(), manager);
    /// # let _ = state;
    /// ```
    pub fn new(
        users_query: Arc<dyn UserRecordsQuery>,
        users_command: Arc<dyn UserRecordsCommand>,
    ) -> Self {
        Self {
            users_query,
            users_command,
        }
    }
}
