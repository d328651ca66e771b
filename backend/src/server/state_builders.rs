//! Builders for the HTTP state from the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use user_registry::domain::UserRecordManager;
use user_registry::domain::ports::UserRepository;
use user_registry::inbound::http::state::HttpState;
use user_registry::outbound::persistence::{DieselUserRepository, InMemoryUserRepository};

use super::ServerConfig;

fn state_for<R>(repository: R, clock: Arc<dyn Clock>) -> HttpState
where
    R: UserRepository + 'static,
{
    let manager = Arc::new(UserRecordManager::new(Arc::new(repository), clock));
    HttpState::new(manager.clone(), manager)
}

/// Build the shared handler state.
///
/// Uses the Diesel adapter when a pool is configured, otherwise an in-memory
/// store that lives as long as the process.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL user store");
            state_for(DieselUserRepository::new(pool.clone()), clock)
        }
        None => {
            info!("no database configured; using in-memory user store");
            state_for(InMemoryUserRepository::default(), clock)
        }
    };
    web::Data::new(state)
}
