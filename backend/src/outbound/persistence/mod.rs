//! User record persistence adapters.
//!
//! - [`DieselUserRepository`]: PostgreSQL via `diesel-async` and a `bb8` pool.
//! - [`InMemoryUserRepository`]: process-local store for development and
//!   tests.
//!
//! Diesel row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; adapters translate to domain types at the edge.
//!
//! # Example
//!
//! ```no_run
//! use user_registry::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let repository = DieselUserRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod diesel_user_repository;
mod in_memory_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
