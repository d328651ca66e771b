//! User registry service library.
//!
//! Hexagonal layout: [`domain`] holds the record model, validation and the
//! manager; [`inbound`] adapts HTTP to the driving ports; [`outbound`]
//! implements the store port for PostgreSQL and for memory.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
