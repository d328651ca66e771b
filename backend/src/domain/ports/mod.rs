//! Domain ports for the hexagonal boundary.
//!
//! Driven port: [`UserRepository`] (the record store). Driving ports:
//! [`UserRecordsQuery`] and [`UserRecordsCommand`].

mod macros;
pub(crate) use macros::define_port_error;

mod user_records;
mod user_repository;

#[cfg(test)]
pub use user_records::{MockUserRecordsCommand, MockUserRecordsQuery};
pub use user_records::{UserRecordError, UserRecordsCommand, UserRecordsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    EMAIL_UNIQUE_CONSTRAINT, PHONE_UNIQUE_CONSTRAINT, UserPersistenceError, UserRepository,
};
