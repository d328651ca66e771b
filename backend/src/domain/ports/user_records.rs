//! Driving ports for user record reads and mutations.
//!
//! Inbound adapters depend on these traits rather than on the concrete
//! manager so handlers can be exercised against doubles.

use async_trait::async_trait;

use crate::domain::{CreateUserInput, UserField, UserId, UserPatch, UserRecord, UserValidationError};

/// Expected and unexpected outcomes of a user record operation.
///
/// Every call terminates in `Ok` or one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRecordError {
    /// No record exists for the given external identifier.
    #[error("user not found")]
    NotFound,
    /// The operation would break email or phone uniqueness.
    ///
    /// `field` is `None` when the store reported a violation it could not
    /// attribute.
    #[error("user {} already registered", conflict_subject(.field))]
    Conflict { field: Option<UserField> },
    /// The supplied fields are malformed.
    #[error(transparent)]
    Validation(#[from] UserValidationError),
    /// Anything unanticipated. The message is diagnostic only.
    #[error("user records unavailable: {0}")]
    Internal(String),
}

fn conflict_subject(field: &Option<UserField>) -> &'static str {
    match field {
        Some(UserField::Email) => "email",
        Some(UserField::Phone) => "phone",
        Some(UserField::FullName) => "full name",
        None => "email or phone",
    }
}

impl UserRecordError {
    /// Conflict attributed to `field`.
    pub fn conflict(field: UserField) -> Self {
        Self::Conflict { field: Some(field) }
    }
}

/// Read side of the user record service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordsQuery: Send + Sync {
    /// Every stored record.
    async fn list_all(&self) -> Result<Vec<UserRecord>, UserRecordError>;

    /// The record addressed by `external_id`.
    async fn get_by_external_id(&self, external_id: &UserId) -> Result<UserRecord, UserRecordError>;
}

/// Write side of the user record service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordsCommand: Send + Sync {
    /// Validate and store a new record.
    async fn create(&self, input: CreateUserInput) -> Result<UserRecord, UserRecordError>;

    /// Apply `patch` to the record addressed by `external_id`.
    async fn update(
        &self,
        external_id: &UserId,
        patch: UserPatch,
    ) -> Result<UserRecord, UserRecordError>;

    /// Remove the record addressed by `external_id`.
    async fn delete(&self, external_id: &UserId) -> Result<(), UserRecordError>;
}
