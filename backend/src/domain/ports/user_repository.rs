//! Port abstraction for user record persistence and its errors.
//!
//! Adapters must enforce email and phone uniqueness atomically at write time
//! and report a lost race as [`UserPersistenceError::UniqueViolation`]. The
//! domain treats that report as the final word on uniqueness.

use async_trait::async_trait;

use crate::domain::{NewUser, RecordId, UserField, UserId, UserRecord};

use super::define_port_error;

/// Name of the unique constraint guarding `users.email`.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";
/// Name of the unique constraint guarding `users.phone`.
pub const PHONE_UNIQUE_CONSTRAINT: &str = "users_phone_key";

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A write would have broken a uniqueness constraint.
        UniqueViolation { constraint: String } =>
            "user repository unique constraint violated: {constraint}",
    }
}

impl UserPersistenceError {
    /// Field guarded by the violated constraint, when it can be identified.
    ///
    /// # Examples
    /// ```
    /// use user_registry::domain::UserField;
    /// use user_registry::domain::ports::{EMAIL_UNIQUE_CONSTRAINT, UserPersistenceError};
    ///
    /// let err = UserPersistenceError::unique_violation(EMAIL_UNIQUE_CONSTRAINT);
    /// assert_eq!(err.conflicting_field(), Some(UserField::Email));
    /// ```
    pub fn conflicting_field(&self) -> Option<UserField> {
        match self {
            Self::UniqueViolation { constraint } => match constraint.as_str() {
                EMAIL_UNIQUE_CONSTRAINT => Some(UserField::Email),
                PHONE_UNIQUE_CONSTRAINT => Some(UserField::Phone),
                _ => None,
            },
            Self::Connection { .. } | Self::Query { .. } => None,
        }
    }
}

/// Durable keyed storage for user records.
///
/// Lookups return zero or one record. `find_all` returns records in an
/// adapter-defined order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a record by its internal key.
    async fn find_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch a record by its external identifier.
    async fn find_by_external_id(
        &self,
        external_id: &UserId,
    ) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch the record holding `email`, if any.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch the record holding `phone`, if any.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch every record.
    async fn find_all(&self) -> Result<Vec<UserRecord>, UserPersistenceError>;

    /// Insert a new record, assigning its internal key.
    ///
    /// Fails with [`UserPersistenceError::UniqueViolation`] when the email or
    /// phone is already held by another record.
    async fn insert(&self, user: &NewUser) -> Result<UserRecord, UserPersistenceError>;

    /// Overwrite the mutable fields of an existing record.
    ///
    /// Returns `None` when the record no longer exists. Fails with
    /// [`UserPersistenceError::UniqueViolation`] when the new email or phone
    /// is held by another record.
    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Remove a record. Returns `false` when it was already gone.
    async fn delete(&self, user: &UserRecord) -> Result<bool, UserPersistenceError>;
}
