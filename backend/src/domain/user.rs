//! User record model.
//!
//! A user record is addressed externally by a random [`UserId`] and
//! internally by a store-assigned [`RecordId`]. Contact fields (`email` and
//! `phone`) are unique across the store.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod validation;

pub use validation::{
    UserFields, UserValidationError, validate_create_fields, validate_update_fields,
};

/// Errors returned when parsing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    Empty,
    /// The identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    Invalid,
}

/// External, caller-facing user identifier stored as a UUID.
///
/// Assigned once at creation and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserIdError> {
        if id.is_empty() {
            return Err(UserIdError::Empty);
        }
        if id.trim() != id {
            return Err(UserIdError::Invalid);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserIdError::Invalid)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Store-assigned internal key. Never exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw key produced by a store.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw key value.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// Names one of the mutable user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserField {
    /// The user's full name.
    FullName,
    /// The user's email address.
    Email,
    /// The user's phone number.
    Phone,
}

impl UserField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub external_id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: NaiveDate,
}

/// A stored user record.
///
/// ## Invariants
/// - `id`, `external_id` and `created_at` never change after insertion.
/// - `full_name`, `email` and `phone` hold trimmed, validated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    id: RecordId,
    external_id: UserId,
    full_name: String,
    email: String,
    phone: String,
    created_at: NaiveDate,
}

impl UserRecord {
    /// Attach a store-assigned key to a new record.
    pub fn from_new(id: RecordId, user: NewUser) -> Self {
        let NewUser {
            external_id,
            full_name,
            email,
            phone,
            created_at,
        } = user;
        Self {
            id,
            external_id,
            full_name,
            email,
            phone,
            created_at,
        }
    }

    /// Internal store key.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// External identifier.
    pub fn external_id(&self) -> &UserId {
        &self.external_id
    }

    /// Full name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Phone number.
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    /// Date the record was created.
    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    pub(crate) fn set_full_name(&mut self, full_name: String) {
        self.full_name = full_name;
    }

    pub(crate) fn set_email(&mut self, email: String) {
        self.email = email;
    }

    pub(crate) fn set_phone(&mut self, phone: String) {
        self.phone = phone;
    }
}

/// Fields supplied to create a record. `None` means the field was omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CreateUserInput {
    /// Input with all three fields supplied.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            full_name: Some(full_name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
        }
    }

    /// Copy with leading and trailing whitespace removed from every field.
    pub fn trimmed(self) -> Self {
        Self {
            full_name: trim(self.full_name),
            email: trim(self.email),
            phone: trim(self.phone),
        }
    }
}

/// Partial update. Each field is either absent (`None`) or present.
///
/// A present value replaces the stored one; there is no way to clear a
/// field.
///
/// # Examples
/// ```
/// use user_registry::domain::UserPatch;
///
/// let patch = UserPatch::default().with_email(" ada@example.com ").trimmed();
/// assert_eq!(patch.email.as_deref(), Some("ada@example.com"));
/// assert!(patch.phone.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserPatch {
    /// Supply a new full name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Supply a new email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Supply a new phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Copy with leading and trailing whitespace removed from every field.
    pub fn trimmed(self) -> Self {
        Self {
            full_name: trim(self.full_name),
            email: trim(self.email),
            phone: trim(self.phone),
        }
    }
}

fn trim(value: Option<String>) -> Option<String> {
    value.map(|raw| raw.trim().to_owned())
}
