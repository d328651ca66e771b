//! Domain primitives, ports and services.
//!
//! Purpose: define the user record model, its validation rules and the
//! manager that owns every create/read/update/delete decision. Types here
//! carry no framework concerns; inbound and outbound adapters translate to
//! and from them.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic API error payload.
//! - TraceId: per-request correlation identifier.
//! - UserRecord, UserId, UserPatch, CreateUserInput: the record model.
//! - UserRecordManager: implementation of the driving ports.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_record_manager;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    CreateUserInput, NewUser, RecordId, UserField, UserFields, UserId, UserIdError, UserPatch,
    UserRecord, UserValidationError, validate_create_fields, validate_update_fields,
};
pub use self::user_record_manager::UserRecordManager;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use user_registry::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("User not found"))
/// }
/// # assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
