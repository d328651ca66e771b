//! Shared request validation helpers for inbound HTTP adapters.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, UserField, UserId, UserValidationError};

/// Detail code attached to request-shape failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailCode {
    InvalidUuid,
    MalformedBody,
}

impl DetailCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::MalformedBody => "malformed_body",
        }
    }
}

fn field_error(message: impl Into<String>, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Parse the `{uuid}` path segment into a [`UserId`].
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| {
        debug!(value = raw, %err, "rejected user id path segment");
        field_error(
            "uuid must be a valid UUID",
            "uuid",
            DetailCode::InvalidUuid.as_str(),
        )
    })
}

/// Client-facing message for a field validation failure.
fn validation_message(err: UserValidationError) -> String {
    let field = err.field();
    match err {
        UserValidationError::MissingField { .. } => format!("{field} is required"),
        UserValidationError::BlankField { .. } => format!("{field} must not be blank"),
        UserValidationError::InvalidCharacters { .. } => {
            format!("{field} must not contain the characters < or >")
        }
        UserValidationError::InvalidEmailShape => "Email address format is invalid".to_owned(),
        UserValidationError::InvalidPhoneShape => {
            "Phone must be 7-15 digits with an optional leading '+'".to_owned()
        }
    }
}

/// Map a field validation failure to a 400 carrying `{field, code}` details.
pub(crate) fn map_validation_error(err: UserValidationError) -> Error {
    let field: UserField = err.field();
    field_error(validation_message(err), field.as_str(), err.code())
}

/// Error handler for `web::JsonConfig`: malformed bodies become 400
/// `invalid_request` in the shared error shape.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected malformed JSON body");
    let message = match &err {
        JsonPayloadError::ContentType => "Request body must be JSON",
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body is too large"
        }
        _ => "Request body is not valid JSON",
    };
    field_error(message, "body", DetailCode::MalformedBody.as_str()).into()
}

/// JSON extractor configuration shared by every route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}
