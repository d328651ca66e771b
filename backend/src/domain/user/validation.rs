//! Field validation for user records.
//!
//! Pure functions, no store access. Creation and update deliberately apply
//! different phone rules: creation only screens angle brackets, update also
//! requires the strict digits-only shape.

use std::sync::OnceLock;

use regex::Regex;

use super::{CreateUserInput, UserField, UserPatch};

/// Validation failures for user fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// A field required on creation was omitted or blank.
    #[error("{field} is required")]
    MissingField { field: UserField },
    /// A field supplied in an update was blank.
    #[error("{field} must not be blank")]
    BlankField { field: UserField },
    /// A field contained `<` or `>`.
    #[error("{field} must not contain the characters < or >")]
    InvalidCharacters { field: UserField },
    /// The email address is not well formed.
    #[error("email address format is invalid")]
    InvalidEmailShape,
    /// The phone number is not 7-15 digits with an optional leading `+`.
    #[error("phone must be 7-15 digits with an optional leading '+'")]
    InvalidPhoneShape,
}

impl UserValidationError {
    /// Field the failure refers to.
    pub fn field(&self) -> UserField {
        match self {
            Self::MissingField { field }
            | Self::BlankField { field }
            | Self::InvalidCharacters { field } => *field,
            Self::InvalidEmailShape => UserField::Email,
            Self::InvalidPhoneShape => UserField::Phone,
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::BlankField { .. } => "blank_field",
            Self::InvalidCharacters { .. } => "invalid_characters",
            Self::InvalidEmailShape => "invalid_email",
            Self::InvalidPhoneShape => "invalid_phone",
        }
    }
}

/// Fields accepted for a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Dot-atom local part and dot-separated labels, both admitting
        // non-ASCII letters; the domain needs no top-level dot. A bracketed
        // IPv4 or IPv6 literal may stand in for the domain.
        let pattern = concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{FFFF}-]+",
            r"(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{FFFF}-]+)*",
            r"@(?:",
            r"[A-Za-z0-9\x{80}-\x{FFFF}](?:[A-Za-z0-9\x{80}-\x{FFFF}-]*[A-Za-z0-9\x{80}-\x{FFFF}])?",
            r"(?:\.[A-Za-z0-9\x{80}-\x{FFFF}](?:[A-Za-z0-9\x{80}-\x{FFFF}-]*[A-Za-z0-9\x{80}-\x{FFFF}])?)*",
            r"|\[[0-9]{1,3}(?:\.[0-9]{1,3}){3}\]",
            r"|\[IPv6:[0-9A-Fa-f:.]+\]",
            r")$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^[+]?[0-9]{7,15}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

fn has_angle_brackets(value: &str) -> bool {
    value.contains(['<', '>'])
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the fields required to create a record.
///
/// Fails with `MissingField` if any field is absent or blank, then with
/// `InvalidCharacters` if any contains `<`/`>`, then with
/// `InvalidEmailShape`. The phone number is not shape-checked here.
///
/// # Examples
/// ```
/// use user_registry::domain::{CreateUserInput, validate_create_fields};
///
/// let input = CreateUserInput::new("Ada Lovelace", "ada@example.com", "123");
/// let fields = validate_create_fields(&input).expect("loose phone accepted on create");
/// assert_eq!(fields.phone, "123");
/// ```
pub fn validate_create_fields(input: &CreateUserInput) -> Result<UserFields, UserValidationError> {
    let required = |value: &Option<String>, field| match value.as_deref() {
        Some(value) if !is_blank(value) => Ok(value.to_owned()),
        _ => Err(UserValidationError::MissingField { field }),
    };
    let fields = UserFields {
        full_name: required(&input.full_name, UserField::FullName)?,
        email: required(&input.email, UserField::Email)?,
        phone: required(&input.phone, UserField::Phone)?,
    };

    for (field, value) in [
        (UserField::FullName, &fields.full_name),
        (UserField::Email, &fields.email),
        (UserField::Phone, &fields.phone),
    ] {
        if has_angle_brackets(value) {
            return Err(UserValidationError::InvalidCharacters { field });
        }
    }

    if !email_regex().is_match(&fields.email) {
        return Err(UserValidationError::InvalidEmailShape);
    }

    Ok(fields)
}

/// Check the fields present in a patch. Absent fields are not inspected.
pub fn validate_update_fields(patch: &UserPatch) -> Result<(), UserValidationError> {
    if let Some(full_name) = patch.full_name.as_deref() {
        screen(UserField::FullName, full_name)?;
    }
    if let Some(email) = patch.email.as_deref() {
        screen(UserField::Email, email)?;
        if !email_regex().is_match(email) {
            return Err(UserValidationError::InvalidEmailShape);
        }
    }
    if let Some(phone) = patch.phone.as_deref() {
        screen(UserField::Phone, phone)?;
        if !phone_regex().is_match(phone) {
            return Err(UserValidationError::InvalidPhoneShape);
        }
    }
    Ok(())
}

fn screen(field: UserField, value: &str) -> Result<(), UserValidationError> {
    if is_blank(value) {
        return Err(UserValidationError::BlankField { field });
    }
    if has_angle_brackets(value) {
        return Err(UserValidationError::InvalidCharacters { field });
    }
    Ok(())
}
