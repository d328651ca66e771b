//! User record HTTP handlers.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/{uuid}
//! POST   /api/v1/users        {"fullName":"Ada Lovelace","email":"ada@example.com","phone":"+4407700900123"}
//! PUT    /api/v1/users/{uuid} {"phone":"+4407700900124"}
//! DELETE /api/v1/users/{uuid}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::ports::UserRecordError;
use crate::domain::{CreateUserInput, Error, UserField, UserPatch, UserRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_validation_error, parse_user_id};

/// Request body for `POST /api/v1/users`. Every field is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "Ada Lovelace")]
    pub full_name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "+4407700900123")]
    pub phone: Option<String>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            full_name: value.full_name,
            email: value.email,
            phone: value.phone,
        }
    }
}

/// Request body for `PUT /api/v1/users/{uuid}`. Omitted fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[schema(example = "+4407700900124")]
    pub phone: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            full_name: value.full_name,
            email: value.email,
            phone: value.phone,
        }
    }
}

/// Public projection of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub uuid: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "+4407700900123")]
    pub phone: String,
}

impl From<UserRecord> for UserResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            uuid: value.external_id().to_string(),
            full_name: value.full_name().to_owned(),
            email: value.email().to_owned(),
            phone: value.phone().to_owned(),
        }
    }
}

/// Success envelope shared by every users endpoint.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Human-readable outcome.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    fn with_data(message: &str, data: T) -> Self {
        Self {
            message: message.to_owned(),
            data: Some(data),
        }
    }
}

/// Success body for outcomes that carry no record.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

fn conflict_error(field: Option<UserField>) -> Error {
    let (message, field) = match field {
        Some(UserField::Email) => ("Email already registered", UserField::Email),
        Some(UserField::Phone) => ("Phone number already registered", UserField::Phone),
        Some(UserField::FullName) | None => {
            return Error::conflict("Email or phone already registered");
        }
    };
    Error::conflict(message).with_details(json!({
        "field": field.as_str(),
        "code": "conflict",
    }))
}

/// Translate a manager outcome into the shared error body.
pub(crate) fn map_user_record_error(err: UserRecordError) -> Error {
    match err {
        UserRecordError::NotFound => Error::not_found("User not found"),
        UserRecordError::Conflict { field } => conflict_error(field),
        UserRecordError::Validation(err) => map_validation_error(err),
        UserRecordError::Internal(message) => {
            error!(%message, "user record operation failed");
            Error::internal(message)
        }
    }
}

/// List every user.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = Envelope<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let records = state
        .users_query
        .list_all()
        .await
        .map_err(map_user_record_error)?;
    let data: Vec<UserResponse> = records.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(Envelope::with_data("Users retrieved successfully", data)))
}

/// Fetch one user by external identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{uuid}",
    params(("uuid" = String, Path, description = "External user identifier")),
    responses(
        (status = 200, description = "User", body = Envelope<UserResponse>),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{uuid}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    let record = state
        .users_query
        .get_by_external_id(&id)
        .await
        .map_err(map_user_record_error)?;
    Ok(HttpResponse::Ok().json(Envelope::with_data(
        "User retrieved successfully",
        UserResponse::from(record),
    )))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email or phone already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let record = state
        .users_command
        .create(payload.into_inner().into())
        .await
        .map_err(map_user_record_error)?;
    Ok(HttpResponse::Created().json(Envelope::with_data(
        "User registered successfully",
        UserResponse::from(record),
    )))
}

/// Apply a partial update to a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{uuid}",
    params(("uuid" = String, Path, description = "External user identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email or phone already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{uuid}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    let record = state
        .users_command
        .update(&id, payload.into_inner().into())
        .await
        .map_err(map_user_record_error)?;
    Ok(HttpResponse::Ok().json(Envelope::with_data(
        "User updated successfully",
        UserResponse::from(record),
    )))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{uuid}",
    params(("uuid" = String, Path, description = "External user identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{uuid}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    state
        .users_command
        .delete(&id)
        .await
        .map_err(map_user_record_error)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

/// Register every users route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}

#[cfg(test)]
mod tests;
