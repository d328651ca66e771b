//! Tests for users API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::NaiveDate;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockUserRecordsCommand, MockUserRecordsQuery};
use crate::domain::{NewUser, RecordId, UserId, UserValidationError};
use crate::inbound::http::validation::json_config;

const ADA_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn ada() -> UserRecord {
    UserRecord::from_new(
        RecordId::new(1),
        NewUser {
            external_id: UserId::new(ADA_ID).expect("fixture id"),
            full_name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: "+4407700900123".to_owned(),
            created_at: NaiveDate::from_ymd_opt(2026, 3, 14).expect("fixture date"),
        },
    )
}

fn test_app(
    query: MockUserRecordsQuery,
    command: MockUserRecordsCommand,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(query), Arc::new(command));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(web::scope("/api/v1").configure(configure))
}

async fn send(
    query: MockUserRecordsQuery,
    command: MockUserRecordsCommand,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(query, command)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("JSON body");
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn list_returns_projections_without_internal_fields() {
    let mut query = MockUserRecordsQuery::new();
    query.expect_list_all().times(1).return_once(|| Ok(vec![ada()]));

    let (status, body) = send(
        query,
        MockUserRecordsCommand::new(),
        actix_test::TestRequest::get().uri("/api/v1/users"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Users retrieved successfully",
            "data": [{
                "uuid": ADA_ID,
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+4407700900123",
            }],
        })
    );
}

#[rstest]
#[actix_web::test]
async fn get_passes_the_parsed_identifier() {
    let mut query = MockUserRecordsQuery::new();
    query
        .expect_get_by_external_id()
        .withf(|id| id.to_string() == ADA_ID)
        .times(1)
        .return_once(|_| Ok(ada()));

    let (status, body) = send(
        query,
        MockUserRecordsCommand::new(),
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/{ADA_ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["uuid"], ADA_ID);
}

#[rstest]
#[actix_web::test]
async fn get_unknown_user_is_404() {
    let mut query = MockUserRecordsQuery::new();
    query
        .expect_get_by_external_id()
        .return_once(|_| Err(UserRecordError::NotFound));

    let (status, body) = send(
        query,
        MockUserRecordsCommand::new(),
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/{ADA_ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"code": "not_found", "message": "User not found"}));
}

#[rstest]
#[case(actix_test::TestRequest::get())]
#[case(actix_test::TestRequest::delete())]
#[actix_web::test]
async fn malformed_identifier_is_rejected_before_the_service(
    #[case] request: actix_test::TestRequest,
) {
    let mut query = MockUserRecordsQuery::new();
    query.expect_get_by_external_id().times(0);
    let mut command = MockUserRecordsCommand::new();
    command.expect_delete().times(0);

    let (status, body) = send(query, command, request.uri("/api/v1/users/not-a-uuid")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"], json!({"field": "uuid", "code": "invalid_uuid"}));
}

#[rstest]
#[actix_web::test]
async fn create_returns_201_with_projection() {
    let mut command = MockUserRecordsCommand::new();
    command
        .expect_create()
        .withf(|input| {
            input.full_name.as_deref() == Some("Ada Lovelace")
                && input.email.as_deref() == Some("ada@example.com")
                && input.phone.as_deref() == Some("+4407700900123")
        })
        .times(1)
        .return_once(|_| Ok(ada()));

    let (status, body) = send(
        MockUserRecordsQuery::new(),
        command,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "+4407700900123",
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[rstest]
#[case(UserField::Email, "Email already registered", "email")]
#[case(UserField::Phone, "Phone number already registered", "phone")]
#[actix_web::test]
async fn create_conflict_names_the_field(
    #[case] field: UserField,
    #[case] message: &str,
    #[case] wire_field: &str,
) {
    let mut command = MockUserRecordsCommand::new();
    command
        .expect_create()
        .return_once(move |_| Err(UserRecordError::conflict(field)));

    let (status, body) = send(
        MockUserRecordsQuery::new(),
        command,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"fullName": "Ada", "email": "ada@example.com", "phone": "1234567"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({
            "code": "conflict",
            "message": message,
            "details": {"field": wire_field, "code": "conflict"},
        })
    );
}

#[rstest]
#[actix_web::test]
async fn unattributed_conflict_uses_generic_message() {
    let mut command = MockUserRecordsCommand::new();
    command
        .expect_update()
        .return_once(|_, _| Err(UserRecordError::Conflict { field: None }));

    let (status, body) = send(
        MockUserRecordsQuery::new(),
        command,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{ADA_ID}"))
            .set_json(json!({"email": "grace@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email or phone already registered");
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn create_validation_failure_is_400_with_details() {
    let mut command = MockUserRecordsCommand::new();
    command.expect_create().return_once(|_| {
        Err(UserRecordError::Validation(
            UserValidationError::InvalidCharacters {
                field: UserField::FullName,
            },
        ))
    });

    let (status, body) = send(
        MockUserRecordsQuery::new(),
        command,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"fullName": "Jo<hn", "email": "jo@example.com", "phone": "1234567"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"],
        json!({"field": "fullName", "code": "invalid_characters"})
    );
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_400_in_the_shared_error_shape() {
    let mut command = MockUserRecordsCommand::new();
    command.expect_create().times(0);

    let (status, body) = send(
        MockUserRecordsQuery::new(),
        command,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"fullName\": "),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "malformed_body");
}

#[rstest]
#[actix_web::test]
async fn update_forwards_only_supplied_fields() {
    let mut command = MockUserRecordsCommand::new();
    command
        .expect_update()
        .withf(|id, patch| {
            id.to_string() == ADA_ID
                && *patch == UserPatch::default().with_phone("+4407700900124")
        })
        .times(1)
        .return_once(|_, _| Ok(ada()));

    let (status, body) = send(
        MockUserRecordsQuery::new(),
        command,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{ADA_ID}"))
            .set_json(json!({"phone": "+4407700900124"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");
}

#[rstest]
#[actix_web::test]
async fn delete_returns_message_without_data() {
    let mut command = MockUserRecordsCommand::new();
    command.expect_delete().times(1).return_once(|_| Ok(()));

    let (status, body) = send(
        MockUserRecordsQuery::new(),
        command,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/users/{ADA_ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "User deleted successfully"}));
}

#[rstest]
#[actix_web::test]
async fn internal_failures_are_redacted() {
    let mut query = MockUserRecordsQuery::new();
    query
        .expect_list_all()
        .return_once(|| Err(UserRecordError::Internal("pool exhausted at 10.0.0.5".to_owned())));

    let (status, body) = send(
        query,
        MockUserRecordsCommand::new(),
        actix_test::TestRequest::get().uri("/api/v1/users"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"code": "internal_error", "message": "Internal server error"})
    );
}
