//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] registers every users and health endpoint together with the
//! schema wrappers from [`crate::inbound::http::schemas`]. The document backs
//! Swagger UI in debug builds and is printed by `openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User registry API",
        description = "Create, read, update and delete user records with unique email and phone."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateUserRequest,
        UpdateUserRequest,
        UserResponse,
        MessageResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "User record operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/api/v1/users/{uuid}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn document_lists_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn user_projection_uses_wire_names_only() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user = schemas.get("UserResponse").expect("UserResponse schema");

        for field in ["uuid", "fullName", "email", "phone"] {
            assert_object_schema_has_field(user, field);
        }
        match user {
            RefOr::T(Schema::Object(obj)) => {
                assert!(!obj.properties.contains_key("id"));
                assert!(!obj.properties.contains_key("createdAt"));
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn delete_documents_a_message_only_body() {
        let doc = ApiDoc::openapi();
        let item = doc
            .paths
            .paths
            .get("/api/v1/users/{uuid}")
            .expect("user item path");
        let delete = item.delete.as_ref().expect("delete operation");
        let ok = delete.responses.responses.get("200").expect("200 response");
        let body = serde_json::to_string(ok).expect("response serialises");

        assert!(body.contains("MessageResponse"), "unexpected body: {body}");
        assert!(!body.contains("UserResponse"), "unexpected body: {body}");

        let schemas = &doc.components.as_ref().expect("components").schemas;
        let message = schemas.get("MessageResponse").expect("MessageResponse schema");
        assert_object_schema_has_field(message, "message");
        match message {
            RefOr::T(Schema::Object(obj)) => assert!(!obj.properties.contains_key("data")),
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("crate.domain.Error").expect("Error schema");

        assert_object_schema_has_field(error, "code");
        assert_object_schema_has_field(error, "message");
    }
}
