//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the task, user and health endpoints together with the
//! schema wrappers from [`crate::inbound::http::schemas`]. The document is
//! served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{
    ErrorBodySchema, ErrorEnvelopeSchema, TaskEnvelopeSchema, TaskListEnvelopeSchema,
    TaskRequestSchema, TaskSchema, UserEnvelopeSchema, UserListEnvelopeSchema, UserRequestSchema,
    UserSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskboard API",
        description = "Tasks and users with mutually maintained assignment references."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::get_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        TaskSchema,
        UserSchema,
        TaskRequestSchema,
        UserRequestSchema,
        ErrorBodySchema,
        ErrorEnvelopeSchema,
        TaskEnvelopeSchema,
        TaskListEnvelopeSchema,
        UserEnvelopeSchema,
        UserListEnvelopeSchema,
    )),
    tags(
        (name = "tasks", description = "Task resources"),
        (name = "users", description = "User resources"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schemas.

    use super::*;

    #[test]
    fn every_resource_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/tasks",
            "/api/tasks/{id}",
            "/api/users",
            "/api/users/{id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn entity_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        for name in ["Task", "User", "ErrorEnvelope"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
