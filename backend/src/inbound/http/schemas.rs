//! OpenAPI schema definitions for domain types and response envelopes.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their JSON shape and exist only for documentation.

#![expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// OpenAPI schema for [`crate::domain::Task`].
#[derive(ToSchema)]
#[schema(as = Task, rename_all = "camelCase")]
pub struct TaskSchema {
    /// Store-assigned identifier.
    #[schema(rename = "_id", example = "5f0c2a9e8b3d4c6f9a1e2b3c4d5e6f70")]
    id: String,
    /// Task name.
    #[schema(example = "Write report")]
    name: String,
    /// Free text; empty when not supplied.
    description: String,
    /// Due date as an RFC 3339 timestamp.
    #[schema(example = "2025-01-01T00:00:00.000Z")]
    deadline: String,
    /// Completion flag.
    completed: bool,
    /// Assignee's identifier or the empty string.
    assigned_user: String,
    /// Assignee's name or `unassigned`.
    #[schema(example = "unassigned")]
    assigned_user_name: String,
    /// Creation time; never changed by updates.
    date_created: String,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = User, rename_all = "camelCase")]
pub struct UserSchema {
    /// Store-assigned identifier.
    #[schema(rename = "_id")]
    id: String,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    name: String,
    /// Unique email address.
    #[schema(example = "ada@example.com")]
    email: String,
    /// Identifiers of tasks assigned to this user.
    pending_tasks: Vec<String>,
    /// Creation time.
    date_created: String,
}

/// OpenAPI schema for [`crate::domain::TaskInput`].
#[derive(ToSchema)]
#[schema(as = TaskRequest, rename_all = "camelCase")]
pub struct TaskRequestSchema {
    /// Required.
    name: String,
    description: Option<String>,
    /// Required; RFC 3339, `YYYY-MM-DD` or epoch milliseconds.
    #[schema(value_type = String)]
    deadline: serde_json::Value,
    completed: Option<bool>,
    assigned_user: Option<String>,
    assigned_user_name: Option<String>,
}

/// OpenAPI schema for [`crate::domain::UserInput`].
#[derive(ToSchema)]
#[schema(as = UserRequest, rename_all = "camelCase")]
pub struct UserRequestSchema {
    /// Required.
    name: String,
    /// Required and unique.
    email: String,
    pending_tasks: Option<Vec<String>>,
}

/// `data` of an error envelope.
#[derive(ToSchema)]
#[schema(as = ErrorBody, rename_all = "camelCase")]
pub struct ErrorBodySchema {
    /// Human-readable summary.
    error: String,
    /// Underlying cause, when known.
    error_message: Option<serde_json::Value>,
}

/// Error envelope.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
pub struct ErrorEnvelopeSchema {
    /// `BAD REQUEST`, `NOT FOUND` or `SERVER ERROR`.
    #[schema(example = "NOT FOUND")]
    message: String,
    data: ErrorBodySchema,
}

/// Envelope around a single task.
#[derive(ToSchema)]
#[schema(as = TaskEnvelope)]
pub struct TaskEnvelopeSchema {
    /// `OK`, `CREATED`, `UPDATED` or `DELETED`.
    message: String,
    data: TaskSchema,
}

/// Envelope around a task list, or a bare count for `count=true`.
#[derive(ToSchema)]
#[schema(as = TaskListEnvelope)]
pub struct TaskListEnvelopeSchema {
    /// Always `OK`.
    message: String,
    data: Vec<TaskSchema>,
}

/// Envelope around a single user.
#[derive(ToSchema)]
#[schema(as = UserEnvelope)]
pub struct UserEnvelopeSchema {
    /// `OK`, `CREATED`, `UPDATED` or `DELETED`.
    message: String,
    data: UserSchema,
}

/// Envelope around a user list, or a bare count for `count=true`.
#[derive(ToSchema)]
#[schema(as = UserListEnvelope)]
pub struct UserListEnvelopeSchema {
    /// Always `OK`.
    message: String,
    data: Vec<UserSchema>,
}

/// List query parameters. Structured values are JSON text.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParamsSchema {
    /// Filter expression, e.g. `{"completed": false}`.
    #[serde(rename = "where")]
    filter: Option<String>,
    /// Sort specification, e.g. `{"deadline": 1}`.
    sort: Option<String>,
    /// Projection, e.g. `{"name": 1}`; also accepted as `filter`.
    select: Option<String>,
    /// Matches to skip.
    skip: Option<u64>,
    /// Maximum results; `0` is unlimited.
    limit: Option<u64>,
    /// Return the number of matches instead of documents.
    count: Option<bool>,
}

/// Projection parameter for by-id reads.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SelectParamsSchema {
    /// Projection, e.g. `{"name": 1}`; also accepted as `filter`.
    select: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn properties<T: PartialSchema>() -> Vec<String> {
        match T::schema() {
            RefOr::T(Schema::Object(object)) => object.properties.keys().cloned().collect(),
            other => panic!("expected object schema, got {other:?}"),
        }
    }

    #[test]
    fn task_schema_uses_wire_field_names() {
        let fields = properties::<TaskSchema>();
        assert!(fields.contains(&"_id".to_owned()));
        assert!(fields.contains(&"assignedUserName".to_owned()));
        assert!(fields.contains(&"dateCreated".to_owned()));
    }

    #[test]
    fn user_schema_uses_wire_field_names() {
        let fields = properties::<UserSchema>();
        assert!(fields.contains(&"_id".to_owned()));
        assert!(fields.contains(&"pendingTasks".to_owned()));
    }
}
