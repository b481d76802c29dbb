//! User API handlers.
//!
//! ```text
//! GET    /api/users?where=&sort=&select=&skip=&limit=&count=
//! POST   /api/users      {"name": "...", "email": "...", "pendingTasks": [...]}
//! GET    /api/users/{id}?select=
//! PUT    /api/users/{id} {"name": "...", "email": "...", "pendingTasks": [...]}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use list_query::ListParams;

use crate::domain::{ApiResult, UserInput};
use crate::inbound::http::envelope;
use crate::inbound::http::schemas::{
    ErrorEnvelopeSchema, ListParamsSchema, SelectParamsSchema, UserEnvelopeSchema,
    UserListEnvelopeSchema, UserRequestSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{list_query, projection, user_draft, user_id};

/// List users, or count them with `count=true`.
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListParamsSchema),
    responses(
        (status = 200, description = "Matching users or their count", body = UserListEnvelopeSchema),
        (status = 400, description = "Malformed query parameter", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let query = list_query(&params, state.list_defaults.users)?;
    let listing = state.user_query.list_users(query).await?;
    Ok(envelope::ok(listing))
}

/// Create a user and assign any listed pending tasks to them.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequestSchema,
    responses(
        (status = 201, description = "User created", body = UserEnvelopeSchema),
        (status = 400, description = "Missing name or email, or duplicate email", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserInput>,
) -> ApiResult<HttpResponse> {
    let draft = user_draft(payload.into_inner())?;
    let user = state.user_command.create_user(draft).await?;
    Ok(envelope::created(user))
}

/// Fetch one user, optionally projected with `select`.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier"), SelectParamsSchema),
    responses(
        (status = 200, description = "User", body = UserEnvelopeSchema),
        (status = 400, description = "Malformed select", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such user", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    let projection = projection(&params)?;
    let document = state.user_query.get_user(&id, projection).await?;
    Ok(envelope::ok(document))
}

/// Replace a user's fields, reassigning tasks added to or removed from
/// `pendingTasks`.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserRequestSchema,
    responses(
        (status = 200, description = "User updated", body = UserEnvelopeSchema),
        (status = 400, description = "Missing name or email, or duplicate email", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such user", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserInput>,
) -> ApiResult<HttpResponse> {
    let draft = user_draft(payload.into_inner())?;
    let id = user_id(&path)?;
    let user = state.user_command.update_user(&id, draft).await?;
    Ok(envelope::updated(user))
}

/// Delete a user and unassign every task still assigned to them.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = UserEnvelopeSchema),
        (status = 404, description = "No such user", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    let user = state.user_command.delete_user(&id).await?;
    Ok(envelope::deleted(user))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
