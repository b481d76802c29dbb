//! Task API handlers.
//!
//! ```text
//! GET    /api/tasks?where=&sort=&select=&skip=&limit=&count=
//! POST   /api/tasks      {"name": "...", "deadline": "...", ...}
//! GET    /api/tasks/{id}?select=
//! PUT    /api/tasks/{id} {"name": "...", "deadline": "...", ...}
//! DELETE /api/tasks/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use list_query::ListParams;

use crate::domain::{ApiResult, TaskInput};
use crate::inbound::http::envelope;
use crate::inbound::http::schemas::{
    ErrorEnvelopeSchema, ListParamsSchema, SelectParamsSchema, TaskEnvelopeSchema,
    TaskListEnvelopeSchema, TaskRequestSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{list_query, projection, task_draft, task_id};

/// List tasks, or count them with `count=true`.
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(ListParamsSchema),
    responses(
        (status = 200, description = "Matching tasks or their count", body = TaskListEnvelopeSchema),
        (status = 400, description = "Malformed query parameter", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let query = list_query(&params, state.list_defaults.tasks)?;
    let listing = state.task_query.list_tasks(query).await?;
    Ok(envelope::ok(listing))
}

/// Create a task and add it to its assignee's pending list.
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = TaskRequestSchema,
    responses(
        (status = 201, description = "Task created", body = TaskEnvelopeSchema),
        (status = 400, description = "Missing name or deadline", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    payload: web::Json<TaskInput>,
) -> ApiResult<HttpResponse> {
    let draft = task_draft(payload.into_inner())?;
    let task = state.task_command.create_task(draft).await?;
    Ok(envelope::created(task))
}

/// Fetch one task, optionally projected with `select`.
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier"), SelectParamsSchema),
    responses(
        (status = 200, description = "Task", body = TaskEnvelopeSchema),
        (status = 400, description = "Malformed select", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such task", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["tasks"],
    operation_id = "getTask"
)]
#[get("/tasks/{id}")]
pub async fn get_task(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    let id = task_id(&path)?;
    let projection = projection(&params)?;
    let document = state.task_query.get_task(&id, projection).await?;
    Ok(envelope::ok(document))
}

/// Replace a task's fields, moving it between assignees when needed.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = TaskRequestSchema,
    responses(
        (status = 200, description = "Task updated", body = TaskEnvelopeSchema),
        (status = 400, description = "Missing name or deadline", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such task", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TaskInput>,
) -> ApiResult<HttpResponse> {
    let draft = task_draft(payload.into_inner())?;
    let id = task_id(&path)?;
    let task = state.task_command.update_task(&id, draft).await?;
    Ok(envelope::updated(task))
}

/// Delete a task and remove it from its assignee's pending list.
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task deleted", body = TaskEnvelopeSchema),
        (status = 404, description = "No such task", body = ErrorEnvelopeSchema),
        (status = 500, description = "Store failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = task_id(&path)?;
    let task = state.task_command.delete_task(&id).await?;
    Ok(envelope::deleted(task))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
