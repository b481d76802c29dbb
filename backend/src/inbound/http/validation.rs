//! Shared request parsing helpers for the task and user handlers.

use list_query::{ListParams, ListQuery, Projection};
use serde_json::json;

use crate::domain::{
    Error, TaskDraft, TaskId, TaskInput, TaskValidationError, UserDraft, UserId, UserInput,
    UserValidationError,
};

const TASK_NOT_FOUND: &str = "The requested Task could not be found in the database";
const USER_NOT_FOUND: &str = "The requested User could not be found in the database";

fn map_task_validation_error(err: TaskValidationError) -> Error {
    let error = Error::validation(err.to_string());
    match err {
        TaskValidationError::MissingNameOrDeadline => error,
        TaskValidationError::InvalidDeadline => error.with_details(json!({"field": "deadline"})),
        TaskValidationError::InvalidAssignee => {
            error.with_details(json!({"field": "assignedUser"}))
        }
    }
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let error = Error::validation(err.to_string());
    match err {
        UserValidationError::MissingNameOrEmail => error,
        UserValidationError::InvalidPendingTask { index } => {
            error.with_details(json!({"field": "pendingTasks", "index": index}))
        }
    }
}

/// Validate a task request body.
pub(crate) fn task_draft(input: TaskInput) -> Result<TaskDraft, Error> {
    TaskDraft::try_from(input).map_err(map_task_validation_error)
}

/// Validate a user request body.
pub(crate) fn user_draft(input: UserInput) -> Result<UserDraft, Error> {
    UserDraft::try_from(input).map_err(map_user_validation_error)
}

/// Path identifiers that cannot name a stored task are reported as missing.
pub(crate) fn task_id(raw: &str) -> Result<TaskId, Error> {
    TaskId::new(raw).map_err(|_| Error::not_found(TASK_NOT_FOUND))
}

/// Path identifiers that cannot name a stored user are reported as missing.
pub(crate) fn user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::not_found(USER_NOT_FOUND))
}

/// Parse list parameters with the resource's default page size.
pub(crate) fn list_query(params: &ListParams, default_limit: u64) -> Result<ListQuery, Error> {
    Ok(ListQuery::from_params(params, default_limit)?)
}

/// Parse the optional `select` projection of a by-id read.
pub(crate) fn projection(params: &ListParams) -> Result<Option<Projection>, Error> {
    Ok(params
        .select
        .as_deref()
        .map(Projection::parse)
        .transpose()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    fn missing_task_fields_have_no_details() {
        let error = task_draft(TaskInput::default()).expect_err("name missing");
        assert_eq!(error.code(), ErrorCode::ValidationFailed);
        assert_eq!(
            error.message(),
            "Task name and deadline are required in the request body"
        );
        assert!(error.details().is_none());
    }

    #[rstest]
    fn bad_deadline_names_the_field() {
        let input = TaskInput {
            name: Some("Report".to_owned()),
            deadline: Some(Value::Bool(true)),
            ..TaskInput::default()
        };
        let error = task_draft(input).expect_err("deadline invalid");
        assert_eq!(error.details(), Some(&json!({"field": "deadline"})));
    }

    #[rstest]
    fn bad_pending_task_reports_its_index() {
        let input = UserInput {
            name: Some("Ada".to_owned()),
            email: Some("ada@example.com".to_owned()),
            pending_tasks: Some(vec!["t1".to_owned(), String::new()]),
        };
        let error = user_draft(input).expect_err("pending task invalid");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "pendingTasks", "index": 1}))
        );
    }

    #[rstest]
    #[case("")]
    #[case(" t1")]
    fn unusable_path_ids_are_not_found(#[case] raw: &str) {
        let error = task_id(raw).expect_err("id rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn malformed_select_is_a_malformed_query() {
        let params = ListParams {
            select: Some("[1]".to_owned()),
            ..ListParams::default()
        };
        let error = projection(&params).expect_err("select invalid");
        assert_eq!(error.code(), ErrorCode::MalformedQuery);
    }
}
