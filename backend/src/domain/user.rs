//! User documents and the validated input used to create or replace them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{TaskId, UserId, timestamp};

/// Validation errors raised while turning request fields into a [`UserDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// `name` or `email` is absent or blank.
    #[error("User name and email are required in the request body")]
    MissingNameOrEmail,
    /// An entry of `pendingTasks` is not a usable identifier.
    #[error("pendingTasks[{index}] must be a task identifier")]
    InvalidPendingTask {
        /// Position of the offending entry.
        index: usize,
    },
}

/// Stored user.
///
/// ## Invariants
/// - `pending_tasks` holds no duplicates.
/// - `email` is unique across users; enforced by the user service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    id: UserId,
    name: String,
    email: String,
    #[serde(default)]
    pending_tasks: Vec<TaskId>,
    #[serde(with = "timestamp")]
    date_created: DateTime<Utc>,
}

impl User {
    /// Store-assigned identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Unique email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Tasks currently assigned to the user.
    pub fn pending_tasks(&self) -> &[TaskId] {
        &self.pending_tasks
    }

    /// Creation timestamp.
    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }
}

/// User fields as supplied by a client on create or replace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Identifiers of tasks assigned to the user.
    pub pending_tasks: Option<Vec<String>>,
}

/// Validated editable user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: String,
    email: String,
    pending_tasks: Vec<TaskId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewUser<'a> {
    name: &'a str,
    email: &'a str,
    pending_tasks: &'a [TaskId],
    #[serde(with = "timestamp")]
    date_created: DateTime<Utc>,
}

impl UserDraft {
    /// Draft with no pending tasks.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(UserValidationError::MissingNameOrEmail);
        }
        Ok(Self {
            name,
            email,
            pending_tasks: Vec::new(),
        })
    }

    /// Replace the pending task list, dropping repeated identifiers.
    #[must_use]
    pub fn with_pending_tasks(mut self, tasks: impl IntoIterator<Item = TaskId>) -> Self {
        self.pending_tasks.clear();
        for task in tasks {
            if !self.pending_tasks.contains(&task) {
                self.pending_tasks.push(task);
            }
        }
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Requested pending tasks in first-seen order.
    pub fn pending_tasks(&self) -> &[TaskId] {
        &self.pending_tasks
    }

    pub(crate) fn as_new_document(&self, date_created: DateTime<Utc>) -> impl Serialize + '_ {
        NewUser {
            name: &self.name,
            email: &self.email,
            pending_tasks: &self.pending_tasks,
            date_created,
        }
    }

    /// Replace the editable fields of `existing`, keeping its identity and
    /// creation time.
    pub fn apply_to(self, existing: &User) -> User {
        User {
            id: existing.id.clone(),
            name: self.name,
            email: self.email,
            pending_tasks: self.pending_tasks,
            date_created: existing.date_created,
        }
    }
}

impl TryFrom<UserInput> for UserDraft {
    type Error = UserValidationError;

    fn try_from(input: UserInput) -> Result<Self, Self::Error> {
        let (Some(name), Some(email)) = (input.name, input.email) else {
            return Err(UserValidationError::MissingNameOrEmail);
        };
        let pending_tasks = input
            .pending_tasks
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                TaskId::new(raw).map_err(|_| UserValidationError::InvalidPendingTask { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, email)?.with_pending_tasks(pending_tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn input(name: Option<&str>, email: Option<&str>) -> UserInput {
        UserInput {
            name: name.map(str::to_owned),
            email: email.map(str::to_owned),
            pending_tasks: None,
        }
    }

    #[rstest]
    #[case(None, Some("a@x.com"))]
    #[case(Some("A"), None)]
    #[case(Some(""), Some("a@x.com"))]
    #[case(Some("A"), Some(" "))]
    fn name_and_email_are_required(#[case] name: Option<&str>, #[case] email: Option<&str>) {
        assert_eq!(
            UserDraft::try_from(input(name, email)),
            Err(UserValidationError::MissingNameOrEmail)
        );
    }

    #[rstest]
    fn pending_tasks_default_to_empty() {
        let draft = UserDraft::try_from(input(Some("A"), Some("a@x.com"))).expect("valid draft");
        assert!(draft.pending_tasks().is_empty());
    }

    #[rstest]
    fn duplicate_pending_tasks_keep_first_occurrence() {
        let mut raw = input(Some("A"), Some("a@x.com"));
        raw.pending_tasks = Some(vec!["t2".into(), "t1".into(), "t2".into()]);
        let draft = UserDraft::try_from(raw).expect("valid draft");
        let ids: Vec<&str> = draft.pending_tasks().iter().map(TaskId::as_str).collect();
        assert_eq!(ids, ["t2", "t1"]);
    }

    #[rstest]
    fn blank_pending_task_reports_its_index() {
        let mut raw = input(Some("A"), Some("a@x.com"));
        raw.pending_tasks = Some(vec!["t1".into(), String::new()]);
        assert_eq!(
            UserDraft::try_from(raw),
            Err(UserValidationError::InvalidPendingTask { index: 1 })
        );
    }

    #[rstest]
    fn stored_users_default_missing_pending_tasks() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "name": "A",
            "email": "a@x.com",
            "dateCreated": "2025-01-01T00:00:00.000Z"
        }))
        .expect("user decodes");
        assert!(user.pending_tasks().is_empty());
    }
}
