//! Task documents and the validated input used to create or replace them.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{TaskId, UserId, timestamp};

/// Display name stored on tasks without an assignee.
pub const UNASSIGNED_NAME: &str = "unassigned";

/// Validation errors raised while turning request fields into a [`TaskDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    /// `name` or `deadline` is absent or blank.
    #[error("Task name and deadline are required in the request body")]
    MissingNameOrDeadline,
    /// `deadline` is present but not a recognised date/time.
    #[error("deadline must be an RFC 3339 timestamp, a YYYY-MM-DD date or epoch milliseconds")]
    InvalidDeadline,
    /// `assignedUser` is not a usable identifier.
    #[error("assignedUser must be a user identifier or an empty string")]
    InvalidAssignee,
}

/// Stored task.
///
/// ## Invariants
/// - `assigned_user` of `None` is stored as the empty-string sentinel.
/// - `date_created` is fixed when the task is first inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    id: TaskId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(with = "timestamp")]
    deadline: DateTime<Utc>,
    #[serde(default)]
    completed: bool,
    #[serde(default, with = "assignee")]
    assigned_user: Option<UserId>,
    #[serde(default = "unassigned_name")]
    assigned_user_name: String,
    #[serde(with = "timestamp")]
    date_created: DateTime<Utc>,
}

fn unassigned_name() -> String {
    UNASSIGNED_NAME.to_owned()
}

impl Task {
    /// Store-assigned identifier.
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Task name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Due date.
    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Completion flag.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Assigned user, if any.
    pub fn assigned_user(&self) -> Option<&UserId> {
        self.assigned_user.as_ref()
    }

    /// Denormalised assignee display name.
    pub fn assigned_user_name(&self) -> &str {
        self.assigned_user_name.as_str()
    }

    /// Creation timestamp.
    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }
}

/// Task fields as supplied by a client on create or replace.
///
/// Every field is optional here so that absence can be reported as a
/// validation failure rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Task name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Deadline in any accepted form.
    pub deadline: Option<Value>,
    /// Completion flag.
    pub completed: Option<bool>,
    /// Assignee identifier; `""` means unassigned.
    pub assigned_user: Option<String>,
    /// Assignee display name.
    pub assigned_user_name: Option<String>,
}

/// Validated editable task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    name: String,
    description: String,
    deadline: DateTime<Utc>,
    completed: bool,
    assigned_user: Option<UserId>,
    assigned_user_name: String,
}

/// Shape of a task before the store assigns an identifier.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewTask<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(with = "timestamp")]
    deadline: DateTime<Utc>,
    completed: bool,
    #[serde(with = "assignee")]
    assigned_user: Option<UserId>,
    assigned_user_name: &'a str,
    #[serde(with = "timestamp")]
    date_created: DateTime<Utc>,
}

impl TaskDraft {
    /// Draft with defaults for everything except the required fields.
    pub fn new(name: impl Into<String>, deadline: DateTime<Utc>) -> Result<Self, TaskValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaskValidationError::MissingNameOrDeadline);
        }
        Ok(Self {
            name,
            description: String::new(),
            deadline,
            completed: false,
            assigned_user: None,
            assigned_user_name: unassigned_name(),
        })
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the completion flag.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Assign the task, recording the display name alongside the identifier.
    #[must_use]
    pub fn assigned_to(mut self, user: Option<UserId>, user_name: impl Into<String>) -> Self {
        self.assigned_user = user;
        self.assigned_user_name = user_name.into();
        self
    }

    /// Task name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Assignee requested by the draft.
    pub fn assigned_user(&self) -> Option<&UserId> {
        self.assigned_user.as_ref()
    }

    /// Serialisable form for insertion, stamped with `date_created`.
    pub(crate) fn as_new_document(&self, date_created: DateTime<Utc>) -> impl Serialize + '_ {
        NewTask {
            name: &self.name,
            description: &self.description,
            deadline: self.deadline,
            completed: self.completed,
            assigned_user: self.assigned_user.clone(),
            assigned_user_name: &self.assigned_user_name,
            date_created,
        }
    }

    /// Replace the editable fields of `existing`, keeping its identity and
    /// creation time.
    pub fn apply_to(self, existing: &Task) -> Task {
        Task {
            id: existing.id.clone(),
            name: self.name,
            description: self.description,
            deadline: self.deadline,
            completed: self.completed,
            assigned_user: self.assigned_user,
            assigned_user_name: self.assigned_user_name,
            date_created: existing.date_created,
        }
    }
}

impl TryFrom<TaskInput> for TaskDraft {
    type Error = TaskValidationError;

    fn try_from(input: TaskInput) -> Result<Self, Self::Error> {
        let deadline = match input.deadline.as_ref().map(parse_deadline).transpose()? {
            Some(Some(deadline)) => deadline,
            _ => return Err(TaskValidationError::MissingNameOrDeadline),
        };
        let name = input
            .name
            .ok_or(TaskValidationError::MissingNameOrDeadline)?;
        let assigned_user = match input.assigned_user.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(UserId::new(raw).map_err(|_| TaskValidationError::InvalidAssignee)?),
        };
        let assigned_user_name = input.assigned_user_name.unwrap_or_else(unassigned_name);

        Ok(Self::new(name, deadline)?
            .with_description(input.description.unwrap_or_default())
            .with_completed(input.completed.unwrap_or(false))
            .assigned_to(assigned_user, assigned_user_name))
    }
}

/// Interpret a deadline value.
///
/// Returns `Ok(None)` for `null` or a blank string, which callers treat as
/// absent. Strings may be RFC 3339 timestamps or `YYYY-MM-DD` dates (midnight
/// UTC); integers are milliseconds since the Unix epoch.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use taskboard::domain::parse_deadline;
///
/// let deadline = parse_deadline(&json!("2025-01-01")).expect("valid").expect("present");
/// assert_eq!(deadline.to_rfc3339(), "2025-01-01T00:00:00+00:00");
/// ```
pub fn parse_deadline(value: &Value) -> Result<Option<DateTime<Utc>>, TaskValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) if raw.trim().is_empty() => Ok(None),
        Value::String(raw) => parse_deadline_text(raw.trim()).map(Some),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(Some)
            .ok_or(TaskValidationError::InvalidDeadline),
        _ => Err(TaskValidationError::InvalidDeadline),
    }
}

fn parse_deadline_text(raw: &str) -> Result<DateTime<Utc>, TaskValidationError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or(TaskValidationError::InvalidDeadline)
}

/// Serde adapter mapping `Option<UserId>` to the empty-string sentinel.
mod assignee {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::UserId;

    pub fn serialize<S>(value: &Option<UserId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_ref().map_or("", UserId::as_str))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => UserId::new(raw).map(Some).map_err(D::Error::custom),
        }
    }
}
