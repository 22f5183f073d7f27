//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its create/update request shapes.
//! - Own title validation shared by create and update paths.
//!
//! # Invariants
//! - `title` is never blank after trimming.
//! - `id`, `owner_id` and `created_at` never change after creation.
//! - `Priority` has the total order `Low < Medium < High`.

use crate::model::category::CategoryId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable todo identifier.
pub type TodoId = Uuid;

/// Todo urgency. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Stable lowercase name used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Completion-status filter for todo listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    All,
    /// Only `completed == false`.
    Active,
    /// Only `completed == true`.
    Completed,
}

impl TodoFilter {
    /// Maps the filter onto the `(owner, completed)` index key.
    pub fn completed_key(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(false),
            Self::Completed => Some(true),
        }
    }
}

/// Validation failures for todo fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyTitle,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "todo title must not be blank"),
        }
    }
}

impl Error for TodoValidationError {}

/// Rejects titles that are empty after trimming surrounding whitespace.
pub fn validate_title(title: &str) -> Result<(), TodoValidationError> {
    if title.trim().is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }
    Ok(())
}

/// Canonical todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    /// Epoch milliseconds.
    pub due_date: Option<i64>,
    /// Epoch milliseconds, strictly increasing per database.
    pub created_at: i64,
}

impl Todo {
    /// Checks record-level invariants before a write or after a read.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_title(&self.title)
    }
}

/// Create request for one todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<i64>,
    /// Categories to link, in request order. Duplicates are collapsed.
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority,
            due_date: None,
            category_ids: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_categories(mut self, category_ids: impl IntoIterator<Item = CategoryId>) -> Self {
        self.category_ids = category_ids.into_iter().collect();
        self
    }
}

/// Partial update for one todo.
///
/// `None` leaves a field untouched. For optional fields, `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<i64>>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Rejects a present title that is blank. Absent fields are not checked.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        match self.title.as_deref() {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_title, Priority, Todo, TodoFilter, TodoPatch, TodoValidationError};
    use crate::model::user::UserId;
    use uuid::Uuid;

    fn sample_todo() -> Todo {
        Todo {
            id: Uuid::new_v4(),
            owner_id: UserId::parse("owner").expect("owner id"),
            title: "write report".to_string(),
            description: Some("quarterly".to_string()),
            completed: false,
            priority: Priority::Medium,
            due_date: Some(1_700_000_000_000),
            created_at: 1,
        }
    }

    #[test]
    fn priority_order_is_low_medium_high() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn priority_parse_matches_storage_names() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(Priority::parse("HIGH"), None);
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn filter_maps_to_completed_key() {
        assert_eq!(TodoFilter::All.completed_key(), None);
        assert_eq!(TodoFilter::Active.completed_key(), Some(false));
        assert_eq!(TodoFilter::Completed.completed_key(), Some(true));
        assert_eq!(TodoFilter::default(), TodoFilter::All);
    }

    #[test]
    fn validate_title_rejects_whitespace_only() {
        assert_eq!(validate_title("  \n"), Err(TodoValidationError::EmptyTitle));
        assert!(validate_title(" ok ").is_ok());
    }

    #[test]
    fn empty_patch_is_valid() {
        let patch = TodoPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.validate(), Ok(()));
    }

    #[test]
    fn patch_without_title_skips_title_check() {
        let patch = TodoPatch {
            description: Some(None),
            due_date: Some(None),
            ..TodoPatch::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(patch.validate(), Ok(()));
    }

    #[test]
    fn patch_with_blank_title_is_rejected() {
        let patch = TodoPatch {
            title: Some("   ".to_string()),
            priority: Some(Priority::High),
            ..TodoPatch::default()
        };
        assert_eq!(patch.validate(), Err(TodoValidationError::EmptyTitle));
    }

    #[test]
    fn record_validation_uses_title_rule() {
        let mut todo = sample_todo();
        assert_eq!(todo.validate(), Ok(()));
        todo.title = " ".to_string();
        assert_eq!(todo.validate(), Err(TodoValidationError::EmptyTitle));
    }
}
