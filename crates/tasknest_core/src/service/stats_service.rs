//! Todo statistics.
//!
//! # Invariants
//! - `active == total - completed`.
//! - `high_priority` counts open high-priority todos only, so it never
//!   exceeds `active`.

use crate::model::todo::{Priority, Todo};
use crate::model::user::UserId;
use crate::repo::todo_repo::TodoRepository;
use crate::service::error::ServiceResult;
use serde::{Deserialize, Serialize};

/// Aggregate counts over one user's todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Open todos with `Priority::High`.
    pub high_priority: usize,
}

/// Computes stats from a full scan of one user's todos.
pub fn compute_stats(todos: &[Todo]) -> TodoStats {
    let total = todos.len();
    let completed = todos.iter().filter(|todo| todo.completed).count();
    let high_priority = todos
        .iter()
        .filter(|todo| todo.priority == Priority::High && !todo.completed)
        .count();

    TodoStats {
        total,
        completed,
        active: total - completed,
        high_priority,
    }
}

pub struct StatsService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> StatsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Recomputes stats for `caller` on every call.
    pub fn get_stats(&self, caller: &UserId) -> ServiceResult<TodoStats> {
        let todos = self.repo.list_todos(caller, None)?;
        Ok(compute_stats(&todos))
    }
}
