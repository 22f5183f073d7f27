//! Todo query engine.
//!
//! # Responsibility
//! - Compose the status filter, the category filter and the canonical sort
//!   order into one read.
//!
//! # Invariants
//! - Results are recomputed on every call; nothing is cached.
//! - Canonical order: priority descending, then `created_at` descending,
//!   then `id` ascending. The order is total, so equal-looking rows still
//!   come back in the same order every time.
//! - A category filter only admits todos linked to that category.

use crate::model::category::CategoryId;
use crate::model::todo::{Todo, TodoFilter};
use crate::model::user::UserId;
use crate::repo::association_index::AssociationIndex;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::todo_repo::TodoRepository;
use crate::service::error::{ServiceError, ServiceResult};
use std::cmp::Ordering;

/// Read-side service joining todos, categories and their links.
pub struct QueryService<T, C, A>
where
    T: TodoRepository,
    C: CategoryRepository,
    A: AssociationIndex,
{
    todos: T,
    categories: C,
    links: A,
}

impl<T, C, A> QueryService<T, C, A>
where
    T: TodoRepository,
    C: CategoryRepository,
    A: AssociationIndex,
{
    pub fn new(todos: T, categories: C, links: A) -> Self {
        Self {
            todos,
            categories,
            links,
        }
    }

    /// Returns the caller's todos matching `filter` and, when given,
    /// linked to `category_id`, in canonical order.
    ///
    /// # Errors
    /// - `NotFoundOrForbidden` when `category_id` does not name one of the
    ///   caller's categories (including one that was deleted).
    pub fn get_todos(
        &self,
        caller: &UserId,
        filter: TodoFilter,
        category_id: Option<CategoryId>,
    ) -> ServiceResult<Vec<Todo>> {
        let mut todos = self.todos.list_todos(caller, filter.completed_key())?;

        if let Some(category_id) = category_id {
            if self.categories.get_category(caller, category_id)?.is_none() {
                return Err(ServiceError::NotFoundOrForbidden);
            }
            let members = self.links.todo_ids_for_category(category_id)?;
            todos.retain(|todo| members.contains(&todo.id));
        }

        sort_canonical(&mut todos);
        Ok(todos)
    }
}

/// Compares two todos by the canonical listing order.
pub fn canonical_order(left: &Todo, right: &Todo) -> Ordering {
    right
        .priority
        .cmp(&left.priority)
        .then_with(|| right.created_at.cmp(&left.created_at))
        .then_with(|| left.id.cmp(&right.id))
}

/// Sorts todos in place by `canonical_order`.
pub fn sort_canonical(todos: &mut [Todo]) {
    todos.sort_by(canonical_order);
}
