//! Todo use-case service.
//!
//! # Responsibility
//! - Validate todo input before it reaches storage.
//! - Apply owner-checked create/update/toggle/delete flows.
//!
//! # Invariants
//! - Blank titles are rejected before any write.
//! - Category ids are deduplicated in first-seen order before linking.
//! - `update_todo` overwrites exactly the fields present in the patch.

use crate::model::category::CategoryId;
use crate::model::todo::{validate_title, NewTodo, Todo, TodoId, TodoPatch};
use crate::model::user::UserId;
use crate::repo::todo_repo::TodoRepository;
use crate::service::error::{ServiceError, ServiceResult};
use std::collections::HashSet;

/// Todo service facade over repository implementations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one todo for `caller` and links the requested categories.
    ///
    /// # Errors
    /// - `InvalidArgument` for a blank title or a category the caller does
    ///   not own. Nothing is persisted in either case.
    pub fn create_todo(&self, caller: &UserId, mut request: NewTodo) -> ServiceResult<Todo> {
        validate_title(&request.title)?;
        request.category_ids = dedup_in_order(request.category_ids);
        Ok(self.repo.create_todo(caller, &request)?)
    }

    /// Loads one todo owned by `caller`.
    pub fn get_todo(&self, caller: &UserId, id: TodoId) -> ServiceResult<Todo> {
        self.repo
            .get_todo(caller, id)?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    /// Applies a partial update and returns the stored record.
    ///
    /// Only fields present in `patch` are written. An empty patch is an
    /// owner-checked read.
    pub fn update_todo(
        &self,
        caller: &UserId,
        id: TodoId,
        patch: &TodoPatch,
    ) -> ServiceResult<Todo> {
        if patch.is_empty() {
            return self.get_todo(caller, id);
        }

        patch.validate()?;
        Ok(self.repo.update_todo(caller, id, patch)?)
    }

    /// Flips completion and returns the new `completed` value.
    pub fn toggle_todo(&self, caller: &UserId, id: TodoId) -> ServiceResult<bool> {
        Ok(self.repo.toggle_completed(caller, id)?)
    }

    /// Deletes one todo together with its category links.
    ///
    /// Returns the number of links removed.
    pub fn delete_todo(&self, caller: &UserId, id: TodoId) -> ServiceResult<usize> {
        Ok(self.repo.delete_todo(caller, id)?)
    }

    /// Lists every todo owned by `caller`, unordered.
    pub fn list_todos(&self, caller: &UserId) -> ServiceResult<Vec<Todo>> {
        Ok(self.repo.list_todos(caller, None)?)
    }
}

fn dedup_in_order(ids: Vec<CategoryId>) -> Vec<CategoryId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::dedup_in_order;
    use uuid::Uuid;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert_eq!(dedup_in_order(vec![b, a, b, c, a]), vec![b, a, c]);
    }
}
