//! Category use-case service.
//!
//! # Responsibility
//! - Create, list and delete categories for one caller.
//!
//! # Invariants
//! - Category names are stored trimmed and must not be blank.
//! - Names are not unique; two categories may share a name.

use crate::model::category::{Category, CategoryId};
use crate::model::todo::TodoId;
use crate::model::user::UserId;
use crate::repo::category_repo::CategoryRepository;
use crate::service::error::{ServiceError, ServiceResult};

pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_category(
        &self,
        caller: &UserId,
        name: &str,
        color: &str,
    ) -> ServiceResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "category name must not be blank".to_string(),
            ));
        }
        Ok(self.repo.create_category(caller, name, color)?)
    }

    /// Loads one category owned by `caller`.
    pub fn get_category(&self, caller: &UserId, id: CategoryId) -> ServiceResult<Category> {
        self.repo
            .get_category(caller, id)?
            .ok_or(ServiceError::NotFoundOrForbidden)
    }

    /// Deletes one category and every link to it. Returns the links removed.
    pub fn delete_category(&self, caller: &UserId, id: CategoryId) -> ServiceResult<usize> {
        Ok(self.repo.delete_category(caller, id)?)
    }

    pub fn list_categories(&self, caller: &UserId) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.list_categories(caller)?)
    }

    /// Lists categories linked to a todo. The caller must own the todo; the
    /// check is done by the caller of this method.
    pub fn categories_for_todo(
        &self,
        caller: &UserId,
        todo_id: TodoId,
    ) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.list_categories_for_todo(caller, todo_id)?)
    }
}
