//! Operation set consumed by the presentation layer.
//!
//! # Responsibility
//! - Resolve the caller for every call, then dispatch to the services.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - An unauthenticated call returns before any repository is constructed.
//! - Calls are stateless: filters and selections arrive as arguments.

use crate::auth::{resolve_caller, IdentityProvider};
use crate::config::CoreConfig;
use crate::db::open_db;
use crate::logging::init_logging;
use crate::model::category::{Category, CategoryId};
use crate::model::todo::{NewTodo, Todo, TodoFilter, TodoId, TodoPatch};
use crate::model::user::UserId;
use crate::repo::association_index::SqliteAssociationIndex;
use crate::repo::category_repo::SqliteCategoryRepository;
use crate::repo::todo_repo::SqliteTodoRepository;
use crate::service::category_service::CategoryService;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::query_service::QueryService;
use crate::service::stats_service::{StatsService, TodoStats};
use crate::service::todo_service::TodoService;
use log::{debug, info, warn};
use rusqlite::Connection;

/// Task-tracking backend bound to one database connection and one
/// identity provider.
pub struct TodoApp<P: IdentityProvider> {
    conn: Connection,
    identity: P,
}

impl<P: IdentityProvider> TodoApp<P> {
    /// Wraps an already-migrated connection (see `db::open_db`).
    pub fn new(conn: Connection, identity: P) -> Self {
        Self { conn, identity }
    }

    /// Opens the configured database and starts logging when a log
    /// directory is configured.
    pub fn open(config: &CoreConfig, identity: P) -> ServiceResult<Self> {
        if let Some(log_dir) = config.log_dir.as_ref() {
            init_logging(&config.log_level, log_dir)?;
        }

        let conn = open_db(&config.db_path)
            .map_err(|err| ServiceError::Repo(err.into()))?;
        Ok(Self::new(conn, identity))
    }

    /// Gives the connection back, e.g. for host-side maintenance.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    pub fn create_todo(&self, request: NewTodo) -> ServiceResult<TodoId> {
        let link_count = request.category_ids.len();
        let result = self
            .caller()
            .and_then(|caller| self.todos()?.create_todo(&caller, request))
            .map(|todo| todo.id);
        match &result {
            Ok(id) => info!(
                "event=todo_create module=api status=ok todo_id={id} requested_links={link_count}"
            ),
            Err(err) => log_failure("todo_create", err),
        }
        result
    }

    pub fn get_todo(&self, id: TodoId) -> ServiceResult<Todo> {
        let result = self
            .caller()
            .and_then(|caller| self.todos()?.get_todo(&caller, id));
        if let Err(err) = &result {
            log_failure("todo_get", err);
        }
        result
    }

    pub fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> ServiceResult<()> {
        let result = self
            .caller()
            .and_then(|caller| self.todos()?.update_todo(&caller, id, patch))
            .map(|_| ());
        match &result {
            Ok(()) => info!("event=todo_update module=api status=ok todo_id={id}"),
            Err(err) => log_failure("todo_update", err),
        }
        result
    }

    /// Flips completion and returns the new `completed` value.
    pub fn toggle_todo(&self, id: TodoId) -> ServiceResult<bool> {
        let result = self
            .caller()
            .and_then(|caller| self.todos()?.toggle_todo(&caller, id));
        match &result {
            Ok(completed) => {
                info!("event=todo_toggle module=api status=ok todo_id={id} completed={completed}")
            }
            Err(err) => log_failure("todo_toggle", err),
        }
        result
    }

    pub fn delete_todo(&self, id: TodoId) -> ServiceResult<()> {
        let result = self
            .caller()
            .and_then(|caller| self.todos()?.delete_todo(&caller, id));
        match &result {
            Ok(removed_links) => info!(
                "event=todo_delete module=api status=ok todo_id={id} removed_links={removed_links}"
            ),
            Err(err) => log_failure("todo_delete", err),
        }
        result.map(|_| ())
    }

    /// Lists the caller's todos in canonical order.
    pub fn list_todos(
        &self,
        filter: TodoFilter,
        category_id: Option<CategoryId>,
    ) -> ServiceResult<Vec<Todo>> {
        let result = self.caller().and_then(|caller| {
            let query = QueryService::new(
                SqliteTodoRepository::try_new(&self.conn)?,
                SqliteCategoryRepository::try_new(&self.conn)?,
                SqliteAssociationIndex::new(&self.conn),
            );
            query.get_todos(&caller, filter, category_id)
        });
        match &result {
            Ok(todos) => debug!(
                "event=todo_list module=api status=ok filter={filter:?} by_category={} count={}",
                category_id.is_some(),
                todos.len()
            ),
            Err(err) => log_failure("todo_list", err),
        }
        result
    }

    pub fn get_stats(&self) -> ServiceResult<TodoStats> {
        let result = self.caller().and_then(|caller| {
            StatsService::new(SqliteTodoRepository::try_new(&self.conn)?).get_stats(&caller)
        });
        if let Err(err) = &result {
            log_failure("todo_stats", err);
        }
        result
    }

    /// Categories linked to one of the caller's todos.
    pub fn todo_categories(&self, todo_id: TodoId) -> ServiceResult<Vec<Category>> {
        let result = self.caller().and_then(|caller| {
            self.todos()?.get_todo(&caller, todo_id)?;
            self.categories()?.categories_for_todo(&caller, todo_id)
        });
        if let Err(err) = &result {
            log_failure("todo_categories", err);
        }
        result
    }

    pub fn create_category(&self, name: &str, color: &str) -> ServiceResult<CategoryId> {
        let result = self
            .caller()
            .and_then(|caller| self.categories()?.create_category(&caller, name, color))
            .map(|category| category.id);
        match &result {
            Ok(id) => info!("event=category_create module=api status=ok category_id={id}"),
            Err(err) => log_failure("category_create", err),
        }
        result
    }

    pub fn delete_category(&self, id: CategoryId) -> ServiceResult<()> {
        let result = self
            .caller()
            .and_then(|caller| self.categories()?.delete_category(&caller, id));
        match &result {
            Ok(removed_links) => info!(
                "event=category_delete module=api status=ok category_id={id} removed_links={removed_links}"
            ),
            Err(err) => log_failure("category_delete", err),
        }
        result.map(|_| ())
    }

    pub fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        let result = self
            .caller()
            .and_then(|caller| self.categories()?.list_categories(&caller));
        if let Err(err) = &result {
            log_failure("category_list", err);
        }
        result
    }

    fn caller(&self) -> ServiceResult<UserId> {
        Ok(resolve_caller(&self.identity)?)
    }

    fn todos(&self) -> ServiceResult<TodoService<SqliteTodoRepository<'_>>> {
        Ok(TodoService::new(SqliteTodoRepository::try_new(&self.conn)?))
    }

    fn categories(&self) -> ServiceResult<CategoryService<SqliteCategoryRepository<'_>>> {
        Ok(CategoryService::new(SqliteCategoryRepository::try_new(
            &self.conn,
        )?))
    }
}

fn log_failure(event: &str, err: &ServiceError) {
    match err {
        ServiceError::Repo(source) => warn!(
            "event={event} module=api status=error error_code={} error={source}",
            err.code()
        ),
        _ => debug!(
            "event={event} module=api status=rejected error_code={}",
            err.code()
        ),
    }
}
