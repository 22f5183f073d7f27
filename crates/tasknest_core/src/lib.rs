//! Core data-access and query layer for a multi-tenant todo tracker.
//! This crate is the single source of truth for ownership, referential
//! integrity and listing order.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::TodoApp;
pub use auth::{resolve_caller, AuthError, IdentityProvider, StaticIdentity};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::todo::{
    NewTodo, Priority, Todo, TodoFilter, TodoId, TodoPatch, TodoValidationError,
};
pub use model::user::UserId;
pub use repo::association_index::{AssociationIndex, SqliteAssociationIndex};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::CategoryService;
pub use service::error::{ServiceError, ServiceResult};
pub use service::query_service::{canonical_order, sort_canonical, QueryService};
pub use service::stats_service::{compute_stats, StatsService, TodoStats};
pub use service::todo_service::TodoService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
