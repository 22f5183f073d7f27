//! Todo <-> category association index.
//!
//! # Responsibility
//! - Store the many-to-many link between todos and categories.
//! - Serve lookups from either side (`idx_todo_categories_todo`,
//!   `idx_todo_categories_category`).
//!
//! # Invariants
//! - A `(todo_id, category_id)` pair is stored at most once.
//! - The index has no lifecycle of its own: rows are written when a todo is
//!   created and removed by the todo/category cascades.
//! - Callers own transaction boundaries; pass a `Transaction` (it derefs to
//!   `Connection`) when a write must be atomic with other statements.

use crate::model::category::CategoryId;
use crate::model::todo::TodoId;
use crate::model::user::UserId;
use crate::repo::{parse_uuid, RepoResult};
use rusqlite::{params, Connection};
use std::collections::HashSet;

/// Access paths over the todo <-> category relation.
pub trait AssociationIndex {
    /// Links one todo to one category. Returns `false` when the link exists.
    fn insert(&self, todo_id: TodoId, category_id: CategoryId, owner_id: &UserId)
        -> RepoResult<bool>;
    /// Removes every link naming `todo_id` and returns how many were removed.
    fn delete_by_todo(&self, todo_id: TodoId) -> RepoResult<usize>;
    /// Removes every link naming `category_id` and returns how many were removed.
    fn delete_by_category(&self, category_id: CategoryId) -> RepoResult<usize>;
    /// Categories linked to one todo.
    fn category_ids_for_todo(&self, todo_id: TodoId) -> RepoResult<HashSet<CategoryId>>;
    /// Todos linked to one category.
    fn todo_ids_for_category(&self, category_id: CategoryId) -> RepoResult<HashSet<TodoId>>;
}

/// SQLite-backed association index over `todo_categories`.
pub struct SqliteAssociationIndex<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssociationIndex<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AssociationIndex for SqliteAssociationIndex<'_> {
    fn insert(
        &self,
        todo_id: TodoId,
        category_id: CategoryId,
        owner_id: &UserId,
    ) -> RepoResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO todo_categories (todo_id, category_id, owner_id)
             VALUES (?1, ?2, ?3);",
            params![
                todo_id.to_string(),
                category_id.to_string(),
                owner_id.as_str()
            ],
        )?;
        Ok(inserted == 1)
    }

    fn delete_by_todo(&self, todo_id: TodoId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM todo_categories WHERE todo_id = ?1;",
            [todo_id.to_string()],
        )?;
        Ok(removed)
    }

    fn delete_by_category(&self, category_id: CategoryId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM todo_categories WHERE category_id = ?1;",
            [category_id.to_string()],
        )?;
        Ok(removed)
    }

    fn category_ids_for_todo(&self, todo_id: TodoId) -> RepoResult<HashSet<CategoryId>> {
        collect_ids(
            self.conn,
            "SELECT category_id FROM todo_categories WHERE todo_id = ?1;",
            todo_id,
            "todo_categories.category_id",
        )
    }

    fn todo_ids_for_category(&self, category_id: CategoryId) -> RepoResult<HashSet<TodoId>> {
        collect_ids(
            self.conn,
            "SELECT todo_id FROM todo_categories WHERE category_id = ?1;",
            category_id,
            "todo_categories.todo_id",
        )
    }
}

fn collect_ids(
    conn: &Connection,
    sql: &str,
    key: uuid::Uuid,
    column: &str,
) -> RepoResult<HashSet<uuid::Uuid>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key.to_string()])?;
    let mut ids = HashSet::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.insert(parse_uuid(&value, column)?);
    }
    Ok(ids)
}
