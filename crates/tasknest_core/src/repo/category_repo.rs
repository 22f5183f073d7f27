//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist owner-scoped categories.
//! - Cascade category deletion into the association index.
//!
//! # Invariants
//! - Category rows are never updated after insert.
//! - `delete_category` removes links and the category in one IMMEDIATE
//!   transaction; a failure leaves both untouched.

use crate::model::category::{Category, CategoryId};
use crate::model::todo::TodoId;
use crate::model::user::UserId;
use crate::repo::association_index::{AssociationIndex, SqliteAssociationIndex};
use crate::repo::{ensure_connection_ready, next_created_at, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

/// Repository interface for category persistence.
pub trait CategoryRepository {
    /// Inserts one category owned by `owner_id`.
    fn create_category(&self, owner_id: &UserId, name: &str, color: &str)
        -> RepoResult<Category>;
    /// Loads one category visible to `owner_id`.
    fn get_category(&self, owner_id: &UserId, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Lists the owner's categories.
    fn list_categories(&self, owner_id: &UserId) -> RepoResult<Vec<Category>>;
    /// Lists the owner's categories linked to one todo.
    fn list_categories_for_todo(
        &self,
        owner_id: &UserId,
        todo_id: TodoId,
    ) -> RepoResult<Vec<Category>>;
    /// Deletes the category after its links. Returns the number of links removed.
    fn delete_category(&self, owner_id: &UserId, id: CategoryId) -> RepoResult<usize>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(
        &self,
        owner_id: &UserId,
        name: &str,
        color: &str,
    ) -> RepoResult<Category> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let category = Category::new(
            owner_id.clone(),
            name,
            color,
            next_created_at(&tx, "categories")?,
        );

        tx.execute(
            "INSERT INTO categories (id, owner_id, name, color, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                category.id.to_string(),
                category.owner_id.as_str(),
                category.name.as_str(),
                category.color.as_str(),
                category.created_at,
            ],
        )?;

        tx.commit()?;
        Ok(category)
    }

    fn get_category(&self, owner_id: &UserId, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, name, color, created_at
             FROM categories
             WHERE id = ?1
               AND owner_id = ?2;",
        )?;
        let mut rows = stmt.query(params![id.to_string(), owner_id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_categories(&self, owner_id: &UserId) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, name, color, created_at
             FROM categories
             WHERE owner_id = ?1
             ORDER BY created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([owner_id.as_str()])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn list_categories_for_todo(
        &self,
        owner_id: &UserId,
        todo_id: TodoId,
    ) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.owner_id, c.name, c.color, c.created_at
             FROM todo_categories tc
             INNER JOIN categories c ON c.id = tc.category_id
             WHERE tc.todo_id = ?1
               AND c.owner_id = ?2
             ORDER BY c.created_at ASC, c.id ASC;",
        )?;
        let mut rows = stmt.query(params![todo_id.to_string(), owner_id.as_str()])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn delete_category(&self, owner_id: &UserId, id: CategoryId) -> RepoResult<usize> {
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let exists: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM categories
                WHERE id = ?1
                  AND owner_id = ?2
            );",
            params![id_text.as_str(), owner_id.as_str()],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::NotFound(id));
        }

        let removed_links = SqliteAssociationIndex::new(&tx).delete_by_category(id)?;
        tx.execute(
            "DELETE FROM categories WHERE id = ?1 AND owner_id = ?2;",
            params![id_text.as_str(), owner_id.as_str()],
        )?;

        tx.commit()?;
        Ok(removed_links)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get(0)?;
    let owner_text: String = row.get(1)?;
    let owner_id = UserId::parse(owner_text.as_str()).ok_or_else(|| {
        RepoError::InvalidData(format!("blank owner_id for category `{id_text}`"))
    })?;

    Ok(Category {
        id: parse_uuid(&id_text, "categories.id")?,
        owner_id,
        name: row.get(2)?,
        color: row.get(3)?,
        created_at: row.get(4)?,
    })
}
