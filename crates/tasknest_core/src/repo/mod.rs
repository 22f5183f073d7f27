//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define owner-scoped data access contracts for todos and categories.
//! - Maintain the todo <-> category association index.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every read and write is scoped by `owner_id`; a row owned by another
//!   user is reported exactly like a missing row (`NotFound`).
//! - Cascading deletes run inside one IMMEDIATE transaction: associations
//!   first, then the parent row.
//! - Repositories only bind to connections migrated to the latest schema.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::category::CategoryId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod association_index;
pub mod category_repo;
pub mod todo_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by todo, category and association storage.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Row is absent or owned by someone else.
    NotFound(Uuid),
    /// A referenced category is absent or owned by someone else.
    ForeignCategory(CategoryId),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::ForeignCategory(id) => write!(f, "category not available to owner: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

const REQUIRED_TABLES: [&str; 3] = ["todos", "categories", "todo_categories"];

/// Verifies the connection is migrated and carries every store table.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns a creation timestamp strictly greater than any already stored in
/// `table`, so creation order survives millisecond collisions.
///
/// Must run inside the same write transaction as the insert it stamps.
pub(crate) fn next_created_at(conn: &Connection, table: &'static str) -> RepoResult<i64> {
    let latest: Option<i64> = conn.query_row(
        &format!("SELECT MAX(created_at) FROM {table};"),
        [],
        |row| row.get(0),
    )?;
    let now = now_epoch_ms();
    Ok(match latest {
        Some(latest) if latest >= now => latest + 1,
        _ => now,
    })
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
