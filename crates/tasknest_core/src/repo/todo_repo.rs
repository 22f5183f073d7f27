//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist owner-scoped todo records.
//! - Write initial category links on create and remove them on delete.
//!
//! # Invariants
//! - Write paths call `Todo::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `create_todo`, `update_todo` and `delete_todo` are single IMMEDIATE
//!   transactions.
//! - `update_todo` writes only the columns named by the patch.

use crate::model::category::CategoryId;
use crate::model::todo::{NewTodo, Priority, Todo, TodoId, TodoPatch};
use crate::model::user::UserId;
use crate::repo::association_index::{AssociationIndex, SqliteAssociationIndex};
use crate::repo::{
    bool_to_int, ensure_connection_ready, int_to_bool, next_created_at, parse_uuid, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    title,
    description,
    completed,
    priority,
    due_date,
    created_at
FROM todos";

/// Repository interface for todo persistence.
pub trait TodoRepository {
    /// Inserts a todo plus its category links and returns the stored record.
    ///
    /// Fails with `ForeignCategory` when a linked category is not owned by
    /// `owner_id`; nothing is written in that case.
    fn create_todo(&self, owner_id: &UserId, request: &NewTodo) -> RepoResult<Todo>;
    /// Loads one todo visible to `owner_id`.
    fn get_todo(&self, owner_id: &UserId, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Writes the fields present in `patch` and returns the stored record.
    ///
    /// Columns the patch leaves out are not part of the `UPDATE`, so a
    /// concurrent write to them survives.
    fn update_todo(&self, owner_id: &UserId, id: TodoId, patch: &TodoPatch) -> RepoResult<Todo>;
    /// Flips `completed` and returns the new value.
    fn toggle_completed(&self, owner_id: &UserId, id: TodoId) -> RepoResult<bool>;
    /// Deletes the todo after its links. Returns the number of links removed.
    fn delete_todo(&self, owner_id: &UserId, id: TodoId) -> RepoResult<usize>;
    /// Lists the owner's todos, optionally restricted to one completion state.
    ///
    /// Result order is unspecified.
    fn list_todos(&self, owner_id: &UserId, completed: Option<bool>) -> RepoResult<Vec<Todo>>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, owner_id: &UserId, request: &NewTodo) -> RepoResult<Todo> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        for category_id in &request.category_ids {
            if !category_owned_in_tx(&tx, owner_id, *category_id)? {
                return Err(RepoError::ForeignCategory(*category_id));
            }
        }

        let todo = Todo {
            id: Uuid::new_v4(),
            owner_id: owner_id.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            completed: false,
            priority: request.priority,
            due_date: request.due_date,
            created_at: next_created_at(&tx, "todos")?,
        };
        todo.validate()
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;

        tx.execute(
            "INSERT INTO todos (
                id,
                owner_id,
                title,
                description,
                completed,
                priority,
                due_date,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                todo.id.to_string(),
                todo.owner_id.as_str(),
                todo.title.as_str(),
                todo.description.as_deref(),
                bool_to_int(todo.completed),
                todo.priority.as_str(),
                todo.due_date,
                todo.created_at,
            ],
        )?;

        let links = SqliteAssociationIndex::new(&tx);
        for category_id in &request.category_ids {
            links.insert(todo.id, *category_id, owner_id)?;
        }

        tx.commit()?;
        Ok(todo)
    }

    fn get_todo(&self, owner_id: &UserId, id: TodoId) -> RepoResult<Option<Todo>> {
        load_todo(self.conn, owner_id, id)
    }

    fn update_todo(&self, owner_id: &UserId, id: TodoId, patch: &TodoPatch) -> RepoResult<Todo> {
        patch
            .validate()
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(title) = patch.title.as_ref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(description) = patch.description.as_ref() {
            assignments.push("description = ?");
            bind_values.push(description.clone().map_or(Value::Null, Value::Text));
        }
        if let Some(completed) = patch.completed {
            assignments.push("completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }
        if let Some(priority) = patch.priority {
            assignments.push("priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(due_date) = patch.due_date {
            assignments.push("due_date = ?");
            bind_values.push(due_date.map_or(Value::Null, Value::Integer));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !assignments.is_empty() {
            let sql = format!(
                "UPDATE todos SET {} WHERE id = ? AND owner_id = ?;",
                assignments.join(", ")
            );
            bind_values.push(Value::Text(id.to_string()));
            bind_values.push(Value::Text(owner_id.as_str().to_string()));

            if tx.execute(&sql, params_from_iter(bind_values))? == 0 {
                return Err(RepoError::NotFound(id));
            }
        }

        let todo = load_todo(&tx, owner_id, id)?.ok_or(RepoError::NotFound(id))?;
        tx.commit()?;
        Ok(todo)
    }

    fn toggle_completed(&self, owner_id: &UserId, id: TodoId) -> RepoResult<bool> {
        let completed: Option<i64> = self
            .conn
            .query_row(
                "UPDATE todos
                 SET completed = 1 - completed
                 WHERE id = ?1
                   AND owner_id = ?2
                 RETURNING completed;",
                params![id.to_string(), owner_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match completed {
            Some(value) => int_to_bool(value, "todos.completed"),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn delete_todo(&self, owner_id: &UserId, id: TodoId) -> RepoResult<usize> {
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !todo_owned_in_tx(&tx, owner_id, id_text.as_str())? {
            return Err(RepoError::NotFound(id));
        }

        let removed_links = SqliteAssociationIndex::new(&tx).delete_by_todo(id)?;
        tx.execute(
            "DELETE FROM todos WHERE id = ?1 AND owner_id = ?2;",
            params![id_text.as_str(), owner_id.as_str()],
        )?;

        tx.commit()?;
        Ok(removed_links)
    }

    fn list_todos(&self, owner_id: &UserId, completed: Option<bool>) -> RepoResult<Vec<Todo>> {
        let mut sql = format!("{TODO_SELECT_SQL} WHERE owner_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(owner_id.as_str().to_string())];

        if let Some(completed) = completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }
}

fn load_todo(conn: &Connection, owner_id: &UserId, id: TodoId) -> RepoResult<Option<Todo>> {
    let mut stmt = conn.prepare(&format!(
        "{TODO_SELECT_SQL}
         WHERE id = ?1
           AND owner_id = ?2;"
    ))?;

    let mut rows = stmt.query(params![id.to_string(), owner_id.as_str()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_todo_row(row)?));
    }

    Ok(None)
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "todos.id")?;

    let owner_text: String = row.get("owner_id")?;
    let owner_id = UserId::parse(owner_text.as_str()).ok_or_else(|| {
        RepoError::InvalidData(format!("blank owner_id for todo `{id_text}`"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in todos.priority"
        ))
    })?;

    let todo = Todo {
        id,
        owner_id,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: int_to_bool(row.get("completed")?, "todos.completed")?,
        priority,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
    };
    todo.validate()
        .map_err(|err| RepoError::InvalidData(format!("todo `{id_text}`: {err}")))?;
    Ok(todo)
}

fn todo_owned_in_tx(tx: &Transaction<'_>, owner_id: &UserId, id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM todos
            WHERE id = ?1
              AND owner_id = ?2
        );",
        params![id, owner_id.as_str()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn category_owned_in_tx(
    tx: &Transaction<'_>,
    owner_id: &UserId,
    category_id: CategoryId,
) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM categories
            WHERE id = ?1
              AND owner_id = ?2
        );",
        params![category_id.to_string(), owner_id.as_str()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
