use rusqlite::Connection;
use tasknest_core::db::open_db_in_memory;
use tasknest_core::{
    CategoryRepository, NewTodo, Priority, QueryService, ServiceError, SqliteAssociationIndex,
    SqliteCategoryRepository, SqliteTodoRepository, StatsService, Todo, TodoFilter, TodoPatch,
    TodoRepository, TodoStats, UserId,
};

fn user(name: &str) -> UserId {
    UserId::parse(name).unwrap()
}

fn query(
    conn: &Connection,
) -> QueryService<SqliteTodoRepository<'_>, SqliteCategoryRepository<'_>, SqliteAssociationIndex<'_>>
{
    QueryService::new(
        SqliteTodoRepository::try_new(conn).unwrap(),
        SqliteCategoryRepository::try_new(conn).unwrap(),
        SqliteAssociationIndex::new(conn),
    )
}

fn titles(todos: &[Todo]) -> Vec<&str> {
    todos.iter().map(|todo| todo.title.as_str()).collect()
}

#[test]
fn priorities_sort_high_medium_low_regardless_of_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    for (title, priority) in [
        ("low", Priority::Low),
        ("high", Priority::High),
        ("medium", Priority::Medium),
    ] {
        repo.create_todo(&alice, &NewTodo::new(title, priority))
            .unwrap();
    }

    let listed = query(&conn)
        .get_todos(&alice, TodoFilter::All, None)
        .unwrap();
    assert_eq!(titles(&listed), vec!["high", "medium", "low"]);
}

#[test]
fn equal_priority_lists_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    for title in ["first", "second", "third"] {
        repo.create_todo(&alice, &NewTodo::new(title, Priority::Medium))
            .unwrap();
    }
    repo.create_todo(&alice, &NewTodo::new("urgent", Priority::High))
        .unwrap();

    let listed = query(&conn)
        .get_todos(&alice, TodoFilter::All, None)
        .unwrap();
    assert_eq!(titles(&listed), vec!["urgent", "third", "second", "first"]);
}

#[test]
fn identical_sort_keys_are_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    let a = repo
        .create_todo(&alice, &NewTodo::new("a", Priority::Low))
        .unwrap();
    let b = repo
        .create_todo(&alice, &NewTodo::new("b", Priority::Low))
        .unwrap();
    conn.execute("UPDATE todos SET created_at = 1000;", [])
        .unwrap();

    let listed = query(&conn)
        .get_todos(&alice, TodoFilter::All, None)
        .unwrap();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    let ids: Vec<_> = listed.iter().map(|todo| todo.id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn status_filters_select_active_and_completed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    repo.create_todo(&alice, &NewTodo::new("open", Priority::Low))
        .unwrap();
    let done = repo
        .create_todo(&alice, &NewTodo::new("done", Priority::High))
        .unwrap();
    repo.toggle_completed(&alice, done.id).unwrap();

    let engine = query(&conn);
    assert_eq!(
        titles(&engine.get_todos(&alice, TodoFilter::All, None).unwrap()),
        vec!["done", "open"]
    );
    assert_eq!(
        titles(&engine.get_todos(&alice, TodoFilter::Active, None).unwrap()),
        vec!["open"]
    );
    assert_eq!(
        titles(&engine.get_todos(&alice, TodoFilter::Completed, None).unwrap()),
        vec!["done"]
    );
}

#[test]
fn category_filter_intersects_with_status_filter() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    let work = categories.create_category(&alice, "Work", "red").unwrap();
    let tagged_open = repo
        .create_todo(
            &alice,
            &NewTodo::new("tagged open", Priority::Low).with_categories([work.id]),
        )
        .unwrap();
    let tagged_done = repo
        .create_todo(
            &alice,
            &NewTodo::new("tagged done", Priority::Low).with_categories([work.id]),
        )
        .unwrap();
    repo.toggle_completed(&alice, tagged_done.id).unwrap();
    repo.create_todo(&alice, &NewTodo::new("untagged", Priority::High))
        .unwrap();

    let engine = query(&conn);
    let active_work = engine
        .get_todos(&alice, TodoFilter::Active, Some(work.id))
        .unwrap();
    assert_eq!(active_work.len(), 1);
    assert_eq!(active_work[0].id, tagged_open.id);

    let all_work = engine
        .get_todos(&alice, TodoFilter::All, Some(work.id))
        .unwrap();
    assert_eq!(titles(&all_work), vec!["tagged done", "tagged open"]);
}

#[test]
fn foreign_or_deleted_category_filter_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    let bob = user("bob");
    let bobs = categories.create_category(&bob, "Garden", "green").unwrap();
    let gone = categories.create_category(&alice, "Old", "grey").unwrap();
    categories.delete_category(&alice, gone.id).unwrap();

    let engine = query(&conn);
    for category_id in [bobs.id, gone.id] {
        let err = engine
            .get_todos(&alice, TodoFilter::All, Some(category_id))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFoundOrForbidden));
    }
}

#[test]
fn results_never_include_other_users_todos() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    let bob = user("bob");
    repo.create_todo(&alice, &NewTodo::new("alice's", Priority::Low))
        .unwrap();
    repo.create_todo(&bob, &NewTodo::new("bob's", Priority::High))
        .unwrap();

    let listed = query(&conn)
        .get_todos(&alice, TodoFilter::All, None)
        .unwrap();
    assert_eq!(titles(&listed), vec!["alice's"]);
}

#[test]
fn stats_count_open_high_priority_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    repo.create_todo(&alice, &NewTodo::new("A", Priority::High))
        .unwrap();
    let b = repo
        .create_todo(&alice, &NewTodo::new("B", Priority::Low))
        .unwrap();
    repo.toggle_completed(&alice, b.id).unwrap();
    let c = repo
        .create_todo(&alice, &NewTodo::new("C", Priority::High))
        .unwrap();
    repo.toggle_completed(&alice, c.id).unwrap();
    repo.create_todo(&user("bob"), &NewTodo::new("D", Priority::High))
        .unwrap();

    let stats = StatsService::new(SqliteTodoRepository::try_new(&conn).unwrap())
        .get_stats(&alice)
        .unwrap();
    assert_eq!(
        stats,
        TodoStats {
            total: 3,
            completed: 2,
            active: 1,
            high_priority: 1,
        }
    );
    assert_eq!(stats.active, stats.total - stats.completed);
    assert!(stats.high_priority <= stats.active);
}

#[test]
fn stats_serialize_with_presentation_field_names() {
    let stats = TodoStats {
        total: 2,
        completed: 1,
        active: 1,
        high_priority: 1,
    };
    let value = serde_json::to_value(stats).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"total": 2, "completed": 1, "active": 1, "highPriority": 1})
    );
}

#[test]
fn filter_and_priority_use_lowercase_wire_names() {
    assert_eq!(
        serde_json::to_string(&TodoFilter::Completed).unwrap(),
        "\"completed\""
    );
    let filter: TodoFilter = serde_json::from_str("\"active\"").unwrap();
    assert_eq!(filter, TodoFilter::Active);
    assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
}

#[test]
fn records_and_requests_share_camel_case_wire_names() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let todos = SqliteTodoRepository::try_new(&conn).unwrap();
    let alice = user("alice");
    let work = categories.create_category(&alice, "Work", "red").unwrap();
    let todo = todos
        .create_todo(
            &alice,
            &NewTodo::new("wire", Priority::Medium)
                .with_due_date(5)
                .with_categories([work.id]),
        )
        .unwrap();

    let value = serde_json::to_value(&todo).unwrap();
    assert_eq!(value["ownerId"], "alice");
    assert_eq!(value["dueDate"], 5);
    assert_eq!(value["createdAt"], todo.created_at);
    assert_eq!(value["priority"], "medium");
    assert!(value.get("due_date").is_none());

    let category = serde_json::to_value(&work).unwrap();
    assert_eq!(category["ownerId"], "alice");
    assert!(category.get("createdAt").is_some());

    let request: NewTodo = serde_json::from_value(serde_json::json!({
        "title": "from host",
        "description": null,
        "priority": "high",
        "dueDate": 9,
        "categoryIds": [work.id]
    }))
    .unwrap();
    assert_eq!(request.due_date, Some(9));
    assert_eq!(request.category_ids, vec![work.id]);

    let patch: TodoPatch =
        serde_json::from_value(serde_json::json!({"dueDate": 3, "completed": true})).unwrap();
    assert_eq!(patch.due_date, Some(Some(3)));
    assert_eq!(patch.completed, Some(true));
}
