use tasknest_core::db::open_db_in_memory;
use tasknest_core::{
    AssociationIndex, CategoryService, NewTodo, Priority, ServiceError, SqliteAssociationIndex,
    SqliteCategoryRepository, SqliteTodoRepository, TodoService, UserId,
};

fn user(name: &str) -> UserId {
    UserId::parse(name).unwrap()
}

#[test]
fn create_trims_name_and_keeps_color_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let alice = user("alice");

    let created = service
        .create_category(&alice, "  Work ", "hsl(12, 90%, 65%)")
        .unwrap();
    assert_eq!(created.name, "Work");
    assert_eq!(created.color, "hsl(12, 90%, 65%)");
    assert_eq!(service.get_category(&alice, created.id).unwrap(), created);
}

#[test]
fn create_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    let err = service
        .create_category(&user("alice"), "   ", "red")
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
    assert!(service.list_categories(&user("alice")).unwrap().is_empty());
}

#[test]
fn duplicate_names_are_allowed() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let alice = user("alice");

    let first = service.create_category(&alice, "Errands", "red").unwrap();
    let second = service.create_category(&alice, "Errands", "blue").unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(service.list_categories(&alice).unwrap().len(), 2);
}

#[test]
fn list_is_scoped_to_owner() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let alice = user("alice");
    let bob = user("bob");
    let work = service.create_category(&alice, "Work", "red").unwrap();
    service.create_category(&bob, "Garden", "green").unwrap();

    let listed = service.list_categories(&alice).unwrap();
    assert_eq!(listed, vec![work]);
}

#[test]
fn delete_cascades_to_links_but_keeps_todos() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let todos = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let alice = user("alice");
    let work = categories.create_category(&alice, "Work", "red").unwrap();
    let home = categories.create_category(&alice, "Home", "blue").unwrap();
    let first = todos
        .create_todo(
            &alice,
            NewTodo::new("first", Priority::High).with_categories([work.id, home.id]),
        )
        .unwrap();
    let second = todos
        .create_todo(
            &alice,
            NewTodo::new("second", Priority::Low).with_categories([work.id]),
        )
        .unwrap();

    let removed = categories.delete_category(&alice, work.id).unwrap();
    assert_eq!(removed, 2);

    let links = SqliteAssociationIndex::new(&conn);
    assert!(links.todo_ids_for_category(work.id).unwrap().is_empty());
    let first_links = links.category_ids_for_todo(first.id).unwrap();
    assert_eq!(first_links.len(), 1);
    assert!(first_links.contains(&home.id));

    assert_eq!(todos.list_todos(&alice).unwrap().len(), 2);
    assert!(todos.get_todo(&alice, second.id).is_ok());
    assert!(matches!(
        categories.get_category(&alice, work.id).unwrap_err(),
        ServiceError::NotFoundOrForbidden
    ));
}

#[test]
fn foreign_owner_cannot_delete_category() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let todos = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let alice = user("alice");
    let work = categories.create_category(&alice, "Work", "red").unwrap();
    let todo = todos
        .create_todo(
            &alice,
            NewTodo::new("tagged", Priority::Medium).with_categories([work.id]),
        )
        .unwrap();

    let err = categories.delete_category(&user("bob"), work.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFoundOrForbidden));

    assert!(categories.get_category(&alice, work.id).is_ok());
    let links = SqliteAssociationIndex::new(&conn);
    assert!(links.todo_ids_for_category(work.id).unwrap().contains(&todo.id));
}

#[test]
fn categories_for_todo_lists_linked_categories_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let todos = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let alice = user("alice");
    let work = categories.create_category(&alice, "Work", "red").unwrap();
    let home = categories.create_category(&alice, "Home", "blue").unwrap();
    categories.create_category(&alice, "Unused", "grey").unwrap();
    let todo = todos
        .create_todo(
            &alice,
            NewTodo::new("tagged", Priority::Medium).with_categories([home.id, work.id]),
        )
        .unwrap();

    let linked = categories.categories_for_todo(&alice, todo.id).unwrap();
    let ids: Vec<_> = linked.iter().map(|category| category.id).collect();
    assert_eq!(ids, vec![work.id, home.id]);
}
