//! End-to-end tests through the catalog facade.

use bookcase_core::{
    encode_collection, shared, Book, BookPatch, Catalog, Config, Controller, CoreError, Entity,
    EntityId, Identified, NewBook, NewCategory, NewShelf, NewUser, ReviewPatch, User, UserPatch,
};
use bookcase_storage::{InMemoryStore, ResourceStore};
use std::sync::Arc;
use tempfile::tempdir;

fn book_id(catalog: &Catalog, name: &str) -> EntityId {
    let book = catalog.books().create(NewBook::named(name)).unwrap();
    let id = book.read().id();
    id
}

fn category_id(catalog: &Catalog, name: &str) -> EntityId {
    let category = catalog.categories().create(NewCategory::named(name)).unwrap();
    let id = category.read().id();
    id
}

#[test]
fn created_ids_are_distinct_and_increasing() {
    let catalog = Catalog::open_in_memory();
    let ids: Vec<EntityId> = (0..20).map(|i| book_id(&catalog, &format!("b{i}"))).collect();

    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    assert_eq!(ids[0], EntityId::new(1));
}

#[test]
fn empty_save_and_load_restarts_at_one() {
    let catalog = Catalog::open_in_memory();
    assert!(catalog.save_all());
    assert_eq!(catalog.load_all(), 0);
    assert_eq!(book_id(&catalog, "first"), EntityId::new(1));
}

#[test]
fn reload_continues_after_highest_id() {
    let catalog = Catalog::open_in_memory();
    for raw in [3, 7, 2] {
        catalog
            .books()
            .store()
            .add(shared(Book::new(EntityId::new(raw), NewBook::named("b"))));
    }
    assert!(catalog.save_all());
    assert_eq!(catalog.load_all(), 3);

    assert_eq!(book_id(&catalog, "next"), EntityId::new(8));
}

#[test]
fn deleting_a_category_cascades_to_its_subtree() {
    let catalog = Catalog::open_in_memory();
    let categories = catalog.categories();
    let root = category_id(&catalog, "Fiction");
    let fantasy = categories
        .add_sub_category(root, NewCategory::named("Fantasy"))
        .unwrap();
    let fantasy = fantasy.read().id();
    let horror = categories
        .add_sub_category(root, NewCategory::named("Horror"))
        .unwrap();
    let horror = horror.read().id();

    let hobbit = book_id(&catalog, "The Hobbit");
    let it = book_id(&catalog, "It");
    assert!(categories.add_book_to_category(fantasy, hobbit));
    assert!(categories.add_book_to_category(horror, it));

    assert!(categories.delete_by_id(root));

    assert!(categories.list_all().is_empty());
    for id in [hobbit, it] {
        let book = catalog.books().find_by_id(id).unwrap();
        assert!(book.read().category_ids().is_empty());
    }
    assert!(catalog.verify().is_ok());
}

#[test]
fn book_update_changes_only_present_fields() {
    let catalog = Catalog::open_in_memory();
    let id = {
        let book = catalog
            .books()
            .create(NewBook::named("Dune").price(12.0).author("Herbert"))
            .unwrap();
        let id = book.read().id();
        id
    };

    assert!(catalog.books().update(id, BookPatch::new().price(9.99)));

    let book = catalog.books().find_by_id(id).unwrap();
    let book = book.read();
    assert_eq!(book.name(), "Dune");
    assert_eq!(book.author(), "Herbert");
    assert_eq!(book.price(), 9.99);
}

#[test]
fn out_of_range_and_missing_scores_become_zero() {
    let catalog = Catalog::open_in_memory();
    catalog.register(NewUser::new("ana", "pw"));
    catalog.login("ana", "pw");
    let book = book_id(&catalog, "Dune");

    let high = catalog.reviews().create(book, "wow", Some(7.0)).unwrap().unwrap();
    let none = catalog.reviews().create(book, "meh", None).unwrap().unwrap();
    assert_eq!(high.score(), 0.0);
    assert_eq!(none.score(), 0.0);
    assert_eq!(catalog.books().score(book), Some(0.0));
}

#[test]
fn shelves_follow_the_logged_in_user() {
    let catalog = Catalog::open_in_memory();
    catalog.register(NewUser::new("ana", "pw"));
    catalog.register(NewUser::new("bia", "pw"));

    let ana = catalog.login("ana", "pw").unwrap();
    let shelf = catalog.shelves().create(NewShelf::named("to read")).unwrap();

    catalog.login("bia", "pw").unwrap();
    assert!(catalog.shelves().list_all().is_empty());
    catalog.shelves().create(NewShelf::named("favourites"));

    assert_eq!(ana.read().shelves(), &[shelf]);
    catalog.logout();
    assert!(catalog.shelves().list_all().is_empty());
}

#[test]
fn only_the_author_may_delete_a_review() {
    let catalog = Catalog::open_in_memory();
    catalog.register(NewUser::new("ana", "pw"));
    catalog.register(NewUser::new("bia", "pw"));
    let book = book_id(&catalog, "Dune");

    catalog.login("ana", "pw");
    let review = catalog
        .reviews()
        .create(book, "great", Some(5.0))
        .unwrap()
        .unwrap();

    catalog.login("bia", "pw");
    let err = catalog.reviews().delete_by_id(book, review.id()).unwrap_err();
    assert!(matches!(err, CoreError::NotAuthor { .. }));
    let err = catalog
        .reviews()
        .update(book, review.id(), ReviewPatch::new().score(1.0))
        .unwrap_err();
    assert!(err.is_refusal());
    assert_eq!(catalog.reviews().find(book, review.id()), Some(review.clone()));

    catalog.logout();
    let err = catalog.reviews().delete_by_id(book, review.id()).unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));

    catalog.login("ana", "pw");
    assert!(catalog.reviews().delete_by_id(book, review.id()).unwrap());
    assert!(catalog.reviews().list_for_book(book).is_empty());
}

#[test]
fn reviews_survive_reload_with_their_sequencer() {
    let resources: Arc<dyn ResourceStore> = Arc::new(InMemoryStore::new());
    let catalog = Catalog::with_store(Arc::clone(&resources), Config::default());
    catalog.register(NewUser::new("ana", "pw"));
    catalog.login("ana", "pw");
    let book = book_id(&catalog, "Dune");
    catalog.reviews().create(book, "a", Some(4.0)).unwrap();
    catalog.reviews().create(book, "b", Some(2.0)).unwrap();
    assert!(catalog.save_all());

    let reopened = Catalog::with_store(resources, Config::default());
    assert_eq!(reopened.reviews().list_for_book(book).len(), 2);
    assert_eq!(reopened.reviews().next_id(), EntityId::new(3));
    assert_eq!(reopened.books().score(book), Some(3.0));
}

#[test]
fn deleted_author_leaves_a_warning() {
    let catalog = Catalog::open_in_memory();
    let ana = catalog.register(NewUser::new("ana", "pw")).unwrap();
    let ana = ana.read().id();
    catalog.login("ana", "pw");
    let book = book_id(&catalog, "Dune");
    catalog.reviews().create(book, "a", Some(4.0)).unwrap();

    assert!(catalog.users().delete_by_id(ana));
    assert!(catalog.current_user().is_none());

    let report = catalog.verify();
    assert!(report.is_ok());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(catalog.reviews().list_for_book(book).len(), 1);
}

#[test]
fn directory_store_persists_across_opens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog");

    {
        let catalog = Catalog::open(&path).unwrap();
        catalog.register(NewUser::new("ana", "pw"));
        catalog.login("ana", "pw");
        let shelf = catalog.shelves().create(NewShelf::named("s")).unwrap().id();
        let book = book_id(&catalog, "Dune");
        let sf = category_id(&catalog, "SF");
        assert!(catalog.categories().add_book_to_category(sf, book));
        assert!(catalog.shelves().add_book_to_shelf(shelf, book));
        catalog.reviews().create(book, "great", Some(5.0)).unwrap();
        assert!(catalog.save_all());
    }

    let catalog = Catalog::open_with_config(&path, Config::new().create_if_missing(false)).unwrap();
    let stats = catalog.stats();
    assert_eq!(stats.users, 1);
    assert_eq!(stats.shelves, 1);
    assert_eq!(stats.books, 1);
    assert_eq!(stats.reviews, 1);
    assert_eq!(stats.categories, 1);
    assert_eq!(stats.next_book_id, EntityId::new(2));
    assert!(catalog.verify().is_ok());

    let book = catalog.books().find_by_id(EntityId::new(1)).unwrap();
    assert_eq!(book.read().category_ids(), &[EntityId::new(1)]);
    assert_eq!(book.read().score_display(), "5.0");
}

#[test]
fn missing_directory_is_an_error_without_create() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent");

    let err = Catalog::open_with_config(&path, Config::new().create_if_missing(false)).unwrap_err();
    assert!(matches!(err, CoreError::DataDirectoryMissing { .. }));
    assert!(!path.exists());
}

#[test]
fn strict_tree_rejects_ancestor_cycles() {
    let catalog = Catalog::with_store(
        Arc::new(InMemoryStore::new()),
        Config::new().strict_category_tree(true),
    );
    let root = category_id(&catalog, "root");
    let child = catalog
        .categories()
        .add_sub_category(root, NewCategory::named("child"))
        .unwrap();
    let child = child.read().id();

    let err = catalog.categories().attach_sub_category(child, root).unwrap_err();
    assert!(matches!(err, CoreError::CategoryCycle { .. }));
    assert!(catalog.verify().is_ok());
}

#[test]
fn renamed_author_keeps_review_and_namesake_is_refused() {
    let catalog = Catalog::open_in_memory();
    let ana = catalog.register(NewUser::new("ana", "pw")).unwrap();
    let ana = ana.read().id();
    catalog.login("ana", "pw");
    let book = book_id(&catalog, "Dune");
    let review = catalog.reviews().create(book, "mine", Some(4.0)).unwrap().unwrap();

    assert!(catalog.users().update(ana, UserPatch::new().username("anabel")));
    assert!(catalog
        .reviews()
        .update(book, review.id(), ReviewPatch::new().score(5.0))
        .unwrap());

    catalog.register(NewUser::new("ana", "other")).unwrap();
    catalog.login("ana", "other").unwrap();
    let err = catalog.reviews().delete_by_id(book, review.id()).unwrap_err();
    assert!(matches!(err, CoreError::NotAuthor { .. }));
    assert!(catalog.reviews().find(book, review.id()).is_some());
}

#[test]
fn deleted_book_ids_do_not_alias_on_shelves() {
    let catalog = Catalog::open_in_memory();
    catalog.register(NewUser::new("ana", "pw"));
    catalog.login("ana", "pw");
    let shelf = catalog.shelves().create(NewShelf::named("s")).unwrap().id();
    let kept = book_id(&catalog, "A");
    let gone = book_id(&catalog, "B");
    assert!(catalog.shelves().add_book_to_shelf(shelf, kept));
    assert!(catalog.shelves().add_book_to_shelf(shelf, gone));

    assert!(catalog.books().delete_by_id(gone));
    assert!(catalog.save_all());
    assert_eq!(book_id(&catalog, "Unrelated"), gone);

    let names: Vec<String> = catalog
        .shelves()
        .books(shelf)
        .iter()
        .map(|b| b.read().name().to_string())
        .collect();
    assert_eq!(names, vec!["A".to_string()]);
    assert!(catalog.verify().warnings.is_empty());
}

#[test]
fn duplicate_ids_on_disk_fail_verification() {
    let store = InMemoryStore::new();
    let users = vec![
        User::new(EntityId::new(1), Some("ana"), None),
        User::new(EntityId::new(1), Some("bia"), None),
    ];
    store
        .write(User::RESOURCE, &encode_collection(users.as_slice()).unwrap())
        .unwrap();

    let catalog = Catalog::with_store(Arc::new(store), Config::default());
    assert_eq!(catalog.users().list_all().len(), 1);
    let report = catalog.verify();
    assert!(!report.is_ok());
    assert!(report.errors[0].contains("user"));

    assert!(catalog.save_all());
    catalog.load_all();
    assert!(catalog.verify().is_ok());
}
