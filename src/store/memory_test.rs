use super::*;

fn reading_list() -> NewList {
    NewList { title: "Reading".into(), description: Some("summer".into()) }
}

fn dune() -> NewBook {
    NewBook {
        title: "Dune".into(),
        author: "Frank Herbert".into(),
        publisher: "Chilton".into(),
        publication_year: 1965,
        page_count: 412,
    }
}

async fn store_with_users() -> (MemoryStore, UserId, UserId) {
    let store = MemoryStore::new();
    let alice = store.insert_user("alice", "h1").await.unwrap();
    let bob = store.insert_user("bob", "h2").await.unwrap();
    (store, alice, bob)
}

// =============================================================================
// credentials
// =============================================================================

#[tokio::test]
async fn user_ids_are_sequential_from_one() {
    let (_, alice, bob) = store_with_users().await;
    assert_eq!(alice, UserId::new(1));
    assert_eq!(bob, UserId::new(2));
}

#[tokio::test]
async fn duplicate_username_is_rejected_and_keeps_original_hash() {
    let (store, alice, _) = store_with_users().await;
    let err = store.insert_user("alice", "other").await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey(_)));
    assert_eq!(store.find_user("alice", "h1").await.unwrap(), alice);
    assert!(matches!(store.find_user("alice", "other").await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn find_user_requires_matching_hash() {
    let (store, _, _) = store_with_users().await;
    assert!(matches!(store.find_user("alice", "h2").await, Err(StoreError::NotFound)));
    assert!(matches!(store.find_user("carol", "h1").await, Err(StoreError::NotFound)));
}

// =============================================================================
// lists
// =============================================================================

#[tokio::test]
async fn list_is_visible_only_to_owner() {
    let (store, alice, bob) = store_with_users().await;
    let list_id = ListStore::create(&store, alice, &reading_list()).await.unwrap();

    let list = ListStore::by_id(&store, alice, list_id).await.unwrap();
    assert_eq!(list.title, "Reading");
    assert!(matches!(ListStore::by_id(&store, bob, list_id).await, Err(StoreError::NotFound)));
    assert_eq!(ListStore::all(&store, alice).await.unwrap().len(), 1);
    assert!(ListStore::all(&store, bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_create_for_unknown_user_writes_nothing() {
    let store = MemoryStore::new();
    let err = ListStore::create(&store, UserId::new(99), &reading_list())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingReference(_)));
    assert_eq!(store.row_counts().await, (0, 0, 0, 0));
}

#[tokio::test]
async fn list_update_by_non_owner_affects_no_rows() {
    let (store, alice, bob) = store_with_users().await;
    let list_id = ListStore::create(&store, alice, &reading_list()).await.unwrap();
    let hijack = List { id: list_id, title: "mine now".into(), description: None };

    assert_eq!(ListStore::update(&store, bob, &hijack).await.unwrap(), 0);
    let list = ListStore::by_id(&store, alice, list_id).await.unwrap();
    assert_eq!(list.title, "Reading");
}

#[tokio::test]
async fn list_delete_by_non_owner_is_a_no_op() {
    let (store, alice, bob) = store_with_users().await;
    let list_id = ListStore::create(&store, alice, &reading_list()).await.unwrap();

    assert_eq!(ListStore::delete(&store, bob, list_id).await.unwrap(), 0);
    assert!(ListStore::by_id(&store, alice, list_id).await.is_ok());
}

#[tokio::test]
async fn list_delete_cuts_off_its_books() {
    let (store, alice, _) = store_with_users().await;
    let list_id = ListStore::create(&store, alice, &reading_list()).await.unwrap();
    let book_id = BookStore::create(&store, list_id, &dune()).await.unwrap();

    assert_eq!(ListStore::delete(&store, alice, list_id).await.unwrap(), 1);
    assert!(matches!(BookStore::by_id(&store, alice, book_id).await, Err(StoreError::NotFound)));
    let (lists, owners, _, members) = store.row_counts().await;
    assert_eq!((lists, owners, members), (0, 0, 0));
}

// =============================================================================
// books
// =============================================================================

#[tokio::test]
async fn book_create_for_missing_list_rolls_back() {
    let store = MemoryStore::new();
    let err = BookStore::create(&store, 404, &dune()).await.unwrap_err();
    assert!(matches!(err, StoreError::MissingReference(_)));
    assert_eq!(store.row_counts().await, (0, 0, 0, 0));
}

#[tokio::test]
async fn book_visibility_follows_the_ownership_chain() {
    let (store, alice, bob) = store_with_users().await;
    let list_id = ListStore::create(&store, alice, &reading_list()).await.unwrap();
    let book_id = BookStore::create(&store, list_id, &dune()).await.unwrap();

    assert_eq!(BookStore::by_id(&store, alice, book_id).await.unwrap().title, "Dune");
    assert!(matches!(BookStore::by_id(&store, bob, book_id).await, Err(StoreError::NotFound)));
    assert_eq!(BookStore::all(&store, alice, list_id).await.unwrap().len(), 1);
    assert!(BookStore::all(&store, bob, list_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn books_are_listed_per_list() {
    let (store, alice, _) = store_with_users().await;
    let first = ListStore::create(&store, alice, &reading_list()).await.unwrap();
    let second = ListStore::create(&store, alice, &reading_list()).await.unwrap();
    BookStore::create(&store, first, &dune()).await.unwrap();
    BookStore::create(&store, second, &dune()).await.unwrap();
    BookStore::create(&store, second, &dune()).await.unwrap();

    assert_eq!(BookStore::all(&store, alice, first).await.unwrap().len(), 1);
    assert_eq!(BookStore::all(&store, alice, second).await.unwrap().len(), 2);
}

#[tokio::test]
async fn book_update_and_delete_by_non_owner_affect_no_rows() {
    let (store, alice, bob) = store_with_users().await;
    let list_id = ListStore::create(&store, alice, &reading_list()).await.unwrap();
    let book_id = BookStore::create(&store, list_id, &dune()).await.unwrap();
    let mut book = BookStore::by_id(&store, alice, book_id).await.unwrap();
    book.title = "Dune Messiah".into();

    assert_eq!(BookStore::update(&store, bob, &book).await.unwrap(), 0);
    assert_eq!(BookStore::delete(&store, bob, book_id).await.unwrap(), 0);
    assert_eq!(BookStore::by_id(&store, alice, book_id).await.unwrap().title, "Dune");

    assert_eq!(BookStore::update(&store, alice, &book).await.unwrap(), 1);
    assert_eq!(BookStore::by_id(&store, alice, book_id).await.unwrap().title, "Dune Messiah");
    assert_eq!(BookStore::delete(&store, alice, book_id).await.unwrap(), 1);
    assert_eq!(store.row_counts().await, (1, 1, 0, 0));
}
