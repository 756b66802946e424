use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::*;
use crate::store::memory::MemoryStore;
use crate::store::{CredentialStore, StoreResult};

/// Delegates to a memory store and counts write calls.
struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

#[async_trait]
impl ListStore for CountingStore {
    async fn create(&self, user: UserId, list: &NewList) -> StoreResult<i64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        ListStore::create(&self.inner, user, list).await
    }

    async fn all(&self, user: UserId) -> StoreResult<Vec<List>> {
        ListStore::all(&self.inner, user).await
    }

    async fn by_id(&self, user: UserId, list_id: i64) -> StoreResult<List> {
        ListStore::by_id(&self.inner, user, list_id).await
    }

    async fn update(&self, user: UserId, list: &List) -> StoreResult<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        ListStore::update(&self.inner, user, list).await
    }

    async fn delete(&self, user: UserId, list_id: i64) -> StoreResult<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        ListStore::delete(&self.inner, user, list_id).await
    }
}

async fn setup() -> (ListService, Arc<CountingStore>, UserId, UserId) {
    let inner = MemoryStore::new();
    let alice = inner.insert_user("alice", "h1").await.unwrap();
    let bob = inner.insert_user("bob", "h2").await.unwrap();
    let store = Arc::new(CountingStore { inner, writes: AtomicUsize::new(0) });
    (ListService::new(store.clone()), store, alice, bob)
}

fn reading() -> NewList {
    NewList { title: "Reading".into(), description: Some("summer".into()) }
}

#[tokio::test]
async fn create_rejects_blank_title_without_writing() {
    let (lists, store, alice, _) = setup().await;
    let blank = NewList { title: "   ".into(), description: None };
    assert!(matches!(lists.create(alice, &blank).await, Err(ShelfError::InvalidInput(_))));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn other_users_list_is_not_found() {
    let (lists, _, alice, bob) = setup().await;
    let id = lists.create(alice, &reading()).await.unwrap();

    assert!(matches!(lists.get_by_id(bob, id).await, Err(ShelfError::NotFound)));
    assert!(matches!(lists.get_by_id(bob, id + 100).await, Err(ShelfError::NotFound)));
    assert!(lists.get_all(bob).await.unwrap().is_empty());
    assert_eq!(lists.get_all(alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_update_fails_and_performs_no_write() {
    let (lists, store, alice, _) = setup().await;
    let id = lists.create(alice, &reading()).await.unwrap();
    let writes_before = store.writes.load(Ordering::SeqCst);

    let err = lists.update(alice, id, UpdateListInput::default()).await.unwrap_err();
    assert!(matches!(err, ShelfError::EmptyUpdate));
    assert_eq!(store.writes.load(Ordering::SeqCst), writes_before);
}

#[tokio::test]
async fn title_update_preserves_description() {
    let (lists, _, alice, _) = setup().await;
    let id = lists.create(alice, &reading()).await.unwrap();

    let input = UpdateListInput { title: Some("new".into()), description: None };
    lists.update(alice, id, input).await.unwrap();

    let list = lists.get_by_id(alice, id).await.unwrap();
    assert_eq!(list.title, "new");
    assert_eq!(list.description.as_deref(), Some("summer"));
}

#[tokio::test]
async fn update_rejects_blank_title() {
    let (lists, _, alice, _) = setup().await;
    let id = lists.create(alice, &reading()).await.unwrap();
    let input = UpdateListInput { title: Some(String::new()), description: None };
    assert!(matches!(lists.update(alice, id, input).await, Err(ShelfError::InvalidInput(_))));
}

#[tokio::test]
async fn update_of_unowned_list_is_not_found_and_leaves_it_intact() {
    let (lists, _, alice, bob) = setup().await;
    let id = lists.create(alice, &reading()).await.unwrap();

    let input = UpdateListInput { title: Some("hijacked".into()), description: None };
    assert!(matches!(lists.update(bob, id, input).await, Err(ShelfError::NotFound)));
    assert_eq!(lists.get_by_id(alice, id).await.unwrap().title, "Reading");
}

#[tokio::test]
async fn delete_of_unowned_list_is_a_silent_no_op() {
    let (lists, _, alice, bob) = setup().await;
    let id = lists.create(alice, &reading()).await.unwrap();

    lists.delete(bob, id).await.unwrap();
    assert!(lists.get_by_id(alice, id).await.is_ok());

    lists.delete(alice, id).await.unwrap();
    assert!(matches!(lists.get_by_id(alice, id).await, Err(ShelfError::NotFound)));
}
