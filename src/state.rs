//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` bundles the three services for the router. Handlers never take
//! the whole bundle: each one extracts the single service it calls through the
//! `FromRef` impls below.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AuthConfig;
use crate::services::auth::AuthService;
use crate::services::book::BookService;
use crate::services::list::ListService;
use crate::store::{BookStore, CredentialStore, ListStore};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub lists: Arc<ListService>,
    pub books: Arc<BookService>,
}

impl AppState {
    /// Wire the services over a backend that serves all three store traits.
    #[must_use]
    pub fn new<S>(store: Arc<S>, auth: &AuthConfig) -> Self
    where
        S: CredentialStore + ListStore + BookStore + 'static,
    {
        let credentials: Arc<dyn CredentialStore> = store.clone();
        let list_store: Arc<dyn ListStore> = store.clone();
        let book_store: Arc<dyn BookStore> = store;

        let lists = Arc::new(ListService::new(list_store));
        Self {
            auth: Arc::new(AuthService::from_config(credentials, auth)),
            books: Arc::new(BookService::new(book_store, lists.clone())),
            lists,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<ListService> {
    fn from_ref(state: &AppState) -> Self {
        state.lists.clone()
    }
}

impl FromRef<AppState> for Arc<BookService> {
    fn from_ref(state: &AppState) -> Self {
        state.books.clone()
    }
}
