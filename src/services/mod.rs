//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Each service owns one capability and depends only on the store trait it
//! needs. Route handlers take the specific service they call, so the
//! dependency a handler has is visible in its signature.

pub mod auth;
pub mod book;
pub mod error;
pub mod list;
pub mod token;
