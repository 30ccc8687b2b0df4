//! Session management
//!
//! Holds the current authentication state as shared process-wide state, keeps
//! the token fresh, and terminates the session on expiry or external
//! invalidation.

pub mod manager;
pub mod store;
pub mod types;

pub use manager::SessionManager;
pub use store::TokenStore;
pub use types::*;
