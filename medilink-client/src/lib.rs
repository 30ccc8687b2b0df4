//! Medilink Client - hospital API consumer and session lifecycle
//!
//! This crate talks to the remote hospital API (the sole authority on business
//! rules and token validity) and maintains the client-side session: identity
//! derived from the token payload, proactive refresh before expiry, and
//! logout on any auth failure or external invalidation.

pub mod api;
pub mod session;
pub mod token;

pub use api::ApiClient;
pub use session::{
    format_remaining, LogoutReason, SessionEvent, SessionManager, SessionSnapshot, TokenStore,
};
pub use token::{decode_claims, TokenClaims};
