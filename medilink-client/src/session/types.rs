//! Session state types
//!
//! The session is either fully authenticated or fully anonymous; holding the
//! identity fields inside a single `Option` makes partial population
//! unrepresentable.

use medilink_core::Role;
use serde::{Deserialize, Serialize};

/// In-memory record of the current authentication state
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) auth: Option<Authenticated>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }
}

/// The populated half of the session
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Opaque bearer token sent with every API call
    pub token: String,
    pub user_id: i64,
    pub user_name: String,
    pub role: Role,
    /// Token expiry as Unix seconds
    pub expires_at: i64,
}

/// Read-only view of the session handed to consumers
///
/// Screens read identity, role and the token value through this; only the
/// session manager writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: String,
    pub user_id: i64,
    pub user_name: String,
    pub role: Role,
    pub expires_at: i64,
}

impl From<&Authenticated> for SessionSnapshot {
    fn from(auth: &Authenticated) -> Self {
        Self {
            token: auth.token.clone(),
            user_id: auth.user_id,
            user_name: auth.user_name.clone(),
            role: auth.role,
            expires_at: auth.expires_at,
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user asked to sign out
    UserRequest,
    /// The token reached its expiry before a refresh landed
    Expired,
    /// Server-side verification rejected the token or could not be reached
    VerifyFailed,
    /// The proactive refresh call failed
    RefreshFailed,
    /// The persisted token disappeared from storage (another context signed out)
    StorageCleared,
}

impl std::fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogoutReason::UserRequest => write!(f, "signed out"),
            LogoutReason::Expired => write!(f, "session expired"),
            LogoutReason::VerifyFailed => write!(f, "token verification failed"),
            LogoutReason::RefreshFailed => write!(f, "token refresh failed"),
            LogoutReason::StorageCleared => write!(f, "signed out from another session"),
        }
    }
}

/// Session lifecycle notifications broadcast to every screen
///
/// `LoggedOut` is the signal to navigate back to sign-in.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    LoggedIn(SessionSnapshot),
    LoggedOut(LogoutReason),
}

/// Seconds until expiry, clamped so the countdown never goes negative
pub fn remaining_seconds(expires_at: i64, now: i64) -> i64 {
    (expires_at - now).max(0)
}

/// Format a remaining duration as `HH:MM:SS`
pub fn format_remaining(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
