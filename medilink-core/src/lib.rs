//! Medilink Core - shared types, errors and configuration
//!
//! Foundation crate for the Medilink hospital client: domain records mirroring
//! the server schemas, the unified error type, and config/logging plumbing.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use chrono;
pub use tracing;
