//! Unified error handling for the Medilink client stack
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type MedilinkResult<T> = Result<T, MedilinkError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the Medilink system
#[derive(Error, Debug)]
pub enum MedilinkError {
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status returned by the server, when the request got that far
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    #[error("Token error: {message}")]
    Token {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MedilinkError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            MedilinkError::Api { context, .. } => Some(context),
            MedilinkError::Network { context, .. } => Some(context),
            MedilinkError::Authentication { context, .. } => Some(context),
            MedilinkError::Token { context, .. } => Some(context),
            MedilinkError::Config { context, .. } => Some(context),
            MedilinkError::Storage { context, .. } => Some(context),
            MedilinkError::Validation { context, .. } => Some(context),
            MedilinkError::NotFound { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The server-supplied detail message, suitable for showing to the user verbatim
    pub fn user_message(&self) -> String {
        match self {
            MedilinkError::Api { message, .. } => message.clone(),
            MedilinkError::Network { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether this failure must terminate the current session
    ///
    /// Auth-related failures and malformed tokens converge on logout; everything
    /// else is terminal for the single user action only.
    pub fn invalidates_session(&self) -> bool {
        matches!(
            self,
            MedilinkError::Authentication { .. } | MedilinkError::Token { .. }
        )
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            MedilinkError::Config { .. } | MedilinkError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration or validation error"
                );
            }
            MedilinkError::Network { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Network error (may be transient)"
                );
            }
            MedilinkError::Token { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Malformed token, treating as no session"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        MedilinkError::Config {
            message: $msg.to_string(),
            source: None,
            context: ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Delete the config file to fall back to defaults"),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        MedilinkError::Config {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        MedilinkError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! token_error {
    ($msg:expr, $component:expr) => {
        MedilinkError::Token {
            message: $msg.to_string(),
            context: ErrorContext::new($component)
                .with_suggestion("Sign in again to obtain a fresh token"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        MedilinkError::NotFound {
            resource: $resource.to_string(),
            context: ErrorContext::new($component)
                .with_suggestion("Verify the identifier and try again"),
        }
    };
}
