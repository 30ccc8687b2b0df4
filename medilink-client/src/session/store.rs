//! Durable token storage
//!
//! One file holding the raw bearer token, standing in for the browser's
//! persisted token key. Removing the file is the cross-context invalidation
//! signal the session manager watches for.

use medilink_core::{ErrorContext, MedilinkError, MedilinkResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed store for the persisted bearer token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a token is currently persisted
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the persisted token, if any
    pub fn load(&self) -> MedilinkResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MedilinkError::Storage {
                message: format!("Failed to read token store: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("token_store")
                    .with_operation("load")
                    .with_metadata("path", &self.path.display().to_string()),
            }),
        }
    }

    /// Persist a token, replacing any previous one
    pub fn save(&self, token: &str) -> MedilinkResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MedilinkError::Storage {
                message: format!("Failed to create token store directory: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("token_store").with_operation("save"),
            })?;
        }

        std::fs::write(&self.path, token).map_err(|e| MedilinkError::Storage {
            message: format!("Failed to write token store: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("token_store")
                .with_operation("save")
                .with_metadata("path", &self.path.display().to_string()),
        })?;

        debug!(path = %self.path.display(), "persisted token");
        Ok(())
    }

    /// Remove the persisted token; missing files are not an error
    pub fn clear(&self) -> MedilinkResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared persisted token");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MedilinkError::Storage {
                message: format!("Failed to remove token store: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("token_store").with_operation("clear"),
            }),
        }
    }
}
