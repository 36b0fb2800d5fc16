//! Persisted session state
//!
//! The access/refresh tokens and the user profile survive process restarts
//! as a small JSON file in the XDG state directory. Transient refresh
//! bookkeeping is never written out.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::auth::UserProfile;

/// On-disk session shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<UserProfile>,
    pub saved_at: String,
}

/// Handle on the session file location
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default XDG state location
    pub fn default_location() -> Result<Self> {
        Ok(Self {
            path: crate::config::get_session_path()?,
        })
    }

    /// Store at an explicit path (used by tests)
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the persisted session, if any
    ///
    /// A missing file is simply "no session". A corrupt file is treated the
    /// same way after a warning; the next login rewrites it.
    pub fn load(&self) -> Option<StoredSession> {
        if !self.path.exists() {
            return None;
        }
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to read session file {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::warn!("discarding corrupt session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Write the session to disk
    pub fn save(
        &self,
        token: Option<&str>,
        refresh_token: Option<&str>,
        user: Option<&UserProfile>,
    ) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let stored = StoredSession {
            token: token.map(str::to_string),
            refresh_token: refresh_token.map(str::to_string),
            user: user.cloned(),
            saved_at: chrono::Utc::now().to_rfc3339(),
        };

        let json = serde_json::to_string_pretty(&stored).context("Failed to serialize session")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        Ok(())
    }

    /// Remove the session file; missing files are fine
    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!("failed to remove session file {}: {}", self.path.display(), e);
            }
        }
    }
}
