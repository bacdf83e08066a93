//! Persisted user profile.
//!
//! A small JSON key-value file in the data directory. Only the `userName`
//! key is used; other keys are preserved on write.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use visita_core::Result;

/// File name of the profile inside the data directory.
pub const PROFILE_FILE: &str = "profile.json";

const USER_NAME_KEY: &str = "userName";

/// Key-value file holding the remembered user name.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Profile stored as `profile.json` under `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(PROFILE_FILE))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the remembered name.
    ///
    /// A missing file means no name yet. An unreadable or corrupt file is
    /// logged and also treated as no name.
    pub fn load_name(&self) -> Option<String> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No profile file");
            return None;
        }
        match self.read_entries() {
            Ok(entries) => entries
                .get(USER_NAME_KEY)
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable profile");
                None
            }
        }
    }

    /// Overwrite the remembered name.
    pub fn save_name(&self, name: &str) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(USER_NAME_KEY.to_string(), Value::String(name.to_string()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(entries))?;
        std::fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "Saved user name");
        Ok(())
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
