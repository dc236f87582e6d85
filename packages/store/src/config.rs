//! # Client configuration in `notes.toml`
//!
//! ## Structure
//!
//! ```toml
//! [store]
//! collection = "notes"     # document collection holding note records
//!
//! [display]
//! preview_chars = 50       # list rows show at most this many characters
//!
//! [profile]                # identity used by LocalSession
//! id = "local"
//! display_name = "Local User"
//!
//! [log]
//! level = "info"
//! ```
//!
//! A missing file is the default configuration, which signs in as the local
//! profile above. In a file that exists, every section may be left out and
//! falls back to its default, except `[profile]`: without it there is no
//! identity to sign in with, and sign-in is cancelled.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::Identity;

/// Top-level configuration stored in `notes.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Identity>,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_collection")]
    pub collection: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// A `tracing` level name: trace, debug, info, warn or error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_collection() -> String {
    "notes".to_string()
}

fn default_preview_chars() -> usize {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

fn local_profile() -> Identity {
    Identity::new("local", "Local User")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            display: DisplayConfig::default(),
            profile: Some(local_profile()),
            log: LogConfig::default(),
        }
    }
}

impl NotesConfig {
    /// Builder method to set the note collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.store.collection = collection.into();
        self
    }

    /// Builder method to set the identity used for local sign-in.
    pub fn with_profile(mut self, profile: Identity) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Builder method to remove the sign-in identity.
    pub fn without_profile(mut self) -> Self {
        self.profile = None;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "notes.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read a config file, falling back to the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(s) => Ok(Self::from_toml(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("{} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
