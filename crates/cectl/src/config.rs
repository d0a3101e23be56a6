//! Profile store.
//!
//! Profiles live in a TOML file with one table per profile:
//!
//! ```toml
//! [default]
//! base = "https://api.cloud-elements.com/elements/api-v2"
//! user = "..."
//! org = "..."
//! label = "production"
//! ```
//!
//! Top-level keys that are not tables, such as `profile = "default"`, are
//! kept as they are and written back on save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Name of the profile used when none is given.
pub const DEFAULT_PROFILE: &str = "default";

/// Credentials and endpoint for one platform account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Base URL of the API, e.g. `https://api.cloud-elements.com/elements/api-v2`.
    #[serde(default)]
    pub base: String,
    /// User secret.
    #[serde(default)]
    pub user: String,
    /// Organization secret.
    #[serde(default)]
    pub org: String,
    /// Name of the profile this one was copied from by `profiles set`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Profile {
    /// Create a profile without a label.
    pub fn new(base: impl Into<String>, user: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            user: user.into(),
            org: org.into(),
            label: None,
        }
    }

    /// The composed `Authorization` header value.
    pub fn auth(&self) -> String {
        format!("User {}, Organization {}", self.user, self.org)
    }
}

/// All profiles of a config file.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: BTreeMap<String, Profile>,
    settings: toml::Table,
}

impl ProfileStore {
    /// Load profiles from a file. A missing file reads as an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid TOML.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CliError> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(CliError::Config(format!(
                    "failed to read config file {}: {e}",
                    path.display()
                )));
            }
        };
        Self::from_toml(path, &content)
    }

    /// Parse profiles from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(path: impl Into<PathBuf>, content: &str) -> Result<Self, CliError> {
        let document: toml::Table =
            toml::from_str(content).map_err(|e| CliError::Config(format!("invalid TOML: {e}")))?;

        let mut profiles = BTreeMap::new();
        let mut settings = toml::Table::new();
        for (key, value) in document {
            if value.is_table() {
                let profile: Profile = value
                    .try_into()
                    .map_err(|e| CliError::Config(format!("invalid profile {key}: {e}")))?;
                profiles.insert(key, profile);
            } else {
                settings.insert(key, value);
            }
        }

        Ok(Self {
            path: path.into(),
            profiles,
            settings,
        })
    }

    /// Write the profiles back, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save(&self) -> Result<(), CliError> {
        let mut document = self.settings.clone();
        for (name, profile) in &self.profiles {
            let value = toml::Value::try_from(profile)
                .map_err(|e| CliError::Config(format!("failed to serialize profiles: {e}")))?;
            document.insert(name.clone(), value);
        }
        let content = toml::to_string_pretty(&document)
            .map_err(|e| CliError::Config(format!("failed to serialize profiles: {e}")))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), "saved profiles");
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a profile exists.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Look up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ProfileNotFound`] naming the profile and the file.
    pub fn get(&self, name: &str) -> Result<&Profile, CliError> {
        self.profiles
            .get(name)
            .ok_or_else(|| CliError::ProfileNotFound {
                name: name.to_string(),
                path: self.path.clone(),
            })
    }

    /// Add a new profile.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ProfileExists`] if the name is taken.
    pub fn add(&mut self, name: &str, profile: Profile) -> Result<(), CliError> {
        if self.contains(name) {
            return Err(CliError::ProfileExists(name.to_string()));
        }
        self.profiles.insert(name.to_string(), profile);
        Ok(())
    }

    /// Copy a profile into `default`, labelled with its name.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ProfileNotFound`] if the profile does not exist.
    pub fn set_default(&mut self, name: &str) -> Result<&Profile, CliError> {
        let source = self.get(name)?;
        let profile = Profile {
            label: Some(name.to_string()),
            ..source.clone()
        };
        self.profiles.insert(DEFAULT_PROFILE.to_string(), profile);
        self.get(DEFAULT_PROFILE)
    }

    /// Profile names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Profiles in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profiles are configured.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Default config location, `$HOME/.config/ce/cectl.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::home_dir()
        .map(|home| home.join(".config").join("ce").join("cectl.toml"))
        .ok_or_else(|| CliError::Config("unable to determine home directory".into()))
}
