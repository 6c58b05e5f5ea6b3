//! Board configuration.
//!
//! Read from an optional JSON file, then overridden by environment variables:
//! - `NOTEBOARD_CONFIG` - config file path (default: `<config dir>/noteboard/config.json`)
//! - `NOTEBOARD_SHEET_URL` - published sheet link; unset means the local document is used
//! - `NOTEBOARD_FALLBACK_PATH` - local JSON document (default: `updates.json`)
//! - `NOTEBOARD_OVERRIDES_PATH` - override store file (default: `<data dir>/overrides.json`)
//! - `NOTEBOARD_ADMIN_SECRET` - secret expected in the `key` admin parameter

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::geometry::{ClampPolicy, ScalePolicy, DEFAULT_DRAG_THRESHOLD, IMAGE_ASPECT};
use crate::overrides::DEFAULT_STORAGE_KEY;

const APP_NAME: &str = "noteboard";
const CONFIG_FILE: &str = "config.json";
const OVERRIDES_FILE: &str = "overrides.json";
const FALLBACK_FILE: &str = "updates.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Published sheet link in any supported shape.
    pub sheet_url: Option<String>,
    /// Local snapshot used when no sheet is configured.
    pub fallback_path: PathBuf,
    /// Override store file. Resolved against the data directory when unset.
    pub overrides_path: Option<PathBuf>,
    /// Key the overrides are stored under inside the store file.
    pub storage_key: String,
    pub admin_secret: Option<String>,
    /// Board image width / height.
    pub aspect_ratio: f64,
    /// Bounds for dragged positions.
    pub clamp: ClampPolicy,
    pub scale: ScalePolicy,
    /// Pointer travel in pixels before a press becomes a drag.
    pub drag_threshold: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            sheet_url: None,
            fallback_path: PathBuf::from(FALLBACK_FILE),
            overrides_path: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            admin_secret: None,
            aspect_ratio: IMAGE_ASPECT,
            clamp: ClampPolicy::Strict,
            scale: ScalePolicy::default(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl BoardConfig {
    /// Load from the config file and environment.
    /// Returns defaults (plus environment) if the file is missing or invalid.
    pub fn load() -> Self {
        let from_file = match config_path() {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to load config, using defaults: {:#}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };
        from_file.with_env()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Apply `NOTEBOARD_*` environment variables.
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = lookup("NOTEBOARD_SHEET_URL") {
            self.sheet_url = Some(url);
        }
        if let Some(path) = lookup("NOTEBOARD_FALLBACK_PATH") {
            self.fallback_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("NOTEBOARD_OVERRIDES_PATH") {
            self.overrides_path = Some(PathBuf::from(path));
        }
        if let Some(secret) = lookup("NOTEBOARD_ADMIN_SECRET") {
            self.admin_secret = Some(secret);
        }
        self
    }

    /// Override store file, defaulting to the platform data directory.
    pub fn resolved_overrides_path(&self) -> PathBuf {
        if let Some(path) = &self.overrides_path {
            return path.clone();
        }
        match ProjectDirs::from("", "", APP_NAME) {
            Some(dirs) => dirs.data_dir().join(OVERRIDES_FILE),
            None => PathBuf::from(OVERRIDES_FILE),
        }
    }

    /// Capability granted by the admin query, if one was supplied.
    pub fn capability(&self, admin_query: Option<&str>) -> Capability {
        admin_query
            .map(|query| Capability::from_query(query, self.admin_secret.as_deref()))
            .unwrap_or_default()
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NOTEBOARD_CONFIG") {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
