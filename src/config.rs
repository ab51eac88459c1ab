//! Application-level configuration loading, including the player color palette and setup limits.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::registry::SessionLimits;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PUB_GOLF_BACK_CONFIG_PATH";
const DEFAULT_SNAPSHOT_PATH: &str = "data/pub-golf-storage.json";
const DEFAULT_UPLOADS_DIR: &str = "public/uploads";
const DEFAULT_UPLOADS_URL_PREFIX: &str = "/uploads";
/// Request body cap for the multipart photo routes.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
/// Fallback token used when the palette is configured empty.
const DEFAULT_COLOR: &str = "#FFFFFF";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    player_colors: Vec<String>,
    limits: SessionLimits,
    snapshot_path: PathBuf,
    uploads_dir: PathBuf,
    uploads_url_prefix: String,
    max_upload_bytes: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        colors = app_config.player_colors.len(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Color token for the roster slot at `index`, cycling through the palette.
    pub fn color_for_index(&self, index: usize) -> String {
        if self.player_colors.is_empty() {
            return DEFAULT_COLOR.to_string();
        }
        self.player_colors[index % self.player_colors.len()].clone()
    }

    /// Limits enforced when a session is created.
    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// File holding the persisted sessions.
    pub fn snapshot_path(&self) -> &PathBuf {
        &self.snapshot_path
    }

    /// Directory receiving relay uploads.
    pub fn uploads_dir(&self) -> &PathBuf {
        &self.uploads_dir
    }

    /// Public URL prefix under which [`Self::uploads_dir`] is served.
    pub fn uploads_url_prefix(&self) -> &str {
        &self.uploads_url_prefix
    }

    /// Largest request body accepted by the multipart photo routes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Override [`Self::max_upload_bytes`].
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Point the snapshot and uploads at another root directory.
    pub fn with_data_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.snapshot_path = root.join("pub-golf-storage.json");
        self.uploads_dir = root.join("uploads");
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            player_colors: default_colors(),
            limits: SessionLimits::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            uploads_url_prefix: DEFAULT_UPLOADS_URL_PREFIX.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    player_colors: Option<Vec<String>>,
    #[serde(default)]
    max_course_length: Option<usize>,
    #[serde(default)]
    max_players: Option<usize>,
    #[serde(default)]
    snapshot_path: Option<PathBuf>,
    #[serde(default)]
    uploads_dir: Option<PathBuf>,
    #[serde(default)]
    uploads_url_prefix: Option<String>,
    #[serde(default)]
    max_upload_bytes: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let limits = SessionLimits {
            max_course_length: value
                .max_course_length
                .unwrap_or(defaults.limits.max_course_length),
            max_players: value.max_players.unwrap_or(defaults.limits.max_players),
        };
        Self {
            player_colors: value.player_colors.unwrap_or(defaults.player_colors),
            limits,
            snapshot_path: value.snapshot_path.unwrap_or(defaults.snapshot_path),
            uploads_dir: value.uploads_dir.unwrap_or(defaults.uploads_dir),
            uploads_url_prefix: value
                .uploads_url_prefix
                .map(|prefix| prefix.trim_end_matches('/').to_string())
                .unwrap_or(defaults.uploads_url_prefix),
            max_upload_bytes: value
                .max_upload_bytes
                .filter(|bytes| *bytes > 0)
                .unwrap_or(defaults.max_upload_bytes),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in palette shipped with the binary.
fn default_colors() -> Vec<String> {
    [
        "#FF6B35", "#4ECDC4", "#FFE66D", "#C44569", "#95E1D3", "#F38181", "#AA96DA", "#FCBAD3",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
