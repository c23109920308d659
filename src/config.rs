use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::SyncError;

pub const APP_DIR_NAME: &str = "playsync";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_STOREFRONT: &str = "us";
pub const USER_AGENT: &str = concat!("playsync/", env!("CARGO_PKG_VERSION"));

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn get_config_file_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE_NAME)
}

pub fn default_backup_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("backups")
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    /// OAuth bearer token with playlist read/modify scopes
    pub access_token: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppleMusicConfig {
    pub developer_token: Option<String>,
    pub user_token: Option<String>,
    pub storefront: String,
}

impl Default for AppleMusicConfig {
    fn default() -> Self {
        Self {
            developer_token: None,
            user_token: None,
            storefront: DEFAULT_STOREFRONT.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// OAuth bearer token with the youtube scope
    pub access_token: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub spotify: SpotifyConfig,
    pub apple_music: AppleMusicConfig,
    pub youtube: YouTubeConfig,
    pub request_timeout_secs: u64,
    pub backup_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spotify: SpotifyConfig::default(),
            apple_music: AppleMusicConfig::default(),
            youtube: YouTubeConfig::default(),
            request_timeout_secs: REQUEST_TIMEOUT_SECONDS,
            backup_dir: None,
        }
    }
}

impl Settings {
    /// Config file (if any) overlaid with environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, SyncError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(get_config_file_path);
        let mut settings = Self::from_file(&path)?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Missing file means defaults; an unreadable or malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self, SyncError> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| SyncError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SPOTIFY_ACCESS_TOKEN") {
            self.spotify.access_token = Some(v);
        }
        if let Some(v) = get("APPLE_MUSIC_DEV_TOKEN") {
            self.apple_music.developer_token = Some(v);
        }
        if let Some(v) = get("APPLE_MUSIC_USER_TOKEN") {
            self.apple_music.user_token = Some(v);
        }
        if let Some(v) = get("APPLE_MUSIC_STOREFRONT") {
            self.apple_music.storefront = v;
        }
        if let Some(v) = get("YOUTUBE_ACCESS_TOKEN") {
            self.youtube.access_token = Some(v);
        }
        if let Some(v) = get("PLAYSYNC_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => log::warn!("Ignoring invalid PLAYSYNC_TIMEOUT_SECS: {}", v),
            }
        }
        if let Some(v) = get("PLAYSYNC_BACKUP_DIR") {
            self.backup_dir = Some(PathBuf::from(v));
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.backup_dir.clone().unwrap_or_else(default_backup_dir)
    }
}
