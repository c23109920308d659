use crate::providers::Platform;
use serde::{Deserialize, Serialize};

/// Identity used by every set operation: exact, case-sensitive `(name, artist)`.
pub type TrackKey = (String, String);

/// Platform-agnostic track record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    /// Primary artist only
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Platform-specific scale, not comparable across platforms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
    /// Native id on the platform this record came from (never part of identity)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Track {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            album: String::new(),
            duration_ms: None,
            popularity: None,
            external_id: None,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_popularity(mut self, popularity: u32) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    pub fn key(&self) -> TrackKey {
        (self.name.clone(), self.artist.clone())
    }

    /// Text used to look the track up on another platform.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.name, self.artist)
    }
}

/// A playlist on one platform. `name` may be provisional until fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub platform: Platform,
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u32>,
}

impl PlaylistRef {
    pub fn new(platform: Platform, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            platform,
            id: id.into(),
            name: name.into(),
            track_count: None,
        }
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.platform)
    }
}
