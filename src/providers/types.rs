use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "spotify", alias = "Spotify")]
    Spotify,
    #[serde(rename = "apple_music", alias = "Apple Music")]
    AppleMusic,
    #[serde(rename = "youtube_music", alias = "YouTube Music")]
    YouTubeMusic,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Spotify, Platform::AppleMusic, Platform::YouTubeMusic];

    /// Stable lowercase identifier, used in file names and `platform:id` arguments.
    pub fn id(&self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::AppleMusic => "apple_music",
            Platform::YouTubeMusic => "youtube_music",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Spotify => "Spotify",
            Platform::AppleMusic => "Apple Music",
            Platform::YouTubeMusic => "YouTube Music",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Platform {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "spotify" => Ok(Platform::Spotify),
            "applemusic" | "apple" => Ok(Platform::AppleMusic),
            "youtubemusic" | "youtube" | "ytmusic" => Ok(Platform::YouTubeMusic),
            _ => Err(SyncError::InvalidPlatform(format!(
                "'{}'. Valid: spotify, apple_music, youtube_music",
                s
            ))),
        }
    }
}
