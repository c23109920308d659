use crate::canonical::RawTrack;
use crate::models::PlaylistRef;
use crate::providers::Platform;
use serde::{Deserialize, Serialize};

/// Artist used when a video carries no channel attribution.
pub const UNKNOWN_ARTIST: &str = "Unknown";
const TOPIC_SUFFIX: &str = " - Topic";

/// Auto-generated music channels are named "{Artist} - Topic".
pub fn artist_from_channel(channel: Option<String>) -> String {
    match channel {
        Some(title) if !title.trim().is_empty() => title
            .strip_suffix(TOPIC_SUFFIX)
            .map(str::to_string)
            .unwrap_or(title),
        _ => UNKNOWN_ARTIST.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: Option<String>,
    pub video_owner_channel_title: Option<String>,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub snippet: PlaylistItemSnippet,
}

impl PlaylistItem {
    pub fn into_raw(self) -> RawTrack {
        let snippet = self.snippet;
        RawTrack {
            name: snippet.title,
            artist: Some(artist_from_channel(snippet.video_owner_channel_title)),
            album: None,
            duration_ms: None,
            popularity: None,
            external_id: snippet.resource_id.and_then(|r| r.video_id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: Option<String>,
    pub channel_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchId,
    #[serde(default)]
    pub snippet: SearchSnippet,
}

impl SearchResult {
    pub fn into_raw(self) -> RawTrack {
        RawTrack {
            name: self.snippet.title,
            artist: Some(artist_from_channel(self.snippet.channel_title)),
            album: None,
            duration_ms: None,
            popularity: None,
            external_id: self.id.video_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistSnippet {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub item_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubePlaylist {
    pub id: String,
    #[serde(default)]
    pub snippet: PlaylistSnippet,
    pub content_details: Option<ContentDetails>,
}

impl YouTubePlaylist {
    pub fn into_ref(self) -> PlaylistRef {
        PlaylistRef {
            track_count: self.content_details.and_then(|d| d.item_count),
            ..PlaylistRef::new(Platform::YouTubeMusic, self.id, self.snippet.title)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPlaylistSnippet<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatus {
    pub privacy_status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub snippet: NewPlaylistSnippet<'a>,
    pub status: PlaylistStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource<'a> {
    pub kind: &'static str,
    pub video_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemSnippet<'a> {
    pub playlist_id: &'a str,
    pub resource_id: VideoResource<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertItemRequest<'a> {
    pub snippet: NewItemSnippet<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameSnippet<'a> {
    pub title: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameRequest<'a> {
    pub id: &'a str,
    pub snippet: RenameSnippet<'a>,
}
