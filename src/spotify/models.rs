use crate::canonical::RawTrack;
use crate::models::PlaylistRef;
use crate::providers::Platform;
use serde::{Deserialize, Serialize};

/// One page of a Spotify paginated response
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub uri: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: Option<SpotifyAlbum>,
    pub duration_ms: Option<u64>,
    pub popularity: Option<u32>,
}

impl SpotifyTrack {
    /// Only the first listed artist is kept; the track URI is the native id.
    pub fn into_raw(self) -> RawTrack {
        RawTrack {
            name: self.name,
            artist: self.artists.into_iter().next().and_then(|a| a.name),
            album: self.album.and_then(|a| a.name),
            duration_ms: self.duration_ms,
            popularity: self.popularity,
            external_id: self.uri,
        }
    }
}

/// Playlist entry; `track` is null for removed or unavailable items
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging<SpotifyTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracksSummary {
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub tracks: Option<TracksSummary>,
}

impl SpotifyPlaylist {
    pub fn into_ref(self) -> PlaylistRef {
        PlaylistRef {
            platform: Platform::Spotify,
            id: self.id,
            name: self.name,
            track_count: self.tracks.and_then(|t| t.total),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddItemsRequest<'a> {
    pub uris: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameRequest<'a> {
    pub name: &'a str,
}
