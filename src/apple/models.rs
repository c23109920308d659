use crate::canonical::RawTrack;
use crate::models::PlaylistRef;
use crate::providers::Platform;
use serde::{Deserialize, Serialize};

/// `{ "data": [...], "next": "/v1/..." }` envelope used by every endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayParams {
    pub catalog_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub duration_in_millis: Option<u64>,
    pub play_params: Option<PlayParams>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    pub id: String,
    #[serde(default)]
    pub attributes: SongAttributes,
}

impl Song {
    /// Library songs point at their catalog id; catalog songs are their own id.
    pub fn into_raw(self) -> RawTrack {
        let attrs = self.attributes;
        let catalog_id = attrs
            .play_params
            .and_then(|p| p.catalog_id)
            .unwrap_or(self.id);
        RawTrack {
            name: attrs.name,
            artist: attrs.artist_name,
            album: attrs.album_name,
            duration_ms: attrs.duration_in_millis,
            popularity: None,
            external_id: Some(catalog_id),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistAttributes {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryPlaylist {
    pub id: String,
    #[serde(default)]
    pub attributes: PlaylistAttributes,
}

impl LibraryPlaylist {
    pub fn into_ref(self) -> PlaylistRef {
        PlaylistRef::new(Platform::AppleMusic, self.id, self.attributes.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongResults {
    pub songs: Option<ResourceList<Song>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: SongResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPlaylistAttributes<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub attributes: NewPlaylistAttributes<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackReference<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest<'a> {
    pub data: Vec<TrackReference<'a>>,
}
