use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::{Platform, PlatformAdapter};
use crate::spotify::client::SpotifyClient;
use async_trait::async_trait;

pub struct SpotifyProvider {
    client: SpotifyClient,
}

impl SpotifyProvider {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlatformAdapter for SpotifyProvider {
    fn platform(&self) -> Platform {
        Platform::Spotify
    }

    /// Accepts a bare id, a `spotify:playlist:` URI or an open.spotify.com URL.
    async fn list_playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, SyncError> {
        self.client.playlist_tracks(playlist_id).await
    }

    async fn create_playlist(&self, name: &str) -> Result<String, SyncError> {
        self.client.create_playlist(name).await
    }

    async fn append_native_ids(
        &self,
        playlist_id: &str,
        native_ids: &[String],
    ) -> Result<usize, SyncError> {
        self.client.add_uris(playlist_id, native_ids).await
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Vec<Track> {
        match self.client.search(query, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Spotify search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    async fn delete_playlist(&self, playlist_id: &str) -> bool {
        match self.client.unfollow_playlist(playlist_id).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to delete Spotify playlist {}: {}", playlist_id, e);
                false
            }
        }
    }

    async fn rename_playlist(&self, playlist_id: &str, new_name: &str) -> bool {
        match self.client.rename_playlist(playlist_id, new_name).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to rename Spotify playlist {}: {}", playlist_id, e);
                false
            }
        }
    }

    async fn get_user_playlists(&self) -> Vec<PlaylistRef> {
        match self.client.user_playlists().await {
            Ok(playlists) => playlists,
            Err(e) => {
                log::warn!("Failed to list Spotify playlists: {}", e);
                Vec::new()
            }
        }
    }
}
