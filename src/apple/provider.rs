use crate::apple::client::AppleMusicClient;
use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::{Platform, PlatformAdapter};
use async_trait::async_trait;

pub struct AppleMusicProvider {
    client: AppleMusicClient,
}

impl AppleMusicProvider {
    pub fn new(client: AppleMusicClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlatformAdapter for AppleMusicProvider {
    fn platform(&self) -> Platform {
        Platform::AppleMusic
    }

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
        self.client.add_songs(playlist_id, native_ids).await
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Vec<Track> {
        match self.client.search(query, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Apple Music search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    // The Apple Music API cannot delete or rename library playlists.
    async fn delete_playlist(&self, playlist_id: &str) -> bool {
        log::warn!(
            "Apple Music does not support deleting playlists via the API ({})",
            playlist_id
        );
        false
    }

    async fn rename_playlist(&self, playlist_id: &str, _new_name: &str) -> bool {
        log::warn!(
            "Apple Music does not support renaming playlists via the API ({})",
            playlist_id
        );
        false
    }

    async fn get_user_playlists(&self) -> Vec<PlaylistRef> {
        match self.client.library_playlists().await {
            Ok(playlists) => playlists,
            Err(e) => {
                log::warn!("Failed to list Apple Music playlists: {}", e);
                Vec::new()
            }
        }
    }
}
