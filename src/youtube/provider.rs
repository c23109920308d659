use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::{Platform, PlatformAdapter};
use crate::youtube::client::YouTubeClient;
use async_trait::async_trait;

pub struct YouTubeMusicProvider {
    client: YouTubeClient,
}

impl YouTubeMusicProvider {
    pub fn new(client: YouTubeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlatformAdapter for YouTubeMusicProvider {
    fn platform(&self) -> Platform {
        Platform::YouTubeMusic
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
        self.client.add_videos(playlist_id, native_ids).await
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Vec<Track> {
        match self.client.search(query, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("YouTube Music search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    async fn delete_playlist(&self, playlist_id: &str) -> bool {
        match self.client.delete_playlist(playlist_id).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to delete YouTube playlist {}: {}", playlist_id, e);
                false
            }
        }
    }

    async fn rename_playlist(&self, playlist_id: &str, new_name: &str) -> bool {
        match self.client.rename_playlist(playlist_id, new_name).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to rename YouTube playlist {}: {}", playlist_id, e);
                false
            }
        }
    }

    async fn get_user_playlists(&self) -> Vec<PlaylistRef> {
        match self.client.user_playlists().await {
            Ok(playlists) => playlists,
            Err(e) => {
                log::warn!("Failed to list YouTube playlists: {}", e);
                Vec::new()
            }
        }
    }
}
