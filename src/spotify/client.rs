use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::models::*;
use crate::canonical;
use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::http;

pub const API_BASE: &str = "https://api.spotify.com/v1";
/// Spotify caps playlist writes at 100 URIs per request.
pub const ADD_BATCH_SIZE: usize = 100;
const PAGE_SIZE: u32 = 100;

pub struct SpotifyClient {
    client: Client,
    access_token: String,
    base_url: String,
    user_id: OnceCell<String>,
}

impl SpotifyClient {
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            access_token: access_token.into(),
            base_url: API_BASE.to_string(),
            user_id: OnceCell::new(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Extract playlist ID from various Spotify URL formats
    pub fn extract_playlist_id(url_or_id: &str) -> Result<String, SyncError> {
        let trimmed = url_or_id.trim();

        if let Some(id) = trimmed.strip_prefix("spotify:playlist:") {
            return Ok(id.to_string());
        }

        if trimmed.contains("open.spotify.com/") {
            if let Some(id_part) = trimmed.split("/playlist/").nth(1) {
                let id = id_part.split(['?', '/']).next().unwrap_or(id_part);
                if !id.is_empty() {
                    return Ok(id.to_string());
                }
            }
        }

        if trimmed.contains("spotify.link/") {
            return Err(SyncError::PlaylistNotFound(
                "Share links are not supported. Please use the full playlist URL.".to_string(),
            ));
        }

        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(trimmed.to_string());
        }

        Err(SyncError::PlaylistNotFound(format!(
            "Could not extract playlist ID from: {}",
            url_or_id
        )))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, operation: &str) -> Result<T, SyncError> {
        log::debug!("GET {}", url);
        let response = self.authed(self.client.get(url)).send().await?;
        let response = http::ensure_success(response, operation).await?;
        http::parse_json(response, operation).await
    }

    pub async fn current_user_id(&self) -> Result<String, SyncError> {
        self.user_id
            .get_or_try_init(|| async {
                let user: SpotifyUser = self.get_json(&self.url("/me"), "current user").await?;
                Ok::<_, SyncError>(user.id)
            })
            .await
            .cloned()
    }

    pub async fn playlist_tracks(&self, url_or_id: &str) -> Result<Vec<Track>, SyncError> {
        let playlist_id = Self::extract_playlist_id(url_or_id)?;
        log::info!("Fetching Spotify playlist: {}", playlist_id);

        let mut next = Some(format!(
            "{}?limit={}",
            self.url(&format!("/playlists/{}/tracks", playlist_id)),
            PAGE_SIZE
        ));
        let mut raws = Vec::new();

        while let Some(url) = next.take() {
            let response = self.authed(self.client.get(&url)).send().await?;
            let response = http::ensure_playlist(response, &playlist_id).await?;
            let page: Paging<PlaylistItem> = http::parse_json(response, "playlist tracks").await?;

            raws.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.track)
                    .map(SpotifyTrack::into_raw),
            );
            next = page.next;
        }

        let tracks = canonical::canonicalize_all(raws, "Spotify");
        log::info!("Successfully fetched {} tracks from playlist", tracks.len());
        Ok(tracks)
    }

    pub async fn create_playlist(&self, name: &str) -> Result<String, SyncError> {
        let user_id = self.current_user_id().await?;
        let url = self.url(&format!("/users/{}/playlists", urlencoding::encode(&user_id)));

        let response = self
            .authed(self.client.post(&url))
            .json(&CreatePlaylistRequest { name, public: false })
            .send()
            .await?;
        let response = http::ensure_success(response, "create playlist").await?;
        let created: SpotifyPlaylist = http::parse_json(response, "create playlist").await?;
        Ok(created.id)
    }

    /// Add URIs in batches; stops at the first failed batch.
    pub async fn add_uris(&self, playlist_id: &str, uris: &[String]) -> Result<usize, SyncError> {
        let playlist_id = Self::extract_playlist_id(playlist_id)?;
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let mut added = 0;

        for chunk in uris.chunks(ADD_BATCH_SIZE) {
            let response = self
                .authed(self.client.post(&url))
                .json(&AddItemsRequest { uris: chunk })
                .send()
                .await;

            let result = match response {
                Ok(response) => http::ensure_success(response, "add tracks").await.map(|_| ()),
                Err(e) => Err(SyncError::from(e)),
            };

            if let Err(e) = result {
                if added == 0 {
                    return Err(e);
                }
                log::warn!(
                    "Stopped adding to {} after {} tracks: {}",
                    playlist_id,
                    added,
                    e
                );
                break;
            }
            added += chunk.len();
        }

        Ok(added)
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, SyncError> {
        let url = format!(
            "{}?q={}&type=track&limit={}",
            self.url("/search"),
            urlencoding::encode(query),
            limit.clamp(1, 50)
        );
        let response: SearchResponse = self.get_json(&url, "search").await?;
        let raws = response
            .tracks
            .map(|page| page.items)
            .unwrap_or_default()
            .into_iter()
            .map(SpotifyTrack::into_raw);
        Ok(canonical::canonicalize_all(raws, "Spotify search"))
    }

    /// Spotify has no playlist deletion; unfollowing removes it from the library.
    pub async fn unfollow_playlist(&self, playlist_id: &str) -> Result<(), SyncError> {
        let playlist_id = Self::extract_playlist_id(playlist_id)?;
        let url = self.url(&format!("/playlists/{}/followers", playlist_id));
        let response = self.authed(self.client.delete(&url)).send().await?;
        http::ensure_success(response, "delete playlist").await?;
        Ok(())
    }

    pub async fn rename_playlist(&self, playlist_id: &str, name: &str) -> Result<(), SyncError> {
        let playlist_id = Self::extract_playlist_id(playlist_id)?;
        let url = self.url(&format!("/playlists/{}", playlist_id));
        let response = self
            .authed(self.client.put(&url))
            .json(&RenameRequest { name })
            .send()
            .await?;
        http::ensure_success(response, "rename playlist").await?;
        Ok(())
    }

    pub async fn user_playlists(&self) -> Result<Vec<PlaylistRef>, SyncError> {
        let mut next = Some(format!("{}?limit=50", self.url("/me/playlists")));
        let mut playlists = Vec::new();

        while let Some(url) = next.take() {
            let page: Paging<SpotifyPlaylist> = self.get_json(&url, "user playlists").await?;
            playlists.extend(page.items.into_iter().map(SpotifyPlaylist::into_ref));
            next = page.next;
        }

        Ok(playlists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stub::StubServer;

    #[test]
    fn test_extract_playlist_id() {
        let id = "37i9dQZF1DXcBWIGoYBM5M";
        assert_eq!(SpotifyClient::extract_playlist_id(id).unwrap(), id);
        assert_eq!(
            SpotifyClient::extract_playlist_id(&format!("spotify:playlist:{}", id)).unwrap(),
            id
        );
        assert_eq!(
            SpotifyClient::extract_playlist_id(&format!(
                "https://open.spotify.com/playlist/{}?si=abc123",
                id
            ))
            .unwrap(),
            id
        );
        assert_eq!(
            SpotifyClient::extract_playlist_id(&format!(
                "https://open.spotify.com/intl-de/playlist/{}",
                id
            ))
            .unwrap(),
            id
        );
    }

    #[test]
    fn test_extract_playlist_id_rejects_share_links() {
        assert!(matches!(
            SpotifyClient::extract_playlist_id("https://spotify.link/abcdef"),
            Err(SyncError::PlaylistNotFound(_))
        ));
        assert!(SpotifyClient::extract_playlist_id("not a playlist").is_err());
        assert!(SpotifyClient::extract_playlist_id("").is_err());
    }

    const PAGE_ONE: &str = r#"{"items": [
        {"track": {"uri": "spotify:track:1", "name": "Song A",
            "artists": [{"name": "Artist X"}, {"name": "Guest"}],
            "album": {"name": "Album"}, "duration_ms": 200000, "popularity": 70}},
        {"track": null}
    ], "next": "{base}/playlists/abc/tracks?offset=100&limit=100"}"#;

    const PAGE_TWO: &str = r#"{"items": [
        {"track": {"uri": "spotify:track:2", "name": "Song B", "artists": [{"name": "Artist Y"}]}},
        {"track": {"uri": "spotify:track:3", "name": "", "artists": [{"name": "Artist Z"}]}}
    ], "next": null}"#;

    fn client(server: &StubServer) -> SpotifyClient {
        SpotifyClient::new("token", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.base_url())
    }

    #[tokio::test]
    async fn test_playlist_tracks_follows_pages() {
        let server = StubServer::start(vec![
            ("GET /playlists/abc/tracks?limit=100", 200, PAGE_ONE),
            ("GET /playlists/abc/tracks?offset=100&limit=100", 200, PAGE_TWO),
        ])
        .await;

        let tracks = client(&server)
            .playlist_tracks("https://open.spotify.com/playlist/abc?si=xyz")
            .await
            .unwrap();

        // null items and nameless tracks are dropped
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].artist, "Artist X");
        assert_eq!(tracks[0].external_id.as_deref(), Some("spotify:track:1"));
        assert_eq!(tracks[1].name, "Song B");
        assert_eq!(tracks[1].album, "");
        assert_eq!(server.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_playlist() {
        let server = StubServer::start(Vec::new()).await;

        let result = client(&server).playlist_tracks("abc").await;

        assert_eq!(result.unwrap_err(), SyncError::PlaylistNotFound("abc".to_string()));
    }

    #[tokio::test]
    async fn test_search_sends_single_encoded_query() {
        let server = StubServer::start(vec![(
            "GET /search?q=Song%20A%20Artist%20X&type=track&limit=1",
            200,
            r#"{"tracks": {"items": [{"uri": "spotify:track:1", "name": "Song A",
                "artists": [{"name": "Artist X"}]}], "next": null}}"#,
        )])
        .await;

        let hits = client(&server).search("Song A Artist X", 1).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].external_id.as_deref(), Some("spotify:track:1"));
    }
}
