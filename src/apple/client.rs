use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::*;
use crate::canonical;
use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::http;

pub const API_HOST: &str = "https://api.music.apple.com";
pub const PLAYLIST_DESCRIPTION: &str = "Created by PlaySync";
const PAGE_SIZE: u32 = 100;

pub struct AppleMusicClient {
    client: Client,
    developer_token: String,
    user_token: String,
    storefront: String,
    host: String,
}

impl AppleMusicClient {
    pub fn new(
        developer_token: impl Into<String>,
        user_token: impl Into<String>,
        storefront: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            developer_token: developer_token.into(),
            user_token: user_token.into(),
            storefront: storefront.into(),
            host: API_HOST.to_string(),
        })
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.developer_token)
            .header("Music-User-Token", &self.user_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, operation: &str) -> Result<T, SyncError> {
        log::debug!("GET {}", url);
        let response = self.authed(self.client.get(url)).send().await?;
        let response = http::ensure_success(response, operation).await?;
        http::parse_json(response, operation).await
    }

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, SyncError> {
        log::info!("Fetching Apple Music playlist: {}", playlist_id);

        let mut next = Some(self.url(&format!(
            "/v1/me/library/playlists/{}/tracks?limit={}",
            urlencoding::encode(playlist_id),
            PAGE_SIZE
        )));
        let mut raws = Vec::new();

        while let Some(url) = next.take() {
            let response = self.authed(self.client.get(&url)).send().await?;
            let response = http::ensure_playlist(response, playlist_id).await?;
            let page: ResourceList<Song> = http::parse_json(response, "playlist tracks").await?;

            raws.extend(page.data.into_iter().map(Song::into_raw));
            next = page.next.map(|path| self.url(&path));
        }

        Ok(canonical::canonicalize_all(raws, "Apple Music"))
    }

    pub async fn create_playlist(&self, name: &str) -> Result<String, SyncError> {
        let response = self
            .authed(self.client.post(self.url("/v1/me/library/playlists")))
            .json(&CreatePlaylistRequest {
                attributes: NewPlaylistAttributes {
                    name,
                    description: PLAYLIST_DESCRIPTION,
                },
            })
            .send()
            .await?;
        let response = http::ensure_success(response, "create playlist").await?;
        let created: ResourceList<LibraryPlaylist> =
            http::parse_json(response, "create playlist").await?;

        created
            .data
            .into_iter()
            .next()
            .map(|p| p.id)
            .ok_or_else(|| SyncError::Upstream("create playlist: empty response".to_string()))
    }

    /// Add catalog songs in a single request.
    pub async fn add_songs(&self, playlist_id: &str, catalog_ids: &[String]) -> Result<usize, SyncError> {
        let body = AddTracksRequest {
            data: catalog_ids
                .iter()
                .map(|id| TrackReference {
                    id: id.as_str(),
                    kind: "songs",
                })
                .collect(),
        };
        let url = self.url(&format!(
            "/v1/me/library/playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        ));

        let response = self.authed(self.client.post(&url)).json(&body).send().await?;
        http::ensure_success(response, "add tracks").await?;
        Ok(catalog_ids.len())
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, SyncError> {
        let url = format!(
            "{}?term={}&types=songs&limit={}",
            self.url(&format!("/v1/catalog/{}/search", self.storefront)),
            urlencoding::encode(query),
            limit.clamp(1, 25)
        );
        let response: SearchResponse = self.get_json(&url, "search").await?;
        let raws = response
            .results
            .songs
            .map(|s| s.data)
            .unwrap_or_default()
            .into_iter()
            .map(Song::into_raw);
        Ok(canonical::canonicalize_all(raws, "Apple Music search"))
    }

    pub async fn library_playlists(&self) -> Result<Vec<PlaylistRef>, SyncError> {
        let mut next = Some(self.url("/v1/me/library/playlists?limit=100"));
        let mut playlists = Vec::new();

        while let Some(url) = next.take() {
            let page: ResourceList<LibraryPlaylist> = self.get_json(&url, "library playlists").await?;
            playlists.extend(page.data.into_iter().map(LibraryPlaylist::into_ref));
            next = page.next.map(|path| self.url(&path));
        }

        Ok(playlists)
    }
}
