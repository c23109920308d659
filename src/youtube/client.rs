use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::*;
use crate::canonical;
use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::http;

pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const PLAYLIST_DESCRIPTION: &str = "Created by PlaySync";
/// YouTube's "Music" video category.
const MUSIC_CATEGORY_ID: &str = "10";
const PAGE_SIZE: u32 = 50;

pub struct YouTubeClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            access_token: access_token.into(),
            base_url: API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
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

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, SyncError> {
        log::info!("Fetching YouTube Music playlist: {}", playlist_id);

        let mut raws = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}?part=snippet&playlistId={}&maxResults={}",
                self.url("/playlistItems"),
                urlencoding::encode(playlist_id),
                PAGE_SIZE
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
            }

            let response = self.authed(self.client.get(&url)).send().await?;
            let response = http::ensure_playlist(response, playlist_id).await?;
            let page: ListResponse<PlaylistItem> = http::parse_json(response, "playlist tracks").await?;

            raws.extend(page.items.into_iter().map(PlaylistItem::into_raw));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(canonical::canonicalize_all(raws, "YouTube Music"))
    }

    pub async fn create_playlist(&self, name: &str) -> Result<String, SyncError> {
        let response = self
            .authed(self.client.post(format!("{}?part=snippet,status", self.url("/playlists"))))
            .json(&CreatePlaylistRequest {
                snippet: NewPlaylistSnippet {
                    title: name,
                    description: PLAYLIST_DESCRIPTION,
                },
                status: PlaylistStatus {
                    privacy_status: "private",
                },
            })
            .send()
            .await?;
        let response = http::ensure_success(response, "create playlist").await?;
        let created: YouTubePlaylist = http::parse_json(response, "create playlist").await?;
        Ok(created.id)
    }

    /// The API inserts one video per request; failures are skipped and only
    /// successful inserts are counted.
    pub async fn add_videos(&self, playlist_id: &str, video_ids: &[String]) -> Result<usize, SyncError> {
        let url = format!("{}?part=snippet", self.url("/playlistItems"));
        let mut added = 0;
        let mut last_error = None;

        for video_id in video_ids {
            let body = InsertItemRequest {
                snippet: NewItemSnippet {
                    playlist_id,
                    resource_id: VideoResource {
                        kind: "youtube#video",
                        video_id: video_id.as_str(),
                    },
                },
            };

            let result = match self.authed(self.client.post(&url)).json(&body).send().await {
                Ok(response) => http::ensure_success(response, "add track").await.map(|_| ()),
                Err(e) => Err(SyncError::from(e)),
            };

            match result {
                Ok(()) => added += 1,
                Err(e) => {
                    log::warn!("Failed to add video {} to {}: {}", video_id, playlist_id, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if added == 0 => Err(e),
            _ => Ok(added),
        }
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, SyncError> {
        let url = format!(
            "{}?part=snippet&type=video&videoCategoryId={}&q={}&maxResults={}",
            self.url("/search"),
            MUSIC_CATEGORY_ID,
            urlencoding::encode(query),
            limit.clamp(1, 50)
        );
        let response: ListResponse<SearchResult> = self.get_json(&url, "search").await?;
        let raws = response.items.into_iter().map(SearchResult::into_raw);
        Ok(canonical::canonicalize_all(raws, "YouTube Music search"))
    }

    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<(), SyncError> {
        let url = format!(
            "{}?id={}",
            self.url("/playlists"),
            urlencoding::encode(playlist_id)
        );
        let response = self.authed(self.client.delete(&url)).send().await?;
        http::ensure_success(response, "delete playlist").await?;
        Ok(())
    }

    pub async fn rename_playlist(&self, playlist_id: &str, name: &str) -> Result<(), SyncError> {
        let response = self
            .authed(self.client.put(format!("{}?part=snippet", self.url("/playlists"))))
            .json(&RenameRequest {
                id: playlist_id,
                snippet: RenameSnippet { title: name },
            })
            .send()
            .await?;
        http::ensure_success(response, "rename playlist").await?;
        Ok(())
    }

    pub async fn user_playlists(&self) -> Result<Vec<PlaylistRef>, SyncError> {
        let mut playlists = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}?part=snippet,contentDetails&mine=true&maxResults={}",
                self.url("/playlists"),
                PAGE_SIZE
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
            }

            let page: ListResponse<YouTubePlaylist> = self.get_json(&url, "user playlists").await?;
            playlists.extend(page.items.into_iter().map(YouTubePlaylist::into_ref));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(playlists)
    }
}
