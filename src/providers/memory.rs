//! Scripted in-memory adapter used by the workflow tests.

use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::traits::PlatformAdapter;
use crate::providers::types::Platform;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    /// id -> (name, tracks); BTreeMap keeps listing order stable
    playlists: BTreeMap<String, (String, Vec<Track>)>,
    next_id: usize,
    searches: Vec<(String, usize)>,
}

pub struct InMemoryAdapter {
    platform: Platform,
    /// Searchable catalog, keyed by the exact query that finds each track
    catalog: HashMap<String, Track>,
    failing_playlists: HashSet<String>,
    fail_create: bool,
    fail_append: bool,
    state: Mutex<State>,
}

impl InMemoryAdapter {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            catalog: HashMap::new(),
            failing_playlists: HashSet::new(),
            fail_create: false,
            fail_append: false,
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_playlist(self, id: &str, name: &str, tracks: Vec<Track>) -> Self {
        self.state
            .lock()
            .unwrap()
            .playlists
            .insert(id.to_string(), (name.to_string(), tracks));
        self
    }

    /// Make `track` findable by its own search query.
    pub fn with_catalog_track(mut self, track: Track) -> Self {
        let native = format!("{}:{}", self.platform.id(), self.catalog.len());
        let track = track.with_external_id(native);
        self.catalog.insert(track.search_query(), track);
        self
    }

    pub fn with_failing_playlist(mut self, id: &str) -> Self {
        self.failing_playlists.insert(id.to_string());
        self
    }

    pub fn with_failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn with_failing_append(mut self) -> Self {
        self.fail_append = true;
        self
    }

    pub fn tracks_of(&self, id: &str) -> Option<Vec<Track>> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .get(id)
            .map(|(_, tracks)| tracks.clone())
    }

    pub fn playlist_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .values()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn searches(&self) -> Vec<(String, usize)> {
        self.state.lock().unwrap().searches.clone()
    }

    pub fn find_playlist(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|(_, (n, _))| n == name)
            .map(|(id, _)| id.clone())
    }
}

#[async_trait]
impl PlatformAdapter for InMemoryAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn list_playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, SyncError> {
        if self.failing_playlists.contains(playlist_id) {
            return Err(SyncError::Upstream(format!("HTTP 503 for {}", playlist_id)));
        }
        self.tracks_of(playlist_id)
            .ok_or_else(|| SyncError::PlaylistNotFound(playlist_id.to_string()))
    }

    async fn create_playlist(&self, name: &str) -> Result<String, SyncError> {
        if self.fail_create {
            return Err(SyncError::Upstream("HTTP 500 creating playlist".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("{}-new-{}", self.platform.id(), state.next_id);
        state
            .playlists
            .insert(id.clone(), (name.to_string(), Vec::new()));
        Ok(id)
    }

    async fn append_native_ids(
        &self,
        playlist_id: &str,
        native_ids: &[String],
    ) -> Result<usize, SyncError> {
        if self.fail_append {
            return Err(SyncError::Upstream("HTTP 500 adding tracks".to_string()));
        }
        let resolved: Vec<Track> = native_ids
            .iter()
            .filter_map(|id| {
                self.catalog
                    .values()
                    .find(|t| t.external_id.as_deref() == Some(id.as_str()))
                    .cloned()
            })
            .collect();
        let mut state = self.state.lock().unwrap();
        let (_, tracks) = state
            .playlists
            .get_mut(playlist_id)
            .ok_or_else(|| SyncError::PlaylistNotFound(playlist_id.to_string()))?;
        let added = resolved.len();
        tracks.extend(resolved);
        Ok(added)
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Vec<Track> {
        self.state
            .lock()
            .unwrap()
            .searches
            .push((query.to_string(), limit));
        self.catalog.get(query).into_iter().take(limit).cloned().collect()
    }

    async fn delete_playlist(&self, playlist_id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .playlists
            .remove(playlist_id)
            .is_some()
    }

    async fn rename_playlist(&self, playlist_id: &str, new_name: &str) -> bool {
        match self.state.lock().unwrap().playlists.get_mut(playlist_id) {
            Some((name, _)) => {
                *name = new_name.to_string();
                true
            }
            None => false,
        }
    }

    async fn get_user_playlists(&self) -> Vec<PlaylistRef> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .map(|(id, (name, tracks))| PlaylistRef {
                platform: self.platform,
                id: id.clone(),
                name: name.clone(),
                track_count: Some(tracks.len() as u32),
            })
            .collect()
    }
}
