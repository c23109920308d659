use crate::errors::SyncError;
use crate::export;
use crate::matching;
use crate::models::{PlaylistRef, Track};
use crate::providers::types::Platform;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Capability set every streaming platform client exposes to the core.
///
/// Read and create operations propagate their errors. Everything else is
/// best-effort: failures are logged inside the adapter and reported through
/// a degraded return value (a short count, `false`, an empty list) so a
/// batch never aborts because one track or one management call failed.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// User-friendly name
    fn name(&self) -> &str {
        self.platform().display_name()
    }

    async fn list_playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, SyncError>;

    /// Returns the id of the new playlist.
    async fn create_playlist(&self, name: &str) -> Result<String, SyncError>;

    /// Append already-resolved native ids. Returns how many were written.
    async fn append_native_ids(
        &self,
        playlist_id: &str,
        native_ids: &[String],
    ) -> Result<usize, SyncError>;

    /// Catalog search. Empty on no results or on failure.
    async fn search_tracks(&self, query: &str, limit: usize) -> Vec<Track>;

    async fn delete_playlist(&self, playlist_id: &str) -> bool;

    async fn rename_playlist(&self, playlist_id: &str, new_name: &str) -> bool;

    /// Empty on failure.
    async fn get_user_playlists(&self) -> Vec<PlaylistRef>;

    /// Resolve each track on this platform and add the matches.
    ///
    /// Unmatched tracks are skipped; the caller compares the returned count
    /// with `tracks.len()` to detect under-matching.
    async fn add_tracks(&self, playlist_id: &str, tracks: &[Track]) -> usize {
        let resolution = matching::resolve_all(self, tracks).await;
        if resolution.matched.is_empty() {
            return 0;
        }

        match self.append_native_ids(playlist_id, &resolution.matched).await {
            Ok(added) => added,
            Err(e) => {
                log::warn!(
                    "[{}] Failed to add {} tracks to {}: {}",
                    self.platform(),
                    resolution.matched.len(),
                    playlist_id,
                    e
                );
                0
            }
        }
    }

    /// Snapshot every user playlist into a manifest file and return its path.
    ///
    /// Playlists whose tracks cannot be fetched are left out of the manifest.
    async fn backup_all_playlists(&self, dir: Option<&Path>) -> Option<PathBuf> {
        let playlists = self.get_user_playlists().await;
        let mut entries = Vec::with_capacity(playlists.len());

        for playlist in playlists {
            match self.list_playlist_tracks(&playlist.id).await {
                Ok(tracks) => entries.push(export::BackupEntry::new(&playlist, tracks)),
                Err(e) => {
                    log::warn!(
                        "[{}] Skipping playlist '{}' in backup: {}",
                        self.platform(),
                        playlist.name,
                        e
                    );
                }
            }
        }

        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(crate::config::default_backup_dir);

        match export::write_backup_manifest(&dir, self.platform(), &entries) {
            Ok(path) => {
                log::info!(
                    "[{}] Backed up {} playlists to {}",
                    self.platform(),
                    entries.len(),
                    path.display()
                );
                Some(path)
            }
            Err(e) => {
                log::warn!("[{}] Backup failed: {}", self.platform(), e);
                None
            }
        }
    }
}
