//! Best-effort resolution of canonical tracks to platform-native ids.
//!
//! One query per track, `"{name} {artist}"`, one result requested, and the
//! top hit is accepted as-is. There is no confidence threshold and no
//! fallback query, so a wrong top hit is added silently.

use crate::models::Track;
use crate::providers::PlatformAdapter;

/// Number of search results requested per track.
pub const SEARCH_LIMIT: usize = 1;

#[derive(Debug, Default)]
pub struct Resolution {
    /// Native ids of matched tracks, in input order
    pub matched: Vec<String>,
    pub unmatched: Vec<Track>,
}

/// Resolve a single track to the native id of the platform's top hit.
pub async fn resolve<A>(adapter: &A, track: &Track) -> Option<String>
where
    A: PlatformAdapter + ?Sized,
{
    let query = track.search_query();
    let results = adapter.search_tracks(&query, SEARCH_LIMIT).await;

    match results.into_iter().next() {
        Some(hit) => {
            let id = hit.external_id;
            if id.is_none() {
                log::debug!(
                    "[{}] Top hit for '{}' has no native id",
                    adapter.platform(),
                    query
                );
            }
            id
        }
        None => {
            log::debug!("[{}] No match for '{}'", adapter.platform(), query);
            None
        }
    }
}

/// Resolve every track in order. Sequential: one search in flight at a time.
pub async fn resolve_all<A>(adapter: &A, tracks: &[Track]) -> Resolution
where
    A: PlatformAdapter + ?Sized,
{
    let mut resolution = Resolution::default();

    for track in tracks {
        match resolve(adapter, track).await {
            Some(id) => resolution.matched.push(id),
            None => resolution.unmatched.push(track.clone()),
        }
    }

    log::info!(
        "[{}] Matched {}/{} tracks",
        adapter.platform(),
        resolution.matched.len(),
        tracks.len()
    );

    resolution
}
