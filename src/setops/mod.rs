//! Set operations over canonical tracks, keyed by `(name, artist)`.

pub mod filter;

pub use filter::FilterCriteria;

use crate::errors::SyncError;
use crate::models::{Track, TrackKey};
use serde::Serialize;
use std::collections::HashSet;

/// Minimum number of sources for merge and compare.
pub const MIN_SOURCES: usize = 2;

fn ensure_sources(count: usize) -> Result<(), SyncError> {
    if count < MIN_SOURCES {
        return Err(SyncError::InsufficientSources(count));
    }
    Ok(())
}

/// Union of all sources by identity. The first copy of each key wins, album
/// included. Output is in first-seen order, which callers should not rely on.
pub fn merge(sources: &[Vec<Track>]) -> Result<Vec<Track>, SyncError> {
    ensure_sources(sources.len())?;

    let mut seen: HashSet<TrackKey> = HashSet::new();
    let merged: Vec<Track> = sources
        .iter()
        .flatten()
        .filter(|track| seen.insert(track.key()))
        .cloned()
        .collect();

    log::info!("Merged {} sources into {} unique tracks", sources.len(), merged.len());
    Ok(merged)
}

/// Tracks unique to one source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceDifference {
    pub label: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Tracks present in every source
    pub common: Vec<Track>,
    /// One entry per source, in input order
    pub unique: Vec<SourceDifference>,
}

/// Intersection across every source plus each source's difference against it.
///
/// Each source is deduplicated by identity first; the common list keeps the
/// copies from the first source.
pub fn compare(sources: &[(String, Vec<Track>)]) -> Result<Comparison, SyncError> {
    ensure_sources(sources.len())?;

    let key_sets: Vec<HashSet<TrackKey>> = sources
        .iter()
        .map(|(_, tracks)| tracks.iter().map(Track::key).collect())
        .collect();

    let in_all = |key: &TrackKey| key_sets.iter().all(|set| set.contains(key));

    let common = dedup(&sources[0].1)
        .into_iter()
        .filter(|track| in_all(&track.key()))
        .collect();

    let unique = sources
        .iter()
        .map(|(label, tracks)| SourceDifference {
            label: label.clone(),
            tracks: dedup(tracks)
                .into_iter()
                .filter(|track| !in_all(&track.key()))
                .collect(),
        })
        .collect();

    Ok(Comparison { common, unique })
}

fn dedup(tracks: &[Track]) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .iter()
        .filter(|track| seen.insert(track.key()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(name: &str, artist: &str) -> Track {
        Track::new(name, artist)
    }

    fn keys(tracks: &[Track]) -> HashSet<TrackKey> {
        tracks.iter().map(Track::key).collect()
    }

    #[test]
    fn test_merge_collapses_duplicates() {
        let a = vec![t("One", "X"), t("Two", "X"), t("One", "X")];
        let b = vec![t("Two", "X"), t("Three", "Y")];

        let merged = merge(&[a.clone(), b.clone()]).unwrap();

        assert_eq!(merged.len(), 3);
        let expected: HashSet<TrackKey> = keys(&a).union(&keys(&b)).cloned().collect();
        assert_eq!(keys(&merged), expected);
    }

    #[test]
    fn test_merge_keeps_first_album() {
        let a = vec![t("One", "X").with_album("First")];
        let b = vec![t("One", "X").with_album("Second")];

        let merged = merge(&[a, b]).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].album, "First");
    }

    #[test]
    fn test_merge_is_case_sensitive() {
        let merged = merge(&[vec![t("One", "X")], vec![t("one", "X")]]).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_requires_two_sources() {
        assert_eq!(
            merge(&[vec![t("One", "X")]]).unwrap_err(),
            SyncError::InsufficientSources(1)
        );
    }

    #[test]
    fn test_compare_partitions_sources() {
        let sources = vec![
            ("A".to_string(), vec![t("1", "X"), t("2", "X"), t("3", "Y")]),
            ("B".to_string(), vec![t("1", "X"), t("3", "Y"), t("4", "Z")]),
            ("C".to_string(), vec![t("1", "X"), t("5", "Z"), t("1", "X")]),
        ];

        let cmp = compare(&sources).unwrap();
        let common = keys(&cmp.common);

        assert_eq!(common, keys(&[t("1", "X")]));
        for ((_, tracks), diff) in sources.iter().zip(&cmp.unique) {
            assert!(common.is_subset(&keys(tracks)));
            assert!(keys(&diff.tracks).is_disjoint(&common));
        }
        assert_eq!(cmp.unique[0].label, "A");
        assert_eq!(keys(&cmp.unique[0].tracks), keys(&[t("2", "X"), t("3", "Y")]));
        assert_eq!(keys(&cmp.unique[2].tracks), keys(&[t("5", "Z")]));

        let mut rebuilt = common.clone();
        for diff in &cmp.unique {
            rebuilt.extend(keys(&diff.tracks));
        }
        let all: HashSet<TrackKey> = sources.iter().flat_map(|(_, ts)| keys(ts)).collect();
        assert_eq!(rebuilt, all);
    }

    #[test]
    fn test_compare_requires_two_sources() {
        let sources = vec![("A".to_string(), vec![t("1", "X")])];
        assert_eq!(
            compare(&sources).unwrap_err(),
            SyncError::InsufficientSources(1)
        );
        assert!(compare(&[]).is_err());
    }
}
