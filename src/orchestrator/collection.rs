//! Workflows that gather tracks from several playlists or platforms:
//! smart playlists, import/export, collection snapshots and analysis.

use super::{apply_to, ApplyOutcome, Orchestrator, SmartCriteria};
use crate::errors::SyncError;
use crate::export::{CollectionEntry, CollectionExport, PlaylistDocument};
use crate::models::{PlaylistRef, Track};
use crate::providers::Platform;
use crate::report::{self, AnalysisResults, PlaylistAnalysis};
use chrono::Utc;
use std::collections::BTreeMap;

impl Orchestrator {
    /// Collect tracks from every registered platform, filter them and create
    /// the result on `target`. A platform that fails to deliver is skipped.
    pub async fn smart_playlist(
        &self,
        criteria: &SmartCriteria,
        target: Platform,
        name: &str,
    ) -> Result<ApplyOutcome, SyncError> {
        let adapter = self.registry().get(target)?;
        let mut collected: Vec<Track> = Vec::new();

        for platform in self.registry().platforms() {
            let source = self.registry().get(platform)?;

            if let Some(query) = criteria.search_query.as_deref() {
                collected.extend(source.search_tracks(query, criteria.limit()).await);
            }

            if let Some(playlist_id) = criteria.playlist_id.as_deref() {
                match source.list_playlist_tracks(playlist_id).await {
                    Ok(tracks) => collected.extend(tracks),
                    Err(e) => log::warn!("Error collecting tracks from {}: {}", platform, e),
                }
            }
        }

        let filtered = criteria.filters.apply(&collected);
        log::info!(
            "Smart playlist '{}': {} collected, {} after filters",
            name,
            collected.len(),
            filtered.len()
        );

        apply_to(adapter.as_ref(), name, &filtered).await
    }

    /// Fetch a playlist into an exportable document.
    pub async fn export_playlist(&self, source: &PlaylistRef) -> Result<PlaylistDocument, SyncError> {
        let tracks = self.fetch(source).await?;
        Ok(PlaylistDocument {
            name: source.name.clone(),
            description: format!("Exported from {}", source.platform),
            tracks,
        })
    }

    /// Recreate an exported playlist on `target`.
    pub async fn import_playlist(
        &self,
        document: &PlaylistDocument,
        target: Platform,
        name: Option<&str>,
    ) -> Result<ApplyOutcome, SyncError> {
        let adapter = self.registry().get(target)?;
        let name = name.unwrap_or(document.name.as_str());
        apply_to(adapter.as_ref(), name, &document.tracks).await
    }

    /// Snapshot many playlists. Per-playlist failures become error entries.
    pub async fn export_collection(
        &self,
        collection_name: &str,
        playlists: &[PlaylistRef],
    ) -> CollectionExport {
        let mut platforms: BTreeMap<Platform, Vec<CollectionEntry>> = BTreeMap::new();

        for playlist in playlists {
            let entry = match self.fetch(playlist).await {
                Ok(tracks) => CollectionEntry::Playlist {
                    name: playlist.name.clone(),
                    id: playlist.id.clone(),
                    tracks,
                },
                Err(e) => {
                    log::warn!("Collection export: {} failed: {}", playlist.label(), e);
                    CollectionEntry::Failed {
                        name: playlist.name.clone(),
                        error: e.to_string(),
                    }
                }
            };
            platforms.entry(playlist.platform).or_default().push(entry);
        }

        CollectionExport {
            export_date: Utc::now(),
            collection_name: collection_name.to_string(),
            platforms,
        }
    }

    /// Per-playlist statistics grouped by platform, ready for
    /// [`report::AnalysisReport::build`].
    pub async fn analyze(&self, playlists: &[PlaylistRef]) -> AnalysisResults {
        let mut results = AnalysisResults::new();

        for playlist in playlists {
            let analysis = match self.fetch(playlist).await {
                Ok(tracks) => {
                    PlaylistAnalysis::stats(&playlist.name, report::analyze_playlist(&tracks))
                }
                Err(e) => PlaylistAnalysis::error(&playlist.name, e.to_string()),
            };
            results.entry(playlist.platform).or_default().push(analysis);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::InMemoryAdapter;
    use crate::providers::PlatformRegistry;
    use crate::report::{AnalysisOutcome, AnalysisReport};
    use crate::setops::FilterCriteria;
    use std::sync::Arc;

    fn t(name: &str, artist: &str) -> Track {
        Track::new(name, artist)
    }

    #[tokio::test]
    async fn test_smart_playlist_collects_filters_and_tolerates_failures() {
        let spotify = InMemoryAdapter::new(Platform::Spotify).with_playlist(
            "shared",
            "Shared",
            vec![
                t("Song A", "Artist X").with_popularity(80),
                t("Song B", "Artist Y").with_popularity(5),
            ],
        );
        // no "shared" playlist here: the lookup fails and is skipped
        let youtube = Arc::new(
            InMemoryAdapter::new(Platform::YouTubeMusic).with_catalog_track(t("Song A", "Artist X")),
        );
        let orchestrator = Orchestrator::new(
            PlatformRegistry::new()
                .with(Arc::new(spotify))
                .with(youtube.clone()),
        );
        let criteria = SmartCriteria {
            playlist_id: Some("shared".to_string()),
            filters: FilterCriteria {
                min_popularity: Some(50),
                ..Default::default()
            },
            ..Default::default()
        };

        let outcome = orchestrator
            .smart_playlist(&criteria, Platform::YouTubeMusic, "Popular")
            .await
            .unwrap();

        assert_eq!(outcome.tracks_requested, 1);
        assert_eq!(outcome.tracks_added, 1);
        assert!(youtube.find_playlist("Popular").is_some());
    }

    #[tokio::test]
    async fn test_smart_playlist_uses_search_limit() {
        let youtube = Arc::new(
            InMemoryAdapter::new(Platform::YouTubeMusic).with_catalog_track(t("Song A", "Artist X")),
        );
        let orchestrator = Orchestrator::new(PlatformRegistry::new().with(youtube.clone()));
        let criteria = SmartCriteria {
            search_query: Some("Song A Artist X".to_string()),
            ..Default::default()
        };

        let outcome = orchestrator
            .smart_playlist(&criteria, Platform::YouTubeMusic, "Found")
            .await
            .unwrap();

        assert_eq!(outcome.tracks_added, 1);
        assert_eq!(youtube.searches()[0], ("Song A Artist X".to_string(), 20));
    }

    #[tokio::test]
    async fn test_export_then_import_round_trip() {
        let spotify = InMemoryAdapter::new(Platform::Spotify)
            .with_playlist("p1", "Chill", vec![t("Song A", "Artist X"), t("Song B", "Artist Y")]);
        let apple = Arc::new(
            InMemoryAdapter::new(Platform::AppleMusic)
                .with_catalog_track(t("Song A", "Artist X"))
                .with_catalog_track(t("Song B", "Artist Y")),
        );
        let orchestrator =
            Orchestrator::new(PlatformRegistry::new().with(Arc::new(spotify)).with(apple.clone()));

        let document = orchestrator
            .export_playlist(&PlaylistRef::new(Platform::Spotify, "p1", "Chill"))
            .await
            .unwrap();
        let outcome = orchestrator
            .import_playlist(&document, Platform::AppleMusic, None)
            .await
            .unwrap();

        assert_eq!(outcome.playlist_name, "Chill");
        assert_eq!(outcome.tracks_added, 2);
        let names: Vec<String> = apple
            .tracks_of(&outcome.playlist_id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Song A", "Song B"]);
    }

    #[tokio::test]
    async fn test_collection_and_analysis_record_errors() {
        let spotify = InMemoryAdapter::new(Platform::Spotify)
            .with_playlist("p1", "Chill", vec![t("Song A", "Artist X"), t("Song B", "Artist X")])
            .with_failing_playlist("p2");
        let orchestrator = Orchestrator::new(PlatformRegistry::new().with(Arc::new(spotify)));
        let playlists = vec![
            PlaylistRef::new(Platform::Spotify, "p1", "Chill"),
            PlaylistRef::new(Platform::Spotify, "p2", "Broken"),
            PlaylistRef::new(Platform::AppleMusic, "a1", "Elsewhere"),
        ];

        let collection = orchestrator.export_collection("Mine", &playlists).await;
        let spotify_entries = &collection.platforms[&Platform::Spotify];
        assert!(matches!(spotify_entries[0], CollectionEntry::Playlist { .. }));
        assert!(matches!(spotify_entries[1], CollectionEntry::Failed { .. }));
        assert_eq!(collection.platforms[&Platform::AppleMusic].len(), 1);

        let results = orchestrator.analyze(&playlists).await;
        assert!(matches!(
            results[&Platform::Spotify][1].outcome,
            AnalysisOutcome::Error(_)
        ));
        let report = AnalysisReport::build(&results);
        assert_eq!(report.summary.total_playlists, 3);
        assert_eq!(
            report.platform_details[&Platform::Spotify].top_artists,
            vec![("Artist X".to_string(), 2)]
        );
    }
}
