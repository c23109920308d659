//! Multi-playlist, multi-platform workflows.
//!
//! Items run one after another and targets within an item run one after
//! another. A failure is captured in the result log for the item (or target)
//! it belongs to and the batch moves on.

pub mod collection;
pub mod types;

pub use types::*;

use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::{Platform, PlatformAdapter, PlatformRegistry};
use crate::setops::{self, Comparison};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub unique_tracks: usize,
    #[serde(flatten)]
    pub applied: ApplyOutcome,
}

pub struct Orchestrator {
    registry: PlatformRegistry,
}

impl Orchestrator {
    pub fn new(registry: PlatformRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Convert each playlist onto every target as `"{name} (Converted)"`.
    /// A target equal to the source platform is recorded as skipped.
    pub async fn convert(&self, playlists: Vec<PlaylistRef>, targets: &[Platform]) -> BatchRun {
        let items = playlists
            .into_iter()
            .map(|source| {
                let name = TargetName::Fixed(format!("{} (Converted)", source.name));
                let (own, others): (Vec<Platform>, Vec<Platform>) =
                    targets.iter().copied().partition(|t| *t == source.platform);
                let platform = source.platform;
                let mut item = BatchItem::new(source, others, name);
                if !own.is_empty() {
                    item = item.with_skipped_target(platform, SAME_PLATFORM_REASON);
                }
                item
            })
            .collect();
        self.run(items).await
    }

    /// Execute sync rules in order.
    pub async fn sync(&self, rules: Vec<SyncRule>) -> BatchRun {
        let items = rules.into_iter().map(SyncRule::into_item).collect();
        self.run(items).await
    }

    /// Execute every item exactly once, in submission order.
    pub async fn run(&self, items: Vec<BatchItem>) -> BatchRun {
        let mut run = BatchRun::new();
        log::info!("Batch {} started with {} items", run.run_id, items.len());

        for mut item in items {
            if item.state != ItemState::Pending {
                log::warn!(
                    "Skipping item '{}' in state {:?}",
                    item.source.label(),
                    item.state
                );
                continue;
            }
            self.execute_item(&mut item, &mut run.results).await;
            run.items.push(item);
        }

        log::info!(
            "Batch {} finished: {} succeeded, {} failed, {} skipped",
            run.run_id,
            run.succeeded(),
            run.failed(),
            run.skipped()
        );
        run
    }

    async fn execute_item(&self, item: &mut BatchItem, results: &mut Vec<BatchResult>) {
        let source_label = item.source.label();

        for (target, reason) in &item.skipped_targets {
            results.push(BatchResult::skipped(&source_label, target.to_string(), reason));
        }

        if item.targets.is_empty() {
            log::warn!("'{}' has no target platforms", source_label);
            results.push(BatchResult::failed(&source_label, ALL_TARGETS, NO_TARGETS_ERROR));
            item.transition(ItemState::Failed);
            item.outcome = Some(ItemOutcome::Failed {
                error: NO_TARGETS_ERROR.to_string(),
            });
            return;
        }

        item.transition(ItemState::Fetching);
        let tracks = match self.fetch(&item.source).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Failed to fetch '{}': {}", source_label, e);
                results.push(BatchResult::failed(&source_label, ALL_TARGETS, &e));
                item.transition(ItemState::Failed);
                item.outcome = Some(ItemOutcome::Failed {
                    error: e.to_string(),
                });
                return;
            }
        };
        let tracks_fetched = tracks.len();
        log::info!("Retrieved {} tracks from {}", tracks_fetched, source_label);

        item.transition(ItemState::Resolving);
        let tracks = match &item.filter {
            Some(filter) => filter.apply(&tracks),
            None => tracks,
        };

        item.transition(ItemState::Applying);
        let (mut succeeded, mut failed) = (0, 0);
        for target in item.targets.clone() {
            let name = item.target_name.for_platform(target);
            let result = match self.apply(target, &name, &tracks).await {
                Ok(outcome) => {
                    succeeded += 1;
                    BatchResult::applied(&source_label, target.to_string(), &outcome)
                }
                Err(e) => {
                    failed += 1;
                    log::warn!("'{}' -> {} failed: {}", source_label, target, e);
                    BatchResult::failed(&source_label, target.to_string(), &e)
                }
            };
            results.push(result);
        }

        if failed > 0 && succeeded == 0 {
            item.transition(ItemState::Failed);
            item.outcome = Some(ItemOutcome::Failed {
                error: format!("all {} targets failed", failed),
            });
        } else {
            item.transition(ItemState::Succeeded);
            item.outcome = Some(ItemOutcome::Succeeded {
                tracks_fetched,
                targets_succeeded: succeeded,
                targets_failed: failed,
            });
        }
    }

    pub async fn fetch(&self, source: &PlaylistRef) -> Result<Vec<Track>, SyncError> {
        let adapter = self.registry.get(source.platform)?;
        adapter.list_playlist_tracks(&source.id).await
    }

    /// Create `name` on `target` and add `tracks` to it.
    pub async fn apply(
        &self,
        target: Platform,
        name: &str,
        tracks: &[Track],
    ) -> Result<ApplyOutcome, SyncError> {
        let adapter = self.registry.get(target)?;
        apply_to(adapter.as_ref(), name, tracks).await
    }

    /// Back up every playlist on each platform. One result per platform.
    pub async fn backup(&self, platforms: &[Platform], dir: &Path) -> BatchRun {
        let mut run = BatchRun::new();

        for &platform in platforms {
            let label = platform.to_string();
            let adapter = match self.registry.get(platform) {
                Ok(adapter) => adapter,
                Err(e) => {
                    run.results.push(BatchResult::failed(&label, "backup", &e));
                    continue;
                }
            };

            let platform_dir = dir.join(platform.id());
            match adapter.backup_all_playlists(Some(&platform_dir)).await {
                Some(path) => run
                    .results
                    .push(BatchResult::success(&label, path.display().to_string())),
                None => run.results.push(BatchResult::failed(
                    &label,
                    "backup",
                    format!("backup of {} failed", label),
                )),
            }
        }

        run
    }

    /// Fetch every source and compare them. Any fetch error aborts.
    pub async fn compare(&self, sources: &[PlaylistRef]) -> Result<Comparison, SyncError> {
        if sources.len() < setops::MIN_SOURCES {
            return Err(SyncError::InsufficientSources(sources.len()));
        }

        let mut sets = Vec::with_capacity(sources.len());
        for source in sources {
            sets.push((source.label(), self.fetch(source).await?));
        }
        setops::compare(&sets)
    }

    /// Merge every source into one new playlist on `target`.
    pub async fn merge_into(
        &self,
        sources: &[PlaylistRef],
        target: Platform,
        name: &str,
    ) -> Result<MergeOutcome, SyncError> {
        if sources.len() < setops::MIN_SOURCES {
            return Err(SyncError::InsufficientSources(sources.len()));
        }
        let adapter = self.registry.get(target)?;

        let mut fetched = Vec::with_capacity(sources.len());
        for source in sources {
            fetched.push(self.fetch(source).await?);
        }
        let merged = setops::merge(&fetched)?;

        let applied = apply_to(adapter.as_ref(), name, &merged).await?;
        Ok(MergeOutcome {
            unique_tracks: merged.len(),
            applied,
        })
    }
}

pub async fn apply_to(
    adapter: &dyn PlatformAdapter,
    name: &str,
    tracks: &[Track],
) -> Result<ApplyOutcome, SyncError> {
    let playlist_id = adapter.create_playlist(name).await?;
    let tracks_added = adapter.add_tracks(&playlist_id, tracks).await;

    log::info!(
        "Added {}/{} tracks to {} playlist: {}",
        tracks_added,
        tracks.len(),
        adapter.platform(),
        name
    );

    Ok(ApplyOutcome {
        playlist_id,
        playlist_name: name.to_string(),
        tracks_requested: tracks.len(),
        tracks_added,
    })
}
