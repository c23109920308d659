//! Work units and result records for batch workflows.

use crate::models::PlaylistRef;
use crate::providers::Platform;
use crate::setops::FilterCriteria;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SYNC_NAME: &str = "Synced Playlist";
pub const DEFAULT_SMART_LIMIT: usize = 20;
/// Target label used when an item failed before any target was attempted.
pub const ALL_TARGETS: &str = "all";
pub const SAME_PLATFORM_REASON: &str = "source and target are the same platform";
pub const NO_TARGETS_ERROR: &str = "no target platforms";

/// Lifecycle of one batch item.
///
/// `Pending -> Fetching -> Resolving -> Applying -> Succeeded | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Pending,
    Fetching,
    Resolving,
    Applying,
    Succeeded,
    Failed,
}

impl ItemState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemState::Succeeded | ItemState::Failed)
    }
}

/// How the playlist created on each target is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum TargetName {
    /// Same name on every target
    Fixed(String),
    /// `"{name} ({platform})"`
    PerPlatform(String),
}

impl TargetName {
    pub fn for_platform(&self, platform: Platform) -> String {
        match self {
            TargetName::Fixed(name) => name.clone(),
            TargetName::PerPlatform(name) => format!("{} ({})", name, platform),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    Succeeded {
        tracks_fetched: usize,
        targets_succeeded: usize,
        targets_failed: usize,
    },
    Failed {
        error: String,
    },
}

/// One playlist to copy from its source onto a set of targets.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub source: PlaylistRef,
    pub targets: Vec<Platform>,
    pub target_name: TargetName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterCriteria>,
    /// Requested targets left out of this item, with the reason
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_targets: Vec<(Platform, String)>,
    pub state: ItemState,
    pub outcome: Option<ItemOutcome>,
}

impl BatchItem {
    pub fn new(source: PlaylistRef, targets: Vec<Platform>, target_name: TargetName) -> Self {
        Self {
            source,
            targets,
            target_name,
            filter: None,
            skipped_targets: Vec::new(),
            state: ItemState::Pending,
            outcome: None,
        }
    }

    pub fn with_skipped_target(mut self, target: Platform, reason: impl Into<String>) -> Self {
        self.skipped_targets.push((target, reason.into()));
        self
    }

    pub fn with_filter(mut self, filter: FilterCriteria) -> Self {
        self.filter = Some(filter).filter(|f| !f.is_empty());
        self
    }

    pub(crate) fn transition(&mut self, next: ItemState) {
        log::debug!(
            "Item '{}': {:?} -> {:?}",
            self.source.label(),
            self.state,
            next
        );
        self.state = next;
    }
}

/// Declarative sync rule, as read from a rules file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRule {
    pub source_platform: Platform,
    pub target_platforms: Vec<Platform>,
    pub playlist_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterCriteria>,
}

impl SyncRule {
    pub fn into_item(self) -> BatchItem {
        let name = self.name.unwrap_or_else(|| DEFAULT_SYNC_NAME.to_string());
        let source = PlaylistRef::new(self.source_platform, self.playlist_id, name.clone());
        let item = BatchItem::new(source, self.target_platforms, TargetName::PerPlatform(name));
        match self.filters {
            Some(filter) => item.with_filter(filter),
            None => item,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Failed,
    /// Target not attempted, e.g. converting a playlist onto its own platform
    Skipped,
}

/// One row of the result log: one (item, target) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub source_label: String,
    pub target_label: String,
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks_requested: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks_added: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    pub fn success(source_label: impl Into<String>, target_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            target_label: target_label.into(),
            status: ResultStatus::Success,
            playlist_id: None,
            playlist_name: None,
            tracks_requested: None,
            tracks_added: None,
            error: None,
        }
    }

    pub fn failed(
        source_label: impl Into<String>,
        target_label: impl Into<String>,
        error: impl ToString,
    ) -> Self {
        Self {
            status: ResultStatus::Failed,
            error: Some(error.to_string()),
            ..Self::success(source_label, target_label)
        }
    }

    pub fn skipped(
        source_label: impl Into<String>,
        target_label: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self {
            status: ResultStatus::Skipped,
            error: Some(reason.to_string()),
            ..Self::success(source_label, target_label)
        }
    }

    pub fn applied(
        source_label: impl Into<String>,
        target_label: impl Into<String>,
        outcome: &ApplyOutcome,
    ) -> Self {
        Self {
            playlist_id: Some(outcome.playlist_id.clone()),
            playlist_name: Some(outcome.playlist_name.clone()),
            tracks_requested: Some(outcome.tracks_requested),
            tracks_added: Some(outcome.tracks_added),
            ..Self::success(source_label, target_label)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    /// Tracks that could not be matched on the target.
    pub fn unmatched(&self) -> usize {
        match (self.tracks_requested, self.tracks_added) {
            (Some(requested), Some(added)) => requested.saturating_sub(added),
            _ => 0,
        }
    }
}

/// Result of creating a playlist on one target and filling it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub playlist_id: String,
    pub playlist_name: String,
    pub tracks_requested: usize,
    pub tracks_added: usize,
}

/// Everything a batch workflow produced, in submission order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRun {
    pub run_id: Uuid,
    pub items: Vec<BatchItem>,
    pub results: Vec<BatchResult>,
}

impl BatchRun {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            items: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.count(ResultStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(ResultStatus::Skipped)
    }

    fn count(&self, status: ResultStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

impl Default for BatchRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Criteria for building a playlist from searches and existing playlists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    /// Looked up on every registered platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub filters: FilterCriteria,
}

impl SmartCriteria {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_SMART_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_rule_defaults() {
        let rule: SyncRule = serde_json::from_str(
            r#"{"source_platform": "spotify", "target_platforms": ["youtube_music"], "playlist_id": "abc"}"#,
        )
        .unwrap();

        let item = rule.into_item();

        assert_eq!(item.source.id, "abc");
        assert_eq!(item.state, ItemState::Pending);
        assert_eq!(
            item.target_name.for_platform(Platform::YouTubeMusic),
            "Synced Playlist (YouTube Music)"
        );
        assert!(item.filter.is_none());
    }

    #[test]
    fn test_empty_filter_is_dropped() {
        let item = BatchItem::new(
            PlaylistRef::new(Platform::Spotify, "p", "P"),
            vec![Platform::AppleMusic],
            TargetName::Fixed("P".to_string()),
        )
        .with_filter(FilterCriteria::default());
        assert!(item.filter.is_none());
    }

    #[test]
    fn test_result_unmatched_count() {
        let outcome = ApplyOutcome {
            playlist_id: "x".to_string(),
            playlist_name: "X".to_string(),
            tracks_requested: 5,
            tracks_added: 3,
        };
        let result = BatchResult::applied("src", "Spotify", &outcome);
        assert!(result.is_success());
        assert_eq!(result.unmatched(), 2);
        assert_eq!(BatchResult::failed("src", "all", "boom").unmatched(), 0);
    }

    #[test]
    fn test_result_serialization() {
        let json = serde_json::to_value(BatchResult::failed("Mix (Spotify)", "all", "boom")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
        assert!(json.get("tracks_added").is_none());
    }
}
