//! Playlist statistics and cross-platform aggregation.
//!
//! Everything here is a pure function of its inputs. Artist rankings sort by
//! descending count with a stable sort, so ties keep first-seen order.

use crate::models::Track;
use crate::providers::Platform;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const PLATFORM_TOP_ARTISTS: usize = 10;
pub const OVERALL_TOP_ARTISTS: usize = 15;

/// `(artist, count)` pairs, highest count first.
pub type ArtistRanking = Vec<(String, usize)>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistStats {
    pub total_tracks: usize,
    pub duration_ms: u64,
    /// Full artist frequency table for the playlist
    pub top_artists: ArtistRanking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Stats(PlaylistStats),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistAnalysis {
    pub playlist_name: String,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

impl PlaylistAnalysis {
    pub fn stats(playlist_name: impl Into<String>, stats: PlaylistStats) -> Self {
        Self {
            playlist_name: playlist_name.into(),
            outcome: AnalysisOutcome::Stats(stats),
        }
    }

    pub fn error(playlist_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            playlist_name: playlist_name.into(),
            outcome: AnalysisOutcome::Error(message.into()),
        }
    }
}

pub type AnalysisResults = BTreeMap<Platform, Vec<PlaylistAnalysis>>;

/// Sum counts per artist, keeping first-seen order, then rank.
pub fn rank_artists<I, S>(counts: I, top_n: usize) -> ArtistRanking
where
    I: IntoIterator<Item = (S, usize)>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut table: ArtistRanking = Vec::new();

    for (artist, count) in counts {
        let artist = artist.as_ref();
        match index.get(artist) {
            Some(&i) => table[i].1 += count,
            None => {
                index.insert(artist.to_string(), table.len());
                table.push((artist.to_string(), count));
            }
        }
    }

    // stable: ties stay in first-seen order
    table.sort_by(|a, b| b.1.cmp(&a.1));
    table.truncate(top_n);
    table
}

pub fn analyze_playlist(tracks: &[Track]) -> PlaylistStats {
    PlaylistStats {
        total_tracks: tracks.len(),
        duration_ms: tracks.iter().map(|t| t.duration_ms.unwrap_or(0)).sum(),
        top_artists: rank_artists(tracks.iter().map(|t| (t.artist.as_str(), 1)), usize::MAX),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_playlists: usize,
    pub platforms_analyzed: Vec<Platform>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformDetail {
    /// Includes playlists whose analysis failed
    pub total_playlists: usize,
    pub total_tracks: usize,
    pub total_duration_ms: u64,
    pub top_artists: ArtistRanking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossPlatformInsights {
    pub overall_top_artists: ArtistRanking,
    /// Sum over platforms; the same track on two platforms counts twice
    pub total_tracks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub platform_details: BTreeMap<Platform, PlatformDetail>,
    pub cross_platform_insights: CrossPlatformInsights,
}

impl AnalysisReport {
    pub fn build(results: &AnalysisResults) -> Self {
        Self::build_at(results, Utc::now())
    }

    pub fn build_at(results: &AnalysisResults, generated_at: DateTime<Utc>) -> Self {
        let platform_details: BTreeMap<Platform, PlatformDetail> = results
            .iter()
            .map(|(platform, playlists)| (*platform, platform_detail(playlists)))
            .collect();

        let overall_top_artists = rank_artists(
            platform_details
                .values()
                .flat_map(|d| d.top_artists.iter().map(|(a, c)| (a.as_str(), *c))),
            OVERALL_TOP_ARTISTS,
        );

        Self {
            generated_at,
            summary: ReportSummary {
                total_playlists: results.values().map(Vec::len).sum(),
                platforms_analyzed: results.keys().copied().collect(),
            },
            cross_platform_insights: CrossPlatformInsights {
                overall_top_artists,
                total_tracks: platform_details.values().map(|d| d.total_tracks).sum(),
            },
            platform_details,
        }
    }
}

fn platform_detail(playlists: &[PlaylistAnalysis]) -> PlatformDetail {
    let stats: Vec<&PlaylistStats> = playlists
        .iter()
        .filter_map(|p| match &p.outcome {
            AnalysisOutcome::Stats(s) => Some(s),
            AnalysisOutcome::Error(_) => None,
        })
        .collect();

    PlatformDetail {
        total_playlists: playlists.len(),
        total_tracks: stats.iter().map(|s| s.total_tracks).sum(),
        total_duration_ms: stats.iter().map(|s| s.duration_ms).sum(),
        top_artists: rank_artists(
            stats
                .iter()
                .flat_map(|s| s.top_artists.iter().map(|(a, c)| (a.as_str(), *c))),
            PLATFORM_TOP_ARTISTS,
        ),
    }
}
