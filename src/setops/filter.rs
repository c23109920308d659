use crate::models::Track;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Independent track predicates, combined with AND.
///
/// Unset keys are no-ops, and so are zero thresholds and empty artist sets.
/// Missing popularity or duration reads as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_popularity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub exclude_artists: HashSet<String>,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub include_artists: HashSet<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.min_popularity.unwrap_or(0) == 0
            && self.max_duration_ms.unwrap_or(0) == 0
            && self.exclude_artists.is_empty()
            && self.include_artists.is_empty()
    }

    pub fn matches(&self, track: &Track) -> bool {
        if let Some(min) = self.min_popularity.filter(|v| *v > 0) {
            if track.popularity.unwrap_or(0) < min {
                return false;
            }
        }

        if let Some(max) = self.max_duration_ms.filter(|v| *v > 0) {
            if track.duration_ms.unwrap_or(0) > max {
                return false;
            }
        }

        if self.exclude_artists.contains(&track.artist) {
            return false;
        }

        self.include_artists.is_empty() || self.include_artists.contains(&track.artist)
    }

    pub fn apply(&self, tracks: &[Track]) -> Vec<Track> {
        let kept: Vec<Track> = tracks.iter().filter(|t| self.matches(t)).cloned().collect();
        if kept.len() != tracks.len() {
            log::debug!("Filter kept {}/{} tracks", kept.len(), tracks.len());
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Track> {
        vec![
            Track::new("Hit", "X").with_popularity(90).with_duration_ms(200_000),
            Track::new("Deep Cut", "X").with_popularity(10).with_duration_ms(180_000),
            Track::new("Epic", "Y").with_popularity(70).with_duration_ms(600_000),
            Track::new("Unknown", "Z"),
        ]
    }

    fn names(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_empty_criteria_keeps_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(criteria.apply(&sample()), sample());
    }

    #[test]
    fn test_min_popularity_treats_missing_as_zero() {
        let criteria = FilterCriteria {
            min_popularity: Some(50),
            ..Default::default()
        };
        assert_eq!(names(&criteria.apply(&sample())), vec!["Hit", "Epic"]);
    }

    #[test]
    fn test_max_duration() {
        let criteria = FilterCriteria {
            max_duration_ms: Some(300_000),
            ..Default::default()
        };
        assert_eq!(
            names(&criteria.apply(&sample())),
            vec!["Hit", "Deep Cut", "Unknown"]
        );
    }

    #[test]
    fn test_zero_thresholds_are_noops() {
        let criteria = FilterCriteria {
            min_popularity: Some(0),
            max_duration_ms: Some(0),
            ..Default::default()
        };
        assert!(criteria.is_empty());
        assert_eq!(criteria.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_artist_sets_compose() {
        let criteria = FilterCriteria {
            include_artists: ["X", "Y"].iter().map(|s| s.to_string()).collect(),
            exclude_artists: ["Y"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        assert_eq!(names(&criteria.apply(&sample())), vec!["Hit", "Deep Cut"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let criteria = FilterCriteria {
            min_popularity: Some(20),
            max_duration_ms: Some(400_000),
            exclude_artists: ["Z"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let once = criteria.apply(&sample());
        assert_eq!(criteria.apply(&once), once);
    }

    #[test]
    fn test_deserialize_partial_criteria() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"min_popularity": 40, "exclude_artists": ["X"]}"#).unwrap();
        assert_eq!(criteria.min_popularity, Some(40));
        assert!(criteria.exclude_artists.contains("X"));
        assert!(criteria.include_artists.is_empty());
    }
}
