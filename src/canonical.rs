//! Conversion of platform track records into canonical [`Track`]s.
//!
//! Every adapter maps its own JSON shape into a [`RawTrack`] and hands it to
//! [`canonicalize`]; nothing past this point sees platform-specific fields.

use crate::errors::SyncError;
use crate::models::Track;
use serde::{Deserialize, Serialize};

/// A track as reported by a platform, with every attribute optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrack {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    pub popularity: Option<u32>,
    pub external_id: Option<String>,
}

/// Build a canonical track. Missing optional attributes fall back to an
/// empty album and absent duration/popularity; a missing (or blank) name or
/// artist is an error.
pub fn canonicalize(raw: RawTrack) -> Result<Track, SyncError> {
    let name = required(raw.name, "name")?;
    let artist = required(raw.artist, "artist")?;

    Ok(Track {
        album: raw.album.unwrap_or_default(),
        duration_ms: raw.duration_ms,
        popularity: raw.popularity,
        external_id: raw.external_id.filter(|id| !id.is_empty()),
        ..Track::new(name, artist)
    })
}

/// Canonicalize a batch, dropping malformed records with a warning.
pub fn canonicalize_all(raws: impl IntoIterator<Item = RawTrack>, source: &str) -> Vec<Track> {
    raws.into_iter()
        .filter_map(|raw| match canonicalize(raw) {
            Ok(track) => Some(track),
            Err(e) => {
                log::warn!("Dropping malformed track from {}: {}", source, e);
                None
            }
        })
        .collect()
}

fn required(value: Option<String>, field: &str) -> Result<String, SyncError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SyncError::MissingRequiredField(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: Option<&str>, artist: Option<&str>) -> RawTrack {
        RawTrack {
            name: name.map(String::from),
            artist: artist.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_album_becomes_empty() {
        let track = canonicalize(raw(Some("Song"), Some("Artist"))).unwrap();
        assert_eq!(track.album, "");
        assert_eq!(track.duration_ms, None);
        assert_eq!(track.popularity, None);
    }

    #[test]
    fn test_missing_name_fails() {
        let err = canonicalize(raw(None, Some("Artist"))).unwrap_err();
        assert_eq!(err, SyncError::MissingRequiredField("name".to_string()));
    }

    #[test]
    fn test_missing_artist_fails() {
        let err = canonicalize(raw(Some("Song"), Some(""))).unwrap_err();
        assert_eq!(err, SyncError::MissingRequiredField("artist".to_string()));
    }

    #[test]
    fn test_keeps_optional_fields_verbatim() {
        let track = canonicalize(RawTrack {
            name: Some("  Song ".to_string()),
            artist: Some("Artist".to_string()),
            album: Some("Album".to_string()),
            duration_ms: Some(215_000),
            popularity: Some(71),
            external_id: Some("spotify:track:abc".to_string()),
        })
        .unwrap();
        // no whitespace or case normalization
        assert_eq!(track.name, "  Song ");
        assert_eq!(track.album, "Album");
        assert_eq!(track.duration_ms, Some(215_000));
        assert_eq!(track.popularity, Some(71));
        assert_eq!(track.external_id.as_deref(), Some("spotify:track:abc"));
    }

    #[test]
    fn test_canonicalize_all_skips_bad_records() {
        let tracks = canonicalize_all(
            vec![raw(Some("A"), Some("X")), raw(None, Some("Y")), raw(Some("C"), Some("Z"))],
            "test",
        );
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].name, "C");
    }
}
