//! On-disk artifacts: playlist exports, backup manifests, collection
//! snapshots and analysis reports.

use crate::errors::SyncError;
use crate::models::{PlaylistRef, Track};
use crate::providers::Platform;
use crate::report::AnalysisReport;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 3] = ["Track Name", "Artist", "Album"];
pub const REPORT_CSV_HEADER: [&str; 4] = ["Platform", "Playlists", "Total Tracks", "Top Artist"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn ensure_dir(dir: &Path) -> Result<(), SyncError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// File-system friendly form of a playlist name.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "playlist".to_string()
    } else {
        trimmed.to_string()
    }
}

// --- Single playlist -------------------------------------------------------

/// `{name}_{timestamp}.{ext}` under `dir`.
pub fn playlist_export_path(dir: &Path, name: &str, format: ExportFormat) -> PathBuf {
    dir.join(format!(
        "{}_{}.{}",
        sanitize_file_name(name),
        timestamp(),
        format.extension()
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDocument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistExport {
    pub playlist: PlaylistDocument,
}

pub fn write_playlist(
    path: &Path,
    format: ExportFormat,
    document: &PlaylistDocument,
) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    match format {
        ExportFormat::Json => {
            let export = PlaylistExport {
                playlist: document.clone(),
            };
            fs::write(path, serde_json::to_string_pretty(&export)?)?;
        }
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(CSV_HEADER)?;
            for track in &document.tracks {
                writer.write_record([&track.name, &track.artist, &track.album])?;
            }
            writer.flush()?;
        }
    }

    log::info!(
        "Exported {} tracks of '{}' to {}",
        document.tracks.len(),
        document.name,
        path.display()
    );
    Ok(())
}

/// Read a playlist previously written with [`ExportFormat::Json`].
pub fn read_playlist(path: &Path) -> Result<PlaylistDocument, SyncError> {
    let text = fs::read_to_string(path)?;
    let export: PlaylistExport = serde_json::from_str(&text)?;
    Ok(export.playlist)
}

// --- Backup manifest -------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEntry {
    pub id: String,
    pub name: String,
    pub tracks_count: usize,
    pub tracks: Vec<Track>,
}

impl BackupEntry {
    pub fn new(playlist: &PlaylistRef, tracks: Vec<Track>) -> Self {
        Self {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            tracks_count: tracks.len(),
            tracks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub backup_date: DateTime<Utc>,
    pub total_playlists: usize,
    pub playlists: Vec<BackupEntry>,
}

pub fn write_backup_manifest(
    dir: &Path,
    platform: Platform,
    entries: &[BackupEntry],
) -> Result<PathBuf, SyncError> {
    ensure_dir(dir)?;

    let manifest = BackupManifest {
        backup_date: Utc::now(),
        total_playlists: entries.len(),
        playlists: entries.to_vec(),
    };
    let path = dir.join(format!("{}_backup_{}.json", platform.id(), timestamp()));
    fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
    Ok(path)
}

pub fn read_backup_manifest(path: &Path) -> Result<BackupManifest, SyncError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

// --- Collection ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionEntry {
    Playlist {
        name: String,
        id: String,
        tracks: Vec<Track>,
    },
    Failed {
        name: String,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionExport {
    pub export_date: DateTime<Utc>,
    pub collection_name: String,
    pub platforms: BTreeMap<Platform, Vec<CollectionEntry>>,
}

pub fn write_collection(dir: &Path, collection: &CollectionExport) -> Result<PathBuf, SyncError> {
    ensure_dir(dir)?;
    let path = dir.join(format!("playlist_collection_{}.json", timestamp()));
    fs::write(&path, serde_json::to_string_pretty(collection)?)?;
    Ok(path)
}

// --- Report ----------------------------------------------------------------

pub fn write_report(
    dir: &Path,
    report: &AnalysisReport,
    format: ExportFormat,
) -> Result<PathBuf, SyncError> {
    ensure_dir(dir)?;
    let path = dir.join(format!(
        "playlist_report_{}.{}",
        timestamp(),
        format.extension()
    ));

    match format {
        ExportFormat::Json => {
            fs::write(&path, serde_json::to_string_pretty(report)?)?;
        }
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(REPORT_CSV_HEADER)?;
            for (platform, detail) in &report.platform_details {
                let top = detail
                    .top_artists
                    .first()
                    .map(|(artist, _)| artist.clone())
                    .unwrap_or_else(|| "N/A".to_string());
                writer.write_record([
                    platform.to_string(),
                    detail.total_playlists.to_string(),
                    detail.total_tracks.to_string(),
                    top,
                ])?;
            }
            writer.flush()?;
        }
    }

    Ok(path)
}
