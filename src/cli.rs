//! Command-line surface: argument parsing, adapter wiring and result output.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::apple::{AppleMusicClient, AppleMusicProvider};
use crate::config::Settings;
use crate::errors::SyncError;
use crate::export::{self, ExportFormat};
use crate::models::PlaylistRef;
use crate::orchestrator::{BatchRun, Orchestrator, ResultStatus, SmartCriteria, SyncRule};
use crate::providers::{Platform, PlatformRegistry};
use crate::report::{AnalysisReport, ArtistRanking};
use crate::setops::filter::FilterCriteria;
use crate::spotify::{SpotifyClient, SpotifyProvider};
use crate::youtube::{YouTubeClient, YouTubeMusicProvider};

pub const DEFAULT_MERGE_NAME: &str = "Merged Playlist";
pub const DEFAULT_SMART_NAME: &str = "Smart Playlist";
pub const DEFAULT_COLLECTION_NAME: &str = "My Collection";

#[derive(Parser, Debug)]
#[command(name = "playsync")]
#[command(about = "Move, merge and back up playlists across Spotify, Apple Music and YouTube Music")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print raw result records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy playlists onto other platforms
    Convert {
        #[arg(required = true, value_name = "PLATFORM:ID", value_parser = parse_source)]
        sources: Vec<PlaylistRef>,
        #[arg(long = "to", required = true, value_delimiter = ',')]
        targets: Vec<Platform>,
    },
    /// Run sync rules from a JSON file
    Sync {
        #[arg(long, value_name = "FILE")]
        rules: PathBuf,
    },
    /// Union several playlists into a new one
    Merge {
        #[arg(required = true, num_args = 2.., value_name = "PLATFORM:ID", value_parser = parse_source)]
        sources: Vec<PlaylistRef>,
        #[arg(long = "to")]
        target: Platform,
        #[arg(long, default_value = DEFAULT_MERGE_NAME)]
        name: String,
    },
    /// Show tracks shared by all playlists and unique to each
    Compare {
        #[arg(required = true, num_args = 2.., value_name = "PLATFORM:ID", value_parser = parse_source)]
        sources: Vec<PlaylistRef>,
    },
    /// Back up every playlist of the given platforms
    Backup {
        /// Defaults to every configured platform
        #[arg(long = "platform", value_delimiter = ',')]
        platforms: Vec<Platform>,
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Write one playlist to a JSON or CSV file
    Export {
        #[arg(value_name = "PLATFORM:ID", value_parser = parse_source)]
        source: PlaylistRef,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Snapshot several playlists into one collection file
    Collection {
        #[arg(required = true, value_name = "PLATFORM:ID", value_parser = parse_source)]
        sources: Vec<PlaylistRef>,
        #[arg(long, default_value = DEFAULT_COLLECTION_NAME)]
        name: String,
        #[arg(long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
    /// Recreate a playlist from a JSON export
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long = "to")]
        target: Platform,
        #[arg(long)]
        name: Option<String>,
    },
    /// Analyze playlists and summarize them per platform
    Report {
        #[arg(required = true, value_name = "PLATFORM:ID", value_parser = parse_source)]
        sources: Vec<PlaylistRef>,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Write the report file here instead of printing it
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Build a filtered playlist from searches or an existing playlist
    Smart(SmartArgs),
    /// List the user's playlists on a platform
    Playlists { platform: Platform },
}

#[derive(Args, Debug)]
pub struct SmartArgs {
    #[arg(long = "to")]
    pub target: Platform,
    #[arg(long, default_value = DEFAULT_SMART_NAME)]
    pub name: String,
    #[arg(long)]
    pub query: Option<String>,
    /// Looked up on every configured platform
    #[arg(long)]
    pub playlist: Option<String>,
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub min_popularity: Option<u32>,
    #[arg(long)]
    pub max_duration_ms: Option<u64>,
    #[arg(long = "exclude-artist")]
    pub exclude_artists: Vec<String>,
    #[arg(long = "include-artist")]
    pub include_artists: Vec<String>,
}

impl SmartArgs {
    pub fn criteria(&self) -> SmartCriteria {
        SmartCriteria {
            search_query: self.query.clone(),
            playlist_id: self.playlist.clone(),
            limit: self.limit,
            filters: FilterCriteria {
                min_popularity: self.min_popularity,
                max_duration_ms: self.max_duration_ms,
                exclude_artists: self.exclude_artists.iter().cloned().collect(),
                include_artists: self.include_artists.iter().cloned().collect(),
            },
        }
    }
}

/// Parse `platform:id`. Only the first colon separates, so Spotify URIs and
/// URLs pass through intact. The display name starts out as the id.
pub fn parse_source(value: &str) -> Result<PlaylistRef, SyncError> {
    let (platform, id) = value.split_once(':').ok_or_else(|| {
        SyncError::InvalidPlatform(format!("expected PLATFORM:ID, got '{}'", value))
    })?;
    let platform: Platform = platform.parse()?;
    let id = id.trim();
    if id.is_empty() {
        return Err(SyncError::PlaylistNotFound(format!(
            "missing playlist id in '{}'",
            value
        )));
    }
    Ok(PlaylistRef::new(platform, id, id))
}

/// Register an adapter for every platform whose credentials are configured.
pub fn build_registry(settings: &Settings) -> Result<PlatformRegistry, SyncError> {
    let timeout = settings.request_timeout();
    let mut registry = PlatformRegistry::new();

    if let Some(token) = &settings.spotify.access_token {
        let client = SpotifyClient::new(token.clone(), timeout)?;
        registry.register(Arc::new(SpotifyProvider::new(client)));
    }

    let apple = &settings.apple_music;
    match (&apple.developer_token, &apple.user_token) {
        (Some(developer), Some(user)) => {
            let client = AppleMusicClient::new(
                developer.clone(),
                user.clone(),
                apple.storefront.clone(),
                timeout,
            )?;
            registry.register(Arc::new(AppleMusicProvider::new(client)));
        }
        (Some(_), None) | (None, Some(_)) => {
            log::warn!("Apple Music needs both a developer token and a user token; skipping");
        }
        (None, None) => {}
    }

    if let Some(token) = &settings.youtube.access_token {
        let client = YouTubeClient::new(token.clone(), timeout)?;
        registry.register(Arc::new(YouTubeMusicProvider::new(client)));
    }

    log::info!("Configured platforms: {:?}", registry.platforms());
    Ok(registry)
}

/// Key used to match a user-supplied id against listed playlist ids.
/// Spotify accepts URLs and URIs for the same playlist, so they reduce to
/// the bare id; other platforms compare ids as given.
fn lookup_key(platform: Platform, id: &str) -> String {
    match platform {
        Platform::Spotify => {
            SpotifyClient::extract_playlist_id(id).unwrap_or_else(|_| id.trim().to_string())
        }
        _ => id.trim().to_string(),
    }
}

/// Replace provisional names with the titles from the user's playlist lists.
/// One listing per platform; unknown ids keep their provisional name.
async fn resolve_names(registry: &PlatformRegistry, sources: &mut [PlaylistRef]) {
    let mut titles: HashMap<Platform, HashMap<String, String>> = HashMap::new();

    for source in sources.iter_mut() {
        let platform = source.platform;
        if !titles.contains_key(&platform) {
            let listed = match registry.get(platform) {
                Ok(adapter) => adapter
                    .get_user_playlists()
                    .await
                    .into_iter()
                    .map(|p| (lookup_key(platform, &p.id), p.name))
                    .collect(),
                Err(_) => HashMap::new(),
            };
            titles.insert(platform, listed);
        }

        let key = lookup_key(platform, &source.id);
        if let Some(name) = titles.get(&platform).and_then(|names| names.get(&key)) {
            source.name = name.clone();
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let registry = build_registry(&settings)?;
    if registry.is_empty() {
        log::warn!("No platform credentials configured");
    }
    let orchestrator = Orchestrator::new(registry);
    let json = cli.json;

    match cli.command {
        Command::Convert {
            mut sources,
            targets,
        } => {
            resolve_names(orchestrator.registry(), &mut sources).await;
            let run = orchestrator.convert(sources, &targets).await;
            print_run(&run, json)?;
        }
        Command::Sync { rules } => {
            let rules = read_rules(&rules)?;
            let run = orchestrator.sync(rules).await;
            print_run(&run, json)?;
        }
        Command::Merge {
            sources,
            target,
            name,
        } => {
            let outcome = orchestrator.merge_into(&sources, target, &name).await?;
            if json {
                print_json(&outcome)?;
            } else {
                println!(
                    "Merged {} unique tracks into '{}' on {}: {} added",
                    outcome.unique_tracks, outcome.applied.playlist_name, target, outcome.applied.tracks_added
                );
            }
        }
        Command::Compare { mut sources } => {
            resolve_names(orchestrator.registry(), &mut sources).await;
            let comparison = orchestrator.compare(&sources).await?;
            if json {
                print_json(&comparison)?;
            } else {
                println!("Common tracks: {}", comparison.common.len());
                for track in &comparison.common {
                    println!("  {} - {}", track.artist, track.name);
                }
                for difference in &comparison.unique {
                    println!("Unique to {}: {}", difference.label, difference.tracks.len());
                    for track in &difference.tracks {
                        println!("  {} - {}", track.artist, track.name);
                    }
                }
            }
        }
        Command::Backup { platforms, dir } => {
            let platforms = if platforms.is_empty() {
                orchestrator.registry().platforms()
            } else {
                platforms
            };
            let dir = dir.unwrap_or_else(|| settings.backup_dir());
            let run = orchestrator.backup(&platforms, &dir).await;
            print_run(&run, json)?;
        }
        Command::Export {
            mut source,
            format,
            output,
        } => {
            resolve_names(orchestrator.registry(), std::slice::from_mut(&mut source)).await;
            let document = orchestrator.export_playlist(&source).await?;
            let path = output
                .unwrap_or_else(|| export::playlist_export_path(Path::new("."), &document.name, format));
            export::write_playlist(&path, format, &document)?;
            println!("Exported {} tracks to {}", document.tracks.len(), path.display());
        }
        Command::Collection {
            mut sources,
            name,
            dir,
        } => {
            resolve_names(orchestrator.registry(), &mut sources).await;
            let collection = orchestrator.export_collection(&name, &sources).await;
            let path = export::write_collection(&dir, &collection)?;
            println!("Exported collection '{}' to {}", name, path.display());
        }
        Command::Import { file, target, name } => {
            let document = export::read_playlist(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let outcome = orchestrator
                .import_playlist(&document, target, name.as_deref())
                .await?;
            if json {
                print_json(&outcome)?;
            } else {
                println!(
                    "Imported '{}' to {}: {}/{} tracks added",
                    outcome.playlist_name, target, outcome.tracks_added, outcome.tracks_requested
                );
            }
        }
        Command::Report {
            mut sources,
            format,
            dir,
        } => {
            resolve_names(orchestrator.registry(), &mut sources).await;
            let results = orchestrator.analyze(&sources).await;
            let report = AnalysisReport::build(&results);
            match dir {
                Some(dir) => {
                    let path = export::write_report(&dir, &report, format)?;
                    println!("Report written to {}", path.display());
                }
                None if json => print_json(&report)?,
                None => print_report(&report),
            }
        }
        Command::Smart(args) => {
            let outcome = orchestrator
                .smart_playlist(&args.criteria(), args.target, &args.name)
                .await?;
            if json {
                print_json(&outcome)?;
            } else {
                println!(
                    "Created smart playlist '{}' on {}: {} tracks added",
                    outcome.playlist_name, args.target, outcome.tracks_added
                );
            }
        }
        Command::Playlists { platform } => {
            let adapter = orchestrator.registry().get(platform)?;
            let playlists = adapter.get_user_playlists().await;
            if json {
                print_json(&playlists)?;
            } else {
                for playlist in &playlists {
                    match playlist.track_count {
                        Some(count) => println!("{}\t{}\t{} tracks", playlist.id, playlist.name, count),
                        None => println!("{}\t{}", playlist.id, playlist.name),
                    }
                }
            }
        }
    }

    Ok(())
}

fn read_rules(path: &Path) -> anyhow::Result<Vec<SyncRule>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file {}", path.display()))?;
    let rules: Vec<SyncRule> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid rules file {}", path.display()))?;
    Ok(rules)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_run(run: &BatchRun, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(run);
    }

    for result in &run.results {
        let status = match result.status {
            ResultStatus::Success => "ok",
            ResultStatus::Failed => "FAILED",
            ResultStatus::Skipped => "skipped",
        };
        let detail = match (&result.error, result.tracks_added, result.tracks_requested) {
            (Some(error), _, _) => error.clone(),
            (None, Some(added), Some(requested)) => format!("{}/{} tracks added", added, requested),
            _ => String::new(),
        };
        println!(
            "[{}] {} -> {} {}",
            status, result.source_label, result.target_label, detail
        );
    }
    println!(
        "{} succeeded, {} failed, {} skipped (run {})",
        run.succeeded(),
        run.failed(),
        run.skipped(),
        run.run_id
    );
    Ok(())
}

fn print_ranking(ranking: &ArtistRanking) {
    for (artist, count) in ranking {
        println!("    {} ({})", artist, count);
    }
}

fn print_report(report: &AnalysisReport) {
    println!(
        "Analyzed {} playlists on {} platforms",
        report.summary.total_playlists,
        report.summary.platforms_analyzed.len()
    );
    for (platform, detail) in &report.platform_details {
        println!(
            "{}: {} playlists, {} tracks, {} min",
            platform,
            detail.total_playlists,
            detail.total_tracks,
            detail.total_duration_ms / 60_000
        );
        print_ranking(&detail.top_artists);
    }
    println!(
        "Across platforms: {} tracks",
        report.cross_platform_insights.total_tracks
    );
    print_ranking(&report.cross_platform_insights.overall_top_artists);
}
