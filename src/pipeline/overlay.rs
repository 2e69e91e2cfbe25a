use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ParseError;
use crate::pipeline::{align, parse};
use crate::types::scene::{Scene, Trace};
use crate::types::track::{SkippedPoint, Track};

pub const OVERLAY_TITLE: &str = "Overlayed 3D GPX Trails";

/// Every `*.gpx` file directly inside `dir`, sorted by name. A missing
/// directory is not an error; it just yields nothing.
pub fn discover_gpx_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!("No '{}' folder found", dir.display());
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Could not list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "gpx"))
        .collect();
    files.sort();
    files
}

pub fn report_skipped(source: &Path, skipped: &[SkippedPoint]) {
    for point in skipped {
        tracing::warn!(
            "Skipped trkpt #{} in {}: {}",
            point.index,
            source.display(),
            point.reason
        );
    }
}

/// Extracts `path` and keeps only the points that can be placed in 3D,
/// i.e. those with an elevation. The track is named after the file.
pub fn load_plottable_track(path: &Path) -> Result<Track, ParseError> {
    let extraction = parse::parse_file(path)?;
    report_skipped(path, &extraction.skipped);
    Ok(Track::from_path(path, extraction.points).with_elevation_only())
}

#[derive(Debug, Default)]
pub struct Batch {
    pub tracks: Vec<Track>,
    pub empty: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, ParseError)>,
}

/// Loads each file independently. A file that cannot be read or parsed is
/// reported and left out; the others are unaffected.
pub fn load_tracks(files: &[PathBuf]) -> Batch {
    let mut batch = Batch::default();
    for path in files {
        match load_plottable_track(path) {
            Ok(track) if track.is_empty() => {
                tracing::warn!("No valid points found in {}", path.display());
                batch.empty.push(path.clone());
            }
            Ok(track) => {
                tracing::debug!("Loaded {} points from {}", track.len(), path.display());
                batch.tracks.push(track);
            }
            Err(e) => {
                tracing::error!("Could not read {}: {}", path.display(), e);
                batch.failed.push((path.clone(), e));
            }
        }
    }
    batch
}

/// Scene of all tracks in input order, each shifted to its own origin when
/// `aligned` is set.
pub fn build_scene(title: &str, tracks: &[Track], aligned: bool) -> Scene {
    let traces = if aligned {
        align::align_tracks(tracks)
            .iter()
            .map(Trace::from_aligned)
            .collect()
    } else {
        tracks
            .iter()
            .filter(|track| !track.is_empty())
            .map(Trace::from_track)
            .collect()
    };
    Scene::new(title, traces, aligned)
}
