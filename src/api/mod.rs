//! High-level, ergonomic library API: mask single scenes or batches of
//! scene pairs, and preprocess WorldCover tile directories. Prefer these
//! entrypoints over the low-level core modules when embedding seamask.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::params::MaskingParams;
use crate::core::pipeline;
pub use crate::core::pipeline::{SceneOutcome, SceneReport, SkipReason};
use crate::core::worldcover::preprocess::preprocess_tiles;
use crate::error::{Error, Result};

/// An HH/HV input pair for one scene.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenePair {
    pub hh: PathBuf,
    pub hv: PathBuf,
}

impl ScenePair {
    /// Load a scene list from a JSON file of `{"hh": ..., "hv": ...}` objects.
    pub fn load_list(path: &Path) -> Result<Vec<ScenePair>> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Processing(format!("invalid scene list {}: {}", path.display(), e))
        })
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Mask a single scene pair with the given parameters.
pub fn process_scene(hh: &Path, hv: &Path, params: &MaskingParams) -> Result<SceneOutcome> {
    pipeline::process_scene(hh, hv, params)
}

/// Mask a list of scene pairs sequentially. With `continue_on_error`, a
/// failing scene is counted and the batch moves on; otherwise the first
/// error aborts the run.
pub fn process_scenes(
    pairs: &[ScenePair],
    params: &MaskingParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for (idx, pair) in pairs.iter().enumerate() {
        info!("Processing scene {}/{}", idx + 1, pairs.len());
        match process_scene(&pair.hh, &pair.hv, params) {
            Ok(SceneOutcome::Masked(scene)) => {
                info!(
                    "Masked scene {} ({} tiles, {:.1}% masked)",
                    scene.bounds,
                    scene.tiles.len(),
                    scene.masked_fraction * 100.0
                );
                report.processed += 1;
            }
            Ok(SceneOutcome::Skipped(reason)) => {
                warn!("Skipped scene {}: {}", pair.hh.display(), reason);
                report.skipped += 1;
            }
            Err(e) if continue_on_error => {
                warn!("Error processing {}: {}", pair.hh.display(), e);
                report.errors += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Batch complete: processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(report)
}

/// Convert raw WorldCover class tiles into preprocessed land/water tiles.
pub fn preprocess_worldcover_dir(input_dir: &Path, output_dir: &Path) -> Result<usize> {
    preprocess_tiles(input_dir, output_dir)
}
