//! Per-scene masking pipeline: tile selection, mosaicking, reprojection,
//! mask construction and cleanup, and channel masking with atomic output.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::core::apply::apply_mask;
use crate::core::band::RasterBand;
use crate::core::grid::BoundingBox;
use crate::core::mask::{build_land_mask, land_fraction};
use crate::core::morphology::{binary_closing, binary_dilation, fill_holes};
use crate::core::params::MaskingParams;
use crate::core::reproject::reproject_to_grid;
use crate::core::worldcover::{locate_tiles, mosaic_tiles};
use crate::error::{Error, Result};
use crate::io::GdalRasterReader;
use crate::io::writers::write_geotiff_f32;
use crate::types::{Channel, LandClassSet, TileVariant};

const SMALL_SCENE_MPX: f64 = 10.0;
const MEDIUM_SCENE_MPX: f64 = 50.0;

/// Why a scene produced no outputs without being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The HH channel contains no valid samples at all.
    NoValidPixels,
    /// WorldCover coverage is entirely nodata within the scene footprint.
    NoCoverage,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoValidPixels => write!(f, "no valid pixels in the scene"),
            SkipReason::NoCoverage => write!(f, "no WorldCover coverage within the scene bounds"),
        }
    }
}

/// Result of a completed scene run.
#[derive(Debug, Clone)]
pub struct SceneReport {
    pub hh_output: PathBuf,
    pub hv_output: PathBuf,
    pub bounds: BoundingBox,
    pub tiles: Vec<String>,
    pub masked_fraction: f64,
}

#[derive(Debug, Clone)]
pub enum SceneOutcome {
    Masked(SceneReport),
    Skipped(SkipReason),
}

/// Deterministic output filename for one channel of a scene.
fn output_name(channel: Channel, bounds: &BoundingBox) -> String {
    format!("{}_masked_{}.tif", channel, bounds.tag())
}

/// Run the full land-masking pipeline for one HH/HV scene pair.
pub fn process_scene(
    hh_path: &Path,
    hv_path: &Path,
    params: &MaskingParams,
) -> Result<SceneOutcome> {
    let started = Instant::now();

    if params.tile_variant == TileVariant::Preprocessed
        && params.land_classes != LandClassSet::default()
    {
        warn!(
            "Preprocessed tiles bake in the default land classes; \
             the configured land_classes only apply to raw class maps"
        );
    }

    info!("Loading HH channel: {}", hh_path.display());
    let hh = GdalRasterReader::open(hh_path)?.read_band_f32(1)?;
    log_scene_size(&hh);

    let Some(window) = hh.valid_window() else {
        warn!("No finite pixels found in the HH channel; skipping scene");
        return Ok(SceneOutcome::Skipped(SkipReason::NoValidPixels));
    };
    let bounds = hh.grid.window_bounds_wgs84(&window)?;
    info!("AOI (WGS84): {}", bounds);

    let tiles = locate_tiles(&bounds)?;
    let tile_names: Vec<String> = tiles.iter().map(|t| t.name()).collect();
    info!("Selected WorldCover tiles: {}", tile_names.join(", "));

    let mosaic = mosaic_tiles(&tiles, &params.worldcover_dir, params.tile_variant)?;
    let landcover = reproject_to_grid(&mosaic, &hh.grid)?;

    let lc_nodata = landcover.nodata.unwrap_or(params.tile_variant.nodata());
    if landcover.data.iter().all(|&v| v == lc_nodata) {
        warn!(
            "WorldCover land cover is all nodata within the AOI; \
             check that the selected tiles cover the scene bounds"
        );
        return Ok(SceneOutcome::Skipped(SkipReason::NoCoverage));
    }

    let mut mask = build_land_mask(&landcover, &hh, &params.land_classes, params.tile_variant)?;
    if params.mask_cleanup {
        let cleaned = fill_holes(&binary_closing(&mask.data, 1));
        mask = RasterBand::new(mask.grid.clone(), cleaned, None)?;
    }
    if params.coastline_dilation > 0 {
        let buffered = binary_dilation(&mask.data, params.coastline_dilation);
        mask = RasterBand::new(mask.grid.clone(), buffered, None)?;
    }
    let masked_fraction = land_fraction(&mask);
    info!("Masking {:.1}% of the scene", masked_fraction * 100.0);

    info!("Applying land mask to HH");
    let hh_masked = apply_mask(&hh, &mask)?;

    info!("Loading HV channel: {}", hv_path.display());
    let hv = GdalRasterReader::open(hv_path)?.read_band_f32(1)?;
    if hv.grid != hh.grid {
        return Err(Error::grid_mismatch(
            "HV grid does not match HH (CRS/transform/shape)",
        ));
    }
    let hv_masked = apply_mask(&hv, &mask)?;

    std::fs::create_dir_all(&params.output_dir)?;
    let hh_output = params.output_dir.join(output_name(Channel::Hh, &bounds));
    let hv_output = params.output_dir.join(output_name(Channel::Hv, &bounds));

    write_channel(&hh_output, &hh_masked, hh_path, &tile_names, params)?;
    write_channel(&hv_output, &hv_masked, hv_path, &tile_names, params)?;
    info!(
        "Wrote {} and {}",
        hh_output.display(),
        hv_output.display()
    );
    info!("Scene ran in {:.2} s", started.elapsed().as_secs_f64());

    Ok(SceneOutcome::Masked(SceneReport {
        hh_output,
        hv_output,
        bounds,
        tiles: tile_names,
        masked_fraction,
    }))
}

fn write_channel(
    output: &Path,
    band: &RasterBand<f32>,
    source: &Path,
    tile_names: &[String],
    params: &MaskingParams,
) -> Result<()> {
    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tags = [
        ("LAND_CLASSES", params.land_classes.to_string()),
        ("WORLDCOVER_TILES", tile_names.join(",")),
        ("SOURCE_SCENE", source_name),
    ];
    write_geotiff_f32(output, band, &tags)
}

fn log_scene_size(band: &RasterBand<f32>) {
    let megapixels = (band.width() * band.height()) as f64 / 1_000_000.0;
    let (label, runtime_note) = if megapixels < SMALL_SCENE_MPX {
        ("small", "<20s")
    } else if megapixels < MEDIUM_SCENE_MPX {
        ("medium", "<60s")
    } else {
        ("large", "<3min")
    };
    info!(
        "Scene is {}x{} ({:.1} Mpx, {}); expect {} runtime",
        band.width(),
        band.height(),
        megapixels,
        label,
        runtime_note
    );
}
