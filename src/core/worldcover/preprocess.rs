//! Tile preprocessing: convert raw WorldCover class maps into compact
//! land/water tiles at native resolution (land=1, water=0, nodata=255).
//!
//! Preprocessed tiles make repeated scene runs cheaper because the land
//! predicate is already baked in; they encode the default class set, so
//! custom `land_classes` configurations need the raw maps instead.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::band::RasterBand;
use crate::core::worldcover::tiles::TILE_PREFIX;
use crate::error::Result;
use crate::io::GdalRasterReader;
use crate::io::writers::write_geotiff_u8;
use crate::types::{TileVariant, worldcover_class};

const PREPROCESSED_NODATA: u8 = 255;

/// Convert every raw `_Map.tif` tile under `input_dir` and write the
/// `_preprocessed.tif` counterparts into `output_dir`. Returns the number of
/// tiles converted.
pub fn preprocess_tiles(input_dir: &Path, output_dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(output_dir)?;

    let mut tile_paths: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| {
                    name.starts_with(TILE_PREFIX)
                        && name.ends_with(TileVariant::Map.filename_suffix())
                })
        })
        .collect();
    tile_paths.sort();

    let total = tile_paths.len();
    for (idx, tile_path) in tile_paths.iter().enumerate() {
        let name = tile_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let out_name = name.replace(
            TileVariant::Map.filename_suffix(),
            TileVariant::Preprocessed.filename_suffix(),
        );
        info!("[{}/{}] Preprocessing {} -> {}", idx + 1, total, name, out_name);

        let reader = GdalRasterReader::open(tile_path)?;
        let raw = reader.read_band_u8(1)?;
        let compact = classify(&raw)?;
        write_geotiff_u8(
            &output_dir.join(out_name),
            &compact,
            PREPROCESSED_NODATA,
            &[],
        )?;
    }

    Ok(total)
}

fn classify(raw: &RasterBand<u8>) -> Result<RasterBand<u8>> {
    let data = raw.data.mapv(|class| match class {
        worldcover_class::NODATA => PREPROCESSED_NODATA,
        worldcover_class::PERMANENT_WATER => 0,
        _ => 1,
    });
    RasterBand::new(raw.grid.clone(), data, Some(PREPROCESSED_NODATA))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{GeoGrid, GeoTransform, WGS84};
    use ndarray::array;

    #[test]
    fn classes_collapse_to_land_water_nodata() {
        let grid = GeoGrid::new(WGS84, GeoTransform::new(0.0, 2.0, 1.0, -1.0), 3, 2).unwrap();
        let raw = RasterBand::new(
            grid,
            array![[0u8, 80, 10], [70, 95, 0]],
            Some(worldcover_class::NODATA),
        )
        .unwrap();

        let compact = classify(&raw).unwrap();
        assert_eq!(compact.data, array![[255u8, 0, 1], [1, 1, 255]]);
        assert_eq!(compact.nodata, Some(255));
    }
}
