//! Tile mosaicking: load the located WorldCover tiles and merge them into a
//! single raster covering the union of their extents at native resolution.

use std::collections::BTreeSet;
use std::path::Path;

use ndarray::Array2;
use tracing::{debug, info};

use crate::core::band::RasterBand;
use crate::core::grid::{GeoGrid, GeoTransform, WGS84};
use crate::core::worldcover::tiles::TileId;
use crate::error::{Error, Result};
use crate::io::GdalRasterReader;
use crate::types::TileVariant;

/// Read and merge the given tiles from `worldcover_dir`.
///
/// Every tile must be present; a missing file aborts the scene with the exact
/// expected filename. Pixels outside all tile coverage keep the nodata value.
pub fn mosaic_tiles(
    tiles: &BTreeSet<TileId>,
    worldcover_dir: &Path,
    variant: TileVariant,
) -> Result<RasterBand<u8>> {
    if tiles.is_empty() {
        return Err(Error::Processing(
            "no WorldCover tiles intersect the scene bounds".into(),
        ));
    }

    let mut bands = Vec::with_capacity(tiles.len());
    for tile in tiles {
        let filename = tile.filename(variant);
        let path = worldcover_dir.join(&filename);
        if !path.exists() {
            return Err(Error::MissingTile {
                tile: tile.name(),
                filename,
                dir: worldcover_dir.display().to_string(),
            });
        }
        debug!("Reading WorldCover tile {}", filename);
        let reader = GdalRasterReader::open(&path)?;
        bands.push(reader.read_band_u8(1)?);
    }

    let fill = bands[0].nodata.unwrap_or(variant.nodata());
    let mosaic = merge_bands(&bands, fill)?;
    info!(
        "Mosaicked {} tile(s) into {}x{} raster",
        bands.len(),
        mosaic.width(),
        mosaic.height()
    );
    Ok(mosaic)
}

/// Merge pre-loaded tiles over the union of their extents.
///
/// Overlap precedence: the first band listed wins; later bands only fill
/// pixels still at `fill`. Callers pass tiles in ascending `TileId` order so
/// the result never depends on directory enumeration order.
pub fn merge_bands(bands: &[RasterBand<u8>], fill: u8) -> Result<RasterBand<u8>> {
    let first = bands
        .first()
        .ok_or_else(|| Error::Processing("cannot merge an empty tile list".into()))?;
    let px = first.grid.transform.pixel_width;
    let py = first.grid.transform.pixel_height;

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for band in bands {
        let grid = &band.grid;
        if grid.crs != WGS84 {
            return Err(Error::grid_mismatch(format!(
                "WorldCover tile is in {}, expected {}",
                grid.crs, WGS84
            )));
        }
        if !grid.transform.is_north_up() {
            return Err(Error::grid_mismatch(
                "WorldCover tile is not north-up".to_string(),
            ));
        }
        if (grid.transform.pixel_width - px).abs() > 1e-9
            || (grid.transform.pixel_height - py).abs() > 1e-9
        {
            return Err(Error::grid_mismatch(
                "WorldCover tiles disagree on pixel size".to_string(),
            ));
        }
        let (x0, y0, x1, y1) = grid.bounds();
        min_x = min_x.min(x0);
        min_y = min_y.min(y0);
        max_x = max_x.max(x1);
        max_y = max_y.max(y1);
    }

    let width = ((max_x - min_x) / px).round() as usize;
    let height = ((max_y - min_y) / -py).round() as usize;
    let transform = GeoTransform::new(min_x, max_y, px, py);
    let grid = GeoGrid::new(WGS84, transform, width, height)?;

    let mut data = Array2::from_elem((height, width), fill);
    for band in bands {
        let col_off = ((band.grid.transform.origin_x - min_x) / px).round() as usize;
        let row_off = ((band.grid.transform.origin_y - max_y) / py).round() as usize;
        for (r, src_row) in band.data.outer_iter().enumerate() {
            let out_r = row_off + r;
            if out_r >= height {
                break;
            }
            for (c, &value) in src_row.iter().enumerate() {
                let out_c = col_off + c;
                if out_c >= width {
                    break;
                }
                let cell = &mut data[[out_r, out_c]];
                if *cell == fill {
                    *cell = value;
                }
            }
        }
    }

    RasterBand::new(grid, data, Some(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tile_band(origin_x: f64, origin_y: f64, size: usize, value: u8) -> RasterBand<u8> {
        let transform = GeoTransform::new(origin_x, origin_y, 1.0, -1.0);
        let grid = GeoGrid::new(WGS84, transform, size, size).unwrap();
        RasterBand::new(grid, Array2::from_elem((size, size), value), Some(0)).unwrap()
    }

    #[test]
    fn adjacent_tiles_cover_the_union_extent() {
        let a = tile_band(0.0, 3.0, 3, 10);
        let b = tile_band(3.0, 3.0, 3, 20);
        let merged = merge_bands(&[a, b], 0).unwrap();

        assert_eq!(merged.width(), 6);
        assert_eq!(merged.height(), 3);
        assert_eq!(merged.data[[0, 0]], 10);
        assert_eq!(merged.data[[2, 5]], 20);
        assert_relative_eq!(merged.grid.transform.origin_x, 0.0);
        assert_relative_eq!(merged.grid.transform.origin_y, 3.0);
    }

    #[test]
    fn first_band_wins_on_overlap() {
        let a = tile_band(0.0, 3.0, 3, 10);
        let b = tile_band(1.0, 3.0, 3, 20);
        let merged = merge_bands(&[a, b], 0).unwrap();

        // Overlapping columns 1..3 keep the first band's value.
        assert_eq!(merged.data[[0, 1]], 10);
        assert_eq!(merged.data[[0, 2]], 10);
        assert_eq!(merged.data[[0, 3]], 20);
    }

    #[test]
    fn later_bands_fill_nodata_gaps() {
        let mut a = tile_band(0.0, 3.0, 3, 10);
        a.data[[1, 1]] = 0;
        let b = tile_band(0.0, 3.0, 3, 20);
        let merged = merge_bands(&[a, b], 0).unwrap();

        assert_eq!(merged.data[[1, 1]], 20);
        assert_eq!(merged.data[[0, 0]], 10);
    }

    #[test]
    fn uncovered_pixels_stay_nodata() {
        // Diagonal tiles leave two corners uncovered.
        let a = tile_band(0.0, 6.0, 3, 10);
        let b = tile_band(3.0, 3.0, 3, 20);
        let merged = merge_bands(&[a, b], 0).unwrap();

        assert_eq!(merged.width(), 6);
        assert_eq!(merged.height(), 6);
        assert_eq!(merged.data[[0, 5]], 0);
        assert_eq!(merged.data[[5, 0]], 0);
        assert_eq!(merged.data[[0, 0]], 10);
        assert_eq!(merged.data[[5, 5]], 20);
    }

    #[test]
    fn missing_tile_is_reported_with_its_filename() {
        let dir = tempfile::tempdir().unwrap();
        let mut tiles = BTreeSet::new();
        tiles.insert(TileId { lat: 54, lon: -63 });
        tiles.insert(TileId { lat: 54, lon: -60 });

        match mosaic_tiles(&tiles, dir.path(), TileVariant::Map) {
            Err(Error::MissingTile { tile, filename, .. }) => {
                assert_eq!(tile, "N54W063");
                assert_eq!(filename, "ESA_WorldCover_10m_2021_V200_N54W063_Map.tif");
            }
            other => panic!("expected MissingTile, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn empty_tile_set_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            mosaic_tiles(&BTreeSet::new(), dir.path(), TileVariant::Map),
            Err(Error::Processing(_))
        ));
    }

    #[test]
    fn mixed_pixel_sizes_are_rejected() {
        let a = tile_band(0.0, 3.0, 3, 10);
        let transform = GeoTransform::new(3.0, 3.0, 0.5, -0.5);
        let grid = GeoGrid::new(WGS84, transform, 3, 3).unwrap();
        let b = RasterBand::new(grid, Array2::from_elem((3, 3), 20u8), Some(0)).unwrap();

        assert!(matches!(
            merge_bands(&[a, b], 0),
            Err(Error::GridMismatch(_))
        ));
    }
}
