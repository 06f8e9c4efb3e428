//! GeoTIFF output: georeferenced single-band rasters written atomically.
//!
//! Data lands in a temporary file next to the target and is renamed into
//! place after the dataset is flushed, so an aborted run leaves no partial
//! output behind.

use chrono::Utc;
use gdal::raster::{Buffer, GdalType};
use gdal::{DriverManager, Metadata};
use std::path::Path;

use crate::core::band::RasterBand;
use crate::core::grid::spatial_ref;
use crate::error::Result;
use crate::io::GdalError;

/// Write a masked SAR channel as float32 with NaN nodata.
pub fn write_geotiff_f32(
    output: &Path,
    band: &RasterBand<f32>,
    tags: &[(&str, String)],
) -> Result<()> {
    write_band(output, band, f64::NAN, tags)
}

/// Write a land-cover style byte raster, e.g. a preprocessed tile.
pub fn write_geotiff_u8(
    output: &Path,
    band: &RasterBand<u8>,
    nodata: u8,
    tags: &[(&str, String)],
) -> Result<()> {
    write_band(output, band, nodata as f64, tags)
}

fn write_band<T: GdalType + Copy>(
    output: &Path,
    band: &RasterBand<T>,
    nodata: f64,
    tags: &[(&str, String)],
) -> Result<()> {
    let dir = output.parent().filter(|p| !p.as_os_str().is_empty());
    let tmp = tempfile::Builder::new()
        .prefix(".seamask-")
        .suffix(".tif")
        .tempfile_in(dir.unwrap_or_else(|| Path::new(".")))?;
    let tmp_path = tmp.into_temp_path();

    {
        let driver = DriverManager::get_driver_by_name("GTiff").map_err(GdalError::from)?;
        let mut ds = driver
            .create_with_band_type::<T, _>(&tmp_path, band.width(), band.height(), 1)
            .map_err(GdalError::from)?;

        ds.set_geo_transform(&band.grid.transform.to_gdal())
            .map_err(GdalError::from)?;
        let srs = spatial_ref(&band.grid.crs)?;
        ds.set_spatial_ref(&srs).map_err(GdalError::from)?;

        ds.set_metadata_item("PROCESSING_TIMESTAMP", &Utc::now().to_rfc3339(), "")
            .map_err(GdalError::from)?;
        ds.set_metadata_item(
            "SOFTWARE",
            concat!("seamask ", env!("CARGO_PKG_VERSION")),
            "",
        )
        .map_err(GdalError::from)?;
        for (key, value) in tags {
            ds.set_metadata_item(key, value, "").map_err(GdalError::from)?;
        }

        let mut raster_band = ds.rasterband(1).map_err(GdalError::from)?;
        raster_band
            .set_no_data_value(Some(nodata))
            .map_err(GdalError::from)?;
        let data: Vec<T> = band.data.iter().copied().collect();
        let mut buf = Buffer::new((band.width(), band.height()), data);
        raster_band
            .write((0, 0), (band.width(), band.height()), &mut buf)
            .map_err(GdalError::from)?;
    }

    tmp_path.persist(output).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{GeoGrid, GeoTransform, WGS84};
    use crate::io::GdalRasterReader;
    use ndarray::array;

    #[test]
    fn f32_round_trip_preserves_grid_and_nan_nodata() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("hh_masked_test.tif");

        let grid = GeoGrid::new(WGS84, GeoTransform::new(-60.0, 55.0, 0.5, -0.5), 3, 2).unwrap();
        let band = RasterBand::new(
            grid.clone(),
            array![[0.5f32, f32::NAN, 1.5], [2.5, 3.5, f32::NAN]],
            Some(f32::NAN),
        )
        .unwrap();

        write_geotiff_f32(&output, &band, &[("LAND_CLASSES", "10,20".to_string())]).unwrap();
        assert!(output.exists());

        let back = GdalRasterReader::open(&output)
            .unwrap()
            .read_band_f32(1)
            .unwrap();
        assert_eq!(back.grid, grid);
        assert_eq!(back.data[[0, 0]], 0.5);
        assert_eq!(back.data[[1, 1]], 3.5);
        assert!(back.data[[0, 1]].is_nan());
        assert!(back.data[[1, 2]].is_nan());
    }

    #[test]
    fn u8_round_trip_preserves_samples_and_nodata() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("tile.tif");

        let grid = GeoGrid::new(WGS84, GeoTransform::new(0.0, 3.0, 1.0, -1.0), 2, 2).unwrap();
        let band = RasterBand::new(grid, array![[1u8, 0], [255, 1]], Some(255)).unwrap();

        write_geotiff_u8(&output, &band, 255, &[]).unwrap();

        let back = GdalRasterReader::open(&output)
            .unwrap()
            .read_band_u8(1)
            .unwrap();
        assert_eq!(back.data, array![[1u8, 0], [255, 1]]);
        assert_eq!(back.nodata, Some(255));
    }
}
