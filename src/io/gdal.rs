use gdal::raster::GdalType;
use gdal::{Dataset, errors::GdalError as GdalCrateError};
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

use crate::core::band::RasterBand;
use crate::core::grid::{GeoGrid, GeoTransform};
use crate::error::Result;

/// Errors encountered when using the GDAL reader
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Band index {0} out of range (raster has {1} bands)")]
    BandIndex(usize, usize),
    #[error("Dimension mismatch: expected {0}x{1}, got {2} samples")]
    DimensionMismatch(usize, usize, usize),
}

/// Reader for georeferenced rasters via GDAL (GeoTIFF and friends).
pub struct GdalRasterReader {
    dataset: Dataset,
    width: usize,
    height: usize,
    bands: usize,
    geotransform: [f64; 6],
    projection: String,
}

// Helper to extract EPSG code from WKT authority tag
fn parse_epsg(wkt: &str) -> Option<String> {
    const KEY: &str = "AUTHORITY[\"EPSG\",\"";
    if let Some(idx) = wkt.rfind(KEY) {
        let start = idx + KEY.len();
        if let Some(end) = wkt[start..].find('"') {
            let code = &wkt[start..start + end];
            return Some(format!("EPSG:{}", code));
        }
    }
    None
}

impl GdalRasterReader {
    /// Open a GDAL-supported dataset and capture its spatial metadata.
    pub fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, GdalError> {
        let dataset = Dataset::open(path.as_ref())?;
        let (width, height) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(GdalError::UnsupportedFormat("No raster bands found".into()));
        }
        let geotransform = dataset.geo_transform()?;
        let proj = dataset.projection();
        if proj.is_empty() {
            return Err(GdalError::UnsupportedFormat(
                "Dataset has no projection; expected a geocoded raster".into(),
            ));
        }
        // Prefer the compact EPSG form so grids from different files compare
        let projection = if proj.starts_with("EPSG:") {
            proj
        } else if let Some(code) = parse_epsg(&proj) {
            code
        } else {
            proj
        };
        Ok(GdalRasterReader {
            dataset,
            width,
            height,
            bands,
            geotransform,
            projection,
        })
    }

    /// Grid descriptor of the dataset (validates transform and extent).
    pub fn grid(&self) -> Result<GeoGrid> {
        GeoGrid::new(
            self.projection.clone(),
            GeoTransform::from_gdal(self.geotransform),
            self.width,
            self.height,
        )
    }

    fn read_array<T: GdalType + Copy>(
        &self,
        index: usize,
    ) -> std::result::Result<(Array2<T>, Option<f64>), GdalError> {
        if index == 0 || index > self.bands {
            return Err(GdalError::BandIndex(index, self.bands));
        }
        let band = self.dataset.rasterband(index)?;
        let nodata = band.no_data_value();
        let window = (self.width, self.height);
        let buf = band.read_as::<T>((0, 0), window, window, None)?;
        let data = buf.data().to_vec();
        let len = data.len();
        let array = Array2::from_shape_vec((self.height, self.width), data)
            .map_err(|_| GdalError::DimensionMismatch(self.width, self.height, len))?;
        Ok((array, nodata))
    }

    /// Read a band (1-based index) as f32 samples, e.g. a SAR channel.
    pub fn read_band_f32(&self, index: usize) -> Result<RasterBand<f32>> {
        let (data, nodata) = self.read_array::<f32>(index)?;
        RasterBand::new(self.grid()?, data, nodata.map(|v| v as f32))
    }

    /// Read a band (1-based index) as u8 samples, e.g. a land-cover tile.
    pub fn read_band_u8(&self, index: usize) -> Result<RasterBand<u8>> {
        let (data, nodata) = self.read_array::<u8>(index)?;
        RasterBand::new(self.grid()?, data, nodata.map(|v| v as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsg_code_is_extracted_from_wkt_authority() {
        let wkt = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],AUTHORITY["EPSG","4326"]]"#;
        assert_eq!(parse_epsg(wkt), Some("EPSG:4326".to_string()));
        assert_eq!(parse_epsg("LOCAL_CS[\"unnamed\"]"), None);
    }
}
