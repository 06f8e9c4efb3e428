//! I/O layer for GDAL-backed rasters.
//! Provides the `gdal` reader adapter and `writers` for georeferenced
//! GeoTIFF outputs with embedded processing metadata.
pub mod gdal;
pub use gdal::{GdalError, GdalRasterReader};

pub mod writers;
