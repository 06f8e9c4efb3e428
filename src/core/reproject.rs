//! Nearest-neighbor reprojection of a land-cover raster onto a target grid.
//!
//! Land-cover classes are categorical, so resampling must never blend
//! neighboring samples; every output pixel is either a copied source sample
//! or nodata. Sampling is pixel-center: each target center is mapped through
//! the target transform, across CRSs when they differ, and through the
//! inverse source transform, and the containing source pixel is taken.

use gdal::spatial_ref::CoordTransform;
use ndarray::Array2;
use tracing::debug;

use crate::core::band::RasterBand;
use crate::core::grid::{GeoGrid, spatial_ref};
use crate::error::{Error, Result};
use crate::io::GdalError;

/// Resample `source` onto `target`, returning a band whose grid is exactly
/// `target`. Out-of-source-bounds pixels and source nodata become nodata.
pub fn reproject_to_grid(source: &RasterBand<u8>, target: &GeoGrid) -> Result<RasterBand<u8>> {
    if !source.grid.transform.is_invertible() || !target.transform.is_invertible() {
        return Err(Error::grid_mismatch(
            "cannot reproject with a degenerate affine transform",
        ));
    }

    let nodata = source.nodata.unwrap_or(0);
    let (src_h, src_w) = (source.grid.height as f64, source.grid.width as f64);

    // CRS reconciliation is skipped entirely when both grids agree; WorldCover
    // mosaics meeting a WGS84 scene stay on the pure-affine path.
    let crs_transform = if source.grid.crs == target.crs {
        None
    } else {
        debug!(
            "Reprojecting {} -> {} ({}x{})",
            source.grid.crs, target.crs, target.width, target.height
        );
        let src_srs = spatial_ref(&source.grid.crs)?;
        let dst_srs = spatial_ref(&target.crs)?;
        Some(CoordTransform::new(&dst_srs, &src_srs).map_err(GdalError::from)?)
    };

    let mut data = Array2::from_elem((target.height, target.width), nodata);
    let mut xs = vec![0.0; target.width];
    let mut ys = vec![0.0; target.width];
    let mut zs = vec![0.0; target.width];

    for row in 0..target.height {
        for col in 0..target.width {
            let (x, y) = target
                .transform
                .offset_to_geo(col as f64 + 0.5, row as f64 + 0.5);
            xs[col] = x;
            ys[col] = y;
        }
        if let Some(ct) = &crs_transform {
            zs.fill(0.0);
            ct.transform_coords(&mut xs, &mut ys, &mut zs)
                .map_err(GdalError::from)?;
        }
        for col in 0..target.width {
            let (src_col, src_row) = source.grid.transform.geo_to_pixel(xs[col], ys[col]);
            let (src_col, src_row) = (src_col.floor(), src_row.floor());
            if src_col >= 0.0 && src_col < src_w && src_row >= 0.0 && src_row < src_h {
                data[[row, col]] = source.data[[src_row as usize, src_col as usize]];
            }
        }
    }

    RasterBand::new(target.clone(), data, Some(nodata))
}
