//! Land-mask construction from reprojected land cover and the SAR scene.

use ndarray::Zip;

use crate::core::band::RasterBand;
use crate::error::{Error, Result};
use crate::types::{LandClassSet, TileVariant};

/// Build the boolean mask on the SAR grid. A pixel is masked (`true`) when
/// any of these hold:
/// - its land-cover class is in `classes`,
/// - its land-cover coverage is unknown (reprojected nodata),
/// - the SAR sample itself is nodata.
///
/// Unknown coverage masks out rather than passes through; a gap in the tiles
/// must not read as open water downstream.
pub fn build_land_mask(
    landcover: &RasterBand<u8>,
    sar: &RasterBand<f32>,
    classes: &LandClassSet,
    variant: TileVariant,
) -> Result<RasterBand<bool>> {
    if landcover.grid != sar.grid {
        return Err(Error::grid_mismatch(
            "land cover is not aligned to the SAR grid",
        ));
    }

    let lc_nodata = landcover.nodata.unwrap_or(variant.nodata());
    let data = Zip::from(&landcover.data)
        .and(&sar.data)
        .map_collect(|&class, &sample| {
            class == lc_nodata || variant.is_land(class, classes) || sar.is_nodata(sample)
        });

    RasterBand::new(sar.grid.clone(), data, None)
}

/// Fraction of masked pixels, for reporting.
pub fn land_fraction(mask: &RasterBand<bool>) -> f64 {
    if mask.data.is_empty() {
        return 0.0;
    }
    let masked = mask.data.iter().filter(|&&m| m).count();
    masked as f64 / mask.data.len() as f64
}
