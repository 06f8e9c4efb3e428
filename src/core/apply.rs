//! Mask application: NaN out land and nodata pixels of a SAR channel.

use ndarray::Zip;

use crate::core::band::RasterBand;
use crate::error::{Error, Result};

/// Apply the land mask to one polarization channel, producing a new band on
/// the same grid. Masked pixels and the channel's own nodata become NaN;
/// everything else is copied unchanged. Applying the same mask twice is a
/// no-op, and channels masked with one mask stay pixel-aligned.
pub fn apply_mask(channel: &RasterBand<f32>, mask: &RasterBand<bool>) -> Result<RasterBand<f32>> {
    if channel.grid != mask.grid {
        return Err(Error::grid_mismatch(
            "land mask is not aligned to the channel grid",
        ));
    }

    let data = Zip::from(&channel.data)
        .and(&mask.data)
        .map_collect(|&sample, &masked| {
            if masked || channel.is_nodata(sample) {
                f32::NAN
            } else {
                sample
            }
        });

    RasterBand::new(channel.grid.clone(), data, Some(f32::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{GeoGrid, GeoTransform, WGS84};
    use ndarray::array;

    fn grid() -> GeoGrid {
        GeoGrid::new(WGS84, GeoTransform::new(0.0, 2.0, 1.0, -1.0), 2, 2).unwrap()
    }

    fn mask(values: [[bool; 2]; 2]) -> RasterBand<bool> {
        let data = array![
            [values[0][0], values[0][1]],
            [values[1][0], values[1][1]]
        ];
        RasterBand::new(grid(), data, None).unwrap()
    }

    #[test]
    fn masked_pixels_become_nan_others_are_copied() {
        let channel = RasterBand::new(grid(), array![[0.5f32, 1.5], [2.5, 3.5]], None).unwrap();
        let out = apply_mask(&channel, &mask([[true, false], [false, true]])).unwrap();

        assert!(out.data[[0, 0]].is_nan());
        assert_eq!(out.data[[0, 1]], 1.5);
        assert_eq!(out.data[[1, 0]], 2.5);
        assert!(out.data[[1, 1]].is_nan());
    }

    #[test]
    fn channel_nodata_is_masked_regardless_of_mask() {
        let channel =
            RasterBand::new(grid(), array![[f32::NAN, -9999.0], [2.5, 3.5]], Some(-9999.0))
                .unwrap();
        let out = apply_mask(&channel, &mask([[false, false], [false, false]])).unwrap();

        assert!(out.data[[0, 0]].is_nan());
        assert!(out.data[[0, 1]].is_nan());
        assert_eq!(out.data[[1, 0]], 2.5);
    }

    #[test]
    fn masking_is_idempotent() {
        let channel = RasterBand::new(grid(), array![[0.5f32, 1.5], [2.5, 3.5]], None).unwrap();
        let m = mask([[true, false], [true, false]]);

        let once = apply_mask(&channel, &m).unwrap();
        let twice = apply_mask(&once, &m).unwrap();

        for (a, b) in once.data.iter().zip(twice.data.iter()) {
            assert_eq!(a.is_nan(), b.is_nan());
            if !a.is_nan() {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn grid_mismatch_is_rejected() {
        let channel = RasterBand::new(grid(), array![[0.5f32, 1.5], [2.5, 3.5]], None).unwrap();
        let other_grid =
            GeoGrid::new(WGS84, GeoTransform::new(1.0, 2.0, 1.0, -1.0), 2, 2).unwrap();
        let misaligned =
            RasterBand::new(other_grid, array![[false, false], [false, false]], None).unwrap();

        assert!(matches!(
            apply_mask(&channel, &misaligned),
            Err(Error::GridMismatch(_))
        ));
    }
}
