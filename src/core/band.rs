//! Georeferenced raster band: a 2D sample array tied to a `GeoGrid`.

use ndarray::Array2;

use crate::core::grid::{GeoGrid, PixelWindow};
use crate::error::{Error, Result};

/// A single raster band with georeferencing and an optional nodata sentinel.
///
/// Bands are value types: every pipeline stage produces a new band rather
/// than mutating its input, so stages stay composable and failures isolated.
#[derive(Debug, Clone)]
pub struct RasterBand<T> {
    pub grid: GeoGrid,
    pub data: Array2<T>,
    pub nodata: Option<T>,
}

impl<T: Copy> RasterBand<T> {
    pub fn new(grid: GeoGrid, data: Array2<T>, nodata: Option<T>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows != grid.height || cols != grid.width {
            return Err(Error::grid_mismatch(format!(
                "band data is {}x{} but grid is {}x{}",
                rows, cols, grid.height, grid.width
            )));
        }
        Ok(Self { grid, data, nodata })
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }
}

impl RasterBand<f32> {
    /// Whether a sample is missing: non-finite or equal to the nodata sentinel.
    pub fn is_nodata(&self, value: f32) -> bool {
        if !value.is_finite() {
            return true;
        }
        match self.nodata {
            Some(nd) => value == nd,
            None => false,
        }
    }

    /// Smallest pixel window containing every valid sample, or `None` when
    /// the band holds no valid data at all. Scene footprints come from this
    /// window rather than the raster extent, so empty collar regions do not
    /// inflate the tile query.
    pub fn valid_window(&self) -> Option<PixelWindow> {
        let (rows, cols) = self.data.dim();
        let mut window: Option<PixelWindow> = None;
        for r in 0..rows {
            for c in 0..cols {
                if self.is_nodata(self.data[[r, c]]) {
                    continue;
                }
                window = Some(match window {
                    None => PixelWindow {
                        row_min: r,
                        row_max: r,
                        col_min: c,
                        col_max: c,
                    },
                    Some(w) => PixelWindow {
                        row_min: w.row_min.min(r),
                        row_max: w.row_max.max(r),
                        col_min: w.col_min.min(c),
                        col_max: w.col_max.max(c),
                    },
                });
            }
        }
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{GeoTransform, WGS84};

    fn grid(width: usize, height: usize) -> GeoGrid {
        GeoGrid::new(WGS84, GeoTransform::new(0.0, 0.0, 1.0, -1.0), width, height).unwrap()
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let data = Array2::<f32>::zeros((3, 4));
        assert!(RasterBand::new(grid(4, 3), data.clone(), None).is_ok());
        assert!(RasterBand::new(grid(3, 4), data, None).is_err());
    }

    #[test]
    fn nodata_detection_covers_nan_and_sentinel() {
        let band =
            RasterBand::new(grid(2, 2), Array2::<f32>::zeros((2, 2)), Some(-9999.0)).unwrap();
        assert!(band.is_nodata(f32::NAN));
        assert!(band.is_nodata(-9999.0));
        assert!(!band.is_nodata(0.5));

        let no_sentinel = RasterBand::new(grid(2, 2), Array2::<f32>::zeros((2, 2)), None).unwrap();
        assert!(no_sentinel.is_nodata(f32::INFINITY));
        assert!(!no_sentinel.is_nodata(-9999.0));
    }

    #[test]
    fn valid_window_shrinks_to_finite_samples() {
        let mut data = Array2::<f32>::from_elem((4, 5), f32::NAN);
        data[[1, 1]] = 0.3;
        data[[2, 3]] = 0.7;
        let band = RasterBand::new(grid(5, 4), data, None).unwrap();

        let window = band.valid_window().unwrap();
        assert_eq!(
            window,
            crate::core::grid::PixelWindow {
                row_min: 1,
                row_max: 2,
                col_min: 1,
                col_max: 3,
            }
        );
    }

    #[test]
    fn valid_window_is_none_for_empty_scene() {
        let data = Array2::<f32>::from_elem((3, 3), f32::NAN);
        let band = RasterBand::new(grid(3, 3), data, None).unwrap();
        assert!(band.valid_window().is_none());
    }
}
