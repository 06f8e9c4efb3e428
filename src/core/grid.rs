//! Georeferencing model: affine transform, grid descriptor, and bounding boxes.
//!
//! `GeoGrid` is the unit of comparison for the whole pipeline: WorldCover
//! tiles, the intermediate mosaic, and the SAR scene each carry one, and the
//! reprojector's contract is that its output grid equals the SAR grid exactly.

use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// CRS definition string for WGS84 geographic coordinates.
pub const WGS84: &str = "EPSG:4326";

/// Points sampled per rectangle edge when transforming bounds between CRSs.
/// Straight edges curve under reprojection; corner-only sampling underestimates
/// the footprint of polar and high-latitude scenes.
const DENSIFY_POINTS: usize = 21;

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and world coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up images `row_rotation` and `col_rotation` are 0 and
/// `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub row_rotation: f64,
    pub col_rotation: f64,
}

impl GeoTransform {
    /// North-up transform without rotation terms.
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// From GDAL coefficient order
    /// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`.
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation
    }

    /// Whether the pixel→world mapping can be inverted.
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() > 1e-12
    }

    /// World coordinates of a pixel center.
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.offset_to_geo(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// World coordinates of a pixel's upper-left corner.
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        self.offset_to_geo(col as f64, row as f64)
    }

    /// World coordinates of a fractional pixel offset.
    pub fn offset_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// Fractional pixel coordinates of a world point. Integer boundaries are
    /// pixel corners, so `floor()` yields the containing pixel.
    /// Returns NaN pairs when the transform is degenerate.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.determinant();
        if det.abs() < 1e-12 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        (col, row)
    }

    pub fn is_north_up(&self) -> bool {
        self.row_rotation.abs() < 1e-12
            && self.col_rotation.abs() < 1e-12
            && self.pixel_height < 0.0
    }
}

/// Inclusive pixel window inside a grid, (row, col) addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

/// Axis-aligned bounding box in WGS84 (degrees).
///
/// `west > east` denotes a box crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Deterministic filename tag encoding the box to two decimals,
    /// e.g. `W-60.20_S53.80_E-59.10_N54.90`.
    pub fn tag(&self) -> String {
        format!(
            "W{:.2}_S{:.2}_E{:.2}_N{:.2}",
            self.west, self.south, self.east, self.north
        )
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "W={:.2} S={:.2} E={:.2} N={:.2}",
            self.west, self.south, self.east, self.north
        )
    }
}

/// A raster's spatial reference, transform, and extent.
///
/// Immutable once derived from file metadata. Two grids compare equal only
/// when CRS, transform, and dimensions all match, which is the condition for
/// pixel-aligned array operations between their rasters.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoGrid {
    pub crs: String,
    pub transform: GeoTransform,
    pub width: usize,
    pub height: usize,
}

impl GeoGrid {
    pub fn new(
        crs: impl Into<String>,
        transform: GeoTransform,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::grid_mismatch(format!(
                "raster has empty extent ({}x{})",
                width, height
            )));
        }
        if !transform.is_invertible() {
            return Err(Error::grid_mismatch(
                "degenerate affine transform (zero pixel area)",
            ));
        }
        Ok(Self {
            crs: crs.into(),
            transform,
            width,
            height,
        })
    }

    /// Native-CRS extent as (min_x, min_y, max_x, max_y), covering the full
    /// pixel footprint including rotation terms.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.window_bounds(&PixelWindow {
            row_min: 0,
            row_max: self.height - 1,
            col_min: 0,
            col_max: self.width - 1,
        })
    }

    /// Native-CRS extent of an inclusive pixel window.
    pub fn window_bounds(&self, window: &PixelWindow) -> (f64, f64, f64, f64) {
        let corners = [
            self.transform
                .pixel_to_geo_corner(window.col_min, window.row_min),
            self.transform
                .pixel_to_geo_corner(window.col_max + 1, window.row_min),
            self.transform
                .pixel_to_geo_corner(window.col_min, window.row_max + 1),
            self.transform
                .pixel_to_geo_corner(window.col_max + 1, window.row_max + 1),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let max_x = corners
            .iter()
            .map(|c| c.0)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let max_y = corners
            .iter()
            .map(|c| c.1)
            .fold(f64::NEG_INFINITY, f64::max);
        (min_x, min_y, max_x, max_y)
    }

    /// WGS84 bounding box of the full grid.
    pub fn bounds_wgs84(&self) -> Result<BoundingBox> {
        let (min_x, min_y, max_x, max_y) = self.bounds();
        self.rect_to_wgs84(min_x, min_y, max_x, max_y)
    }

    /// WGS84 bounding box of an inclusive pixel window.
    pub fn window_bounds_wgs84(&self, window: &PixelWindow) -> Result<BoundingBox> {
        let (min_x, min_y, max_x, max_y) = self.window_bounds(window);
        self.rect_to_wgs84(min_x, min_y, max_x, max_y)
    }

    /// Transform a native-CRS rectangle to WGS84 by sampling densified edges.
    fn rect_to_wgs84(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<BoundingBox> {
        if self.crs == WGS84 {
            return Ok(BoundingBox::new(min_x, min_y, max_x, max_y));
        }

        let src = spatial_ref(&self.crs)?;
        let dst = spatial_ref(WGS84)?;
        let transform = CoordTransform::new(&src, &dst).map_err(crate::io::GdalError::from)?;

        let n = DENSIFY_POINTS;
        let mut xs = Vec::with_capacity(4 * n);
        let mut ys = Vec::with_capacity(4 * n);
        for i in 0..n {
            let t = i as f64 / (n - 1) as f64;
            let x = min_x + t * (max_x - min_x);
            let y = min_y + t * (max_y - min_y);
            // top and bottom edges
            xs.push(x);
            ys.push(max_y);
            xs.push(x);
            ys.push(min_y);
            // left and right edges
            xs.push(min_x);
            ys.push(y);
            xs.push(max_x);
            ys.push(y);
        }
        let mut zs = vec![0.0; xs.len()];
        transform
            .transform_coords(&mut xs, &mut ys, &mut zs)
            .map_err(crate::io::GdalError::from)?;

        let west = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let east = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let south = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let north = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if !(west.is_finite() && east.is_finite() && south.is_finite() && north.is_finite()) {
            return Err(Error::grid_mismatch(format!(
                "could not project bounds from {} to WGS84",
                self.crs
            )));
        }

        Ok(BoundingBox::new(west, south, east, north))
    }
}

/// Parse a CRS definition with lon/lat (x, y) axis order enforced.
pub(crate) fn spatial_ref(definition: &str) -> Result<SpatialRef> {
    let mut srs = SpatialRef::from_definition(definition).map_err(crate::io::GdalError::from)?;
    // GDAL >= 3 honors authority axis order; EPSG:4326 would become (lat, lon).
    srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    Ok(srs)
}
