//! WorldCover tile identifiers and tile selection for a WGS84 bounding box.
//!
//! ESA WorldCover is tiled in 3°×3° cells named by their southwest corner
//! (`N54W060`). Tile selection is pure math; nothing here touches the disk,
//! so the filename convention is testable independently of I/O.

use std::collections::BTreeSet;

use crate::core::grid::BoundingBox;
use crate::error::{Error, Result};
use crate::types::TileVariant;

/// Product/version prefix of the fixed filename convention.
pub const TILE_PREFIX: &str = "ESA_WorldCover_10m_2021_V200_";

/// Tile cell size in degrees.
pub const TILE_SIZE_DEG: f64 = 3.0;

/// Southwest corner of a 3°×3° WorldCover cell; both coordinates are
/// multiples of 3. Ordering is (lat, lon), which fixes every iteration
/// order derived from a tile set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId {
    pub lat: i32,
    pub lon: i32,
}

impl TileId {
    /// The tile containing a WGS84 point, snapping to the 3° grid.
    /// Flooring keeps negative coordinates on the correct cell.
    pub fn containing(lon: f64, lat: f64) -> Self {
        TileId {
            lat: snap_to_grid(lat),
            lon: snap_to_grid(lon),
        }
    }

    /// Cell footprint, southwest-corner inclusive.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.lon as f64,
            self.lat as f64,
            self.lon as f64 + TILE_SIZE_DEG,
            self.lat as f64 + TILE_SIZE_DEG,
        )
    }

    /// Grid cell name, e.g. `N54W060` or `S03E009`.
    pub fn name(&self) -> String {
        let lat_str = if self.lat >= 0 {
            format!("N{:02}", self.lat)
        } else {
            format!("S{:02}", -self.lat)
        };
        let lon_str = if self.lon < 0 {
            format!("W{:03}", -self.lon)
        } else {
            format!("E{:03}", self.lon)
        };
        format!("{}{}", lat_str, lon_str)
    }

    /// Expected on-disk filename for this tile and tile flavor.
    pub fn filename(&self, variant: TileVariant) -> String {
        format!("{}{}{}", TILE_PREFIX, self.name(), variant.filename_suffix())
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn snap_to_grid(value: f64) -> i32 {
    ((value / TILE_SIZE_DEG).floor() * TILE_SIZE_DEG) as i32
}

/// Compute the set of tiles whose footprint intersects `bbox`.
///
/// Intersection is strict: a box that only touches a 3° grid line does not
/// pull in the neighboring tile. A box with `west > east` crosses the
/// antimeridian and is evaluated as two sub-queries.
pub fn locate_tiles(bbox: &BoundingBox) -> Result<BTreeSet<TileId>> {
    validate(bbox)?;

    let mut tiles = BTreeSet::new();
    if bbox.west > bbox.east {
        walk_tiles(
            &BoundingBox::new(bbox.west, bbox.south, 180.0, bbox.north),
            &mut tiles,
        );
        walk_tiles(
            &BoundingBox::new(-180.0, bbox.south, bbox.east, bbox.north),
            &mut tiles,
        );
    } else {
        walk_tiles(bbox, &mut tiles);
    }
    Ok(tiles)
}

fn validate(bbox: &BoundingBox) -> Result<()> {
    let invalid = |reason| Error::InvalidBounds {
        west: bbox.west,
        south: bbox.south,
        east: bbox.east,
        north: bbox.north,
        reason,
    };

    if !(-180.0..=180.0).contains(&bbox.west) || !(-180.0..=180.0).contains(&bbox.east) {
        return Err(invalid("longitude outside [-180, 180]"));
    }
    if !(-90.0..=90.0).contains(&bbox.south) || !(-90.0..=90.0).contains(&bbox.north) {
        return Err(invalid("latitude outside [-90, 90]"));
    }
    if bbox.south > bbox.north {
        return Err(invalid("south exceeds north"));
    }
    Ok(())
}

fn walk_tiles(bbox: &BoundingBox, tiles: &mut BTreeSet<TileId>) {
    let mut lat = snap_to_grid(bbox.south);
    while (lat as f64) < bbox.north {
        let mut lon = snap_to_grid(bbox.west);
        while (lon as f64) < bbox.east {
            let tile = TileId { lat, lon };
            let cell = tile.bounds();
            let intersects = !(cell.east <= bbox.west
                || cell.west >= bbox.east
                || cell.north <= bbox.south
                || cell.south >= bbox.north);
            if intersects {
                tiles.insert(tile);
            }
            lon += TILE_SIZE_DEG as i32;
        }
        lat += TILE_SIZE_DEG as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tiles: &BTreeSet<TileId>) -> Vec<String> {
        tiles.iter().map(|t| t.name()).collect()
    }

    #[test]
    fn bbox_inside_one_tile_returns_exactly_that_tile() {
        let bbox = BoundingBox::new(-59.9, 54.1, -59.1, 54.9);
        let tiles = locate_tiles(&bbox).unwrap();
        assert_eq!(names(&tiles), vec!["N54W060"]);
    }

    #[test]
    fn bbox_spanning_two_tiles_returns_both_and_no_extras() {
        let bbox = BoundingBox::new(-60.2, 54.1, -59.1, 54.9);
        let tiles = locate_tiles(&bbox).unwrap();
        assert_eq!(names(&tiles), vec!["N54W063", "N54W060"]);
    }

    #[test]
    fn boundary_touching_counts_as_non_intersecting() {
        // Exactly one cell; neighbors share only an edge.
        let bbox = BoundingBox::new(-60.0, 54.0, -57.0, 57.0);
        let tiles = locate_tiles(&bbox).unwrap();
        assert_eq!(names(&tiles), vec!["N54W060"]);
    }

    #[test]
    fn antimeridian_bbox_is_split() {
        let bbox = BoundingBox::new(179.0, 60.1, -179.0, 60.9);
        let tiles = locate_tiles(&bbox).unwrap();
        assert_eq!(names(&tiles), vec!["N60W180", "N60E177"]);
    }

    #[test]
    fn inverted_latitude_is_invalid() {
        let bbox = BoundingBox::new(-60.0, 55.0, -59.0, 54.0);
        assert!(matches!(
            locate_tiles(&bbox),
            Err(Error::InvalidBounds { .. })
        ));
    }

    #[test]
    fn out_of_range_longitude_is_invalid() {
        let bbox = BoundingBox::new(-200.0, 54.0, -59.0, 55.0);
        assert!(matches!(
            locate_tiles(&bbox),
            Err(Error::InvalidBounds { .. })
        ));
    }

    #[test]
    fn snapping_handles_negative_coordinates() {
        assert_eq!(TileId::containing(-59.1, 54.2), TileId { lat: 54, lon: -60 });
        assert_eq!(TileId::containing(-60.0, 54.0), TileId { lat: 54, lon: -60 });
        assert_eq!(TileId::containing(9.5, -2.5), TileId { lat: -3, lon: 9 });
    }

    #[test]
    fn tile_names_follow_the_convention() {
        assert_eq!(TileId { lat: 54, lon: -60 }.name(), "N54W060");
        assert_eq!(TileId { lat: -3, lon: 9 }.name(), "S03E009");
        assert_eq!(TileId { lat: 0, lon: 0 }.name(), "N00E000");
    }

    #[test]
    fn filenames_follow_the_convention() {
        let tile = TileId { lat: 54, lon: -60 };
        assert_eq!(
            tile.filename(TileVariant::Map),
            "ESA_WorldCover_10m_2021_V200_N54W060_Map.tif"
        );
        assert_eq!(
            tile.filename(TileVariant::Preprocessed),
            "ESA_WorldCover_10m_2021_V200_N54W060_preprocessed.tif"
        );
    }
}
