//! ESA WorldCover specifics: tile grid math, filename convention,
//! mosaicking, and tile preprocessing.
pub mod mosaic;
pub mod preprocess;
pub mod tiles;

pub use mosaic::mosaic_tiles;
pub use preprocess::preprocess_tiles;
pub use tiles::{TileId, locate_tiles};
