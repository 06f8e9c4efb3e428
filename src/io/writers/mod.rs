pub mod tiff;

pub use tiff::{write_geotiff_f32, write_geotiff_u8};
