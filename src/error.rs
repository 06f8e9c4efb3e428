//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O and GDAL errors, and provides semantic variants for
//! bounds validation, tile resolution, and grid reconciliation failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL reader error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("invalid bounding box ({reason}): W={west} S={south} E={east} N={north}")]
    InvalidBounds {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        reason: &'static str,
    },

    #[error("missing WorldCover tile {tile}: expected {filename} under {dir}")]
    MissingTile {
        tile: String,
        filename: String,
        dir: String,
    },

    #[error("grid mismatch: {0}")]
    GridMismatch(String),

    #[error("processing error: {0}")]
    Processing(String),
}

impl Error {
    pub fn grid_mismatch<S: Into<String>>(msg: S) -> Self {
        Error::GridMismatch(msg.into())
    }
}
