use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{LandClassSet, TileVariant};

/// Masking parameters suitable for config files and presets.
///
/// Everything the pipeline needs travels in this struct; there is no ambient
/// state, so scenes with different configurations can run side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingParams {
    /// Directory holding the WorldCover tiles
    pub worldcover_dir: PathBuf,
    /// Directory masked channels are written into
    pub output_dir: PathBuf,
    /// WorldCover classes masked as land
    pub land_classes: LandClassSet,
    /// Tile flavor on disk (raw class maps or preprocessed land/water tiles)
    pub tile_variant: TileVariant,
    /// Closing + hole filling on the mask before application
    pub mask_cleanup: bool,
    /// Coastline buffer iterations; 0 disables buffering
    pub coastline_dilation: usize,
}

impl Default for MaskingParams {
    fn default() -> Self {
        Self {
            worldcover_dir: PathBuf::from("data/worldcover"),
            output_dir: PathBuf::from("data/output"),
            land_classes: LandClassSet::default(),
            tile_variant: TileVariant::Map,
            mask_cleanup: true,
            coastline_dilation: 2,
        }
    }
}

impl MaskingParams {
    /// Load parameters from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Processing(format!("invalid parameter file {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: MaskingParams =
            serde_json::from_str(r#"{"worldcover_dir": "/tiles"}"#).unwrap();
        assert_eq!(params.worldcover_dir, PathBuf::from("/tiles"));
        assert_eq!(params.output_dir, PathBuf::from("data/output"));
        assert_eq!(params.coastline_dilation, 2);
        assert!(params.mask_cleanup);
    }

    #[test]
    fn params_round_trip_through_json() {
        let params = MaskingParams {
            coastline_dilation: 0,
            tile_variant: TileVariant::Preprocessed,
            ..Default::default()
        };
        let text = serde_json::to_string(&params).unwrap();
        let back: MaskingParams = serde_json::from_str(&text).unwrap();
        assert_eq!(back.coastline_dilation, 0);
        assert_eq!(back.tile_variant, TileVariant::Preprocessed);
    }
}
