use clap::Parser;
use std::path::PathBuf;

use seamask::TileVariant;

#[derive(Parser)]
#[command(name = "seamask", version, about = "SEAMASK CLI")]
pub struct CliArgs {
    /// HH channel raster (single scene mode)
    #[arg(long)]
    pub hh: Option<PathBuf>,

    /// HV channel raster (single scene mode)
    #[arg(long)]
    pub hv: Option<PathBuf>,

    /// JSON file listing {"hh": ..., "hv": ...} scene pairs (batch mode)
    #[arg(long)]
    pub scenes: Option<PathBuf>,

    /// WorldCover tile directory (default: data/worldcover)
    #[arg(long)]
    pub worldcover_dir: Option<PathBuf>,

    /// Output directory for masked channels (default: data/output)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Tile flavor on disk: raw class maps or preprocessed land/water tiles
    #[arg(long, value_enum)]
    pub tile_variant: Option<TileVariant>,

    /// Keep snow/ice unmasked so frozen-ocean returns survive (Arctic scenes)
    #[arg(long, default_value_t = false)]
    pub keep_sea_ice: bool,

    /// Coastline buffer iterations applied to the mask; 0 disables buffering
    #[arg(long)]
    pub coastline_dilation: Option<usize>,

    /// Disable morphological mask cleanup (closing + hole filling)
    #[arg(long, default_value_t = false)]
    pub no_cleanup: bool,

    /// JSON parameters file; explicit flags override its values
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Preprocess raw WorldCover tiles from this directory into
    /// --worldcover-dir, then exit
    #[arg(long)]
    pub preprocess_from: Option<PathBuf>,

    /// Batch mode: continue with remaining scenes when one fails
    #[arg(long, default_value_t = false)]
    pub keep_going: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
