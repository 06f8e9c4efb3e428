#![doc = r#"
SEAMASK — WorldCover-based land masking for geocoded Sentinel-1 SAR scenes.

This crate derives a per-pixel land/water mask for a geocoded Sentinel-1
scene by fusing it with the ESA WorldCover land-cover product, then applies
the mask to each polarization channel and writes NaN-masked GeoTIFFs in the
original SAR geometry. It powers the seamask CLI and can be embedded in your
own Rust applications.

The pipeline selects the 3°×3° WorldCover tiles intersecting the scene
footprint, mosaics them, resamples the mosaic onto the exact SAR grid with
nearest-neighbor sampling (land-cover classes are categorical), builds the
boolean mask from a configurable land-class set, and masks both channels
identically so they stay pixel-aligned.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.
- ESA WorldCover tiles on local disk, named by the standard convention
  (`ESA_WorldCover_10m_2021_V200_N54W060_Map.tif`).

Quick start: mask a scene pair
------------------------------
```rust,no_run
use std::path::Path;
use seamask::{MaskingParams, SceneOutcome, api};

fn main() -> seamask::Result<()> {
    let params = MaskingParams {
        worldcover_dir: "data/worldcover".into(),
        output_dir: "data/output".into(),
        ..Default::default()
    };

    match api::process_scene(
        Path::new("/data/scene_HH.tif"),
        Path::new("/data/scene_HV.tif"),
        &params,
    )? {
        SceneOutcome::Masked(report) => {
            println!("wrote {}", report.hh_output.display());
        }
        SceneOutcome::Skipped(reason) => println!("skipped: {}", reason),
    }
    Ok(())
}
```

Arctic scenes
-------------
The default land-class set masks everything except permanent water. To keep
sea ice visible, drop snow/ice from the land set:

```rust
use seamask::{LandClassSet, MaskingParams};

let params = MaskingParams {
    land_classes: LandClassSet::keeping_sea_ice(),
    ..Default::default()
};
```

Error handling
--------------
All public functions return `seamask::Result<T>`; match on `seamask::Error`
to handle specific cases, e.g. a missing tile names the exact file to fetch:

```rust,no_run
use std::path::Path;
use seamask::{Error, MaskingParams, api};

fn main() {
    let params = MaskingParams::default();
    match api::process_scene(Path::new("hh.tif"), Path::new("hv.tif"), &params) {
        Ok(_) => {}
        Err(Error::MissingTile { filename, .. }) => eprintln!("fetch {filename}"),
        Err(Error::InvalidBounds { .. }) => eprintln!("bad scene footprint"),
        Err(other) => eprintln!("{other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`types`] — enums and core types (e.g. `LandClassSet`, `TileVariant`).
- [`core`] — grid/band data model, tile math, reprojection, mask building.
- [`io`] — GDAL reader and GeoTIFF writers.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::band::RasterBand;
pub use core::grid::{BoundingBox, GeoGrid, GeoTransform, PixelWindow};
pub use core::params::MaskingParams;
pub use error::{Error, Result};
pub use types::{Channel, LandClassSet, TileVariant, worldcover_class};

// Tile handling
pub use core::worldcover::{TileId, locate_tiles};

// Readers and writers
pub use io::gdal::{GdalError, GdalRasterReader};
pub use io::writers::{write_geotiff_f32, write_geotiff_u8};

// High-level API re-exports
pub use api::{
    BatchReport, SceneOutcome, ScenePair, SceneReport, SkipReason, preprocess_worldcover_dir,
    process_scene, process_scenes,
};
