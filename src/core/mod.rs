//! Core processing building blocks: grid/band data model, WorldCover tile
//! handling, reprojection, mask construction, and the per-scene pipeline.
//! These are internal primitives consumed by the high-level `api` module.
pub mod apply;
pub mod band;
pub mod grid;
pub mod mask;
pub mod morphology;
pub mod params;
pub mod pipeline;
pub mod reproject;
pub mod worldcover;
