//! Command Line Interface (CLI) layer for SEAMASK.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for single-scene and batch
//! masking flows. It wires user-provided options to the underlying
//! library functionality exposed via `seamask::api`.
//!
//! If you are embedding seamask into another application, prefer using
//! the high-level `seamask::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
