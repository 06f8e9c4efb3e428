use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("--hh/--hv and --scenes are mutually exclusive; pick one mode")]
    ConflictingModes,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Masking error: {0}")]
    Mask(#[from] seamask::Error),
}
