//! Error types for runtime wiring.

use thiserror::Error;

/// Errors raised while wiring or running the pipeline.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] drift_store::StoreError),

    /// Settings could not be loaded or validated.
    #[error("settings error: {0}")]
    Settings(#[from] drift_settings::SettingsError),

    /// An exclude pattern failed to compile.
    #[error("invalid exclude pattern: {0}")]
    Glob(#[from] globset::Error),
}

/// Convenience type alias for runtime results.
pub type Result<T> = std::result::Result<T, RuntimeError>;
