//! Error type shared by the renderer, the driver, the engines and the helpers.

use thiserror::Error;

/// Everything that can go wrong while turning a plot description into a figure.
#[derive(Debug, Error)]
pub enum PlotError {
    /// `name_position` was neither `ylabel` nor `title`.
    #[error("unknown position for name: {0}")]
    UnknownNamePosition(String),

    /// A histogram bin specification had the wrong shape.
    #[error("invalid bin specification: {0}")]
    InvalidBins(String),

    /// Any other invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failure reported by the drawing engine (length mismatch, backend error, ...).
    #[error("drawing engine error: {0}")]
    Engine(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlotError>;

/// Wrap a backend error the way plotters reports it (`Debug`).
pub(crate) fn engine_err<E: std::fmt::Debug>(e: E) -> PlotError {
    PlotError::Engine(format!("{e:?}"))
}
