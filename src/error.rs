use thiserror::Error;

/// Errors surfaced while loading fixtures, series and settings.
///
/// Playback and chart operations are total and never produce one of these.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown input format for {0}")]
    UnknownFormat(String),

    #[error("no route with id {0}")]
    UnknownRoute(String),

    #[error("column '{0}' not found")]
    MissingColumn(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
