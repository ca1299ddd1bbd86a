use thiserror::Error;

/// Failures at the edges of the dashboard: reading the sheets and
/// exporting views. Filtering and aggregation never fail.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column in {sheet}: {column}")]
    MissingColumn { sheet: &'static str, column: &'static str },

    #[error("No data loaded: {0}")]
    NotLoaded(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
