//! Error types for the `scout-stats` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Broad category of a failure, used by callers to decide how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset was absent or unreadable at startup.
    NotLoaded,
    /// A lookup found nothing.
    NotFound,
    /// The caller supplied invalid input.
    Validation,
}

/// Errors returned by table loading and stats queries.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Every query on a service whose table failed to load.
    #[error("the stats dataset is not loaded")]
    NotLoaded,

    /// No player name matched the search.
    #[error("no data found for player: {name}")]
    PlayerNotFound {
        /// The name that was searched for.
        name: String,
    },

    /// The requested metric is unknown or not a column of this table.
    #[error("metric '{metric}' is not available; available metrics: {}", .available.join(", "))]
    InvalidMetric {
        /// The metric as requested.
        metric: String,
        /// Metrics that can be ranked on this table.
        available: Vec<String>,
    },

    /// The query itself is malformed (e.g. a blank player name).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The CSV header lacks a column the schema requires.
    #[error("required column '{column}' is missing from the dataset")]
    MissingColumn {
        /// The missing column name.
        column: String,
    },

    /// The dataset file could not be opened.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path of the dataset.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The dataset is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StatsError {
    /// Return the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotLoaded | Self::MissingColumn { .. } | Self::Io { .. } | Self::Csv(_) => {
                ErrorKind::NotLoaded
            }
            Self::PlayerNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidMetric { .. } | Self::InvalidQuery(_) => ErrorKind::Validation,
        }
    }
}

/// A convenience result type for stats operations.
pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_metric_lists_alternatives() {
        let err = StatsError::InvalidMetric {
            metric: "NotAColumn".into(),
            available: vec!["Gls".into(), "Ast".into()],
        };
        assert_eq!(
            err.to_string(),
            "metric 'NotAColumn' is not available; available metrics: Gls, Ast"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(StatsError::NotLoaded.kind(), ErrorKind::NotLoaded);
    }
}
