//! # scout-stats
//!
//! Tabular player statistics for the scouting dashboard.
//!
//! A [`StatsService`] owns one [`PlayerTable`] parsed from a season CSV export
//! at startup. It answers two kinds of questions:
//!
//! - point lookups by (partial, case-insensitive) player name, returning the
//!   full [`PlayerRecord`] for the first match;
//! - top-N rankings by a [`Metric`], returning [`RankedPlayer`] projections.
//!
//! ```rust,no_run
//! use scout_stats::{StatsService, TableSchema};
//!
//! let stats = StatsService::load("data/stats.csv", TableSchema::default());
//! let saka = stats.get_player_stats("Saka")?;
//! let scorers = stats.find_top_players("Gls", 5)?;
//! # Ok::<(), scout_stats::StatsError>(())
//! ```

pub mod error;
pub mod metric;
pub mod service;
pub mod table;

pub use error::{ErrorKind, Result, StatsError};
pub use metric::{Metric, UnknownMetric};
pub use service::{RankedPlayer, StatsService};
pub use table::{Cell, PlayerRecord, PlayerTable, TableSchema};
