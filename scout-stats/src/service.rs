//! The quantitative stats service: point lookups and top-N rankings.

use std::path::Path;

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::error::{Result, StatsError};
use crate::metric::Metric;
use crate::table::{Cell, PlayerRecord, PlayerTable, TableSchema};

/// One row of a ranking, projected to the display columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    /// Player name.
    pub player: String,
    /// Club.
    pub squad: Cell,
    /// Age as exported (often `years-days`).
    pub age: Cell,
    /// The metric ranked by.
    pub metric: Metric,
    /// The player's value for `metric`.
    pub value: Cell,
}

/// Read-only queries over a stats table loaded once at startup.
///
/// A service whose table could not be loaded is still constructed; every
/// query on it returns [`StatsError::NotLoaded`].
#[derive(Debug, Clone, Default)]
pub struct StatsService {
    table: Option<PlayerTable>,
}

impl StatsService {
    /// Load the table at `path`. Never fails: a missing or malformed file
    /// yields a service without a table, and the reason is logged.
    pub fn load(path: impl AsRef<Path>, schema: TableSchema) -> Self {
        let path = path.as_ref();
        match PlayerTable::from_path(path, schema) {
            Ok(table) => {
                info!(path = %path.display(), rows = table.row_count(), "stats dataset loaded");
                Self { table: Some(table) }
            }
            Err(StatsError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "stats dataset not found");
                Self::unloaded()
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load stats dataset");
                Self::unloaded()
            }
        }
    }

    /// Wrap an already loaded table.
    pub fn from_table(table: PlayerTable) -> Self {
        Self { table: Some(table) }
    }

    /// A service with no table.
    pub fn unloaded() -> Self {
        Self { table: None }
    }

    /// Whether a table is loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// Number of players in the table (zero when unloaded).
    pub fn row_count(&self) -> usize {
        self.table.as_ref().map_or(0, PlayerTable::row_count)
    }

    fn table(&self) -> Result<&PlayerTable> {
        self.table.as_ref().ok_or(StatsError::NotLoaded)
    }

    /// All players whose name contains `name`, case-insensitively, in row order.
    ///
    /// # Errors
    ///
    /// [`StatsError::NotLoaded`], [`StatsError::InvalidQuery`] for a blank
    /// name, or [`StatsError::PlayerNotFound`] when nothing matches.
    pub fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>> {
        let table = self.table()?;
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Err(StatsError::InvalidQuery("player name must not be empty".to_string()));
        }

        let matches: Vec<PlayerRecord> = (0..table.row_count())
            .filter(|&row| table.player_name(row).to_lowercase().contains(&needle))
            .map(|row| table.record(row))
            .collect();

        if matches.is_empty() {
            return Err(StatsError::PlayerNotFound { name: name.trim().to_string() });
        }
        Ok(matches)
    }

    /// The first player (in row order) whose name contains `name`, case-insensitively.
    ///
    /// Further matches are not reported; use [`find_players`](Self::find_players)
    /// to see them.
    ///
    /// # Errors
    ///
    /// Same as [`find_players`](Self::find_players).
    #[instrument(skip(self))]
    pub fn get_player_stats(&self, name: &str) -> Result<PlayerRecord> {
        let mut matches = self.find_players(name)?;
        if matches.len() > 1 {
            info!(match_count = matches.len(), "player name is ambiguous, returning first match");
        }
        Ok(matches.swap_remove(0))
    }

    /// Metrics that are both known and present in the loaded table.
    ///
    /// # Errors
    ///
    /// [`StatsError::NotLoaded`].
    pub fn available_metrics(&self) -> Result<Vec<Metric>> {
        let table = self.table()?;
        Ok(Metric::ALL.into_iter().filter(|m| table.has_column(m.column())).collect())
    }

    /// The `top_n` players with the highest value of `metric`.
    ///
    /// `metric` must name a known [`Metric`] that is a column of the table.
    /// Ties keep table order and blank values rank last. Asking for more
    /// rows than exist returns every row.
    ///
    /// # Errors
    ///
    /// [`StatsError::NotLoaded`] or [`StatsError::InvalidMetric`].
    #[instrument(skip(self))]
    pub fn find_top_players(&self, metric: &str, top_n: usize) -> Result<Vec<RankedPlayer>> {
        let table = self.table()?;
        let invalid = || StatsError::InvalidMetric {
            metric: metric.to_string(),
            available: Metric::ALL
                .into_iter()
                .filter(|m| table.has_column(m.column()))
                .map(|m| m.column().to_string())
                .collect(),
        };
        let parsed: Metric = metric.parse().map_err(|_| invalid())?;
        let column = table.column_index(parsed.column()).ok_or_else(invalid)?;
        Ok(self.rank(table, parsed, column, top_n))
    }

    /// [`find_top_players`](Self::find_top_players) for an already parsed metric.
    ///
    /// # Errors
    ///
    /// [`StatsError::NotLoaded`], or [`StatsError::InvalidMetric`] if the
    /// table has no such column.
    pub fn rank_by(&self, metric: Metric, top_n: usize) -> Result<Vec<RankedPlayer>> {
        self.find_top_players(metric.column(), top_n)
    }

    fn rank(
        &self,
        table: &PlayerTable,
        metric: Metric,
        column: usize,
        top_n: usize,
    ) -> Vec<RankedPlayer> {
        let rows = table.rows();
        let mut order: Vec<usize> = (0..rows.len()).collect();
        // `sort_by` is stable, so equal values keep table order.
        order.sort_by(|&a, &b| rows[a][column].cmp_desc(&rows[b][column]));

        order
            .into_iter()
            .take(top_n)
            .map(|row| RankedPlayer {
                player: table.player_name(row),
                squad: table.team(row).clone(),
                age: table.age(row).clone(),
                metric,
                value: rows[row][column].clone(),
            })
            .collect()
    }
}
