//! The rankable performance metrics.
//!
//! Column names in the stats export are free-form strings; rankings only
//! accept names that parse into [`Metric`] *and* exist in the loaded table,
//! so a typo becomes a validation error instead of an empty result.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A numeric performance column that players can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Matches played.
    MatchesPlayed,
    /// Matches started.
    Starts,
    /// Minutes played.
    Minutes,
    /// Minutes played divided by 90.
    Nineties,
    /// Goals.
    Goals,
    /// Assists.
    Assists,
    /// Goals plus assists.
    GoalsAssists,
    /// Non-penalty goals.
    NonPenaltyGoals,
    /// Penalty kicks made.
    PenaltiesScored,
    /// Penalty kicks attempted.
    PenaltiesAttempted,
    /// Yellow cards.
    YellowCards,
    /// Red cards.
    RedCards,
    /// Expected goals.
    ExpectedGoals,
    /// Non-penalty expected goals.
    NonPenaltyExpectedGoals,
    /// Expected assisted goals.
    ExpectedAssistedGoals,
    /// Non-penalty xG plus xAG.
    NonPenaltyExpectedGoalsAssists,
    /// Progressive carries.
    ProgressiveCarries,
    /// Progressive passes.
    ProgressivePasses,
    /// Progressive passes received.
    ProgressivePassesReceived,
}

impl Metric {
    /// Every known metric, in display order.
    pub const ALL: [Metric; 19] = [
        Metric::MatchesPlayed,
        Metric::Starts,
        Metric::Minutes,
        Metric::Nineties,
        Metric::Goals,
        Metric::Assists,
        Metric::GoalsAssists,
        Metric::NonPenaltyGoals,
        Metric::PenaltiesScored,
        Metric::PenaltiesAttempted,
        Metric::YellowCards,
        Metric::RedCards,
        Metric::ExpectedGoals,
        Metric::NonPenaltyExpectedGoals,
        Metric::ExpectedAssistedGoals,
        Metric::NonPenaltyExpectedGoalsAssists,
        Metric::ProgressiveCarries,
        Metric::ProgressivePasses,
        Metric::ProgressivePassesReceived,
    ];

    /// The metrics offered in the dashboard's ranking picker.
    pub const DASHBOARD: [Metric; 8] = [
        Metric::Goals,
        Metric::Assists,
        Metric::ExpectedGoals,
        Metric::ExpectedAssistedGoals,
        Metric::ProgressiveCarries,
        Metric::ProgressivePasses,
        Metric::ProgressivePassesReceived,
        Metric::Starts,
    ];

    /// The column header this metric is stored under.
    pub const fn column(self) -> &'static str {
        match self {
            Metric::MatchesPlayed => "MP",
            Metric::Starts => "Starts",
            Metric::Minutes => "Min",
            Metric::Nineties => "90s",
            Metric::Goals => "Gls",
            Metric::Assists => "Ast",
            Metric::GoalsAssists => "G+A",
            Metric::NonPenaltyGoals => "G-PK",
            Metric::PenaltiesScored => "PK",
            Metric::PenaltiesAttempted => "PKatt",
            Metric::YellowCards => "CrdY",
            Metric::RedCards => "CrdR",
            Metric::ExpectedGoals => "xG",
            Metric::NonPenaltyExpectedGoals => "npxG",
            Metric::ExpectedAssistedGoals => "xAG",
            Metric::NonPenaltyExpectedGoalsAssists => "npxG+xAG",
            Metric::ProgressiveCarries => "PrgC",
            Metric::ProgressivePasses => "PrgP",
            Metric::ProgressivePassesReceived => "PrgR",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

/// Returned when a string names no known metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric '{}'", self.0)
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for Metric {
    type Err = UnknownMetric;

    /// Exact column names win; otherwise a unique case-insensitive match is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(metric) = Metric::ALL.iter().find(|m| m.column() == s) {
            return Ok(*metric);
        }
        let mut folded = Metric::ALL.iter().filter(|m| m.column().eq_ignore_ascii_case(s));
        match (folded.next(), folded.next()) {
            (Some(metric), None) => Ok(*metric),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}
