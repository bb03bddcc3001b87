//! The in-memory player table.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::{Result, StatsError};

/// A single typed table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A finite number.
    Number(f64),
    /// Any non-numeric text.
    Text(String),
    /// A blank cell.
    Empty,
}

impl Cell {
    /// Parse a raw CSV field. Thousands separators (`1,234`) are accepted.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Cell::Empty;
        }
        let numeric = if raw.contains(',')
            && raw.chars().all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        {
            raw.replace(',', "").parse::<f64>().ok()
        } else {
            raw.parse::<f64>().ok()
        };
        match numeric {
            Some(value) if value.is_finite() => Cell::Number(value),
            Some(_) => Cell::Empty,
            None => Cell::Text(raw.to_string()),
        }
    }

    /// The numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// The text value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Descending order with blanks and text last.
    pub(crate) fn cmp_desc(&self, other: &Cell) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Text(text) => f.write_str(text),
            Cell::Empty => Ok(()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                serializer.serialize_i64(*value as i64)
            }
            Cell::Number(value) => serializer.serialize_f64(*value),
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Empty => serializer.serialize_none(),
        }
    }
}

/// Which columns identify a player, their club and their age.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableSchema {
    /// Column searched by name lookups.
    pub player_column: String,
    /// Column shown as the player's team in rankings.
    pub team_column: String,
    /// Column shown as the player's age in rankings.
    pub age_column: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            player_column: "Player".to_string(),
            team_column: "Squad".to_string(),
            age_column: "Age".to_string(),
        }
    }
}

/// One player's row: every column in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    columns: Arc<[String]>,
    values: Vec<Cell>,
    player_index: usize,
}

impl PlayerRecord {
    /// The player's name.
    pub fn name(&self) -> String {
        self.values[self.player_index].to_string()
    }

    /// Value of `column`, if the table has it.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns.iter().position(|c| c == column).map(|i| &self.values[i])
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for PlayerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// The full stats table, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct PlayerTable {
    columns: Arc<[String]>,
    rows: Vec<Vec<Cell>>,
    schema: TableSchema,
    player_index: usize,
    team_index: usize,
    age_index: usize,
}

impl PlayerTable {
    /// Read a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Io`] if the file cannot be opened,
    /// [`StatsError::Csv`] if it is not valid CSV, and
    /// [`StatsError::MissingColumn`] if a schema column is absent.
    pub fn from_path(path: impl AsRef<Path>, schema: TableSchema) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| StatsError::Io { path: path.to_path_buf(), source })?;
        Self::from_reader(file, schema)
    }

    /// Read CSV data with a header row from any reader.
    ///
    /// Duplicate header names get a `.1`, `.2`, … suffix so every column stays
    /// addressable. Short rows are padded with [`Cell::Empty`].
    ///
    /// # Errors
    ///
    /// See [`PlayerTable::from_path`].
    pub fn from_reader<R: Read>(reader: R, schema: TableSchema) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Arc<[String]> = dedupe_headers(csv.headers()?.iter()).into();
        let index_of = |column: &str| {
            columns
                .iter()
                .position(|c| c == column)
                .ok_or_else(|| StatsError::MissingColumn { column: column.to_string() })
        };
        let player_index = index_of(&schema.player_column)?;
        let team_index = index_of(&schema.team_column)?;
        let age_index = index_of(&schema.age_column)?;

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record?;
            let mut row: Vec<Cell> = record.iter().take(columns.len()).map(Cell::parse).collect();
            row.resize(columns.len(), Cell::Empty);
            rows.push(row);
        }

        debug!(columns = columns.len(), rows = rows.len(), "parsed stats table");
        Ok(Self { columns, rows, schema, player_index, team_index, age_index })
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the header contains `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// The schema this table was loaded with.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Number of player rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub(crate) fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub(crate) fn player_name(&self, row: usize) -> String {
        self.rows[row][self.player_index].to_string()
    }

    pub(crate) fn team(&self, row: usize) -> &Cell {
        &self.rows[row][self.team_index]
    }

    pub(crate) fn age(&self, row: usize) -> &Cell {
        &self.rows[row][self.age_index]
    }

    pub(crate) fn record(&self, row: usize) -> PlayerRecord {
        PlayerRecord {
            columns: Arc::clone(&self.columns),
            values: self.rows[row].clone(),
            player_index: self.player_index,
        }
    }
}

fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let headers: Vec<&str> = headers.collect();
    let mut taken: HashSet<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for header in headers {
        if emitted.insert(header) {
            out.push(header.to_string());
            continue;
        }
        let suffix = next_suffix.entry(header).or_insert(1);
        let mut candidate = format!("{header}.{suffix}");
        while taken.contains(&candidate) {
            *suffix += 1;
            candidate = format!("{header}.{suffix}");
        }
        *suffix += 1;
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
