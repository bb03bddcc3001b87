//! Text and JSON rendering of service results.

use scout_rag::RagError;
use scout_stats::{Metric, PlayerRecord, RankedPlayer, StatsError};
use serde::Serialize;
use serde_json::json;

use crate::dashboard::OutputFormat;

pub(crate) fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

pub(crate) fn player(record: &PlayerRecord, other_matches: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => pretty(&json!({ "player": record, "other_matches": other_matches })),
        OutputFormat::Text => {
            let width = record.iter().map(|(column, _)| column.chars().count()).max().unwrap_or(0);
            let mut out = format!("Stats for {}\n", record.name());
            for (column, value) in record.iter() {
                out.push_str(&format!("  {column:<width$}  {value}\n"));
            }
            if other_matches > 0 {
                let (noun, verb) =
                    if other_matches == 1 { ("player", "matches") } else { ("players", "match") };
                out.push_str(&format!(
                    "({other_matches} other {noun} also {verb}; showing the first. \
                     Refine the name to pick another.)\n"
                ));
            }
            out.trim_end().to_string()
        }
    }
}

pub(crate) fn ranking(metric: &str, rows: &[RankedPlayer], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => pretty(rows),
        OutputFormat::Text => {
            let label = rows.first().map_or_else(|| metric.to_string(), |r| r.metric.to_string());
            if rows.is_empty() {
                return format!("No players to rank by {label}.");
            }
            let table: Vec<[String; 5]> = rows
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    [
                        (i + 1).to_string(),
                        r.player.clone(),
                        r.squad.to_string(),
                        r.age.to_string(),
                        r.value.to_string(),
                    ]
                })
                .collect();
            let header =
                ["#".to_string(), "Player".into(), "Squad".into(), "Age".into(), label.clone()];
            let mut widths = header.each_ref().map(|h| h.chars().count());
            for row in &table {
                for (width, cell) in widths.iter_mut().zip(row) {
                    *width = (*width).max(cell.chars().count());
                }
            }

            let line = |cells: &[String; 5]| {
                cells
                    .iter()
                    .zip(widths)
                    .map(|(cell, width)| format!("{cell:<width$}"))
                    .collect::<Vec<_>>()
                    .join("  ")
                    .trim_end()
                    .to_string()
            };
            let mut out = format!("Top {} players by {label}\n{}\n", rows.len(), line(&header));
            for row in &table {
                out.push_str(&line(row));
                out.push('\n');
            }
            out.trim_end().to_string()
        }
    }
}

pub(crate) fn answer(question: &str, answer: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => pretty(&json!({ "question": question, "answer": answer })),
        OutputFormat::Text => answer.to_string(),
    }
}

pub(crate) fn metrics(metrics: &[Metric], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => pretty(metrics),
        OutputFormat::Text => {
            if metrics.is_empty() {
                return "The loaded table has no rankable columns.".to_string();
            }
            let names: Vec<String> = metrics
                .iter()
                .map(|m| {
                    if Metric::DASHBOARD.contains(m) { format!("{m}*") } else { m.to_string() }
                })
                .collect();
            format!("Rankable metrics (* = dashboard favourites):\n  {}", names.join(", "))
        }
    }
}

fn error(kind: &str, message: String, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => pretty(&json!({ "error": message, "kind": kind })),
        OutputFormat::Text => format!("[{kind}] {message}"),
    }
}

pub(crate) fn stats_error(err: &StatsError, format: OutputFormat) -> String {
    let kind = match err.kind() {
        scout_stats::ErrorKind::NotLoaded => "unavailable",
        scout_stats::ErrorKind::NotFound => "not found",
        scout_stats::ErrorKind::Validation => "invalid input",
    };
    error(kind, err.to_string(), format)
}

pub(crate) fn rag_error(err: &RagError, format: OutputFormat) -> String {
    let kind = match err.kind() {
        scout_rag::ErrorKind::NotLoaded => "unavailable",
        scout_rag::ErrorKind::NotFound => "not found",
        scout_rag::ErrorKind::Validation => "invalid input",
        scout_rag::ErrorKind::Upstream => "service error",
    };
    error(kind, err.to_string(), format)
}
