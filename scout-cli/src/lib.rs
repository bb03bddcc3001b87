//! # scout-cli
//!
//! The `scout` command-line dashboard.
//!
//! A [`Dashboard`] holds the two read-only services, the stats table and the
//! scouting-report agent, built once from a [`ScoutConfig`]. Each user
//! [`Action`] calls one of them and renders the result as text or JSON.
//! The binary exposes actions as one-shot subcommands and as an interactive
//! session ([`repl::run`]).

pub mod config;
pub mod dashboard;
mod render;
pub mod repl;

pub use config::{ConfigError, ConfigOverrides, ScoutConfig};
pub use dashboard::{Action, Dashboard, OutputFormat};
