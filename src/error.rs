//! Error taxonomy for the planner

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by config loading and plan selection
///
/// A single heuristic timing out or being pruned is not an error; it is
/// recovered locally by dropping that heuristic from the candidate pool.
/// `NoViableStrategy` is raised only when every heuristic fails.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("could not read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file")]
    Parse(#[from] toml::de::Error),

    #[error("invalid date of birth {value:?} (expected m/d/yyyy)")]
    InvalidDate { value: String },

    #[error("loan {name:?} has invalid payment day {day} (expected 1-31)")]
    InvalidPaymentDay { name: String, day: u32 },

    #[error("no loans found in config")]
    NoLoans,

    #[error("no heuristic produced a viable payment plan")]
    NoViableStrategy,
}
