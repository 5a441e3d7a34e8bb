//! Loan Planner - payoff simulator for a set of concurrent loans
//!
//! This library provides:
//! - A day-stepped payment simulator with interest accrual and payoff detection
//! - A family of allocation heuristics deciding where extra capacity goes
//! - Best-plan selection with branch-and-bound style pruning across heuristics
//! - Baseline vs. user-modified scenario comparison and report rendering

pub mod error;
pub mod heuristics;
pub mod loan;
pub mod planner;
pub mod report;
pub mod simulation;

// Re-export commonly used types
pub use error::PlannerError;
pub use heuristics::{Heuristic, ALL_HEURISTICS};
pub use loan::{Loan, PlanConfig};
pub use planner::LoanPlanner;
pub use simulation::{Outcome, PaymentDevice, PaymentStats, PlanComparison};
