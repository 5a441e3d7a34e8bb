//! Loan records and configuration loading

mod data;
pub mod loader;

pub use data::Loan;
pub use loader::{PlanConfig, DATE_FORMAT};
