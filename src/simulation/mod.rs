//! Payment simulation engine, statistics, and trace events

mod engine;
mod stats;
mod trace;

pub use engine::{Outcome, PaymentDevice};
pub use stats::{age_on_date, CalendarSpan, PaymentStats, PlanComparison, DAYS_PER_MONTH};
pub use trace::PlanEvent;
