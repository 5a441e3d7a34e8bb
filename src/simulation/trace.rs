//! Typed payment-plan trace events

use serde::Serialize;
use std::fmt;

/// One entry in a payment plan's event log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlanEvent {
    /// A loan reached zero balance after the given number of months
    LoanFinished { name: String, months: i64 },
    /// A loan's monthly payment grew by `amount` from reallocated capacity
    PaymentIncreased {
        name: String,
        amount: f64,
        new_payment: f64,
    },
    /// The run was abandoned after paying more than the best known plan
    Pruned { amount_paid: f64 },
    /// The run reached the terminal year with loans still outstanding
    TimedOut,
}

impl fmt::Display for PlanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanEvent::LoanFinished { name, months } => {
                write!(f, "Loan {} finished in {} months", name, months)
            }
            PlanEvent::PaymentIncreased {
                name,
                amount,
                new_payment,
            } => write!(f, "Increase {} by ${:.2} to ${:.2}", name, amount, new_payment),
            PlanEvent::Pruned { amount_paid } => write!(f, "Prune plan at ${:.2}", amount_paid),
            PlanEvent::TimedOut => write!(f, "Reached end of time without paying all loans"),
        }
    }
}
