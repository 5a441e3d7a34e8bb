//! Loan data structure and per-loan payment computations

use serde::Serialize;

/// A single loan being paid down
///
/// `monthly_payment` is mutable state: it grows when the loan receives
/// reallocated capacity from a paid-off loan, and never decreases during a
/// simulation run. `monthly_increase` and `upfront_payment` are bookkeeping
/// for user-requested plan changes and stay 0 on the baseline plan.
#[derive(Debug, Clone, Serialize)]
pub struct Loan {
    /// Loan name, unique within a run
    pub name: String,

    /// Outstanding balance; may transiently go negative after the final payment
    pub balance: f64,

    /// Annual interest rate as a fraction (input percentage / 100)
    pub interest_rate: f64,

    /// Current monthly payment
    pub monthly_payment: f64,

    /// Day of month (1-31) the payment is due
    pub payment_day: u32,

    /// Accumulated user-requested monthly payment increase
    pub monthly_increase: f64,

    /// Accumulated user-requested upfront payment
    pub upfront_payment: f64,
}

impl Loan {
    /// Create a loan from its configured values; `interest_rate_pct` is the
    /// rate as a percentage (e.g. 6.5 for 6.5% annual)
    pub fn new(
        name: impl Into<String>,
        balance: f64,
        interest_rate_pct: f64,
        monthly_payment: f64,
        payment_day: u32,
    ) -> Self {
        Self {
            name: name.into(),
            balance,
            interest_rate: interest_rate_pct / 100.0,
            monthly_payment,
            payment_day,
            monthly_increase: 0.0,
            upfront_payment: 0.0,
        }
    }

    /// Amount of the next payment: the monthly payment, or the remaining
    /// balance if that is smaller. The final payment never overpays.
    pub fn payment_amount(&self) -> f64 {
        if self.monthly_payment < self.balance {
            self.monthly_payment
        } else {
            self.balance
        }
    }

    /// Simple interest accrued on the current balance over `days` days
    /// (daily-proportional, no compounding within the period)
    pub fn interest_accrued(&self, days: f64) -> f64 {
        self.balance * self.interest_rate * (days / 365.0)
    }

    /// Ratio of interest accrued over `days` days to the monthly payment
    ///
    /// Contract: `monthly_payment > 0`. Callers must filter zero-payment
    /// loans out of candidate sets before invoking.
    pub fn interest_to_payment_ratio(&self, days: f64) -> f64 {
        debug_assert!(
            self.monthly_payment > 0.0,
            "interest_to_payment_ratio requires a positive monthly payment"
        );
        self.interest_accrued(days) / self.monthly_payment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_stored_as_fraction() {
        let loan = Loan::new("Car", 12_000.0, 6.5, 300.0, 15);
        assert_relative_eq!(loan.interest_rate, 0.065);
        assert_eq!(loan.monthly_increase, 0.0);
        assert_eq!(loan.upfront_payment, 0.0);
    }

    #[test]
    fn test_payment_amount_never_overpays() {
        let mut loan = Loan::new("Card", 50.0, 20.0, 100.0, 1);
        assert_eq!(loan.payment_amount(), 50.0);

        // Balance exactly equal to the payment: the balance is paid
        loan.balance = 100.0;
        assert_eq!(loan.payment_amount(), 100.0);

        loan.balance = 100.01;
        assert_eq!(loan.payment_amount(), 100.0);
    }

    #[test]
    fn test_interest_accrued() {
        let loan = Loan::new("Student", 10_000.0, 10.0, 200.0, 1);

        // One full year accrues the annual rate exactly
        assert_relative_eq!(loan.interest_accrued(365.0), 1_000.0);
        assert_relative_eq!(loan.interest_accrued(36.5), 100.0);
        assert_relative_eq!(loan.interest_accrued(0.0), 0.0);
    }

    #[test]
    fn test_interest_to_payment_ratio() {
        let loan = Loan::new("Student", 10_000.0, 10.0, 200.0, 1);
        assert_relative_eq!(loan.interest_to_payment_ratio(365.0), 5.0);
    }
}
