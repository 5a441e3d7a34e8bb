//! Payment statistics and calendar arithmetic

use crate::loan::DATE_FORMAT;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Average number of days per month in the Gregorian calendar
pub const DAYS_PER_MONTH: f64 = 30.436875;

/// Calendar span between two dates: whole months plus leftover days
///
/// Matches calendar semantics rather than fixed-length months: the whole-month
/// count is the largest n such that `start + n months <= end`, and the days
/// are whatever remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSpan {
    pub months: i64,
    pub days: i64,
}

impl CalendarSpan {
    /// Span from `start` to `end`; both fields are negative when `end` is
    /// before `start`
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            let span = Self::between(end, start);
            return Self {
                months: -span.months,
                days: -span.days,
            };
        }

        let mut months = (i64::from(end.year()) - i64::from(start.year())) * 12
            + (i64::from(end.month()) - i64::from(start.month()));
        // Month addition clamps at month ends, so the estimate can overshoot
        // when end's day-of-month comes earlier than start's
        while months > 0 && add_months(start, months) > end {
            months -= 1;
        }
        let days = (end - add_months(start, months)).num_days();

        Self { months, days }
    }

    /// Convert to raw months, rounding the leftover days by the average
    /// month length
    pub fn to_months(&self) -> i64 {
        (self.months as f64 + self.days as f64 / DAYS_PER_MONTH).round() as i64
    }
}

fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    // Spans are bounded by the simulation's year limit, far from chrono's range
    date.checked_add_months(Months::new(months as u32))
        .expect("date within supported range")
}

/// Age a person born on `date_of_birth` would be on `date`, handling a
/// birthday not yet reached in `date`'s year
pub fn age_on_date(date_of_birth: NaiveDate, date: NaiveDate) -> i32 {
    let mut age = date.year() - date_of_birth.year();
    if (date.month(), date.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Statistics for one simulated payment plan
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStats {
    pub date_of_birth: NaiveDate,
    pub start_date: NaiveDate,
    pub finish_date: Option<NaiveDate>,
    pub amount_paid: f64,
    pub months_paid: i64,
    pub years_paid: f64,
    pub finish_age: i32,
}

impl PaymentStats {
    pub fn new(date_of_birth: NaiveDate, start_date: NaiveDate) -> Self {
        Self {
            date_of_birth,
            start_date,
            finish_date: None,
            amount_paid: 0.0,
            months_paid: 0,
            years_paid: 0.0,
            finish_age: 0,
        }
    }

    /// Fill in the final statistics once the simulation has paid every loan
    pub(crate) fn finish(&mut self, finish_date: NaiveDate) {
        self.finish_date = Some(finish_date);
        self.months_paid = CalendarSpan::between(self.start_date, finish_date).to_months();
        self.years_paid = self.months_paid as f64 / 12.0;
        self.finish_age = age_on_date(self.date_of_birth, finish_date);
    }

    /// Relative comparison of this plan against another plan with the same
    /// birth date; positive values mean the other plan is cheaper/faster
    pub fn compare(&self, other: &PaymentStats) -> PlanComparison {
        let months_difference = match (self.finish_date, other.finish_date) {
            (Some(a), Some(b)) => CalendarSpan::between(b, a).to_months(),
            _ => 0,
        };

        PlanComparison {
            payment_difference: self.amount_paid - other.amount_paid,
            months_difference,
        }
    }
}

impl fmt::Display for PaymentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let finish = self
            .finish_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();

        writeln!(
            f,
            "\tYou will pay ${:.2} over {} months ({:.2} years)",
            self.amount_paid, self.months_paid, self.years_paid
        )?;
        writeln!(f, "\tApproximate finish date: {} (aged {})", finish, self.finish_age)
    }
}

/// Difference between two payment plans' statistics
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlanComparison {
    pub payment_difference: f64,
    pub months_difference: i64,
}

impl fmt::Display for PlanComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "New plan saves ${:.2} and finishes {} months earlier",
            self.payment_difference, self.months_difference
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_span_to_months_rounds_leftover_days() {
        // 1 year, 2 months, 20 days: 14 + 20/30.44 = 14.66, rounds to 15
        let span = CalendarSpan::between(date(2020, 1, 1), date(2021, 3, 21));
        assert_eq!(span.months, 14);
        assert_eq!(span.days, 20);
        assert_eq!(span.to_months(), 15);
    }

    #[test]
    fn test_span_handles_month_end_clamping() {
        let span = CalendarSpan::between(date(2023, 1, 31), date(2023, 3, 1));
        assert_eq!(span.months, 1);
        assert_eq!(span.days, 1);
    }

    #[test]
    fn test_span_can_be_negative() {
        let span = CalendarSpan::between(date(2021, 3, 1), date(2020, 1, 1));
        assert_eq!(span.months, -14);
        assert_eq!(span.to_months(), -14);
    }

    #[test]
    fn test_age_on_date() {
        let dob = date(2000, 3, 1);
        assert_eq!(age_on_date(dob, date(2024, 2, 28)), 23);
        assert_eq!(age_on_date(dob, date(2024, 3, 1)), 24);
        assert_eq!(age_on_date(dob, date(2024, 3, 2)), 24);
    }

    #[test]
    fn test_compare_to_self_is_zero() {
        let mut stats = PaymentStats::new(date(1990, 1, 1), date(2024, 1, 1));
        stats.amount_paid = 12_345.67;
        stats.finish(date(2030, 6, 15));

        let diff = stats.compare(&stats.clone());
        assert_eq!(diff.payment_difference, 0.0);
        assert_eq!(diff.months_difference, 0);
    }

    #[test]
    fn test_compare_reports_savings() {
        let dob = date(1990, 1, 1);
        let start = date(2024, 1, 1);

        let mut initial = PaymentStats::new(dob, start);
        initial.amount_paid = 20_000.0;
        initial.finish(date(2030, 1, 1));

        let mut changed = PaymentStats::new(dob, start);
        changed.amount_paid = 18_000.0;
        changed.finish(date(2029, 1, 1));

        let diff = initial.compare(&changed);
        assert_eq!(diff.payment_difference, 2_000.0);
        assert_eq!(diff.months_difference, 12);
    }
}
