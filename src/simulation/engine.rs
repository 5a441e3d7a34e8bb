//! Day-stepped loan payment simulator
//!
//! A `PaymentDevice` advances a virtual calendar one day at a time, applies
//! interest and payments on each loan's due day, and reallocates a paid-off
//! loan's monthly payment to the remaining loans one dollar at a time via the
//! configured heuristic. An optional pruning bound (the best known plan's
//! final amount paid) lets a run terminate as soon as it provably cannot win.

use super::stats::{CalendarSpan, PaymentStats, DAYS_PER_MONTH};
use super::trace::PlanEvent;
use crate::heuristics::Heuristic;
use crate::loan::Loan;
use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeMap;

/// The simulation gives up when the virtual calendar reaches this year
const MAX_YEAR: i32 = 3000;

/// Terminal state of a simulation run
///
/// Only `Paid` is a success; the statistics of a run that ended any other way
/// must not be consumed. `Pruned` is frequent and expected once a cheap
/// incumbent plan exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every loan reached zero balance
    Paid,
    /// Reached the terminal year with loans still outstanding
    TimedOut,
    /// Cumulative amount paid exceeded the best known plan's total
    Pruned,
    /// No loan had a positive balance at the start
    NothingOwed,
}

impl Outcome {
    pub fn is_paid(&self) -> bool {
        matches!(self, Outcome::Paid)
    }
}

/// Simulates paying a set of loans to completion under one heuristic
pub struct PaymentDevice {
    original_loans: Vec<Loan>,
    loans: Vec<Loan>,
    heuristic: Heuristic,
    prune_bound: Option<f64>,
    stats: PaymentStats,
    events: Vec<PlanEvent>,
}

impl PaymentDevice {
    /// Create a device owning its own copy of the loans
    ///
    /// `prune_bound` is the final amount paid by the best plan found so far,
    /// captured as an immutable snapshot at construction.
    pub fn new(
        date_of_birth: NaiveDate,
        start_date: NaiveDate,
        loans: Vec<Loan>,
        heuristic: Heuristic,
        prune_bound: Option<f64>,
    ) -> Self {
        let mut events = Vec::new();
        for loan in &loans {
            if loan.balance <= 0.0 {
                events.push(PlanEvent::LoanFinished {
                    name: loan.name.clone(),
                    months: 0,
                });
            }
        }

        Self {
            original_loans: loans,
            loans: Vec::new(),
            heuristic,
            prune_bound,
            stats: PaymentStats::new(date_of_birth, start_date),
            events,
        }
    }

    /// Run the simulation to a terminal state; call exactly once
    pub fn run(&mut self) -> Outcome {
        self.loans = self
            .original_loans
            .iter()
            .filter(|l| l.balance > 0.0)
            .cloned()
            .collect();

        if self.loans.is_empty() {
            return Outcome::NothingOwed;
        }

        let mut current = self.stats.start_date;

        while !self.loans.is_empty() {
            let (paid, date, pruned) = self.pay_until_payoff(current);
            current = date;

            if pruned {
                return Outcome::Pruned;
            }
            if paid.is_empty() {
                self.events.push(PlanEvent::TimedOut);
                log::debug!("{}: timed out at year {}", self.heuristic.name(), MAX_YEAR);
                return Outcome::TimedOut;
            }

            let months_so_far =
                CalendarSpan::between(self.stats.start_date, current).to_months();
            for loan in &paid {
                self.reallocate_payment(loan, months_so_far);
            }
        }

        self.stats.finish(current);
        Outcome::Paid
    }

    /// Step forward a day at a time until at least one loan pays off, the
    /// pruning bound is exceeded, or the calendar runs out. Returns the loans
    /// paid off, the day after the last processed date, and the prune flag.
    fn pay_until_payoff(&mut self, mut date: NaiveDate) -> (Vec<Loan>, NaiveDate, bool) {
        let mut paid = Vec::new();

        while paid.is_empty() && date.year() < MAX_YEAR {
            if self.should_prune() {
                self.events.push(PlanEvent::Pruned {
                    amount_paid: self.stats.amount_paid,
                });
                log::debug!(
                    "{}: pruned at ${:.2}",
                    self.heuristic.name(),
                    self.stats.amount_paid
                );
                return (paid, date, true);
            }

            paid = self.pay_due_loans(date);
            date = date.succ_opt().expect("date within supported range");
        }

        (paid, date, false)
    }

    /// A tie with the best plan is not pruned; the run keeps simulating
    fn should_prune(&self) -> bool {
        self.prune_bound
            .is_some_and(|bound| self.stats.amount_paid > bound)
    }

    /// Pay every loan due on `date` and remove the ones that reached zero
    fn pay_due_loans(&mut self, date: NaiveDate) -> Vec<Loan> {
        // Interest accrues since exactly one calendar month before the due day
        let last_payment_date = date
            .checked_sub_months(Months::new(1))
            .expect("date within supported range");
        let days_since_last_payment = (date - last_payment_date).num_days() as f64;

        let mut paid = Vec::new();
        let mut i = 0;
        while i < self.loans.len() {
            if self.loans[i].payment_day == date.day()
                && self.pay_loan(i, days_since_last_payment)
            {
                paid.push(self.loans.remove(i));
            } else {
                i += 1;
            }
        }

        paid
    }

    /// Accrue interest and apply one payment; true if the loan is now paid off
    fn pay_loan(&mut self, index: usize, days_since_last_payment: f64) -> bool {
        let loan = &mut self.loans[index];

        loan.balance += loan.interest_accrued(days_since_last_payment);
        let payment = loan.payment_amount();

        self.stats.amount_paid += payment;
        loan.balance -= payment;

        loan.balance <= 0.0
    }

    /// Hand a paid-off loan's monthly payment to the remaining loans one
    /// dollar at a time, re-invoking the heuristic for every dollar
    fn reallocate_payment(&mut self, paid_loan: &Loan, months_so_far: i64) {
        self.events.push(PlanEvent::LoanFinished {
            name: paid_loan.name.clone(),
            months: months_so_far,
        });

        let mut increases: BTreeMap<usize, f64> = BTreeMap::new();

        for _ in 0..paid_loan.monthly_payment as u64 {
            // Loans already inside their final payment period are not eligible
            let eligible: Vec<usize> = self
                .loans
                .iter()
                .enumerate()
                .filter(|(_, l)| l.balance > l.monthly_payment)
                .map(|(i, _)| i)
                .collect();

            // Eligibility never comes back once a payment overtakes its balance
            if eligible.is_empty() {
                break;
            }

            let chosen = self.heuristic.select(&self.loans, &eligible, DAYS_PER_MONTH);
            *increases.entry(chosen).or_insert(0.0) += 1.0;
            self.loans[chosen].monthly_payment += 1.0;
        }

        for (index, amount) in increases {
            self.events.push(PlanEvent::PaymentIncreased {
                name: self.loans[index].name.clone(),
                amount,
                new_payment: self.loans[index].monthly_payment,
            });
        }
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn stats(&self) -> &PaymentStats {
        &self.stats
    }

    pub fn events(&self) -> &[PlanEvent] {
        &self.events
    }

    /// The loans as configured (with any upfront/increase bookkeeping), not
    /// the evolving working set
    pub fn original_loans(&self) -> &[Loan] {
        &self.original_loans
    }
}
