//! Scenario runner and best-plan selection
//!
//! Evaluates every allocation heuristic against two scenarios: the loans as
//! configured, and (when the user requested an upfront payment or a monthly
//! increase) the loans after applying those changes. Each run prunes against
//! the best plan found so far; the cheapest successful plan per scenario wins.

use crate::error::PlannerError;
use crate::heuristics::{Heuristic, ALL_HEURISTICS};
use crate::loan::{Loan, PlanConfig};
use crate::simulation::{PaymentDevice, PlanComparison, DAYS_PER_MONTH};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::path::Path;

/// Indices of loans still carrying a balance
fn unpaid_indices(loans: &[Loan]) -> Vec<usize> {
    loans
        .iter()
        .enumerate()
        .filter(|(_, l)| l.balance > 0.0)
        .map(|(i, _)| i)
        .collect()
}

/// Evaluates loan payment plans across all heuristics and scenarios
pub struct LoanPlanner {
    config: PlanConfig,
    start_date: NaiveDate,
    parallel: bool,
    initial_successes: Vec<Heuristic>,
    best_initial: Option<PaymentDevice>,
    best_changed: Option<PaymentDevice>,
}

impl LoanPlanner {
    /// Create a planner starting its simulations today
    pub fn new(config: PlanConfig) -> Self {
        Self {
            config,
            start_date: chrono::Local::now().date_naive(),
            parallel: false,
            initial_successes: Vec::new(),
            best_initial: None,
            best_changed: None,
        }
    }

    /// Load the config file and build a planner from it
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PlannerError> {
        Ok(Self::new(PlanConfig::from_path(path)?))
    }

    /// Pin the simulation start date (defaults to today)
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Evaluate the heuristics of each scenario on worker threads, pruning
    /// against the incumbent as of scenario start
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Simulate both scenarios and keep the cheapest successful plan of each
    pub fn find_best_plan(&mut self) {
        if self.run_initial_scenario() && self.config.any_changes() {
            self.run_changed_scenario();
        }
    }

    /// Simulate the loans as configured under every heuristic; true if any
    /// run succeeded
    fn run_initial_scenario(&mut self) -> bool {
        let runs: Vec<(Heuristic, Vec<Loan>)> = ALL_HEURISTICS
            .iter()
            .map(|&h| (h, self.config.loans.clone()))
            .collect();

        let best = self.best_initial.take();
        let (best, succeeded) = self.simulate_runs(runs, best);
        self.best_initial = best;
        self.initial_successes = succeeded;

        if let Some(device) = &self.best_initial {
            log::info!(
                "best baseline plan: {} pays ${:.2}",
                device.heuristic().name(),
                device.stats().amount_paid
            );
        }

        self.best_initial.is_some()
    }

    /// Apply the user-requested changes per heuristic, then simulate. Only
    /// heuristics that produced a baseline plan take part.
    fn run_changed_scenario(&mut self) {
        let runs: Vec<(Heuristic, Vec<Loan>)> = self
            .initial_successes
            .clone()
            .into_iter()
            .map(|h| {
                let mut loans = self.config.loans.clone();
                self.allocate_upfront_payment(&mut loans, h);
                self.allocate_monthly_increase(&mut loans, h);
                (h, loans)
            })
            .collect();

        let best = self.best_changed.take();
        let (best, _) = self.simulate_runs(runs, best);
        self.best_changed = best;

        if let Some(device) = &self.best_changed {
            log::info!(
                "best changed plan: {} pays ${:.2}",
                device.heuristic().name(),
                device.stats().amount_paid
            );
        }
    }

    /// Run each prepared (heuristic, loans) pair and fold the successful
    /// devices into `best`. Returns the new best and the heuristics that
    /// succeeded, in evaluation order.
    fn simulate_runs(
        &self,
        runs: Vec<(Heuristic, Vec<Loan>)>,
        mut best: Option<PaymentDevice>,
    ) -> (Option<PaymentDevice>, Vec<Heuristic>) {
        let mut succeeded = Vec::new();

        if self.parallel {
            // Each run prunes against a snapshot of the incumbent taken at
            // scenario start. A stale bound only costs extra simulated days;
            // it can never reject a plan that would have won.
            let bound = best.as_ref().map(|d| d.stats().amount_paid);
            let finished: Vec<(Heuristic, PaymentDevice)> = runs
                .into_par_iter()
                .filter_map(|(heuristic, loans)| {
                    let mut device = self.make_device(loans, heuristic, bound);
                    if device.run().is_paid() {
                        Some((heuristic, device))
                    } else {
                        None
                    }
                })
                .collect();

            for (heuristic, device) in finished {
                succeeded.push(heuristic);
                keep_if_cheaper(&mut best, device);
            }
        } else {
            for (heuristic, loans) in runs {
                let bound = best.as_ref().map(|d| d.stats().amount_paid);
                let mut device = self.make_device(loans, heuristic, bound);
                if device.run().is_paid() {
                    succeeded.push(heuristic);
                    keep_if_cheaper(&mut best, device);
                }
            }
        }

        (best, succeeded)
    }

    fn make_device(
        &self,
        loans: Vec<Loan>,
        heuristic: Heuristic,
        prune_bound: Option<f64>,
    ) -> PaymentDevice {
        PaymentDevice::new(
            self.config.date_of_birth,
            self.start_date,
            loans,
            heuristic,
            prune_bound,
        )
    }

    /// Pay the upfront lump sum into the loans one dollar at a time via the
    /// heuristic; a loan the lump sum pays off entirely frees its monthly
    /// payment as extra capacity for the rest
    fn allocate_upfront_payment(&self, loans: &mut [Loan], heuristic: Heuristic) {
        for _ in 0..self.config.upfront_payment as u64 {
            let unpaid = unpaid_indices(loans);
            if unpaid.is_empty() {
                break;
            }
            let chosen = heuristic.select(loans, &unpaid, DAYS_PER_MONTH);
            loans[chosen].upfront_payment += 1.0;
            loans[chosen].balance -= 1.0;
        }

        let paid: Vec<usize> = loans
            .iter()
            .enumerate()
            .filter(|(_, l)| l.balance <= 0.0)
            .map(|(i, _)| i)
            .collect();

        for index in paid {
            let dollars = loans[index].monthly_payment as u64;
            for _ in 0..dollars {
                let unpaid = unpaid_indices(loans);
                if unpaid.is_empty() {
                    break;
                }
                let chosen = heuristic.select(loans, &unpaid, DAYS_PER_MONTH);
                loans[chosen].monthly_increase += 1.0;
                loans[chosen].monthly_payment += 1.0;
            }
        }
    }

    /// Spread the requested monthly increase across the unpaid loans one
    /// dollar at a time via the heuristic
    fn allocate_monthly_increase(&self, loans: &mut [Loan], heuristic: Heuristic) {
        for _ in 0..self.config.monthly_increase as u64 {
            let unpaid = unpaid_indices(loans);
            if unpaid.is_empty() {
                break;
            }
            let chosen = heuristic.select(loans, &unpaid, DAYS_PER_MONTH);
            loans[chosen].monthly_increase += 1.0;
            loans[chosen].monthly_payment += 1.0;
        }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Cheapest successful baseline plan, if any
    pub fn best_initial_plan(&self) -> Option<&PaymentDevice> {
        self.best_initial.as_ref()
    }

    /// Cheapest successful plan after the user-requested changes, if any
    pub fn best_changed_plan(&self) -> Option<&PaymentDevice> {
        self.best_changed.as_ref()
    }

    /// The plan to recommend: the changed plan when one exists, else the
    /// baseline plan
    pub fn best_plan(&self) -> Result<&PaymentDevice, PlannerError> {
        self.best_changed
            .as_ref()
            .or(self.best_initial.as_ref())
            .ok_or(PlannerError::NoViableStrategy)
    }

    pub fn has_plan(&self) -> bool {
        self.best_initial.is_some() || self.best_changed.is_some()
    }

    /// Baseline statistics relative to the changed plan, when both ran
    pub fn comparison(&self) -> Option<PlanComparison> {
        match (&self.best_initial, &self.best_changed) {
            (Some(initial), Some(changed)) => Some(initial.stats().compare(changed.stats())),
            _ => None,
        }
    }
}

/// Replace the incumbent only when strictly cheaper; ties keep the incumbent
fn keep_if_cheaper(best: &mut Option<PaymentDevice>, candidate: PaymentDevice) {
    let cheaper = best
        .as_ref()
        .map_or(true, |b| candidate.stats().amount_paid < b.stats().amount_paid);
    if cheaper {
        *best = Some(candidate);
    }
}
