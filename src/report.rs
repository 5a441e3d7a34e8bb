//! Textual and JSON report rendering
//!
//! Consumes the planner's selected devices and their statistics; holds no
//! simulation logic of its own.

use crate::loan::PlanConfig;
use crate::planner::LoanPlanner;
use crate::simulation::{PaymentDevice, PaymentStats, PlanComparison, PlanEvent, DAYS_PER_MONTH};
use serde::Serialize;
use std::fmt::Write;

/// Render the full human-readable report
pub fn render(planner: &LoanPlanner) -> String {
    let initial = planner.best_initial_plan();
    let changed = planner.best_changed_plan();

    if initial.is_none() && changed.is_none() {
        return "Could not determine a payment plan for the given loans\n".to_string();
    }

    let mut out = String::new();
    render_config(&mut out, planner.config());
    out.push('\n');

    match changed {
        Some(device) => render_changes(&mut out, device),
        None => out.push_str("No changes to make\n\n"),
    }

    out.push_str("Payment plan:\n\n");
    if let Some(device) = changed.or(initial) {
        render_trace(&mut out, device);
    }
    out.push('\n');

    if let Some(device) = initial {
        let _ = write!(
            out,
            "Without changing payment plan:\n\n{}\n",
            device.stats()
        );
    }

    if let Some(device) = changed {
        let _ = write!(out, "By using this new plan:\n\n{}\n", device.stats());
    }

    if let (Some(initial), Some(changed)) = (initial, changed) {
        let _ = write!(out, "{}\n", initial.stats().compare(changed.stats()));
    }

    out
}

/// Config summary: totals plus the loans sorted by rate, then balance
fn render_config(out: &mut String, config: &PlanConfig) {
    let total_balance = config.total_balance();
    let total_payment = config.total_monthly_payment();

    let _ = writeln!(out, "Total loan balance: ${:.2}", total_balance);
    let _ = writeln!(out, "Upfront payment: ${:.2}", config.upfront_payment);
    let _ = writeln!(out, "Monthly payment increase: ${:.2}", config.monthly_increase);
    let _ = writeln!(out, "Current monthly payment: ${:.2}", total_payment);
    let _ = writeln!(
        out,
        "New monthly payment: ${:.2}",
        total_payment + config.monthly_increase
    );

    let mut loans: Vec<_> = config.loans.iter().collect();
    loans.sort_by(|a, b| {
        (b.interest_rate, b.balance)
            .partial_cmp(&(a.interest_rate, a.balance))
            .expect("finite loan values")
    });

    out.push_str("\nCurrent loans:\n\n");
    for loan in loans {
        let _ = writeln!(
            out,
            "\t{}: ${:.2} at {:.2}% (${:.2})",
            loan.name,
            loan.balance,
            loan.interest_rate * 100.0,
            loan.interest_accrued(DAYS_PER_MONTH)
        );
    }
}

/// The user-facing changes recorded on the changed plan's loans
fn render_changes(out: &mut String, device: &PaymentDevice) {
    out.push_str("Changes to make:\n\n");

    for loan in device.original_loans().iter().filter(|l| l.upfront_payment > 0.0) {
        let _ = writeln!(
            out,
            "\tMake an initial ${:.2} payment to {}",
            loan.upfront_payment, loan.name
        );
    }

    for loan in device.original_loans().iter().filter(|l| l.monthly_increase > 0.0) {
        let _ = writeln!(
            out,
            "\tIncrease {} by ${:.2} to ${:.2}",
            loan.name, loan.monthly_increase, loan.monthly_payment
        );
    }

    out.push('\n');
}

/// The winning plan's payoff trace, one payoff group per paragraph
fn render_trace(out: &mut String, device: &PaymentDevice) {
    for (i, event) in device.events().iter().enumerate() {
        if i > 0 && matches!(event, PlanEvent::LoanFinished { .. }) {
            out.push('\n');
        }
        let _ = writeln!(out, "\t{}", event);
    }
}

/// Machine-readable summary of one selected plan
#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub heuristic: String,
    pub stats: PaymentStats,
    pub events: Vec<String>,
}

impl PlanSummary {
    fn from_device(device: &PaymentDevice) -> Self {
        Self {
            heuristic: device.heuristic().name().to_string(),
            stats: device.stats().clone(),
            events: device.events().iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Machine-readable report for `--json`
#[derive(Debug, Serialize)]
pub struct Summary {
    pub initial: Option<PlanSummary>,
    pub changed: Option<PlanSummary>,
    pub comparison: Option<PlanComparison>,
}

impl Summary {
    pub fn from_planner(planner: &LoanPlanner) -> Self {
        Self {
            initial: planner.best_initial_plan().map(PlanSummary::from_device),
            changed: planner.best_changed_plan().map(PlanSummary::from_device),
            comparison: planner.comparison(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::Loan;
    use chrono::NaiveDate;

    fn planner(upfront: f64, increase: f64) -> LoanPlanner {
        let config = PlanConfig {
            upfront_payment: upfront,
            monthly_increase: increase,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            loans: vec![
                Loan::new("Small", 1_000.0, 10.0, 100.0, 1),
                Loan::new("Large", 2_000.0, 10.0, 100.0, 15),
            ],
        };
        LoanPlanner::new(config).with_start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_report_without_changes() {
        let mut planner = planner(0.0, 0.0);
        planner.find_best_plan();

        let report = render(&planner);
        assert!(report.contains("Total loan balance: $3000.00"));
        assert!(report.contains("No changes to make"));
        assert!(report.contains("Payment plan:"));
        assert!(report.contains("Without changing payment plan:"));
        assert!(report.contains("You will pay $"));
        assert!(!report.contains("By using this new plan:"));
    }

    #[test]
    fn test_report_with_changes_includes_comparison() {
        let mut planner = planner(500.0, 50.0);
        planner.find_best_plan();

        let report = render(&planner);
        assert!(report.contains("Changes to make:"));
        assert!(report.contains("By using this new plan:"));
        assert!(report.contains("New plan saves $"));
    }

    #[test]
    fn test_report_when_nothing_converges() {
        let config = PlanConfig {
            upfront_payment: 0.0,
            monthly_increase: 0.0,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            loans: vec![Loan::new("Runaway", 10_000.0, 50.0, 10.0, 1)],
        };
        let mut planner = LoanPlanner::new(config)
            .with_start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        planner.find_best_plan();

        assert_eq!(
            render(&planner),
            "Could not determine a payment plan for the given loans\n"
        );
    }

    #[test]
    fn test_json_summary_round_trips() {
        let mut planner = planner(500.0, 0.0);
        planner.find_best_plan();

        let summary = Summary::from_planner(&planner);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"heuristic\""));
        assert!(json.contains("\"amount_paid\""));
        assert!(json.contains("\"comparison\""));
    }
}
