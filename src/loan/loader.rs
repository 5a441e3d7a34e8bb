//! Load the payment plan configuration from a TOML file
//!
//! The file carries an optional `[options]` table with the global plan-change
//! parameters and one `[[loan]]` table per loan, in file order:
//!
//! ```toml
//! [options]
//! upfront_payment = 5000.0
//! monthly_increase = 250.0
//! date_of_birth = "3/1/1990"
//!
//! [[loan]]
//! name = "Car"
//! balance = 12000.0
//! interest_rate = 6.5
//! monthly_payment = 300.0
//! payment_day = 15
//! ```

use super::Loan;
use crate::error::PlannerError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Date format used in config files and reports
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Birth date used when the config does not supply one
const DEFAULT_DATE_OF_BIRTH: &str = "1/1/1900";

fn default_payment_day() -> u32 {
    1
}

/// Raw TOML document before validation
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    options: RawOptions,
    #[serde(default, rename = "loan")]
    loans: Vec<RawLoan>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOptions {
    upfront_payment: f64,
    monthly_increase: f64,
    date_of_birth: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLoan {
    name: String,
    #[serde(default)]
    balance: f64,
    #[serde(default)]
    interest_rate: f64,
    #[serde(default)]
    monthly_payment: f64,
    #[serde(default = "default_payment_day")]
    payment_day: u32,
}

/// Validated planner configuration: the loan records plus the global
/// plan-change parameters
#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub upfront_payment: f64,
    pub monthly_increase: f64,
    pub date_of_birth: NaiveDate,
    pub loans: Vec<Loan>,
}

impl PlanConfig {
    /// Load and validate a config file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PlannerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PlannerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate config text
    pub fn from_toml_str(text: &str) -> Result<Self, PlannerError> {
        let raw: RawConfig = toml::from_str(text)?;

        if raw.loans.is_empty() {
            return Err(PlannerError::NoLoans);
        }

        let dob_text = raw
            .options
            .date_of_birth
            .unwrap_or_else(|| DEFAULT_DATE_OF_BIRTH.to_string());
        let date_of_birth = NaiveDate::parse_from_str(&dob_text, DATE_FORMAT)
            .map_err(|_| PlannerError::InvalidDate { value: dob_text })?;

        let mut loans = Vec::with_capacity(raw.loans.len());
        for loan in raw.loans {
            if !(1..=31).contains(&loan.payment_day) {
                return Err(PlannerError::InvalidPaymentDay {
                    name: loan.name,
                    day: loan.payment_day,
                });
            }
            loans.push(Loan::new(
                loan.name,
                loan.balance,
                loan.interest_rate,
                loan.monthly_payment,
                loan.payment_day,
            ));
        }

        Ok(Self {
            upfront_payment: raw.options.upfront_payment,
            monthly_increase: raw.options.monthly_increase,
            date_of_birth,
            loans,
        })
    }

    /// True if the user requested any plan changes
    pub fn any_changes(&self) -> bool {
        self.upfront_payment > 0.0 || self.monthly_increase > 0.0
    }

    /// Sum of all loan balances
    pub fn total_balance(&self) -> f64 {
        self.loans.iter().map(|l| l.balance).sum()
    }

    /// Sum of all monthly payments
    pub fn total_monthly_payment(&self) -> f64 {
        self.loans.iter().map(|l| l.monthly_payment).sum()
    }
}
