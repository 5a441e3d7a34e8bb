//! Loan Planner CLI
//!
//! Simulates the payment of a set of loans under every allocation heuristic
//! and recommends how extra payment capacity should be spent.

use anyhow::Context;
use clap::Parser;
use loan_planner::{report, LoanPlanner, PlanConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(version, about = "Simulate loan payoff plans and suggest improvements")]
struct Args {
    /// Path to the loan configuration file
    #[arg(short = 'c', long, default_value = "loans.toml")]
    config_file_path: PathBuf,

    /// Evaluate heuristics on worker threads
    #[arg(long)]
    parallel: bool,

    /// Print a JSON summary instead of the text report
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = PlanConfig::from_path(&args.config_file_path)
        .with_context(|| format!("loading {}", args.config_file_path.display()))?;

    let mut planner = LoanPlanner::new(config).parallel(args.parallel);
    planner.find_best_plan();

    if args.json {
        let summary = report::Summary::from_planner(&planner);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", report::render(&planner));
    }

    Ok(if planner.has_plan() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
