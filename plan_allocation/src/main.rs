mod charts;
mod cli;
mod sink;

use std::error::Error;
use std::fs;

use allocator_core::scenarios::{
    fifteen_zone_demand, fifteen_zone_policy, three_zone_demand, three_zone_policy,
};
use allocator_core::{format_report, plan, GoalMode, Scenario};

use crate::cli::{parse_config_from_args, ScenarioChoice};

fn main() -> Result<(), Box<dyn Error>> {
    // 1) Gather config from CLI
    let config = parse_config_from_args();

    // 2) Pick the problem instance: JSON file first, built-ins otherwise
    let (demand, mut policy, default_mode) = if let Some(path) = &config.config_path {
        let text = fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&text)?;
        (scenario.demand, scenario.policy, scenario.mode)
    } else {
        match config.scenario {
            ScenarioChoice::FifteenZone => (
                fifteen_zone_demand(),
                fifteen_zone_policy(),
                GoalMode::SoftDemand,
            ),
            ScenarioChoice::ThreeZone => (
                three_zone_demand(),
                three_zone_policy(),
                GoalMode::HardDemand,
            ),
        }
    };

    if let Some(budget) = config.budget {
        policy.budget = budget;
    }
    let mode = config.mode.unwrap_or(default_mode);
    println!(
        "Planning for {} zones, budget {:.0}, mode {:?}",
        policy.zones.len(),
        policy.budget,
        mode
    );

    // 3) Build, solve, project
    let report = match plan(&demand, &policy, mode) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Solver error => {e}");
            return Err(e.into());
        }
    };

    print!("{}", format_report(&report));

    // 4) Optional charts and exports
    if config.charts {
        println!();
        print!("{}", charts::allocation_chart(&report));
        print!("{}", charts::cost_chart(&report));
        print!("{}", charts::cost_share_chart(&report));
    }
    if let Some(path) = &config.csv_path {
        sink::write_csv(&report, path)?;
        println!("Results saved as {path}");
    }
    if let Some(path) = &config.json_path {
        sink::write_json(&report, path)?;
        println!("Report saved as {path}");
    }

    Ok(())
}
