use std::env;

use allocator_core::GoalMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioChoice {
    /// The fifteen-zone flood scenario, soft demand by default.
    FifteenZone,
    /// The three-zone instance, hard demand by default.
    ThreeZone,
}

#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub scenario: ScenarioChoice,
    /// None means "use the scenario's default mode".
    pub mode: Option<GoalMode>,
    pub budget: Option<f64>,
    pub config_path: Option<String>,
    pub csv_path: Option<String>,
    pub json_path: Option<String>,
    pub charts: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            scenario: ScenarioChoice::FifteenZone,
            mode: None,
            budget: None,
            config_path: None,
            csv_path: None,
            json_path: None,
            charts: false,
        }
    }
}

/// Parses command-line arguments to set:
/// - built-in scenario via --scenario=15 or --scenario=3
/// - goal mode via --mode=soft or --mode=hard
/// - budget override via --budget=NUMBER
/// - a JSON scenario file via --config=PATH
/// - export targets via --csv=PATH and --json=PATH, charts via --charts
pub fn parse_config_from_args() -> PlanConfig {
    let args: Vec<String> = env::args().collect();
    parse_config(&args)
}

pub fn parse_config(args: &[String]) -> PlanConfig {
    let mut config = PlanConfig::default();

    // 1) Which problem instance to run
    if let Some(arg) = args.iter().find(|a| a.starts_with("--scenario=")) {
        if let Some(value) = arg.strip_prefix("--scenario=") {
            match value.to_lowercase().as_str() {
                "15" | "fifteen" => config.scenario = ScenarioChoice::FifteenZone,
                "3" | "three" => config.scenario = ScenarioChoice::ThreeZone,
                _ => {}
            }
        }
    }

    // 2) Goal mode override
    if let Some(arg) = args.iter().find(|a| a.starts_with("--mode=")) {
        if let Some(value) = arg.strip_prefix("--mode=") {
            if let Some(mode) = GoalMode::from_str(value) {
                config.mode = Some(mode);
            }
        }
    }

    // 3) Budget override
    if let Some(arg) = args.iter().find(|a| a.starts_with("--budget=")) {
        if let Some(value) = arg.strip_prefix("--budget=") {
            if let Ok(budget) = value.parse::<f64>() {
                config.budget = Some(budget);
            }
        }
    }

    // 4) External scenario file and export targets
    if let Some(arg) = args.iter().find(|a| a.starts_with("--config=")) {
        config.config_path = arg.strip_prefix("--config=").map(str::to_string);
    }
    if let Some(arg) = args.iter().find(|a| a.starts_with("--csv=")) {
        config.csv_path = arg.strip_prefix("--csv=").map(str::to_string);
    }
    if let Some(arg) = args.iter().find(|a| a.starts_with("--json=")) {
        config.json_path = arg.strip_prefix("--json=").map(str::to_string);
    }

    if args.iter().any(|a| a == "--charts") {
        config.charts = true;
    }

    config
}
