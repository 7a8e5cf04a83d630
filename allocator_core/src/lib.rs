pub mod domain;
pub mod error;
pub mod model;
pub mod objective;
pub mod report;
pub mod scenarios;
pub mod solve;

pub use domain::{
    DemandTable, DemandTarget, GoalMode, ResourceLimits, ResourcePolicy, ResourceType, Scenario,
};
pub use error::AllocationError;
pub use model::{build_model, AllocationModel, ModelMeta};
pub use report::{format_report, project_report, AllocationReport, ZoneAllocation};
pub use solve::{solve, Deviation, SolvedAllocation};

/// Build, solve and project in one step.
pub fn plan(
    demand: &DemandTable,
    policy: &ResourcePolicy,
    mode: GoalMode,
) -> Result<AllocationReport, AllocationError> {
    let model = build_model(demand, policy, mode)?;
    let solved = solve(model)?;
    Ok(project_report(&solved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{three_zone_demand, three_zone_policy};

    #[test]
    fn plan_runs_the_whole_pipeline() {
        let report = plan(
            &three_zone_demand(),
            &three_zone_policy(),
            GoalMode::HardDemand,
        )
        .unwrap();
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.total_cost, 6_600.0);
    }

    #[test]
    fn scenario_configs_round_trip_through_json() {
        let scenario = Scenario {
            demand: three_zone_demand(),
            policy: three_zone_policy(),
            mode: GoalMode::HardDemand,
        };
        let json = serde_json::to_string(&scenario).unwrap();
        let parsed: Scenario = serde_json::from_str(&json).unwrap();
        let report = plan(&parsed.demand, &parsed.policy, parsed.mode).unwrap();
        assert_eq!(report.total_cost, 6_600.0);
    }
}
