use std::collections::HashMap;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::domain::{GoalMode, ResourceType};
use crate::solve::{Deviation, SolvedAllocation};

/// One row of the final report: what a zone receives and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAllocation {
    pub zone: String,
    pub quantities: HashMap<ResourceType, i64>,
    pub cost: f64,
    pub deviations: HashMap<ResourceType, Deviation>,
}

impl ZoneAllocation {
    pub fn quantity(&self, resource: ResourceType) -> i64 {
        self.quantities.get(&resource).copied().unwrap_or(0)
    }

    pub fn deviation(&self, resource: ResourceType) -> Deviation {
        self.deviations.get(&resource).copied().unwrap_or_default()
    }
}

/// The projected outcome of one solve, ready for printing or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub mode: GoalMode,
    pub budget: f64,
    pub rows: Vec<ZoneAllocation>,
    pub total_cost: f64,
    pub remaining_budget: f64,
    pub total_deviation: f64,
    pub budget_deviation: Option<Deviation>,
}

/// Round the solver's floats back onto whole units and derive per-zone
/// spend. Rows come out in roster order.
pub fn project_report(solved: &SolvedAllocation) -> AllocationReport {
    let meta = &solved.meta;
    let mut rows = Vec::with_capacity(meta.zones.len());
    let mut total_cost = 0.0;
    for zone in &meta.zones {
        let mut quantities = HashMap::new();
        let mut deviations = HashMap::new();
        let mut cost = 0.0;
        for resource in ResourceType::ALL {
            let key = (zone.clone(), resource);
            let units = solved.allocations.get(&key).copied().unwrap_or(0.0).round() as i64;
            let unit_cost = meta.unit_costs.get(&resource).copied().unwrap_or(0.0);
            cost += unit_cost * units as f64;
            quantities.insert(resource, units);
            deviations.insert(
                resource,
                solved.deviations.get(&key).copied().unwrap_or_default(),
            );
        }
        total_cost += cost;
        rows.push(ZoneAllocation {
            zone: zone.clone(),
            quantities,
            cost,
            deviations,
        });
    }
    let remaining_budget = meta.budget - total_cost;
    if meta.mode == GoalMode::SoftDemand {
        // The budget is a hard cap in soft mode; going over means the
        // backend returned garbage.
        debug_assert!(
            remaining_budget >= -1e-6,
            "budget cap violated by {remaining_budget}"
        );
    }
    AllocationReport {
        mode: meta.mode,
        budget: meta.budget,
        rows,
        total_cost,
        remaining_budget,
        total_deviation: solved.objective,
        budget_deviation: solved.budget_deviation,
    }
}

/// Render the report as an aligned text table with headline totals.
pub fn format_report(report: &AllocationReport) -> String {
    let mut result = String::new();
    let header = format!(
        "{:<6} {:>10} {:>8} {:>10} {:>10}",
        "Zone", "Ambulances", "Staff", "Supplies", "Cost"
    );
    result.push_str(&format!("{}\n", header.bold()));
    for row in &report.rows {
        result.push_str(&format!(
            "{} {:>10} {:>8} {:>10} {:>10.0}\n",
            format!("{:<6}", row.zone).cyan(),
            row.quantity(ResourceType::Ambulances),
            row.quantity(ResourceType::Staff),
            row.quantity(ResourceType::Supplies),
            row.cost
        ));
    }
    result.push('\n');
    result.push_str(&format!("Total Cost: {:.0}\n", report.total_cost));
    result.push_str(&format!(
        "Remaining Budget: {:.0}\n",
        report.remaining_budget
    ));
    result.push_str(&format!("Total Deviation: {:.2}\n", report.total_deviation));
    if let Some(pair) = report.budget_deviation {
        result.push_str(&format!(
            "Budget Goal Miss: over {:.0}, under {:.0}\n",
            pair.over, pair.under
        ));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build_model, ModelMeta};
    use crate::scenarios::{
        fifteen_zone_demand, fifteen_zone_policy, three_zone_demand, three_zone_policy,
    };
    use crate::solve::solve;

    #[test]
    fn fifteen_zone_report_matches_the_reference_costs() {
        let model = build_model(
            &fifteen_zone_demand(),
            &fifteen_zone_policy(),
            GoalMode::SoftDemand,
        )
        .unwrap();
        let report = project_report(&solve(model).unwrap());

        assert_eq!(report.rows.len(), 15);
        assert_eq!(report.total_cost, 34_600.0);
        assert_eq!(report.remaining_budget, 5_400.0);

        let zones: Vec<&str> = report.rows.iter().map(|row| row.zone.as_str()).collect();
        assert_eq!(zones.first(), Some(&"A"));
        assert_eq!(zones.last(), Some(&"O"));

        let row_sum: f64 = report.rows.iter().map(|row| row.cost).sum();
        assert_eq!(row_sum, report.total_cost);

        // The projector must not lose any deviation pair on the way out.
        let dev_sum: f64 = report
            .rows
            .iter()
            .map(|row| {
                ResourceType::ALL
                    .iter()
                    .map(|&resource| row.deviation(resource).total())
                    .sum::<f64>()
            })
            .sum();
        assert!((dev_sum - report.total_deviation).abs() < 1e-4);
    }

    #[test]
    fn hard_mode_report_exposes_the_budget_identity() {
        let model = build_model(
            &three_zone_demand(),
            &three_zone_policy(),
            GoalMode::HardDemand,
        )
        .unwrap();
        let report = project_report(&solve(model).unwrap());

        assert_eq!(report.total_cost, 6_600.0);
        assert_eq!(report.remaining_budget, 3_400.0);
        let pair = report.budget_deviation.unwrap();
        // With demand pinned, under - over mirrors the remaining budget.
        assert!(((pair.under - pair.over) - report.remaining_budget).abs() < 1e-4);
    }

    #[test]
    fn projection_rounds_solver_floats_onto_whole_units() {
        let meta = ModelMeta {
            zones: vec!["A".to_string(), "B".to_string()],
            mode: GoalMode::SoftDemand,
            budget: 1_000.0,
            unit_costs: HashMap::from([
                (ResourceType::Ambulances, 100.0),
                (ResourceType::Staff, 10.0),
                (ResourceType::Supplies, 1.0),
            ]),
            variable_count: 18,
            constraint_count: 16,
            constraint_names: Vec::new(),
        };
        let mut allocations = HashMap::new();
        let mut deviations = HashMap::new();
        for zone in ["A", "B"] {
            for resource in ResourceType::ALL {
                allocations.insert((zone.to_string(), resource), 2.0000001);
                deviations.insert((zone.to_string(), resource), Deviation::default());
            }
        }
        let solved = SolvedAllocation {
            meta,
            allocations,
            deviations,
            budget_deviation: None,
            objective: 0.0,
        };

        let report = project_report(&solved);
        assert_eq!(report.rows[0].quantity(ResourceType::Ambulances), 2);
        assert_eq!(report.rows[0].cost, 222.0);
        assert_eq!(report.total_cost, 444.0);
        assert_eq!(report.remaining_budget, 556.0);
    }

    #[test]
    fn formatted_report_carries_the_headline_numbers() {
        let model = build_model(
            &fifteen_zone_demand(),
            &fifteen_zone_policy(),
            GoalMode::SoftDemand,
        )
        .unwrap();
        let report = project_report(&solve(model).unwrap());
        let text = format_report(&report);
        assert!(text.contains("Zone"));
        assert!(text.contains("Total Cost: 34600"));
        assert!(text.contains("Remaining Budget: 5400"));
        assert!(text.contains("Total Deviation: 3.00"));
    }

    #[test]
    fn report_round_trips_as_json_for_the_wasm_boundary() {
        let model = build_model(
            &three_zone_demand(),
            &three_zone_policy(),
            GoalMode::HardDemand,
        )
        .unwrap();
        let report = project_report(&solve(model).unwrap());
        let json = serde_json::to_string(&report).unwrap();
        let back: AllocationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
