use allocator_core::{AllocationReport, ResourceType};
use colored::*;

const BAR_WIDTH: usize = 40;

/// Scale a value onto a fixed-width block bar.
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

fn paint(resource: ResourceType, bar: &str) -> ColoredString {
    match resource {
        ResourceType::Ambulances => bar.red(),
        ResourceType::Staff => bar.blue(),
        ResourceType::Supplies => bar.green(),
    }
}

/// Per-zone allocation bars, one scale per resource type so supply
/// counts do not drown out the ambulance counts.
pub fn allocation_chart(report: &AllocationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Allocation by zone".bold()));
    for resource in ResourceType::ALL {
        let max = report
            .rows
            .iter()
            .map(|row| row.quantity(resource))
            .max()
            .unwrap_or(0) as f64;
        out.push_str(&format!("{}\n", resource.label()));
        for row in &report.rows {
            let value = row.quantity(resource) as f64;
            out.push_str(&format!(
                "  {:<4} {:>6} {}\n",
                row.zone,
                row.quantity(resource),
                paint(resource, &bar(value, max, BAR_WIDTH))
            ));
        }
    }
    out
}

/// Spend per zone against the costliest zone.
pub fn cost_chart(report: &AllocationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Cost by zone".bold()));
    let max = report.rows.iter().map(|row| row.cost).fold(0.0, f64::max);
    for row in &report.rows {
        out.push_str(&format!(
            "  {:<4} {:>8.0} {}\n",
            row.zone,
            row.cost,
            bar(row.cost, max, BAR_WIDTH).yellow()
        ));
    }
    out.push_str(&format!(
        "  spent {:.0} of {:.0}, {:.0} left\n",
        report.total_cost, report.budget, report.remaining_budget
    ));
    out
}

/// Share of total spend per zone, the terminal stand-in for a pie chart.
pub fn cost_share_chart(report: &AllocationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Cost share".bold()));
    if report.total_cost <= 0.0 {
        out.push_str("  nothing spent\n");
        return out;
    }
    for row in &report.rows {
        let share = 100.0 * row.cost / report.total_cost;
        out.push_str(&format!(
            "  {:<4} {:>5.1}% {}\n",
            row.zone,
            share,
            bar(share, 100.0, BAR_WIDTH).magenta()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_core::scenarios::{fifteen_zone_demand, fifteen_zone_policy};
    use allocator_core::{plan, GoalMode};

    #[test]
    fn bar_scales_to_the_width() {
        assert_eq!(bar(10.0, 10.0, 8), "████████");
        assert_eq!(bar(5.0, 10.0, 8), "████");
        assert_eq!(bar(0.0, 10.0, 8), "");
        assert_eq!(bar(3.0, 0.0, 8), "");
    }

    #[test]
    fn charts_cover_every_zone_and_the_totals() {
        let report = plan(
            &fifteen_zone_demand(),
            &fifteen_zone_policy(),
            GoalMode::SoftDemand,
        )
        .unwrap();
        let chart = allocation_chart(&report);
        for zone in ["A", "H", "O"] {
            assert!(chart.contains(zone), "missing zone {zone}");
        }
        let cost = cost_chart(&report);
        assert!(cost.contains("34600"));
        let share = cost_share_chart(&report);
        assert!(share.contains('%'));
    }
}
