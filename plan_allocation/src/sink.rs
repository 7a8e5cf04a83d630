use std::error::Error;
use std::fs;

use allocator_core::{AllocationReport, ResourceType};

/// CSV rows matching the printed table, one line per zone plus header.
pub fn csv_string(report: &AllocationReport) -> String {
    let mut out = String::from("Zone,Ambulances,Staff,Supplies,Cost\n");
    for row in &report.rows {
        out.push_str(&format!(
            "{},{},{},{},{:.0}\n",
            row.zone,
            row.quantity(ResourceType::Ambulances),
            row.quantity(ResourceType::Staff),
            row.quantity(ResourceType::Supplies),
            row.cost
        ));
    }
    out
}

pub fn write_csv(report: &AllocationReport, path: &str) -> std::io::Result<()> {
    fs::write(path, csv_string(report))
}

pub fn write_json(report: &AllocationReport, path: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use allocator_core::scenarios::{three_zone_demand, three_zone_policy};
    use allocator_core::{plan, GoalMode};

    #[test]
    fn csv_rows_follow_the_report() {
        let report = plan(
            &three_zone_demand(),
            &three_zone_policy(),
            GoalMode::HardDemand,
        )
        .unwrap();
        let csv = csv_string(&report);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Zone,Ambulances,Staff,Supplies,Cost"));
        assert_eq!(lines.next(), Some("A,3,6,50,3200"));
        assert_eq!(csv.lines().count(), 4);
    }
}
