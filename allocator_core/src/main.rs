use allocator_core::scenarios::{fifteen_zone_demand, fifteen_zone_policy};
use allocator_core::{format_report, plan, GoalMode};

fn main() {
    // 1) The fifteen-zone flood scenario with soft demand goals
    let demand = fifteen_zone_demand();
    let policy = fifteen_zone_policy();

    // 2) Solve and print
    match plan(&demand, &policy, GoalMode::SoftDemand) {
        Ok(report) => {
            println!("--- Flood Response Allocation ---");
            print!("{}", format_report(&report));
        }
        Err(e) => eprintln!("Allocation error: {}", e),
    }
}
