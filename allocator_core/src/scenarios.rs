//! Built-in flood scenarios used by the demo binaries and the test suite.

use std::collections::HashMap;

use crate::domain::{DemandTable, ResourceLimits, ResourcePolicy, ResourceType};

pub const AMBULANCE_COST: f64 = 500.0;
pub const STAFF_COST: f64 = 200.0;
pub const SUPPLY_COST: f64 = 10.0;

/// Demand targets for the fifteen flood zones A..O.
pub fn fifteen_zone_demand() -> DemandTable {
    DemandTable::from_rows(&[
        ("A", 3.0, 6.0, 50.0),
        ("B", 2.0, 4.0, 30.0),
        ("C", 1.0, 3.0, 20.0),
        ("D", 3.0, 5.0, 40.0),
        ("E", 4.0, 8.0, 60.0),
        ("F", 1.0, 2.0, 15.0),
        ("G", 1.0, 3.0, 20.0),
        ("H", 4.0, 8.0, 70.0),
        ("I", 2.0, 4.0, 35.0),
        ("J", 1.0, 3.0, 25.0),
        ("K", 3.0, 6.0, 55.0),
        ("L", 2.0, 5.0, 40.0),
        ("M", 4.0, 8.0, 65.0),
        ("N", 1.0, 2.0, 15.0),
        ("O", 1.0, 3.0, 20.0),
    ])
}

/// Fleet caps are tighter than total demand (30 ambulances against 33
/// requested) so the soft-demand model always carries some shortfall.
pub fn fifteen_zone_policy() -> ResourcePolicy {
    ResourcePolicy {
        zones: ('A'..='O').map(|zone| zone.to_string()).collect(),
        limits: HashMap::from([
            (
                ResourceType::Ambulances,
                ResourceLimits {
                    unit_cost: AMBULANCE_COST,
                    floor: 1.0,
                    cap: 30.0,
                },
            ),
            (
                ResourceType::Staff,
                ResourceLimits {
                    unit_cost: STAFF_COST,
                    floor: 1.0,
                    cap: 70.0,
                },
            ),
            (
                ResourceType::Supplies,
                ResourceLimits {
                    unit_cost: SUPPLY_COST,
                    floor: 10.0,
                    cap: 600.0,
                },
            ),
        ]),
        budget: 40_000.0,
    }
}

/// The small three-zone instance exercised in hard-demand mode.
pub fn three_zone_demand() -> DemandTable {
    DemandTable::from_rows(&[
        ("A", 3.0, 6.0, 50.0),
        ("B", 2.0, 4.0, 30.0),
        ("C", 1.0, 3.0, 20.0),
    ])
}

/// Caps are loose here; the interesting tension is the 10k budget goal
/// against a 6.6k spend.
pub fn three_zone_policy() -> ResourcePolicy {
    ResourcePolicy {
        zones: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        limits: HashMap::from([
            (
                ResourceType::Ambulances,
                ResourceLimits {
                    unit_cost: AMBULANCE_COST,
                    floor: 0.0,
                    cap: 8.0,
                },
            ),
            (
                ResourceType::Staff,
                ResourceLimits {
                    unit_cost: STAFF_COST,
                    floor: 0.0,
                    cap: 20.0,
                },
            ),
            (
                ResourceType::Supplies,
                ResourceLimits {
                    unit_cost: SUPPLY_COST,
                    floor: 0.0,
                    cap: 400.0,
                },
            ),
        ]),
        budget: 10_000.0,
    }
}
