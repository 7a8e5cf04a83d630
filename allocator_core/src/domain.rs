use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The three deployable resource kinds tracked during a flood response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Ambulances,
    Staff,
    Supplies,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [
        ResourceType::Ambulances,
        ResourceType::Staff,
        ResourceType::Supplies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Ambulances => "Ambulances",
            ResourceType::Staff => "Staff",
            ResourceType::Supplies => "Supplies",
        }
    }

    /// Lowercase key used in constraint names, e.g. "ambulances_dev_pos_A".
    pub fn key(&self) -> &'static str {
        match self {
            ResourceType::Ambulances => "ambulances",
            ResourceType::Staff => "staff",
            ResourceType::Supplies => "supplies",
        }
    }
}

/// How zone demand enters the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalMode {
    /// Demand is a goal: each (zone, resource) pair gets deviation
    /// variables and the budget is a hard cap.
    SoftDemand,
    /// Demand is pinned by equality constraints and the budget itself is
    /// the goal, tracked by a single deviation pair.
    HardDemand,
}

impl GoalMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "soft" | "soft_demand" | "soft-demand" => Some(GoalMode::SoftDemand),
            "hard" | "hard_demand" | "hard-demand" => Some(GoalMode::HardDemand),
            _ => None,
        }
    }
}

/// One demand row: how many units of a resource a zone asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandTarget {
    pub zone: String,
    pub resource: ResourceType,
    pub target: f64,
}

/// Demand targets keyed by (zone, resource). Serialized as a flat row
/// list because JSON maps cannot use tuple keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<DemandTarget>", into = "Vec<DemandTarget>")]
pub struct DemandTable {
    entries: HashMap<(String, ResourceType), f64>,
}

impl DemandTable {
    pub fn new() -> Self {
        DemandTable {
            entries: HashMap::new(),
        }
    }

    /// One row per zone: (zone, ambulances, staff, supplies).
    pub fn from_rows(rows: &[(&str, f64, f64, f64)]) -> Self {
        let mut table = DemandTable::new();
        for &(zone, ambulances, staff, supplies) in rows {
            table.set(zone, ResourceType::Ambulances, ambulances);
            table.set(zone, ResourceType::Staff, staff);
            table.set(zone, ResourceType::Supplies, supplies);
        }
        table
    }

    pub fn set(&mut self, zone: &str, resource: ResourceType, target: f64) {
        self.entries.insert((zone.to_string(), resource), target);
    }

    pub fn target(&self, zone: &str, resource: ResourceType) -> Option<f64> {
        self.entries.get(&(zone.to_string(), resource)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zones with at least one target, sorted for stable iteration.
    pub fn zones(&self) -> Vec<String> {
        let mut zones: Vec<String> = self.entries.keys().map(|(zone, _)| zone.clone()).collect();
        zones.sort();
        zones.dedup();
        zones
    }
}

impl From<Vec<DemandTarget>> for DemandTable {
    fn from(rows: Vec<DemandTarget>) -> Self {
        let mut table = DemandTable::new();
        for row in rows {
            table.entries.insert((row.zone, row.resource), row.target);
        }
        table
    }
}

impl From<DemandTable> for Vec<DemandTarget> {
    fn from(table: DemandTable) -> Self {
        let mut rows: Vec<DemandTarget> = table
            .entries
            .into_iter()
            .map(|((zone, resource), target)| DemandTarget {
                zone,
                resource,
                target,
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.zone.as_str(), a.resource.key()).cmp(&(b.zone.as_str(), b.resource.key()))
        });
        rows
    }
}

/// Cost and bounds for one resource type, shared by every zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub unit_cost: f64,
    /// Minimum units every zone must receive.
    pub floor: f64,
    /// Fleet-wide availability across all zones.
    pub cap: f64,
}

/// Supply-side configuration: which zones exist, what each resource
/// costs, and the overall budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePolicy {
    pub zones: Vec<String>,
    pub limits: HashMap<ResourceType, ResourceLimits>,
    pub budget: f64,
}

/// A full problem instance, e.g. parsed from a JSON config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub demand: DemandTable,
    pub policy: ResourcePolicy,
    pub mode: GoalMode,
}
