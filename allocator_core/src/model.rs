use std::collections::{HashMap, HashSet};
use std::env;

use colored::*;
use good_lp::variable::ProblemVariables;
use good_lp::{constraint, variable, variables, Constraint, Expression, Variable};

use crate::domain::{DemandTable, GoalMode, ResourceLimits, ResourcePolicy, ResourceType};
use crate::error::AllocationError;
use crate::objective;

/// Composite key for variable lookup: one slot per (zone, resource).
pub type VarKey = (String, ResourceType);

/// Paired non-negative deviation variables. `over` absorbs allocation
/// above the target and `under` absorbs shortfall; minimizing their sum
/// leaves at most one side non-zero.
#[derive(Clone, Copy)]
pub struct DeviationPair {
    pub over: Variable,
    pub under: Variable,
}

/// A constraint plus the deterministic name it is reported under when
/// the model turns out infeasible.
pub struct NamedConstraint {
    pub name: String,
    pub constraint: Constraint,
}

/// Everything about a built model that survives the solve step (the
/// solver consumes the variables and constraints themselves).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMeta {
    pub zones: Vec<String>,
    pub mode: GoalMode,
    pub budget: f64,
    pub unit_costs: HashMap<ResourceType, f64>,
    pub variable_count: usize,
    pub constraint_count: usize,
    pub constraint_names: Vec<String>,
}

/// A fully built goal program, ready to hand to the solver exactly once.
pub struct AllocationModel {
    pub meta: ModelMeta,
    pub(crate) vars: ProblemVariables,
    pub(crate) allocations: HashMap<VarKey, Variable>,
    pub(crate) deviations: HashMap<VarKey, DeviationPair>,
    pub(crate) budget_deviation: Option<DeviationPair>,
    pub(crate) constraints: Vec<NamedConstraint>,
    pub(crate) objective: Expression,
}

// `ProblemVariables` has no `Debug` impl, so the derive is unavailable.
impl std::fmt::Debug for AllocationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllocationModel")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Validate the inputs and assemble the goal program for the requested
/// mode. Building twice from the same inputs yields the same variable
/// and constraint layout; iteration always follows the zone roster and
/// the fixed resource order, never map order.
pub fn build_model(
    demand: &DemandTable,
    policy: &ResourcePolicy,
    mode: GoalMode,
) -> Result<AllocationModel, AllocationError> {
    ModelBuilder::new(demand, policy, mode).build()
}

/// One validated (zone, resource) cell, in roster order.
struct PlanRow {
    zone: String,
    resource: ResourceType,
    target: f64,
    limits: ResourceLimits,
}

struct ModelBuilder<'a> {
    demand: &'a DemandTable,
    policy: &'a ResourcePolicy,
    mode: GoalMode,
    // Debug mode flag
    debug: bool,
    vars: ProblemVariables,
    allocations: HashMap<VarKey, Variable>,
    // Quantity variables in plan-row order, for deterministic expressions
    alloc_vars: Vec<Variable>,
    deviations: HashMap<VarKey, DeviationPair>,
    dev_pairs: Vec<DeviationPair>,
    budget_deviation: Option<DeviationPair>,
    constraints: Vec<NamedConstraint>,
}

impl<'a> ModelBuilder<'a> {
    fn new(demand: &'a DemandTable, policy: &'a ResourcePolicy, mode: GoalMode) -> Self {
        // Check if debug flag is set
        let debug = env::var("RUST_DEBUG").is_ok() || env::args().any(|arg| arg == "--debug");

        ModelBuilder {
            demand,
            policy,
            mode,
            debug,
            vars: variables!(),
            allocations: HashMap::new(),
            alloc_vars: Vec::new(),
            deviations: HashMap::new(),
            dev_pairs: Vec::new(),
            budget_deviation: None,
            constraints: Vec::new(),
        }
    }

    fn debug_print(&self, emoji: &str, message: &str) {
        if self.debug {
            println!("{} {}", emoji.green(), message.bright_blue());
        }
    }

    fn add_named(&mut self, name: String, constraint: Constraint) {
        if self.debug {
            println!("DEBUG => {}", name.cyan());
        }
        self.constraints.push(NamedConstraint { name, constraint });
    }

    fn build(mut self) -> Result<AllocationModel, AllocationError> {
        self.debug_print("🚀", "Starting model build");

        // 1. Cross-check demand against policy before creating variables
        let plan = self.validate()?;

        // 2. One integer quantity variable per (zone, resource)
        self.debug_print(
            "➕",
            &format!("Step 2: Allocating {} quantity variables", plan.len()),
        );
        self.allocate_quantities(&plan);

        // 3. Tie quantities to demand targets
        match self.mode {
            GoalMode::SoftDemand => {
                self.debug_print("🔗", "Step 3: Linking deviation pairs to targets");
                self.link_demand(&plan);
            }
            GoalMode::HardDemand => {
                self.debug_print("🔗", "Step 3: Pinning quantities to targets");
                self.pin_demand(&plan);
            }
        }

        // 4. Fleet-wide cap per resource type
        self.debug_print("📊", "Step 4: Applying resource caps");
        self.cap_resources(&plan);

        // 5. Budget: hard cap in soft mode, tracked goal in hard mode
        self.debug_print("📊", "Step 5: Applying budget constraint");
        self.constrain_budget(&plan);

        let objective =
            objective::total_deviation(&self.dev_pairs, self.budget_deviation.as_ref());

        let variable_count = self.alloc_vars.len()
            + 2 * self.dev_pairs.len()
            + if self.budget_deviation.is_some() { 2 } else { 0 };
        let constraint_names: Vec<String> =
            self.constraints.iter().map(|c| c.name.clone()).collect();
        let mut unit_costs = HashMap::new();
        for row in &plan {
            unit_costs.insert(row.resource, row.limits.unit_cost);
        }

        self.debug_print(
            "✅",
            &format!(
                "Model ready: {} variables, {} constraints",
                variable_count,
                constraint_names.len()
            ),
        );

        let meta = ModelMeta {
            zones: self.policy.zones.clone(),
            mode: self.mode,
            budget: self.policy.budget,
            unit_costs,
            variable_count,
            constraint_count: self.constraints.len(),
            constraint_names,
        };

        Ok(AllocationModel {
            meta,
            vars: self.vars,
            allocations: self.allocations,
            deviations: self.deviations,
            budget_deviation: self.budget_deviation,
            constraints: self.constraints,
            objective,
        })
    }

    fn validate(&self) -> Result<Vec<PlanRow>, AllocationError> {
        let policy = self.policy;
        if policy.zones.is_empty() {
            return Err(mismatch("zone roster is empty"));
        }
        let mut seen = HashSet::new();
        for zone in &policy.zones {
            if !seen.insert(zone.as_str()) {
                return Err(mismatch(format!("zone {zone:?} appears twice in the roster")));
            }
        }
        if !policy.budget.is_finite() || policy.budget < 0.0 {
            return Err(mismatch(format!(
                "budget must be a non-negative number, got {}",
                policy.budget
            )));
        }

        let mut checked: HashMap<ResourceType, ResourceLimits> = HashMap::new();
        for resource in ResourceType::ALL {
            let Some(limits) = policy.limits.get(&resource) else {
                return Err(mismatch(format!(
                    "no limits configured for {}",
                    resource.label()
                )));
            };
            for (what, value) in [
                ("unit cost", limits.unit_cost),
                ("floor", limits.floor),
                ("cap", limits.cap),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(mismatch(format!(
                        "{} for {} must be a non-negative number, got {value}",
                        what,
                        resource.label()
                    )));
                }
            }
            checked.insert(resource, *limits);
        }

        let mut rows = Vec::with_capacity(policy.zones.len() * ResourceType::ALL.len());
        for zone in &policy.zones {
            for resource in ResourceType::ALL {
                let Some(target) = self.demand.target(zone, resource) else {
                    return Err(mismatch(format!(
                        "zone {zone:?} has no demand target for {}",
                        resource.label()
                    )));
                };
                if !target.is_finite() || target < 0.0 {
                    return Err(mismatch(format!(
                        "demand target for {} in zone {zone:?} must be a non-negative number, got {target}",
                        resource.label()
                    )));
                }
                rows.push(PlanRow {
                    zone: zone.clone(),
                    resource,
                    target,
                    limits: checked[&resource],
                });
            }
        }

        // Demand rows for zones outside the roster are a mismatch, not a
        // silent ignore.
        for zone in self.demand.zones() {
            if !policy.zones.contains(&zone) {
                return Err(mismatch(format!(
                    "demand table covers zone {zone:?} which is not in the policy roster"
                )));
            }
        }

        Ok(rows)
    }

    fn allocate_quantities(&mut self, plan: &[PlanRow]) {
        for row in plan {
            let var = self.vars.add(variable().integer().min(row.limits.floor));
            self.allocations
                .insert((row.zone.clone(), row.resource), var);
            self.alloc_vars.push(var);
        }
    }

    /// Soft mode: allocation - over <= target and allocation + under >=
    /// target per cell, so the pair brackets the miss in either direction.
    fn link_demand(&mut self, plan: &[PlanRow]) {
        for (i, row) in plan.iter().enumerate() {
            let var = self.alloc_vars[i];
            let over = self.vars.add(variable().min(0));
            let under = self.vars.add(variable().min(0));
            let pair = DeviationPair { over, under };
            self.deviations
                .insert((row.zone.clone(), row.resource), pair);
            self.dev_pairs.push(pair);

            let target = row.target;
            self.add_named(
                format!("{}_dev_pos_{}", row.resource.key(), row.zone),
                constraint!(var - over <= target),
            );
            self.add_named(
                format!("{}_dev_neg_{}", row.resource.key(), row.zone),
                constraint!(var + under >= target),
            );
        }
    }

    /// Hard mode: every cell must hit its target exactly.
    fn pin_demand(&mut self, plan: &[PlanRow]) {
        for (i, row) in plan.iter().enumerate() {
            let var = self.alloc_vars[i];
            let target = row.target;
            self.add_named(
                format!("{}_demand_{}", row.resource.key(), row.zone),
                constraint!(var == target),
            );
        }
    }

    fn cap_resources(&mut self, plan: &[PlanRow]) {
        for resource in ResourceType::ALL {
            let mut total = Expression::from(0);
            let mut cap = 0.0;
            for (i, row) in plan.iter().enumerate() {
                if row.resource == resource {
                    total += self.alloc_vars[i];
                    cap = row.limits.cap;
                }
            }
            self.add_named(format!("max_{}", resource.key()), constraint!(total <= cap));
        }
    }

    fn constrain_budget(&mut self, plan: &[PlanRow]) {
        let mut spend = Expression::from(0);
        for (i, row) in plan.iter().enumerate() {
            spend += row.limits.unit_cost * self.alloc_vars[i];
        }
        let budget = self.policy.budget;
        match self.mode {
            GoalMode::SoftDemand => {
                self.add_named("budget_cap".to_string(), constraint!(spend <= budget));
            }
            GoalMode::HardDemand => {
                // The budget is itself the goal here; the pair absorbs
                // spend on either side of it.
                let over = self.vars.add(variable().min(0));
                let under = self.vars.add(variable().min(0));
                self.budget_deviation = Some(DeviationPair { over, under });
                self.add_named(
                    "budget_goal".to_string(),
                    constraint!(spend + under - over == budget),
                );
            }
        }
    }
}

fn mismatch(detail: impl Into<String>) -> AllocationError {
    AllocationError::ConfigurationMismatch(detail.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{
        fifteen_zone_demand, fifteen_zone_policy, three_zone_demand, three_zone_policy,
    };
    use rstest::rstest;

    #[test]
    fn soft_model_shape_matches_the_fifteen_zone_instance() {
        let model = build_model(
            &fifteen_zone_demand(),
            &fifteen_zone_policy(),
            GoalMode::SoftDemand,
        )
        .unwrap();
        let meta = &model.meta;
        // 45 integer quantities plus a deviation pair per cell.
        assert_eq!(meta.variable_count, 135);
        // Two links per cell, three caps, one budget cap.
        assert_eq!(meta.constraint_count, 94);
        assert_eq!(meta.constraint_names.len(), 94);
        assert_eq!(meta.constraint_names[0], "ambulances_dev_pos_A");
        assert_eq!(meta.constraint_names[1], "ambulances_dev_neg_A");
        assert_eq!(meta.constraint_names[93], "budget_cap");
        assert!(meta.constraint_names.iter().any(|n| n == "max_supplies"));
        assert_eq!(model.allocations.len(), 45);
        assert_eq!(model.deviations.len(), 45);
        assert!(model.budget_deviation.is_none());
    }

    #[test]
    fn hard_model_tracks_the_budget_with_one_pair() {
        let model = build_model(
            &three_zone_demand(),
            &three_zone_policy(),
            GoalMode::HardDemand,
        )
        .unwrap();
        let meta = &model.meta;
        assert_eq!(meta.variable_count, 11);
        assert_eq!(meta.constraint_count, 13);
        assert_eq!(meta.constraint_names[0], "ambulances_demand_A");
        assert_eq!(meta.constraint_names[12], "budget_goal");
        assert!(model.deviations.is_empty());
        assert!(model.budget_deviation.is_some());
    }

    #[test]
    fn building_twice_yields_identical_metadata() {
        let demand = fifteen_zone_demand();
        let policy = fifteen_zone_policy();
        let first = build_model(&demand, &policy, GoalMode::SoftDemand).unwrap();
        let second = build_model(&demand, &policy, GoalMode::SoftDemand).unwrap();
        assert_eq!(first.meta, second.meta);
    }

    #[rstest]
    #[case(GoalMode::SoftDemand)]
    #[case(GoalMode::HardDemand)]
    fn missing_target_is_a_configuration_mismatch(#[case] mode: GoalMode) {
        let mut demand = DemandTable::from_rows(&[("A", 3.0, 6.0, 50.0), ("B", 2.0, 4.0, 30.0)]);
        demand.set("C", ResourceType::Ambulances, 1.0);
        demand.set("C", ResourceType::Supplies, 20.0);
        // No staff target for zone C.
        let err = build_model(&demand, &three_zone_policy(), mode).unwrap_err();
        match err {
            AllocationError::ConfigurationMismatch(detail) => {
                assert!(detail.contains("Staff"), "unexpected detail: {detail}");
                assert!(detail.contains('C'), "unexpected detail: {detail}");
            }
            other => panic!("expected configuration mismatch, got {other:?}"),
        }
    }

    #[test]
    fn unknown_demand_zone_is_rejected() {
        let mut demand = three_zone_demand();
        demand.set("Z", ResourceType::Staff, 4.0);
        let err = build_model(&demand, &three_zone_policy(), GoalMode::SoftDemand).unwrap_err();
        assert!(
            matches!(err, AllocationError::ConfigurationMismatch(ref d) if d.contains("\"Z\"")),
            "got {err:?}"
        );
    }

    #[test]
    fn empty_roster_is_rejected() {
        let mut policy = three_zone_policy();
        policy.zones.clear();
        let err = build_model(&three_zone_demand(), &policy, GoalMode::SoftDemand).unwrap_err();
        assert!(matches!(err, AllocationError::ConfigurationMismatch(_)));
    }

    #[test]
    fn duplicate_roster_zone_is_rejected() {
        let mut policy = three_zone_policy();
        policy.zones.push("A".to_string());
        let err = build_model(&three_zone_demand(), &policy, GoalMode::SoftDemand).unwrap_err();
        assert!(
            matches!(err, AllocationError::ConfigurationMismatch(ref d) if d.contains("twice")),
            "got {err:?}"
        );
    }

    #[test]
    fn missing_limits_are_rejected() {
        let mut policy = three_zone_policy();
        policy.limits.remove(&ResourceType::Supplies);
        let err = build_model(&three_zone_demand(), &policy, GoalMode::HardDemand).unwrap_err();
        assert!(
            matches!(err, AllocationError::ConfigurationMismatch(ref d) if d.contains("Supplies")),
            "got {err:?}"
        );
    }

    #[test]
    fn negative_budget_is_rejected() {
        let mut policy = three_zone_policy();
        policy.budget = -1.0;
        let err = build_model(&three_zone_demand(), &policy, GoalMode::SoftDemand).unwrap_err();
        assert!(matches!(err, AllocationError::ConfigurationMismatch(_)));
    }

    #[test]
    fn negative_floor_is_rejected() {
        let mut policy = three_zone_policy();
        if let Some(limits) = policy.limits.get_mut(&ResourceType::Staff) {
            limits.floor = -2.0;
        }
        let err = build_model(&three_zone_demand(), &policy, GoalMode::SoftDemand).unwrap_err();
        assert!(
            matches!(err, AllocationError::ConfigurationMismatch(ref d) if d.contains("floor")),
            "got {err:?}"
        );
    }

    #[test]
    fn non_finite_cap_is_rejected() {
        let mut policy = three_zone_policy();
        if let Some(limits) = policy.limits.get_mut(&ResourceType::Supplies) {
            limits.cap = f64::NAN;
        }
        let err = build_model(&three_zone_demand(), &policy, GoalMode::SoftDemand).unwrap_err();
        assert!(
            matches!(err, AllocationError::ConfigurationMismatch(ref d) if d.contains("cap")),
            "got {err:?}"
        );
    }
}
