use std::collections::HashMap;
use std::env;

use colored::*;
use good_lp::{default_solver, ResolutionError, Solution, SolverModel};
use serde::{Deserialize, Serialize};

use crate::error::AllocationError;
use crate::model::{AllocationModel, ModelMeta, VarKey};

/// Solved values of one deviation pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub over: f64,
    pub under: f64,
}

impl Deviation {
    pub fn total(&self) -> f64 {
        self.over + self.under
    }
}

/// Raw solver output projected back onto the model's keys.
#[derive(Debug, Clone)]
pub struct SolvedAllocation {
    pub meta: ModelMeta,
    pub allocations: HashMap<VarKey, f64>,
    pub deviations: HashMap<VarKey, Deviation>,
    pub budget_deviation: Option<Deviation>,
    /// Sum of every deviation value, the quantity the solver minimized.
    pub objective: f64,
}

/// Hand the model to the backend and map the outcome. The model is
/// consumed; solving the same inputs again means building again.
pub fn solve(model: AllocationModel) -> Result<SolvedAllocation, AllocationError> {
    let AllocationModel {
        meta,
        vars,
        allocations,
        deviations,
        budget_deviation,
        constraints,
        objective,
    } = model;

    let debug = env::var("RUST_DEBUG").is_ok() || env::args().any(|arg| arg == "--debug");
    if debug {
        println!(
            "{} {}",
            "🧮".green(),
            format!(
                "Solving {} variables over {} constraints",
                meta.variable_count, meta.constraint_count
            )
            .bright_blue()
        );
    }

    let mut problem = vars.minimise(objective).using(default_solver);
    for named in constraints {
        problem = problem.with(named.constraint);
    }

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            return Err(AllocationError::Infeasible {
                constraints: meta.constraint_names,
            })
        }
        Err(ResolutionError::Unbounded) => return Err(AllocationError::Unbounded),
        Err(other) => return Err(AllocationError::SolverFailure(other.to_string())),
    };

    let allocation_values: HashMap<VarKey, f64> = allocations
        .iter()
        .map(|(key, var)| (key.clone(), solution.value(*var)))
        .collect();
    let deviation_values: HashMap<VarKey, Deviation> = deviations
        .iter()
        .map(|(key, pair)| {
            (
                key.clone(),
                Deviation {
                    over: solution.value(pair.over),
                    under: solution.value(pair.under),
                },
            )
        })
        .collect();
    let budget_values = budget_deviation.map(|pair| Deviation {
        over: solution.value(pair.over),
        under: solution.value(pair.under),
    });

    let objective_value: f64 = deviation_values.values().map(Deviation::total).sum::<f64>()
        + budget_values.map(|pair| pair.total()).unwrap_or(0.0);

    if debug {
        println!(
            "{} {}",
            "✅".green(),
            format!("Solved with total deviation {objective_value:.4}").bright_blue()
        );
    }

    Ok(SolvedAllocation {
        meta,
        allocations: allocation_values,
        deviations: deviation_values,
        budget_deviation: budget_values,
        objective: objective_value,
    })
}
