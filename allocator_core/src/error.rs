use thiserror::Error;

/// Errors surfaced by model construction and the single solve step.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Demand table and resource policy disagree, detected before any
    /// variable is created.
    #[error("configuration mismatch: {0}")]
    ConfigurationMismatch(String),
    /// No assignment satisfies every constraint. Carries the full
    /// constraint-name ledger so the conflict can be narrowed down.
    #[error("allocation model is infeasible ({} constraints)", .constraints.len())]
    Infeasible { constraints: Vec<String> },
    /// Cannot occur for this formulation (every variable is bounded below
    /// and the objective is minimized) but the solver status still maps.
    #[error("objective is unbounded")]
    Unbounded,
    /// The backend reported an internal failure, passed through verbatim.
    #[error("solver failure: {0}")]
    SolverFailure(String),
}
