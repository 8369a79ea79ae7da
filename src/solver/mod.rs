//! Abstract constraint-model seam.
//!
//! The roster engine emits its model through [`ConstraintModel`] and never
//! binds to a concrete solver. Any backend offering boolean variables,
//! integer linear sums, optional intervals with a global no-overlap and a
//! minimisation objective can be plugged in; a deterministic reference
//! backend lives in [`backtrack`].

pub mod backtrack;

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

/// Opaque handle to a boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolVar(pub(crate) usize);

/// Opaque handle to an optional interval variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalVar(pub(crate) usize);

/// Outcome of a solve; only `Optimal` and `Feasible` carry a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Invalid,
    Unknown,
}

impl SolveStatus {
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Invalid => write!(f, "Invalid"),
            SolveStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Search limits handed to the backend.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Hard wall-clock deadline for the search.
    pub time_limit: Duration,

    /// Worker threads a backend may use; advisory.
    pub num_workers: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            time_limit: Duration::from_secs(3600),
            num_workers: 8,
        }
    }
}

/// Model-building and solving operations the roster engine relies on.
///
/// Linear constraints take `(coefficient, variable)` terms with integer
/// coefficients; the callers pre-scale all hour values to centihours.
pub trait ConstraintModel {
    fn new_bool_var(&mut self, name: &str) -> BoolVar;

    /// `Σ coeff · var == rhs`
    fn add_linear_eq(&mut self, terms: &[(i64, BoolVar)], rhs: i64);

    /// `Σ coeff · var <= rhs`
    fn add_linear_le(&mut self, terms: &[(i64, BoolVar)], rhs: i64);

    /// `Σ coeff · var >= rhs`
    fn add_linear_ge(&mut self, terms: &[(i64, BoolVar)], rhs: i64);

    /// Interval that exists only while `literal` is true. `end` must equal
    /// `start + size`; violating that marks the model invalid.
    fn new_optional_interval(
        &mut self,
        start: i64,
        size: i64,
        end: i64,
        literal: BoolVar,
        name: &str,
    ) -> IntervalVar;

    /// Active intervals in the set must be pairwise disjoint.
    fn add_no_overlap(&mut self, intervals: &[IntervalVar]);

    /// Minimise `Σ coeff · var`; replaces any previous objective.
    fn minimize(&mut self, terms: &[(i64, BoolVar)]);

    fn solve(&mut self, options: &SolveOptions) -> SolveStatus;

    /// Value of a variable in the current solution; `None` when no
    /// solution is available.
    fn bool_value(&self, var: BoolVar) -> Option<bool>;
}
