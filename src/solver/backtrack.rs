//! Deterministic depth-first reference backend.
//!
//! Branches on variables in creation order, false first, with
//! per-constraint bound pruning and incumbent pruning on the objective.
//! Single-threaded regardless of the requested worker count; intended for
//! tests and small horizons, with production workloads going to a
//! CP-SAT-class backend behind the same trait.

use super::{BoolVar, ConstraintModel, IntervalVar, SolveOptions, SolveStatus};
use std::time::Instant;

/// Nodes between wall-clock checks.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Clone)]
struct LinearConstraint {
    terms: Vec<(i64, usize)>,
    lower: Option<i64>,
    upper: Option<i64>,
}

impl LinearConstraint {
    /// Bound check under a partial assignment: the reachable sum range
    /// must still intersect [lower, upper].
    fn satisfiable(&self, assignment: &[Option<bool>]) -> bool {
        let mut min_sum = 0;
        let mut max_sum = 0;

        for &(coefficient, var) in &self.terms {
            match assignment[var] {
                Some(true) => {
                    min_sum += coefficient;
                    max_sum += coefficient;
                }
                Some(false) => {}
                None => {
                    min_sum += coefficient.min(0);
                    max_sum += coefficient.max(0);
                }
            }
        }

        if let Some(upper) = self.upper {
            if min_sum > upper {
                return false;
            }
        }

        if let Some(lower) = self.lower {
            if max_sum < lower {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    start: i64,
    end: i64,
    literal: usize,
}

/// In-memory model plus depth-first branch-and-bound search.
#[derive(Debug, Default)]
pub struct BacktrackModel {
    var_names: Vec<String>,
    constraints: Vec<LinearConstraint>,
    intervals: Vec<Interval>,
    no_overlap_groups: Vec<Vec<usize>>,
    objective: Vec<(i64, usize)>,
    invalid: bool,

    // Rebuilt on every solve
    constraints_by_var: Vec<Vec<usize>>,
    group_intervals_by_var: Vec<Vec<(usize, usize)>>,

    solution: Option<Vec<bool>>,
    best_objective: i64,
}

impl BacktrackModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_constraint(&mut self, terms: &[(i64, BoolVar)], lower: Option<i64>, upper: Option<i64>) {
        self.constraints.push(LinearConstraint {
            terms: terms
                .iter()
                .map(|(coefficient, var)| (*coefficient, var.0))
                .collect(),
            lower,
            upper,
        });
    }

    fn build_search_tables(&mut self) {
        let var_count = self.var_names.len();

        let mut constraints_by_var = vec![Vec::new(); var_count];
        for (index, constraint) in self.constraints.iter().enumerate() {
            for (_, var) in &constraint.terms {
                constraints_by_var[*var].push(index);
            }
        }

        let mut group_intervals_by_var = vec![Vec::new(); var_count];
        for (group_index, group) in self.no_overlap_groups.iter().enumerate() {
            for interval_index in group {
                let literal = self.intervals[*interval_index].literal;
                group_intervals_by_var[literal].push((group_index, *interval_index));
            }
        }

        self.constraints_by_var = constraints_by_var;
        self.group_intervals_by_var = group_intervals_by_var;
    }

    /// Lowest objective value still reachable from this partial assignment.
    fn objective_lower_bound(&self, assignment: &[Option<bool>]) -> i64 {
        self.objective
            .iter()
            .map(|&(coefficient, var)| match assignment[var] {
                Some(true) => coefficient,
                Some(false) => 0,
                None => coefficient.min(0),
            })
            .sum()
    }

    fn objective_value(&self, assignment: &[Option<bool>]) -> i64 {
        self.objective
            .iter()
            .map(|&(coefficient, var)| match assignment[var] {
                Some(true) => coefficient,
                _ => 0,
            })
            .sum()
    }

    /// Check everything the latest decision can have violated.
    fn consistent_after(&self, var: usize, assignment: &[Option<bool>]) -> bool {
        for constraint_index in &self.constraints_by_var[var] {
            if !self.constraints[*constraint_index].satisfiable(assignment) {
                return false;
            }
        }

        if assignment[var] != Some(true) {
            return true;
        }

        for (group_index, interval_index) in &self.group_intervals_by_var[var] {
            let own = self.intervals[*interval_index];

            for other_index in &self.no_overlap_groups[*group_index] {
                if other_index == interval_index {
                    continue;
                }

                let other = self.intervals[*other_index];
                if assignment[other.literal] != Some(true) {
                    continue;
                }

                // Half-open intervals: touching endpoints do not overlap.
                if own.start < other.end && other.start < own.end {
                    return false;
                }
            }
        }

        true
    }

    fn search(
        &mut self,
        index: usize,
        assignment: &mut Vec<Option<bool>>,
        deadline: &Instant,
        deadline_hit: &mut bool,
        nodes: &mut u64,
    ) {
        if *deadline_hit {
            return;
        }

        *nodes += 1;
        if *nodes % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= *deadline {
            *deadline_hit = true;
            return;
        }

        if self.solution.is_some() && self.objective_lower_bound(assignment) >= self.best_objective
        {
            return;
        }

        if index == assignment.len() {
            self.best_objective = self.objective_value(assignment);
            self.solution = Some(
                assignment
                    .iter()
                    .map(|value| value.unwrap_or(false))
                    .collect(),
            );
            return;
        }

        for value in [false, true] {
            assignment[index] = Some(value);
            if self.consistent_after(index, assignment) {
                self.search(index + 1, assignment, deadline, deadline_hit, nodes);
            }
            assignment[index] = None;

            if *deadline_hit {
                return;
            }
        }
    }
}

impl ConstraintModel for BacktrackModel {
    fn new_bool_var(&mut self, name: &str) -> BoolVar {
        let index = self.var_names.len();
        self.var_names.push(name.to_owned());
        BoolVar(index)
    }

    fn add_linear_eq(&mut self, terms: &[(i64, BoolVar)], rhs: i64) {
        self.add_constraint(terms, Some(rhs), Some(rhs));
    }

    fn add_linear_le(&mut self, terms: &[(i64, BoolVar)], rhs: i64) {
        self.add_constraint(terms, None, Some(rhs));
    }

    fn add_linear_ge(&mut self, terms: &[(i64, BoolVar)], rhs: i64) {
        self.add_constraint(terms, Some(rhs), None);
    }

    fn new_optional_interval(
        &mut self,
        start: i64,
        size: i64,
        end: i64,
        literal: BoolVar,
        name: &str,
    ) -> IntervalVar {
        if size < 0 || start + size != end {
            log::error!(
                target: "app::solver",
                "(new_optional_interval) Malformed interval '{}': start {}, size {}, end {}.",
                name, start, size, end
            );
            self.invalid = true;
        }

        let index = self.intervals.len();
        self.intervals.push(Interval {
            start,
            end,
            literal: literal.0,
        });

        IntervalVar(index)
    }

    fn add_no_overlap(&mut self, intervals: &[IntervalVar]) {
        self.no_overlap_groups
            .push(intervals.iter().map(|interval| interval.0).collect());
    }

    fn minimize(&mut self, terms: &[(i64, BoolVar)]) {
        self.objective = terms
            .iter()
            .map(|(coefficient, var)| (*coefficient, var.0))
            .collect();
    }

    fn solve(&mut self, options: &SolveOptions) -> SolveStatus {
        if self.invalid {
            return SolveStatus::Invalid;
        }

        if options.num_workers > 1 {
            log::debug!(
                target: "app::solver",
                "(solve) {} workers requested; this backend searches on one thread.",
                options.num_workers
            );
        }

        self.solution = None;
        self.best_objective = i64::MAX;
        self.build_search_tables();

        let started = Instant::now();
        let deadline = started + options.time_limit;
        let mut assignment: Vec<Option<bool>> = vec![None; self.var_names.len()];
        let mut deadline_hit = false;
        let mut nodes = 0;

        let root_feasible = self
            .constraints
            .iter()
            .all(|constraint| constraint.satisfiable(&assignment));
        if root_feasible {
            self.search(0, &mut assignment, &deadline, &mut deadline_hit, &mut nodes);
        }

        log::debug!(
            target: "app::solver",
            "(solve) {} variables, {} constraints, {} nodes in {:.2}s.",
            self.var_names.len(),
            self.constraints.len(),
            nodes,
            started.elapsed().as_secs_f64()
        );

        match (self.solution.is_some(), deadline_hit) {
            (true, false) => SolveStatus::Optimal,
            (true, true) => SolveStatus::Feasible,
            (false, false) => SolveStatus::Infeasible,
            (false, true) => SolveStatus::Unknown,
        }
    }

    fn bool_value(&self, var: BoolVar) -> Option<bool> {
        self.solution
            .as_ref()
            .and_then(|solution| solution.get(var.0).copied())
    }
}
