//! Owns the decision-variable tables.
//!
//! The builder allocates one boolean per feasible (crew, duty) pair and
//! one worked-today indicator per qualified crew and horizon date, then
//! hands opaque handles to the constraint families. Variables are created
//! in a stable order so identical inputs produce identical models.

use crate::roster::crew::{CrewId, CrewRole};
use crate::roster::duty::{Duty, DutyId};
use crate::roster::feasibility::FeasibleSet;
use crate::roster::indices::RosterIndices;
use crate::solver::{BoolVar, ConstraintModel};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// One assignment variable and its (crew, duty) key.
#[derive(Debug, Clone)]
pub struct AssignmentVar {
    pub crew_id: CrewId,
    pub duty_id: DutyId,
    pub var: BoolVar,
}

/// One worked-today indicator and its (crew, date) key.
#[derive(Debug, Clone)]
pub struct WorkedVar {
    pub crew_id: CrewId,
    pub date: NaiveDate,
    pub var: BoolVar,
}

/// Variable table of a single role.
#[derive(Debug, Default)]
pub struct RoleVars {
    /// Assignment variables in creation order.
    pub assignments: Vec<AssignmentVar>,

    /// Worked-today indicators in creation order.
    pub worked: Vec<WorkedVar>,

    assignments_by_crew: HashMap<CrewId, Vec<usize>>,
    assignments_by_duty: HashMap<DutyId, Vec<usize>>,
    assignments_by_crew_date: HashMap<CrewId, BTreeMap<NaiveDate, Vec<usize>>>,
    worked_by_crew: HashMap<CrewId, BTreeMap<NaiveDate, BoolVar>>,
}

impl RoleVars {
    fn push_assignment(&mut self, crew_id: &CrewId, duty_id: DutyId, date: NaiveDate, var: BoolVar) {
        let index = self.assignments.len();
        self.assignments.push(AssignmentVar {
            crew_id: crew_id.clone(),
            duty_id,
            var,
        });

        self.assignments_by_crew
            .entry(crew_id.clone())
            .or_default()
            .push(index);
        self.assignments_by_duty
            .entry(duty_id)
            .or_default()
            .push(index);
        self.assignments_by_crew_date
            .entry(crew_id.clone())
            .or_default()
            .entry(date)
            .or_default()
            .push(index);
    }

    fn push_worked(&mut self, crew_id: &CrewId, date: NaiveDate, var: BoolVar) {
        self.worked.push(WorkedVar {
            crew_id: crew_id.clone(),
            date,
            var,
        });

        self.worked_by_crew
            .entry(crew_id.clone())
            .or_default()
            .insert(date, var);
    }

    pub fn assignment(&self, index: usize) -> &AssignmentVar {
        &self.assignments[index]
    }

    /// Assignment variables of one crew member, creation order.
    pub fn crew_assignments(&self, crew_id: &str) -> impl Iterator<Item = &AssignmentVar> {
        self.assignments_by_crew
            .get(crew_id)
            .into_iter()
            .flatten()
            .map(move |index| &self.assignments[*index])
    }

    /// Assignment variables targeting one duty, creation order.
    pub fn duty_assignments(&self, duty_id: DutyId) -> impl Iterator<Item = &AssignmentVar> {
        self.assignments_by_duty
            .get(&duty_id)
            .into_iter()
            .flatten()
            .map(move |index| &self.assignments[*index])
    }

    /// Per-date assignment groups of one crew member, ascending by date.
    pub fn crew_assignment_dates(&self, crew_id: &str) -> Option<&BTreeMap<NaiveDate, Vec<usize>>> {
        self.assignments_by_crew_date.get(crew_id)
    }

    /// Assignment variables of one crew member on one date.
    pub fn crew_assignments_on(
        &self,
        crew_id: &str,
        date: NaiveDate,
    ) -> impl Iterator<Item = &AssignmentVar> {
        self.assignments_by_crew_date
            .get(crew_id)
            .and_then(|dates| dates.get(&date))
            .into_iter()
            .flatten()
            .map(move |index| &self.assignments[*index])
    }

    /// Worked-today indicators of one crew member, ascending by date.
    pub fn worked_for_crew(&self, crew_id: &str) -> Option<&BTreeMap<NaiveDate, BoolVar>> {
        self.worked_by_crew.get(crew_id)
    }
}

/// The engine's full variable universe for one solve.
#[derive(Debug, Default)]
pub struct RosterModel {
    roles: [RoleVars; 3],
}

impl RosterModel {
    /// Allocate all decision variables on the backend.
    pub fn build<M: ConstraintModel>(
        model: &mut M,
        feasible: &FeasibleSet,
        duties: &[Duty],
        indices: &RosterIndices,
    ) -> Self {
        let mut roles: [RoleVars; 3] = Default::default();

        for role in CrewRole::ALL {
            let table = &mut roles[role.index()];

            for (crew_id, duty_id) in feasible.pairs_for(role) {
                let var = model.new_bool_var(&format!(
                    "{}_{}_f_{}",
                    role.var_prefix(),
                    crew_id,
                    duty_id
                ));
                table.push_assignment(crew_id, *duty_id, duties[*duty_id].date(), var);
            }

            for crew_id in feasible.qualified_for(role) {
                for date in &indices.unique_duty_dates {
                    let var = model.new_bool_var(&format!("worked_{}_{}", crew_id, date));
                    table.push_worked(crew_id, *date, var);
                }
            }
        }

        let built = RosterModel { roles };
        roster_debug!(
            "(build) Added {} decision variables.",
            built.variable_count()
        );

        built
    }

    pub fn role(&self, role: CrewRole) -> &RoleVars {
        &self.roles[role.index()]
    }

    pub fn variable_count(&self) -> usize {
        self.roles
            .iter()
            .map(|table| table.assignments.len() + table.worked.len())
            .sum()
    }

    /// Prefer rosters with fewer total assignments once the legal minima
    /// are met; this indirectly balances workload across the crew.
    pub fn objective_balance_workload<M: ConstraintModel>(&self, model: &mut M) {
        let terms: Vec<(i64, BoolVar)> = self
            .roles
            .iter()
            .flat_map(|table| table.assignments.iter().map(|assignment| (1, assignment.var)))
            .collect();

        model.minimize(&terms);
    }
}
