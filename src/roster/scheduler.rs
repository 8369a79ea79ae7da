//! Drives one solve round end-to-end: pairing, feasibility filtering,
//! model construction, constraint emission, solving and extraction.

use crate::roster::constraints::{
    coverage, flight_duty_period, overlap, period_hours, rest_days, rolling_hours, sectors,
    ConstraintContext,
};
use crate::roster::constraints::period_hours::PeriodKind;
use crate::roster::crew::{CrewId, CrewMember, HistoricalRecord, TimeOffRequest};
use crate::roster::duty::Duty;
use crate::roster::extract::{apply_utilisation, extract_roster, ExtractError, RosterAssignment};
use crate::roster::feasibility::filter_feasible;
use crate::roster::flight::FlightLeg;
use crate::roster::indices::{HoursMode, RosterIndices};
use crate::roster::model::RosterModel;
use crate::roster::pairing::build_duties;
use crate::roster::regulations::Regulations;
use crate::solver::{ConstraintModel, SolveOptions, SolveStatus};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Instant;

/// Scheduling failures surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// Two crew records share an id
    DuplicateCrewId(CrewId),

    /// The extractor hit an inconsistency; see [`ExtractError`]
    Extract(ExtractError),
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            SchedulerError::DuplicateCrewId(crew_id) => {
                write!(f, "Duplicate crew id '{}'", crew_id)
            }
            SchedulerError::Extract(e) => write!(f, "Extraction failed: {}", e),
        }
    }
}

/// Result of one solve round. `assignments` is empty unless the status
/// carries a solution.
#[derive(Debug)]
pub struct RoundOutcome {
    pub status: SolveStatus,
    pub assignments: Vec<RosterAssignment>,
}

/// Rosters one planning horizon at a time; utilisation counters advance
/// between rounds, never during one.
#[derive(Debug)]
pub struct CrewScheduler {
    flights: Vec<FlightLeg>,
    crew: Vec<CrewMember>,
    time_off: Vec<TimeOffRequest>,
    history: Vec<HistoricalRecord>,
    regulations: Regulations,
    crew_index: HashMap<CrewId, usize>,
    duties: Vec<Duty>,
}

impl CrewScheduler {
    pub fn new(
        flights: Vec<FlightLeg>,
        crew: Vec<CrewMember>,
        time_off: Vec<TimeOffRequest>,
        history: Vec<HistoricalRecord>,
        regulations: Regulations,
    ) -> Result<Self, SchedulerError> {
        let mut crew_index = HashMap::with_capacity(crew.len());
        for (index, member) in crew.iter().enumerate() {
            if crew_index.insert(member.crew_id.clone(), index).is_some() {
                return Err(SchedulerError::DuplicateCrewId(member.crew_id.clone()));
            }
        }

        Ok(CrewScheduler {
            flights,
            crew,
            time_off,
            history,
            regulations,
            crew_index,
            duties: Vec::new(),
        })
    }

    /// The duty table of the last round.
    pub fn duties(&self) -> &[Duty] {
        &self.duties
    }

    /// The crew table with the counters as of the last accepted round.
    pub fn crew(&self) -> &[CrewMember] {
        &self.crew
    }

    /// Run one full round against the given backend.
    pub fn solve_round<M: ConstraintModel>(
        &mut self,
        model: &mut M,
        options: &SolveOptions,
    ) -> Result<RoundOutcome, SchedulerError> {
        let round_started = Instant::now();

        let stage = Instant::now();
        self.duties = build_duties(&self.flights, self.regulations.max_flight_duty_period_hours);
        roster_info!(
            "(solve_round) Generated {} duties from {} legs: {:.2}s",
            self.duties.len(),
            self.flights.len(),
            stage.elapsed().as_secs_f64()
        );

        let stage = Instant::now();
        let feasible = filter_feasible(&self.crew, &self.duties, &self.time_off, &self.regulations);
        roster_info!(
            "(solve_round) Identified feasible crew to duty assignments: {:.2}s",
            stage.elapsed().as_secs_f64()
        );

        let indices = RosterIndices::build(&self.duties, &self.history);

        let stage = Instant::now();
        let vars = RosterModel::build(model, &feasible, &self.duties, &indices);
        vars.objective_balance_workload(model);
        roster_info!(
            "(solve_round) Created {} decision variables: {:.2}s",
            vars.variable_count(),
            stage.elapsed().as_secs_f64()
        );

        let ctx = ConstraintContext {
            duties: &self.duties,
            crew: &self.crew,
            crew_index: &self.crew_index,
            feasible: &feasible,
            indices: &indices,
            vars: &vars,
        };

        let stage = Instant::now();
        overlap::apply(model, &ctx);
        coverage::apply(model, &ctx);
        sectors::apply(model, &ctx, self.regulations.max_sectors_day);
        rolling_hours::apply(
            model,
            &ctx,
            self.regulations.max_duty_time_hours_7_days,
            7,
            HoursMode::Duty,
        );
        rolling_hours::apply(
            model,
            &ctx,
            self.regulations.max_duty_time_hours_28_days,
            28,
            HoursMode::Duty,
        );
        rolling_hours::apply(
            model,
            &ctx,
            self.regulations.max_flight_time_hours_28_days,
            28,
            HoursMode::Flight,
        );
        period_hours::apply(
            model,
            &ctx,
            PeriodKind::CalendarYear,
            self.regulations.max_flight_time_hours_year,
        );
        period_hours::apply(
            model,
            &ctx,
            PeriodKind::RollingTwelveMonths,
            self.regulations.max_flight_time_hours_12_months,
        );
        flight_duty_period::apply(model, &ctx, self.regulations.max_flight_duty_period_hours);
        rest_days::apply(model, &ctx, self.regulations.min_weekly_rest_days, 14);
        roster_info!(
            "(solve_round) Applied constraint families: {:.2}s",
            stage.elapsed().as_secs_f64()
        );

        let stage = Instant::now();
        let status = model.solve(options);
        roster_info!(
            "(solve_round) Solver returned {} after {:.2}s.",
            status,
            stage.elapsed().as_secs_f64()
        );

        if !status.has_solution() {
            roster_warn!("(solve_round) Could not find a roster: {}.", status);
            return Ok(RoundOutcome {
                status,
                assignments: Vec::new(),
            });
        }

        let assignments = extract_roster(model, &vars, &self.duties, &self.crew, &self.crew_index)
            .map_err(SchedulerError::Extract)?;

        apply_utilisation(&mut self.crew, &self.crew_index, &assignments)
            .map_err(SchedulerError::Extract)?;

        roster_info!(
            "(solve_round) Rostered {} assignments in {:.2}s total.",
            assignments.len(),
            round_started.elapsed().as_secs_f64()
        );

        Ok(RoundOutcome {
            status,
            assignments,
        })
    }
}
