//! Shared scaffolding for constraint-family tests: one captain, a
//! configurable duty list and a ready-built variable table on the
//! backtracking backend.

use super::ConstraintContext;
use crate::roster::crew::{CrewId, CrewMember, CrewRole, Qualifications};
use crate::roster::duty::Duty;
use crate::roster::feasibility::FeasibleSet;
use crate::roster::indices::RosterIndices;
use crate::roster::model::RosterModel;
use crate::solver::backtrack::BacktrackModel;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;

pub fn test_captain(crew_id: &str) -> CrewMember {
    CrewMember {
        crew_id: crew_id.to_owned(),
        role: CrewRole::Captain,
        qualifications: Qualifications::All,
        purser: false,
        seniority: 15,
        current_month_flight_time_hours: 0.0,
        current_month_duty_time_hours: 0.0,
        last_11_calendar_months_flight_time_hours: 0.0,
        current_calendar_year_flight_time_hours: 0.0,
    }
}

pub fn test_duty(duty_id: usize, departure: DateTime<Utc>, block_hours: f64) -> Duty {
    let arrival = departure + Duration::minutes((block_hours * 60.0) as i64);

    Duty {
        duty_id,
        outbound_flight_id: duty_id as u64 + 1,
        inbound_flight_id: None,
        outbound_departure_icao: "ELLX".to_owned(),
        outbound_arrival_icao: "EGLL".to_owned(),
        inbound_departure_icao: None,
        inbound_arrival_icao: None,
        aircraft_type: "B738".to_owned(),
        aircraft_registration: "LX-ABC".to_owned(),
        flight_time_hours: block_hours,
        duty_time_hours: 1.5 + block_hours,
        scheduled_departure_utc: departure,
        scheduled_outbound_arrival_utc: arrival,
        scheduled_inbound_departure_utc: None,
        scheduled_arrival_utc: arrival,
        sector_count: 1,
        captains_required: 1,
        first_officers_required: 0,
        cabin_crew_required: 0,
    }
}

/// One captain, feasible on every duty, variables already allocated.
pub struct SingleRoleFixture {
    pub duties: Vec<Duty>,
    pub crew: Vec<CrewMember>,
    pub crew_index: HashMap<CrewId, usize>,
    pub feasible: FeasibleSet,
    pub indices: RosterIndices,
    pub backend: BacktrackModel,
    pub vars: RosterModel,
}

impl SingleRoleFixture {
    pub fn new(duties: Vec<Duty>) -> Self {
        Self::with_history(duties, Vec::new())
    }

    pub fn with_history(
        duties: Vec<Duty>,
        history: Vec<crate::roster::crew::HistoricalRecord>,
    ) -> Self {
        let crew = vec![test_captain("C1")];
        let crew_index: HashMap<CrewId, usize> = [("C1".to_owned(), 0)].into_iter().collect();

        let mut feasible = FeasibleSet::default();
        feasible.qualified[CrewRole::Captain.index()] = vec!["C1".to_owned()];
        feasible.pairs[CrewRole::Captain.index()] = duties
            .iter()
            .map(|duty| ("C1".to_owned(), duty.duty_id))
            .collect();

        let indices = RosterIndices::build(&duties, &history);
        let mut backend = BacktrackModel::new();
        let vars = RosterModel::build(&mut backend, &feasible, &duties, &indices);

        SingleRoleFixture {
            duties,
            crew,
            crew_index,
            feasible,
            indices,
            backend,
            vars,
        }
    }

    /// `count` one-hour duties departing every two hours on 2025-10-01.
    pub fn with_duties_on_day(count: usize) -> Self {
        let base = Utc.with_ymd_and_hms(2025, 10, 1, 6, 0, 0).unwrap();
        let duties = (0..count)
            .map(|duty_id| test_duty(duty_id, base + Duration::hours(duty_id as i64 * 2), 1.0))
            .collect();

        Self::new(duties)
    }

    /// Split into the mutable backend and the read-only context the
    /// constraint families expect.
    pub fn split(&mut self) -> (&mut BacktrackModel, ConstraintContext<'_>) {
        (
            &mut self.backend,
            ConstraintContext {
                duties: &self.duties,
                crew: &self.crew,
                crew_index: &self.crew_index,
                feasible: &self.feasible,
                indices: &self.indices,
                vars: &self.vars,
            },
        )
    }
}
