//! Lifts a solver decision back into typed roster records.

use crate::roster::crew::{CrewId, CrewMember, CrewRole};
use crate::roster::duty::{Duty, DutyId};
use crate::roster::model::RosterModel;
use crate::solver::ConstraintModel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Extraction failures; all of them indicate a model-building bug rather
/// than bad input.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// An assignment variable references a crew id without a crew record
    UnknownCrew(CrewId),

    /// An assignment variable references a duty id outside the duty table
    UnknownDuty(DutyId),

    /// The backend had no value for an owned variable
    MissingValue { crew_id: CrewId, duty_id: DutyId },
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ExtractError::UnknownCrew(crew_id) => {
                write!(f, "Assignment references unknown crew '{}'", crew_id)
            }
            ExtractError::UnknownDuty(duty_id) => {
                write!(f, "Assignment references unknown duty {}", duty_id)
            }
            ExtractError::MissingValue { crew_id, duty_id } => write!(
                f,
                "No solver value for assignment ({}, {})",
                crew_id, duty_id
            ),
        }
    }
}

/// One roster row: an assignment plus the denormalised duty and crew
/// columns the downstream consumers expect.
#[derive(Debug, Clone, Serialize)]
pub struct RosterAssignment {
    pub crew_id: String,
    pub duty_id: usize,
    pub crew_role: String,
    pub crew_purser: String,
    pub duty_scheduled_departure_utc: DateTime<Utc>,
    pub duty_scheduled_outbound_arrival_utc: DateTime<Utc>,
    pub duty_scheduled_inbound_departure_utc: Option<DateTime<Utc>>,
    pub duty_scheduled_arrival_utc: DateTime<Utc>,
    pub duty_aircraft_type: String,
    pub duty_flight_time_hours: f64,
    pub duty_time_hours: f64,
    pub duty_outbound_flight_id: u64,
    pub duty_inbound_flight_id: Option<u64>,
    pub duty_outbound_departure_icao: String,
    pub duty_outbound_arrival_icao: String,
    pub duty_inbound_departure_icao: Option<String>,
    pub duty_inbound_arrival_icao: Option<String>,
    pub duty_aircraft_registration: String,
    pub duty_sector_count: u8,
    pub duty_captains_required: u32,
    pub duty_first_officers_required: u32,
    pub duty_cabin_crew_required: u32,
    pub crew_qualifications: String,
    pub crew_seniority: u32,
}

/// Read every truthy assignment variable out of a solved model.
///
/// Pure with respect to the solver state: running it twice on the same
/// solved model yields identical output.
pub fn extract_roster<M: ConstraintModel>(
    model: &M,
    vars: &RosterModel,
    duties: &[Duty],
    crew: &[CrewMember],
    crew_index: &HashMap<CrewId, usize>,
) -> Result<Vec<RosterAssignment>, ExtractError> {
    let mut assignments = Vec::new();

    for role in CrewRole::ALL {
        for assignment in &vars.role(role).assignments {
            let assigned =
                model
                    .bool_value(assignment.var)
                    .ok_or_else(|| ExtractError::MissingValue {
                        crew_id: assignment.crew_id.clone(),
                        duty_id: assignment.duty_id,
                    })?;

            if !assigned {
                continue;
            }

            let member = crew_index
                .get(&assignment.crew_id)
                .and_then(|index| crew.get(*index))
                .ok_or_else(|| ExtractError::UnknownCrew(assignment.crew_id.clone()))?;

            let duty = duties
                .get(assignment.duty_id)
                .filter(|duty| duty.duty_id == assignment.duty_id)
                .ok_or(ExtractError::UnknownDuty(assignment.duty_id))?;

            assignments.push(roster_row(member, role, duty));
        }
    }

    roster_debug!("(extract_roster) Extracted {} assignments.", assignments.len());
    Ok(assignments)
}

fn roster_row(member: &CrewMember, role: CrewRole, duty: &Duty) -> RosterAssignment {
    RosterAssignment {
        crew_id: member.crew_id.clone(),
        duty_id: duty.duty_id,
        crew_role: role.roster_label().to_owned(),
        crew_purser: if member.purser { "YES" } else { "NO" }.to_owned(),
        duty_scheduled_departure_utc: duty.scheduled_departure_utc,
        duty_scheduled_outbound_arrival_utc: duty.scheduled_outbound_arrival_utc,
        duty_scheduled_inbound_departure_utc: duty.scheduled_inbound_departure_utc,
        duty_scheduled_arrival_utc: duty.scheduled_arrival_utc,
        duty_aircraft_type: duty.aircraft_type.clone(),
        duty_flight_time_hours: duty.flight_time_hours,
        duty_time_hours: duty.duty_time_hours,
        duty_outbound_flight_id: duty.outbound_flight_id,
        duty_inbound_flight_id: duty.inbound_flight_id,
        duty_outbound_departure_icao: duty.outbound_departure_icao.clone(),
        duty_outbound_arrival_icao: duty.outbound_arrival_icao.clone(),
        duty_inbound_departure_icao: duty.inbound_departure_icao.clone(),
        duty_inbound_arrival_icao: duty.inbound_arrival_icao.clone(),
        duty_aircraft_registration: duty.aircraft_registration.clone(),
        duty_sector_count: duty.sector_count,
        duty_captains_required: duty.captains_required,
        duty_first_officers_required: duty.first_officers_required,
        duty_cabin_crew_required: duty.cabin_crew_required,
        crew_qualifications: member.qualifications.to_string(),
        crew_seniority: member.seniority,
    }
}

/// Roll the accepted roster into the utilisation counters, preparing the
/// crew table for the next solve round.
pub fn apply_utilisation(
    crew: &mut [CrewMember],
    crew_index: &HashMap<CrewId, usize>,
    assignments: &[RosterAssignment],
) -> Result<(), ExtractError> {
    for assignment in assignments {
        let member = crew_index
            .get(assignment.crew_id.as_str())
            .and_then(|index| crew.get_mut(*index))
            .ok_or_else(|| ExtractError::UnknownCrew(assignment.crew_id.clone()))?;

        member.current_month_flight_time_hours += assignment.duty_flight_time_hours;
        member.last_11_calendar_months_flight_time_hours += assignment.duty_flight_time_hours;
        member.current_calendar_year_flight_time_hours += assignment.duty_flight_time_hours;

        member.current_month_duty_time_hours += assignment.duty_time_hours;
    }

    Ok(())
}
