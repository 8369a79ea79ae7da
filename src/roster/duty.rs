//! Duties: one- or two-sector pairings rooted at the home base.

use crate::roster::centihours;
use crate::roster::crew::CrewRole;
use crate::roster::flight::FlightId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Dense identifier assigned in emission order by the pairing builder.
pub type DutyId = usize;

/// A legally contiguous block of one or two flight legs flown by the
/// same crew. Immutable once emitted.
#[derive(Debug, Clone, Serialize)]
pub struct Duty {
    pub duty_id: DutyId,
    pub outbound_flight_id: FlightId,
    pub inbound_flight_id: Option<FlightId>,
    pub outbound_departure_icao: String,
    pub outbound_arrival_icao: String,
    pub inbound_departure_icao: Option<String>,
    pub inbound_arrival_icao: Option<String>,
    pub aircraft_type: String,
    pub aircraft_registration: String,
    /// Sum of the legs' block hours, 0.01 h resolution.
    pub flight_time_hours: f64,
    /// Block span plus the briefing/debriefing buffer, 0.01 h resolution.
    pub duty_time_hours: f64,
    pub scheduled_departure_utc: DateTime<Utc>,
    pub scheduled_outbound_arrival_utc: DateTime<Utc>,
    pub scheduled_inbound_departure_utc: Option<DateTime<Utc>>,
    pub scheduled_arrival_utc: DateTime<Utc>,
    pub sector_count: u8,
    pub captains_required: u32,
    pub first_officers_required: u32,
    pub cabin_crew_required: u32,
}

impl Duty {
    /// Calendar day the duty starts on; duties are binned by this date
    /// throughout the constraint families.
    pub fn date(&self) -> NaiveDate {
        self.scheduled_departure_utc.date_naive()
    }

    pub fn required_for(&self, role: CrewRole) -> u32 {
        match role {
            CrewRole::Captain => self.captains_required,
            CrewRole::FirstOfficer => self.first_officers_required,
            CrewRole::FlightAttendant => self.cabin_crew_required,
        }
    }

    pub fn flight_time_centi(&self) -> i64 {
        centihours(self.flight_time_hours)
    }

    pub fn duty_time_centi(&self) -> i64 {
        centihours(self.duty_time_hours)
    }
}
