//! Flight legs and their validation at the ingestion boundary.

use crate::io::parse_utc_timestamp;
use crate::io::tables::FlightRow;
use crate::roster::crew::CrewRequirements;
use crate::roster::round_hours;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt::{Display, Formatter, Result as FmtResult};

pub type FlightId = u64;

/// Reasons a flight row is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum FlightError {
    /// A required column is empty or holds the literal `NULL`
    MissingField(&'static str),

    /// A timestamp column could not be parsed
    InvalidTimestamp(String),

    /// Scheduled arrival is not after scheduled departure
    InvalidTimes,

    /// No crewing requirement row exists for the aircraft type
    UnknownAircraftType(String),
}

impl Display for FlightError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            FlightError::MissingField(column) => write!(f, "Missing value in column '{}'", column),
            FlightError::InvalidTimestamp(raw) => write!(f, "Unparseable timestamp '{}'", raw),
            FlightError::InvalidTimes => write!(f, "Arrival does not follow departure"),
            FlightError::UnknownAircraftType(code) => {
                write!(f, "No crew requirements for aircraft type '{}'", code)
            }
        }
    }
}

/// One atomic flight leg; immutable after ingestion.
#[derive(Debug, Clone)]
pub struct FlightLeg {
    pub flight_id: FlightId,
    pub departure_icao: String,
    pub arrival_icao: String,
    pub aircraft_type: String,
    pub aircraft_registration: String,
    pub scheduled_departure_utc: DateTime<Utc>,
    pub scheduled_arrival_utc: DateTime<Utc>,
    /// Block time in hours, rounded to 0.01 h.
    pub flight_time_hours: f64,
    pub captains_required: u32,
    pub first_officers_required: u32,
    pub cabin_crew_required: u32,
}

impl FlightLeg {
    /// Type a raw flight row, attaching the crewing needs of its aircraft
    /// type. Rows failing the field checks are meant to be discarded with
    /// a warning by the caller; an unknown aircraft type is fatal.
    pub fn from_row(row: &FlightRow, requirements: &CrewRequirements) -> Result<Self, FlightError> {
        let departure_raw = required_field(&row.scheduled_departure_utc, "scheduled_departure_utc")?;
        let arrival_raw = required_field(&row.scheduled_arrival_utc, "scheduled_arrival_utc")?;
        let registration = required_field(&row.aircraft_registration, "aircraft_registration")?;

        let scheduled_departure_utc = parse_utc_timestamp(departure_raw)
            .ok_or_else(|| FlightError::InvalidTimestamp(departure_raw.to_owned()))?;
        let scheduled_arrival_utc = parse_utc_timestamp(arrival_raw)
            .ok_or_else(|| FlightError::InvalidTimestamp(arrival_raw.to_owned()))?;

        if scheduled_arrival_utc <= scheduled_departure_utc {
            return Err(FlightError::InvalidTimes);
        }

        let complement = requirements
            .for_aircraft_type(&row.aircraft_type)
            .ok_or_else(|| FlightError::UnknownAircraftType(row.aircraft_type.clone()))?;

        let block = scheduled_arrival_utc - scheduled_departure_utc;
        let flight_time_hours = round_hours(block.num_seconds() as f64 / 3600.0);

        Ok(FlightLeg {
            flight_id: row.flight_id,
            departure_icao: row.departure_icao.clone(),
            arrival_icao: row.arrival_icao.clone(),
            aircraft_type: row.aircraft_type.clone(),
            aircraft_registration: registration.to_owned(),
            scheduled_departure_utc,
            scheduled_arrival_utc,
            flight_time_hours,
            captains_required: complement.captains,
            first_officers_required: complement.first_officers,
            cabin_crew_required: complement.cabin_crew,
        })
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.scheduled_departure_utc.date_naive()
    }
}

fn required_field<'a>(value: &'a str, column: &'static str) -> Result<&'a str, FlightError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "NULL" {
        return Err(FlightError::MissingField(column));
    }

    Ok(trimmed)
}
