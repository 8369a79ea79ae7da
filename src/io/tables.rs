//! Row shapes of the six input tables.
//!
//! Timestamps stay as raw strings here; validation and parsing happen in
//! the domain constructors so malformed rows can be rejected one by one.

use serde::{Deserialize, Serialize};

/// One scheduled flight leg as delivered by the upstream flight feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRow {
    pub flight_id: u64,
    pub departure_icao: String,
    pub arrival_icao: String,
    pub aircraft_type: String,
    pub aircraft_registration: String,
    pub scheduled_departure_utc: String,
    pub scheduled_arrival_utc: String,
    #[serde(default)]
    pub actual_departure_utc: Option<String>,
    #[serde(default)]
    pub actual_arrival_utc: Option<String>,
}

/// One crew member with accumulated utilisation counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewRow {
    pub crew_id: String,
    pub role: String,
    /// Comma-separated aircraft type codes, or the literal `ALL`.
    pub qualifications: String,
    /// `YES` / `NO`
    pub purser: String,
    pub seniority: u32,
    pub current_month_flight_time_hours: f64,
    pub current_month_duty_time_hours: f64,
    pub last_11_calendar_months_flight_time_hours: f64,
    pub current_calendar_year_flight_time_hours: f64,
}

/// One approved time-off request, dates inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffRow {
    pub crew_id: String,
    pub start_date: String,
    pub end_date: String,
}

/// One flight a crew member worked before the planning horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRow {
    pub crew_id: String,
    pub scheduled_departure_utc: String,
    pub flight_time_hours: f64,
    pub duty_time_hours: f64,
}

/// Crewing needs of one aircraft type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewRequirementRow {
    pub model: String,
    pub captains: u32,
    pub first_officers: u32,
    pub cabin_crew: u32,
}

/// One regulation value, e.g. `max_flight_time_hours_year,900`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationRow {
    pub constraint_name: String,
    pub value: i64,
}
