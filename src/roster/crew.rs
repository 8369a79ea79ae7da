//! Crew members, roles, qualification sets and the per-crew side tables
//! (time off, historical work, crewing requirements).

use crate::io::tables::{CrewRequirementRow, CrewRow, HistoricalRow, TimeOffRow};
use crate::io::{parse_date, parse_utc_timestamp};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

pub type CrewId = String;

/// Errors raised while typing crew-side input rows
#[derive(Debug, Clone, PartialEq)]
pub enum CrewError {
    /// The role column holds an unrecognised value
    InvalidRole(String),

    /// A date or timestamp column could not be parsed
    InvalidDate(String),

    /// A time-off interval ends before it starts
    InvalidInterval,
}

impl Display for CrewError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            CrewError::InvalidRole(role) => write!(f, "Unrecognised crew role '{}'", role),
            CrewError::InvalidDate(raw) => write!(f, "Unparseable date '{}'", raw),
            CrewError::InvalidInterval => write!(f, "Time-off interval ends before it starts"),
        }
    }
}

/// The three rostered crew positions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrewRole {
    Captain,
    FirstOfficer,
    FlightAttendant,
}

impl CrewRole {
    /// All roles in the fixed rostering order.
    pub const ALL: [CrewRole; 3] = [
        CrewRole::Captain,
        CrewRole::FirstOfficer,
        CrewRole::FlightAttendant,
    ];

    /// Dense index used by the per-role variable tables.
    pub fn index(self) -> usize {
        match self {
            CrewRole::Captain => 0,
            CrewRole::FirstOfficer => 1,
            CrewRole::FlightAttendant => 2,
        }
    }

    /// The value carried in the crew table's role column.
    pub fn as_str(self) -> &'static str {
        match self {
            CrewRole::Captain => "Captain",
            CrewRole::FirstOfficer => "First Officer",
            CrewRole::FlightAttendant => "Flight Attendant",
        }
    }

    /// The role label written to roster output rows.
    pub fn roster_label(self) -> &'static str {
        match self {
            CrewRole::Captain => "Captain",
            CrewRole::FirstOfficer => "First Officer",
            CrewRole::FlightAttendant => "Cabin Crew",
        }
    }

    /// Short prefix used when naming assignment variables.
    pub fn var_prefix(self) -> &'static str {
        match self {
            CrewRole::Captain => "capt",
            CrewRole::FirstOfficer => "fo",
            CrewRole::FlightAttendant => "cc",
        }
    }
}

impl Display for CrewRole {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CrewRole {
    type Err = CrewError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Captain" => Ok(CrewRole::Captain),
            "First Officer" => Ok(CrewRole::FirstOfficer),
            "Flight Attendant" => Ok(CrewRole::FlightAttendant),
            other => Err(CrewError::InvalidRole(other.to_owned())),
        }
    }
}

/// Aircraft types a crew member may be rostered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifications {
    /// Qualified on every type in the fleet
    All,

    /// Qualified on the listed type codes only
    AircraftTypes(Vec<String>),
}

impl Qualifications {
    /// Parse the crew table column: the literal `ALL` or a
    /// comma-separated list of type codes.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "ALL" {
            return Qualifications::All;
        }

        let types = raw
            .split(',')
            .map(|code| code.trim().to_owned())
            .filter(|code| !code.is_empty())
            .collect();

        Qualifications::AircraftTypes(types)
    }

    pub fn covers(&self, aircraft_type: &str) -> bool {
        match self {
            Qualifications::All => true,
            Qualifications::AircraftTypes(types) => {
                types.iter().any(|code| code == aircraft_type)
            }
        }
    }
}

impl Display for Qualifications {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Qualifications::All => write!(f, "ALL"),
            Qualifications::AircraftTypes(types) => write!(f, "{}", types.join(",")),
        }
    }
}

/// One crew member with the utilisation accumulated before the current
/// planning round. Counters are only rewritten between solve rounds.
#[derive(Debug, Clone)]
pub struct CrewMember {
    pub crew_id: CrewId,
    pub role: CrewRole,
    pub qualifications: Qualifications,
    pub purser: bool,
    pub seniority: u32,
    pub current_month_flight_time_hours: f64,
    pub current_month_duty_time_hours: f64,
    pub last_11_calendar_months_flight_time_hours: f64,
    pub current_calendar_year_flight_time_hours: f64,
}

impl TryFrom<&CrewRow> for CrewMember {
    type Error = CrewError;

    fn try_from(row: &CrewRow) -> Result<Self, Self::Error> {
        let role = CrewRole::from_str(&row.role)?;

        Ok(CrewMember {
            crew_id: row.crew_id.clone(),
            role,
            qualifications: Qualifications::parse(&row.qualifications),
            purser: row.purser == "YES",
            seniority: row.seniority,
            current_month_flight_time_hours: row.current_month_flight_time_hours,
            current_month_duty_time_hours: row.current_month_duty_time_hours,
            last_11_calendar_months_flight_time_hours: row
                .last_11_calendar_months_flight_time_hours,
            current_calendar_year_flight_time_hours: row
                .current_calendar_year_flight_time_hours,
        })
    }
}

/// An approved time-off request; both dates inclusive.
#[derive(Debug, Clone)]
pub struct TimeOffRequest {
    pub crew_id: CrewId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TimeOffRequest {
    /// A duty conflicts when its outbound departure falls on a blocked day.
    pub fn contains(&self, departure: &DateTime<Utc>) -> bool {
        let date = departure.date_naive();
        self.start_date <= date && date <= self.end_date
    }
}

impl TryFrom<&TimeOffRow> for TimeOffRequest {
    type Error = CrewError;

    fn try_from(row: &TimeOffRow) -> Result<Self, Self::Error> {
        let start_date =
            parse_date(&row.start_date).ok_or_else(|| CrewError::InvalidDate(row.start_date.clone()))?;
        let end_date =
            parse_date(&row.end_date).ok_or_else(|| CrewError::InvalidDate(row.end_date.clone()))?;

        if end_date < start_date {
            return Err(CrewError::InvalidInterval);
        }

        Ok(TimeOffRequest {
            crew_id: row.crew_id.clone(),
            start_date,
            end_date,
        })
    }
}

/// One flight worked before the planning horizon; seeds the rolling
/// window and rest-day constraints.
#[derive(Debug, Clone)]
pub struct HistoricalRecord {
    pub crew_id: CrewId,
    pub scheduled_departure_utc: DateTime<Utc>,
    pub flight_time_hours: f64,
    pub duty_time_hours: f64,
}

impl TryFrom<&HistoricalRow> for HistoricalRecord {
    type Error = CrewError;

    fn try_from(row: &HistoricalRow) -> Result<Self, Self::Error> {
        let scheduled_departure_utc = parse_utc_timestamp(&row.scheduled_departure_utc)
            .ok_or_else(|| CrewError::InvalidDate(row.scheduled_departure_utc.clone()))?;

        Ok(HistoricalRecord {
            crew_id: row.crew_id.clone(),
            scheduled_departure_utc,
            flight_time_hours: row.flight_time_hours,
            duty_time_hours: row.duty_time_hours,
        })
    }
}

/// Crewing needs of a single aircraft type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CrewComplement {
    pub captains: u32,
    pub first_officers: u32,
    pub cabin_crew: u32,
}

/// Required crew complement per aircraft type, keyed by type code.
#[derive(Debug, Clone, Default)]
pub struct CrewRequirements {
    by_aircraft_type: HashMap<String, CrewComplement>,
}

impl CrewRequirements {
    pub fn from_rows(rows: &[CrewRequirementRow]) -> Self {
        let by_aircraft_type = rows
            .iter()
            .map(|row| {
                (
                    row.model.clone(),
                    CrewComplement {
                        captains: row.captains,
                        first_officers: row.first_officers,
                        cabin_crew: row.cabin_crew,
                    },
                )
            })
            .collect();

        CrewRequirements { by_aircraft_type }
    }

    /// `None` marks an unknown aircraft type, which is fatal upstream.
    pub fn for_aircraft_type(&self, aircraft_type: &str) -> Option<&CrewComplement> {
        self.by_aircraft_type.get(aircraft_type)
    }
}
