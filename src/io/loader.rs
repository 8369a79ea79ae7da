//! CSV table loading with the cleansing rules of the ingestion boundary.
//!
//! Flight rows with missing or `NULL` required fields are discarded and
//! counted; an aircraft type without a crewing requirement row is fatal.

use crate::io::tables::{
    CrewRequirementRow, CrewRow, FlightRow, HistoricalRow, RegulationRow, TimeOffRow,
};
use crate::roster::crew::{
    CrewError, CrewMember, CrewRequirements, HistoricalRecord, TimeOffRequest,
};
use crate::roster::flight::{FlightError, FlightLeg};
use crate::roster::regulations::{Regulations, RegulationsError};
use crate::Config;
use serde::de::DeserializeOwned;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::path::Path;

/// Errors raised while loading the input tables
#[derive(Debug)]
pub enum LoaderError {
    /// A table file could not be opened or parsed
    Table { path: String, message: String },

    /// A flight row failed a fatal check (unknown aircraft type)
    Flight(FlightError),

    /// A crew-side row could not be typed
    Crew(CrewError),

    /// The regulation table is unusable
    Regulations(RegulationsError),
}

impl Display for LoaderError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            LoaderError::Table { path, message } => {
                write!(f, "Could not load table '{}': {}", path, message)
            }
            LoaderError::Flight(e) => write!(f, "Flight table error: {}", e),
            LoaderError::Crew(e) => write!(f, "Crew table error: {}", e),
            LoaderError::Regulations(e) => write!(f, "Regulation table error: {}", e),
        }
    }
}

/// Every typed input table of one planning round.
#[derive(Debug)]
pub struct LoadedTables {
    pub flights: Vec<FlightLeg>,
    pub crew: Vec<CrewMember>,
    pub time_off: Vec<TimeOffRequest>,
    pub history: Vec<HistoricalRecord>,
    pub regulations: Regulations,
    /// Flight rows dropped by the cleansing rules.
    pub discarded_flights: usize,
}

/// Load and type all six tables from the configured paths.
pub fn load_tables(config: &Config) -> Result<LoadedTables, LoaderError> {
    let requirement_rows: Vec<CrewRequirementRow> = read_rows(&config.crew_requirements_csv)?;
    let requirements = CrewRequirements::from_rows(&requirement_rows);

    let regulation_rows: Vec<RegulationRow> = read_rows(&config.regulations_csv)?;
    let regulations = Regulations::from_rows(&regulation_rows).map_err(LoaderError::Regulations)?;

    let flight_rows: Vec<FlightRow> = read_rows(&config.flights_csv)?;
    let (flights, discarded_flights) = type_flights(&flight_rows, &requirements)?;

    let crew_rows: Vec<CrewRow> = read_rows(&config.crew_csv)?;
    let crew = crew_rows
        .iter()
        .map(CrewMember::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(LoaderError::Crew)?;

    let time_off_rows: Vec<TimeOffRow> = read_rows(&config.time_off_csv)?;
    let time_off = time_off_rows
        .iter()
        .map(TimeOffRequest::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(LoaderError::Crew)?;

    let historical_rows: Vec<HistoricalRow> = read_rows(&config.historical_csv)?;
    let history = historical_rows
        .iter()
        .map(HistoricalRecord::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(LoaderError::Crew)?;

    log::info!(
        "Loaded {} flights ({} discarded), {} crew, {} time-off requests, {} historical records.",
        flights.len(),
        discarded_flights,
        crew.len(),
        time_off.len(),
        history.len()
    );

    Ok(LoadedTables {
        flights,
        crew,
        time_off,
        history,
        regulations,
        discarded_flights,
    })
}

/// Apply the cleansing rules to raw flight rows.
///
/// Rows with missing required fields or unparseable timestamps are
/// dropped with a warning; an unknown aircraft type aborts the load.
pub fn type_flights(
    rows: &[FlightRow],
    requirements: &CrewRequirements,
) -> Result<(Vec<FlightLeg>, usize), LoaderError> {
    let mut flights = Vec::with_capacity(rows.len());
    let mut discarded = 0;

    for row in rows {
        match FlightLeg::from_row(row, requirements) {
            Ok(leg) => flights.push(leg),
            Err(e @ FlightError::UnknownAircraftType(_)) => {
                return Err(LoaderError::Flight(e));
            }
            Err(e) => {
                log::warn!("Discarding flight {}: {}", row.flight_id, e);
                discarded += 1;
            }
        }
    }

    Ok((flights, discarded))
}

fn read_rows<R: DeserializeOwned>(path: &str) -> Result<Vec<R>, LoaderError> {
    let file = File::open(Path::new(path)).map_err(|e| LoaderError::Table {
        path: path.to_owned(),
        message: e.to_string(),
    })?;

    rows_from_reader(file).map_err(|message| LoaderError::Table {
        path: path.to_owned(),
        message,
    })
}

/// Deserialize one CSV table; exposed for in-memory tests.
pub fn rows_from_reader<R: DeserializeOwned>(reader: impl std::io::Read) -> Result<Vec<R>, String> {
    csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<R>, _>>()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::tables::CrewRequirementRow;

    fn requirements() -> CrewRequirements {
        CrewRequirements::from_rows(&[CrewRequirementRow {
            model: "B738".to_owned(),
            captains: 1,
            first_officers: 1,
            cabin_crew: 4,
        }])
    }

    const FLIGHTS_CSV: &str = "\
flight_id,departure_icao,arrival_icao,aircraft_type,aircraft_registration,scheduled_departure_utc,scheduled_arrival_utc
1,ELLX,EGLL,B738,LX-ABC,2025-10-01 08:00:00,2025-10-01 09:30:00
2,EGLL,ELLX,B738,NULL,2025-10-01 11:00:00,2025-10-01 12:30:00
3,ELLX,EDDF,B738,LX-DEF,NULL,2025-10-02 09:00:00
4,EDDF,ELLX,B738,LX-DEF,2025-10-02 10:00:00,2025-10-02 11:00:00
";

    #[test]
    fn test_type_flights_discards_bad_rows() {
        let rows: Vec<FlightRow> = rows_from_reader(FLIGHTS_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);

        let (flights, discarded) = type_flights(&rows, &requirements()).unwrap();
        assert_eq!(flights.len(), 2);
        assert_eq!(discarded, 2);
        assert_eq!(flights[0].flight_id, 1);
        assert_eq!(flights[1].flight_id, 4);
    }

    #[test]
    fn test_type_flights_unknown_aircraft_type_is_fatal() {
        let csv = "\
flight_id,departure_icao,arrival_icao,aircraft_type,aircraft_registration,scheduled_departure_utc,scheduled_arrival_utc
1,ELLX,EGLL,A359,LX-ABC,2025-10-01 08:00:00,2025-10-01 09:30:00
";
        let rows: Vec<FlightRow> = rows_from_reader(csv.as_bytes()).unwrap();

        let e = type_flights(&rows, &requirements()).unwrap_err();
        assert!(matches!(
            e,
            LoaderError::Flight(FlightError::UnknownAircraftType(_))
        ));
    }

    #[test]
    fn test_rows_from_reader_crew_table() {
        let csv = "\
crew_id,role,qualifications,purser,seniority,current_month_flight_time_hours,current_month_duty_time_hours,last_11_calendar_months_flight_time_hours,current_calendar_year_flight_time_hours
C1,Captain,B738,NO,17,0,0,0,0
FA1,Flight Attendant,ALL,YES,5,10.5,21.0,400.0,450.0
";
        let rows: Vec<CrewRow> = rows_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let crew: Vec<CrewMember> = rows
            .iter()
            .map(CrewMember::try_from)
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(crew[1].purser);
        assert_eq!(crew[1].current_calendar_year_flight_time_hours, 450.0);
    }

    #[test]
    fn test_missing_table_is_reported() {
        let e = read_rows::<FlightRow>("does/not/exist.csv").unwrap_err();
        assert!(matches!(e, LoaderError::Table { .. }));
    }
}
