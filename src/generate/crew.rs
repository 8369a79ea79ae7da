//! Synthetic crew tables: pilots stratified per aircraft type, cabin crew
//! qualified on the whole fleet with a purser share.

use crate::io::tables::CrewRow;
use crate::roster::crew::CrewRole;
use rand::Rng;
use std::ops::RangeInclusive;

/// Captains and first officers to generate per aircraft type.
pub const PILOTS_PER_AIRCRAFT: [(&str, usize); 4] =
    [("B738", 17), ("DH8D", 63), ("B38M", 9), ("B737", 21)];

/// Cabin crew generated for the whole fleet.
pub const TOTAL_FLIGHT_ATTENDANTS: usize = 330;

/// Share of cabin crew qualified as purser.
const PURSER_SHARE: f64 = 0.25;

/// Builds crew rows with fresh utilisation counters; ids are dense per
/// role (`C1..`, `FO1..`, `FA1..`).
#[derive(Debug, Default)]
pub struct CrewGenerator {
    captains: Vec<CrewRow>,
    first_officers: Vec<CrewRow>,
    cabin_crew: Vec<CrewRow>,
}

impl CrewGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_records<R: Rng>(
        &mut self,
        rng: &mut R,
        number_of_records: usize,
        role: CrewRole,
        qualifications: &[&str],
        purser_pool: bool,
        seniority: RangeInclusive<u32>,
    ) {
        for _ in 0..number_of_records {
            let purser = if purser_pool && rng.gen_bool(PURSER_SHARE) {
                "YES"
            } else {
                "NO"
            };

            let row = CrewRow {
                crew_id: self.next_id(role),
                role: role.as_str().to_owned(),
                qualifications: qualifications.join(","),
                purser: purser.to_owned(),
                seniority: rng.gen_range(seniority.clone()),
                current_month_flight_time_hours: 0.0,
                current_month_duty_time_hours: 0.0,
                last_11_calendar_months_flight_time_hours: 0.0,
                current_calendar_year_flight_time_hours: 0.0,
            };

            match role {
                CrewRole::Captain => self.captains.push(row),
                CrewRole::FirstOfficer => self.first_officers.push(row),
                CrewRole::FlightAttendant => self.cabin_crew.push(row),
            }
        }
    }

    fn next_id(&self, role: CrewRole) -> String {
        match role {
            CrewRole::Captain => format!("C{}", self.captains.len() + 1),
            CrewRole::FirstOfficer => format!("FO{}", self.first_officers.len() + 1),
            CrewRole::FlightAttendant => format!("FA{}", self.cabin_crew.len() + 1),
        }
    }

    /// All generated rows, captains first, then first officers, then
    /// cabin crew.
    pub fn rows(self) -> Vec<CrewRow> {
        let mut rows = self.captains;
        rows.extend(self.first_officers);
        rows.extend(self.cabin_crew);
        rows
    }
}

/// The stock fleet: type-rated pilots per airframe, fleet-wide cabin crew.
pub fn generate_default_fleet<R: Rng>(rng: &mut R) -> Vec<CrewRow> {
    let mut generator = CrewGenerator::new();

    for (aircraft_type, count) in PILOTS_PER_AIRCRAFT {
        generator.generate_records(rng, count, CrewRole::Captain, &[aircraft_type], false, 14..=23);
    }

    for (aircraft_type, count) in PILOTS_PER_AIRCRAFT {
        generator.generate_records(
            rng,
            count,
            CrewRole::FirstOfficer,
            &[aircraft_type],
            false,
            4..=15,
        );
    }

    generator.generate_records(
        rng,
        TOTAL_FLIGHT_ATTENDANTS,
        CrewRole::FlightAttendant,
        &["ALL"],
        true,
        1..=25,
    );

    generator.rows()
}
