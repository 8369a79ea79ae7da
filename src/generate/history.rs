//! Synthetic historical flights covering the 28 days before a schedule
//! start, so every rolling window and rest-day constraint has a past to
//! look at.

use crate::io::tables::{CrewRow, HistoricalRow};
use chrono::{Duration, NaiveDate};
use rand::Rng;

/// Average flights per week per role.
const FLIGHTS_PER_WEEK_CAPTAIN: usize = 4;
const FLIGHTS_PER_WEEK_FIRST_OFFICER: usize = 4;
const FLIGHTS_PER_WEEK_CABIN: usize = 5;

/// Generates past flights for the given crew rows.
#[derive(Debug)]
pub struct HistoricalFlightGenerator {
    historical_start_date: NaiveDate,
}

impl HistoricalFlightGenerator {
    /// `schedule_start_date` is the first day of the horizon; history is
    /// placed in the four weeks before it.
    pub fn new(schedule_start_date: NaiveDate) -> Self {
        HistoricalFlightGenerator {
            historical_start_date: schedule_start_date - Duration::days(30),
        }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R, crew: &[CrewRow]) -> Vec<HistoricalRow> {
        let mut rows = Vec::new();

        for member in crew {
            let flights_per_week = match member.role.as_str() {
                "Captain" => FLIGHTS_PER_WEEK_CAPTAIN,
                "First Officer" => FLIGHTS_PER_WEEK_FIRST_OFFICER,
                _ => FLIGHTS_PER_WEEK_CABIN,
            };

            // Three to four weeks worth of flying.
            let total_flights = rng.gen_range(flights_per_week * 3..=flights_per_week * 4);

            for _ in 0..total_flights {
                let flight_date =
                    self.historical_start_date + Duration::days(rng.gen_range(0..=27));

                let flight_time_hours = round1(rng.gen_range(1.0..=5.5));
                let duty_time_hours = round1(flight_time_hours + rng.gen_range(1.5..=3.0));

                rows.push(HistoricalRow {
                    crew_id: member.crew_id.clone(),
                    scheduled_departure_utc: format!(
                        "{} {:02}:{:02}:{:02}",
                        flight_date.format("%Y-%m-%d"),
                        rng.gen_range(6..=22),
                        rng.gen_range(0..=59),
                        rng.gen_range(0..=59)
                    ),
                    flight_time_hours,
                    duty_time_hours,
                });
            }
        }

        rows.sort_by(|a, b| {
            (a.crew_id.as_str(), a.scheduled_departure_utc.as_str())
                .cmp(&(b.crew_id.as_str(), b.scheduled_departure_utc.as_str()))
        });

        rows
    }
}

fn round1(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}
