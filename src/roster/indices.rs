//! Pre-grouped lookups shared by the constraint families.
//!
//! Built once after pairing and feasibility filtering; every family then
//! iterates joins instead of rescanning the row tables.

use crate::roster::crew::{CrewId, HistoricalRecord};
use crate::roster::duty::{Duty, DutyId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Whether a constraint sums block hours or duty hours.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HoursMode {
    Flight,
    Duty,
}

/// Hours a crew member worked on one past calendar day.
#[derive(Debug, Default, Clone, Copy)]
pub struct DayHistory {
    pub flight_time_hours: f64,
    pub duty_time_hours: f64,
}

/// Read-only index tables over the duty list and the historical records.
#[derive(Debug, Default)]
pub struct RosterIndices {
    /// Every date with at least one duty, ascending.
    pub unique_duty_dates: Vec<NaiveDate>,
    pub duties_by_date: BTreeMap<NaiveDate, Vec<DutyId>>,
    history_by_crew: HashMap<CrewId, BTreeMap<NaiveDate, DayHistory>>,
}

impl RosterIndices {
    pub fn build(duties: &[Duty], history: &[HistoricalRecord]) -> Self {
        let mut duties_by_date: BTreeMap<NaiveDate, Vec<DutyId>> = BTreeMap::new();
        for duty in duties {
            duties_by_date.entry(duty.date()).or_default().push(duty.duty_id);
        }

        let unique_duty_dates = duties_by_date.keys().copied().collect();

        let mut history_by_crew: HashMap<CrewId, BTreeMap<NaiveDate, DayHistory>> = HashMap::new();
        for record in history {
            let day = history_by_crew
                .entry(record.crew_id.clone())
                .or_default()
                .entry(record.scheduled_departure_utc.date_naive())
                .or_default();

            day.flight_time_hours += record.flight_time_hours;
            day.duty_time_hours += record.duty_time_hours;
        }

        RosterIndices {
            unique_duty_dates,
            duties_by_date,
            history_by_crew,
        }
    }

    /// First date of the planning horizon.
    pub fn schedule_start(&self) -> Option<NaiveDate> {
        self.unique_duty_dates.first().copied()
    }

    /// Hours of the requested kind this crew member worked inside the
    /// closed date range, before the planning horizon.
    pub fn historical_hours_in(
        &self,
        crew_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        mode: HoursMode,
    ) -> f64 {
        let Some(days) = self.history_by_crew.get(crew_id) else {
            return 0.0;
        };

        days.range(start..=end)
            .map(|(_, day)| match mode {
                HoursMode::Flight => day.flight_time_hours,
                HoursMode::Duty => day.duty_time_hours,
            })
            .sum()
    }

    /// Distinct calendar days with at least one historical record for
    /// this crew member inside the closed date range.
    pub fn historical_work_days_in(&self, crew_id: &str, start: NaiveDate, end: NaiveDate) -> i64 {
        let Some(days) = self.history_by_crew.get(crew_id) else {
            return 0;
        };

        days.range(start..=end).count() as i64
    }
}
