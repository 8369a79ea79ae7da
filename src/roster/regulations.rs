//! The flight- and duty-time limitation rule book.
//!
//! The regulation table is a key/value listing; the eight recognised keys
//! are all required. Unknown keys are skipped with a warning so a newer
//! rule file still loads on an older engine.

use crate::io::tables::RegulationRow;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

lazy_static! {
    static ref RECOGNISED_KEYS: Vec<&'static str> = vec![
        "max_flight_time_hours_year",
        "max_flight_time_hours_12_months",
        "max_flight_time_hours_28_days",
        "max_duty_time_hours_7_days",
        "max_duty_time_hours_28_days",
        "max_flight_duty_period_hours",
        "max_sectors_day",
        "min_weekly_rest_days",
    ];
}

/// Errors raised while typing the regulation table
#[derive(Debug, Clone, PartialEq)]
pub enum RegulationsError {
    /// A recognised key is absent from the table
    MissingKey(&'static str),

    /// A value is not usable as an hour or day count
    InvalidValue { key: String, value: i64 },
}

impl Display for RegulationsError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            RegulationsError::MissingKey(key) => write!(f, "Missing regulation '{}'", key),
            RegulationsError::InvalidValue { key, value } => {
                write!(f, "Regulation '{}' has invalid value {}", key, value)
            }
        }
    }
}

/// The recognised regulation values; read-only after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regulations {
    pub max_flight_time_hours_year: i64,
    pub max_flight_time_hours_12_months: i64,
    pub max_flight_time_hours_28_days: i64,
    pub max_duty_time_hours_7_days: i64,
    pub max_duty_time_hours_28_days: i64,
    pub max_flight_duty_period_hours: i64,
    pub max_sectors_day: i64,
    pub min_weekly_rest_days: i64,
}

impl Regulations {
    pub fn from_rows(rows: &[RegulationRow]) -> Result<Self, RegulationsError> {
        let mut values: HashMap<&str, i64> = HashMap::new();

        for row in rows {
            let Some(&key) = RECOGNISED_KEYS
                .iter()
                .find(|key| **key == row.constraint_name)
            else {
                roster_warn!(
                    "(from_rows) Skipping unrecognised regulation '{}'.",
                    row.constraint_name
                );
                continue;
            };

            if row.value <= 0 {
                return Err(RegulationsError::InvalidValue {
                    key: row.constraint_name.clone(),
                    value: row.value,
                });
            }

            values.insert(key, row.value);
        }

        let take = |key: &'static str| values.get(key).copied().ok_or(RegulationsError::MissingKey(key));

        Ok(Regulations {
            max_flight_time_hours_year: take("max_flight_time_hours_year")?,
            max_flight_time_hours_12_months: take("max_flight_time_hours_12_months")?,
            max_flight_time_hours_28_days: take("max_flight_time_hours_28_days")?,
            max_duty_time_hours_7_days: take("max_duty_time_hours_7_days")?,
            max_duty_time_hours_28_days: take("max_duty_time_hours_28_days")?,
            max_flight_duty_period_hours: take("max_flight_duty_period_hours")?,
            max_sectors_day: take("max_sectors_day")?,
            min_weekly_rest_days: take("min_weekly_rest_days")?,
        })
    }
}

#[cfg(test)]
pub(crate) fn easa_defaults() -> Regulations {
    Regulations {
        max_flight_time_hours_year: 900,
        max_flight_time_hours_12_months: 1000,
        max_flight_time_hours_28_days: 100,
        max_duty_time_hours_7_days: 60,
        max_duty_time_hours_28_days: 190,
        max_flight_duty_period_hours: 13,
        max_sectors_day: 6,
        min_weekly_rest_days: 2,
    }
}
