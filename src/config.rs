//! # Config
//!
//! Define and implement config options for module

use anyhow::Result;
use config::{ConfigError, Environment};
use dotenv::dotenv;
use serde::Deserialize;

/// struct holding configuration options
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// path to the scheduled flights input table
    pub flights_csv: String,

    /// path to the crew members input table
    pub crew_csv: String,

    /// path to the approved time-off requests input table
    pub time_off_csv: String,

    /// path to the historical flights input table
    pub historical_csv: String,

    /// path to the crew requirements per aircraft type input table
    pub crew_requirements_csv: String,

    /// path to the regulation values input table
    pub regulations_csv: String,

    /// path the generated roster is written to
    pub schedule_output_csv: String,

    /// path the generated pairing duties are written to
    pub pairings_output_csv: String,

    /// wall-clock limit for a single solve, in seconds
    pub solver_time_limit_seconds: u64,

    /// number of parallel workers a backend may use
    pub solver_num_workers: u64,

    /// path to log configuration YAML file
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        log::warn!("(default) Creating Config object with default values.");
        Self::new()
    }
}

impl Config {
    /// Default values for Config
    pub fn new() -> Self {
        Config {
            flights_csv: String::from("assets/simulated/flightera_flights.csv"),
            crew_csv: String::from("assets/simulated/crew_members.csv"),
            time_off_csv: String::from("assets/simulated/time_off_requests.csv"),
            historical_csv: String::from("assets/simulated/historical_flights.csv"),
            crew_requirements_csv: String::from("assets/resources/crew_requirements.csv"),
            regulations_csv: String::from("assets/resources/regulations.csv"),
            schedule_output_csv: String::from("assets/output/crew_schedule_output.csv"),
            pairings_output_csv: String::from("assets/output/pairings_output.csv"),
            solver_time_limit_seconds: 3600,
            solver_num_workers: 8,
            log_config: String::from("log4rs.yaml"),
        }
    }

    /// Create a new `Config` object using environment variables
    pub fn try_from_env() -> Result<Self, ConfigError> {
        // read .env file if present
        dotenv().ok();
        let default_config = Config::default();

        config::Config::builder()
            .set_default("flights_csv", default_config.flights_csv)?
            .set_default("crew_csv", default_config.crew_csv)?
            .set_default("time_off_csv", default_config.time_off_csv)?
            .set_default("historical_csv", default_config.historical_csv)?
            .set_default(
                "crew_requirements_csv",
                default_config.crew_requirements_csv,
            )?
            .set_default("regulations_csv", default_config.regulations_csv)?
            .set_default("schedule_output_csv", default_config.schedule_output_csv)?
            .set_default("pairings_output_csv", default_config.pairings_output_csv)?
            .set_default(
                "solver_time_limit_seconds",
                default_config.solver_time_limit_seconds,
            )?
            .set_default("solver_num_workers", default_config.solver_num_workers)?
            .set_default("log_config", default_config.log_config)?
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
