//! Roster engine: duty pairing, feasibility filtering, constraint model
//! construction and roster extraction.

#[macro_use]
pub mod macros;

pub mod constraints;
pub mod crew;
pub mod duty;
pub mod extract;
pub mod feasibility;
pub mod flight;
pub mod indices;
pub mod model;
pub mod pairing;
pub mod regulations;
pub mod scheduler;

/// ICAO code of the airport every duty is rooted at.
pub const HOME_BASE_ICAO: &str = "ELLX";

/// Briefing/debriefing allowance added on top of the block span of a duty.
pub const DUTY_BUFFER_HOURS: f64 = 1.5;

/// Scale hours into integer centihours, truncating toward zero.
///
/// All hour values entering the constraint model pass through here; the
/// model itself never sees floating point.
pub fn centihours(hours: f64) -> i64 {
    (hours * 100.0) as i64
}

/// Round to two decimal places.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centihours_truncates() {
        assert_eq!(centihours(6.0), 600);
        assert_eq!(centihours(4.759), 475);
        assert_eq!(centihours(0.0), 0);
    }

    #[test]
    fn test_round_hours() {
        assert_eq!(round_hours(4.5), 4.5);
        assert_eq!(round_hours(1.005), 1.0);
        assert_eq!(round_hours(2.675000000001), 2.68);
    }
}
