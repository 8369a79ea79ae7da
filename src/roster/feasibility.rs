//! Shrinks the (crew, duty) universe before any model is built.
//!
//! Pure projection: qualification cover, a 95 % prefilter on accumulated
//! utilisation, per-pair headroom against the hard caps and time-off
//! conflicts. Only pairs surviving here may become decision variables.

use crate::roster::crew::{CrewId, CrewMember, CrewRole, TimeOffRequest};
use crate::roster::duty::{Duty, DutyId};
use crate::roster::regulations::Regulations;
use std::collections::HashMap;

/// Share of a hard cap at which a crew member is excluded outright.
const PREFILTER_CAP_SHARE: f64 = 0.95;

/// The feasible assignment universe, per role. Orders are deterministic:
/// crew in input order, duties by ascending id.
#[derive(Debug, Default)]
pub struct FeasibleSet {
    /// Crew ids the model creates worked-day variables for.
    pub qualified: [Vec<CrewId>; 3],

    /// Surviving (crew, duty) pairs; the model creates one assignment
    /// variable per entry.
    pub pairs: [Vec<(CrewId, DutyId)>; 3],
}

impl FeasibleSet {
    pub fn qualified_for(&self, role: CrewRole) -> &[CrewId] {
        &self.qualified[role.index()]
    }

    pub fn pairs_for(&self, role: CrewRole) -> &[(CrewId, DutyId)] {
        &self.pairs[role.index()]
    }
}

/// Project the crew/duty cross product down to the feasible pairs.
pub fn filter_feasible(
    crew: &[CrewMember],
    duties: &[Duty],
    time_off: &[TimeOffRequest],
    regulations: &Regulations,
) -> FeasibleSet {
    let mut time_off_by_crew: HashMap<&str, Vec<&TimeOffRequest>> = HashMap::new();
    for request in time_off {
        time_off_by_crew
            .entry(request.crew_id.as_str())
            .or_default()
            .push(request);
    }

    let mut set = FeasibleSet::default();

    for member in crew {
        let role_index = member.role.index();
        set.qualified[role_index].push(member.crew_id.clone());

        if exceeds_prefilter(member, regulations) {
            roster_debug!(
                "(filter_feasible) {} is within 5% of an accumulated cap, excluded.",
                member.crew_id
            );
            continue;
        }

        let blocked_days = time_off_by_crew
            .get(member.crew_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        for duty in duties {
            if !member.qualifications.covers(&duty.aircraft_type) {
                continue;
            }

            if exceeds_headroom(member, duty, regulations) {
                continue;
            }

            if blocked_days
                .iter()
                .any(|request| request.contains(&duty.scheduled_departure_utc))
            {
                continue;
            }

            set.pairs[role_index].push((member.crew_id.clone(), duty.duty_id));
        }
    }

    for role in CrewRole::ALL {
        roster_debug!(
            "(filter_feasible) {}: {} crew, {} feasible pairs.",
            role,
            set.qualified_for(role).len(),
            set.pairs_for(role).len()
        );
    }

    set
}

/// Crew already at 95 % of an annual, rolling-12-month or 28-day cap are
/// dropped before any per-duty checks.
fn exceeds_prefilter(member: &CrewMember, regulations: &Regulations) -> bool {
    member.current_calendar_year_flight_time_hours
        >= regulations.max_flight_time_hours_year as f64 * PREFILTER_CAP_SHARE
        || member.last_11_calendar_months_flight_time_hours
            >= regulations.max_flight_time_hours_12_months as f64 * PREFILTER_CAP_SHARE
        || member.current_month_flight_time_hours
            >= regulations.max_flight_time_hours_28_days as f64 * PREFILTER_CAP_SHARE
        || member.current_month_duty_time_hours
            >= regulations.max_duty_time_hours_28_days as f64 * PREFILTER_CAP_SHARE
}

/// A pair is dropped when adding the duty's hours would push any of the
/// four accumulated counters past its full cap.
fn exceeds_headroom(member: &CrewMember, duty: &Duty, regulations: &Regulations) -> bool {
    member.current_calendar_year_flight_time_hours + duty.flight_time_hours
        > regulations.max_flight_time_hours_year as f64
        || member.last_11_calendar_months_flight_time_hours + duty.flight_time_hours
            > regulations.max_flight_time_hours_12_months as f64
        || member.current_month_flight_time_hours + duty.flight_time_hours
            > regulations.max_flight_time_hours_28_days as f64
        || member.current_month_duty_time_hours + duty.duty_time_hours
            > regulations.max_duty_time_hours_28_days as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_utc_timestamp;
    use crate::roster::crew::Qualifications;
    use crate::roster::regulations::easa_defaults;
    use chrono::NaiveDate;

    fn captain(crew_id: &str, qualifications: &str) -> CrewMember {
        CrewMember {
            crew_id: crew_id.to_owned(),
            role: CrewRole::Captain,
            qualifications: Qualifications::parse(qualifications),
            purser: false,
            seniority: 15,
            current_month_flight_time_hours: 0.0,
            current_month_duty_time_hours: 0.0,
            last_11_calendar_months_flight_time_hours: 0.0,
            current_calendar_year_flight_time_hours: 0.0,
        }
    }

    fn duty(duty_id: usize, aircraft_type: &str, departure: &str) -> Duty {
        let scheduled_departure_utc = parse_utc_timestamp(departure).unwrap();

        Duty {
            duty_id,
            outbound_flight_id: duty_id as u64 + 100,
            inbound_flight_id: None,
            outbound_departure_icao: "ELLX".to_owned(),
            outbound_arrival_icao: "EGLL".to_owned(),
            inbound_departure_icao: None,
            inbound_arrival_icao: None,
            aircraft_type: aircraft_type.to_owned(),
            aircraft_registration: "LX-ABC".to_owned(),
            flight_time_hours: 2.0,
            duty_time_hours: 3.5,
            scheduled_departure_utc,
            scheduled_outbound_arrival_utc: scheduled_departure_utc + chrono::Duration::hours(2),
            scheduled_inbound_departure_utc: None,
            scheduled_arrival_utc: scheduled_departure_utc + chrono::Duration::hours(2),
            sector_count: 1,
            captains_required: 1,
            first_officers_required: 1,
            cabin_crew_required: 4,
        }
    }

    #[test]
    fn test_qualification_filter() {
        let crew = vec![captain("C1", "B738"), captain("C2", "DH8D"), captain("C3", "ALL")];
        let duties = vec![duty(0, "B738", "2025-10-01 08:00:00")];

        let set = filter_feasible(&crew, &duties, &[], &easa_defaults());

        assert_eq!(set.qualified_for(CrewRole::Captain).len(), 3);
        assert_eq!(
            set.pairs_for(CrewRole::Captain),
            &[("C1".to_owned(), 0), ("C3".to_owned(), 0)]
        );
    }

    #[test]
    fn test_prefilter_excludes_nearly_exhausted_crew() {
        let mut tired = captain("C1", "B738");
        // 95% of the 900-hour annual cap.
        tired.current_calendar_year_flight_time_hours = 855.0;

        let duties = vec![duty(0, "B738", "2025-10-01 08:00:00")];
        let set = filter_feasible(&[tired], &duties, &[], &easa_defaults());

        assert!(set.pairs_for(CrewRole::Captain).is_empty());
        // The crew member still exists for the model's worked-day variables.
        assert_eq!(set.qualified_for(CrewRole::Captain).len(), 1);
    }

    #[test]
    fn test_headroom_excludes_single_pair() {
        let mut near_cap = captain("C1", "B738");

        // 94 + 2.0 stays under the 100-hour 28-day cap.
        near_cap.current_month_flight_time_hours = 94.0;
        let duties = vec![
            duty(0, "B738", "2025-10-01 08:00:00"),
            duty(1, "B738", "2025-10-02 08:00:00"),
        ];
        let set = filter_feasible(&[near_cap.clone()], &duties, &[], &easa_defaults());
        assert_eq!(set.pairs_for(CrewRole::Captain).len(), 2);

        // 94.9 clears the 95% prefilter but 94.9 + 5.2 overshoots the cap.
        near_cap.current_month_flight_time_hours = 94.9;
        let mut long_duty = duty(0, "B738", "2025-10-01 08:00:00");
        long_duty.flight_time_hours = 5.2;

        let set = filter_feasible(&[near_cap], &[long_duty], &[], &easa_defaults());
        assert!(set.pairs_for(CrewRole::Captain).is_empty());
    }

    #[test]
    fn test_time_off_conflict_excludes_pair() {
        let crew = vec![captain("C1", "ALL")];
        let duties = vec![
            duty(0, "B738", "2025-10-03 08:00:00"),
            duty(1, "B738", "2025-10-06 08:00:00"),
        ];
        let time_off = vec![TimeOffRequest {
            crew_id: "C1".to_owned(),
            start_date: NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
        }];

        let set = filter_feasible(&crew, &duties, &time_off, &easa_defaults());
        assert_eq!(set.pairs_for(CrewRole::Captain), &[("C1".to_owned(), 1)]);
    }
}
