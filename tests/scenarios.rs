//! End-to-end rostering scenarios against the reference backend.

use chrono::{DateTime, NaiveDate, Utc};
use crew_rostering::io::parse_utc_timestamp;
use crew_rostering::roster::crew::{
    CrewMember, CrewRole, HistoricalRecord, Qualifications, TimeOffRequest,
};
use crew_rostering::roster::extract::RosterAssignment;
use crew_rostering::roster::flight::FlightLeg;
use crew_rostering::roster::regulations::Regulations;
use crew_rostering::roster::round_hours;
use crew_rostering::roster::scheduler::CrewScheduler;
use crew_rostering::solver::backtrack::BacktrackModel;
use crew_rostering::solver::{SolveOptions, SolveStatus};
use std::collections::HashMap;

fn easa_regulations() -> Regulations {
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

#[allow(clippy::too_many_arguments)]
fn leg(
    flight_id: u64,
    departure_icao: &str,
    arrival_icao: &str,
    aircraft_type: &str,
    registration: &str,
    departure: &str,
    arrival: &str,
    required: (u32, u32, u32),
) -> FlightLeg {
    let scheduled_departure_utc = parse_utc_timestamp(departure).unwrap();
    let scheduled_arrival_utc = parse_utc_timestamp(arrival).unwrap();
    let block = scheduled_arrival_utc - scheduled_departure_utc;

    FlightLeg {
        flight_id,
        departure_icao: departure_icao.to_owned(),
        arrival_icao: arrival_icao.to_owned(),
        aircraft_type: aircraft_type.to_owned(),
        aircraft_registration: registration.to_owned(),
        scheduled_departure_utc,
        scheduled_arrival_utc,
        flight_time_hours: round_hours(block.num_seconds() as f64 / 3600.0),
        captains_required: required.0,
        first_officers_required: required.1,
        cabin_crew_required: required.2,
    }
}

fn crew_member(crew_id: &str, role: CrewRole, qualifications: &str, purser: bool) -> CrewMember {
    CrewMember {
        crew_id: crew_id.to_owned(),
        role,
        qualifications: Qualifications::parse(qualifications),
        purser,
        seniority: 10,
        current_month_flight_time_hours: 0.0,
        current_month_duty_time_hours: 0.0,
        last_11_calendar_months_flight_time_hours: 0.0,
        current_calendar_year_flight_time_hours: 0.0,
    }
}

fn history(crew_id: &str, departure: &str, flight_hours: f64, duty_hours: f64) -> HistoricalRecord {
    HistoricalRecord {
        crew_id: crew_id.to_owned(),
        scheduled_departure_utc: parse_utc_timestamp(departure).unwrap(),
        flight_time_hours: flight_hours,
        duty_time_hours: duty_hours,
    }
}

fn solve(scheduler: &mut CrewScheduler) -> (SolveStatus, Vec<RosterAssignment>) {
    let mut model = BacktrackModel::new();
    let outcome = scheduler
        .solve_round(&mut model, &SolveOptions::default())
        .unwrap();

    (outcome.status, outcome.assignments)
}

/// The universal per-solve checks: exact coverage, qualifications,
/// disjoint duty intervals, time-off respect, the per-day duty-hour cap
/// and single-assignment of every leg.
fn assert_roster_valid(
    scheduler: &CrewScheduler,
    assignments: &[RosterAssignment],
    time_off: &[TimeOffRequest],
) {
    let crew_by_id: HashMap<&str, &CrewMember> = scheduler
        .crew()
        .iter()
        .map(|member| (member.crew_id.as_str(), member))
        .collect();

    // Exact coverage per duty and role.
    for duty in scheduler.duties() {
        for (role_label, required) in [
            ("Captain", duty.captains_required),
            ("First Officer", duty.first_officers_required),
            ("Cabin Crew", duty.cabin_crew_required),
        ] {
            let assigned = assignments
                .iter()
                .filter(|row| row.duty_id == duty.duty_id && row.crew_role == role_label)
                .count();
            assert_eq!(
                assigned as u32, required,
                "duty {} role {} coverage",
                duty.duty_id, role_label
            );
        }
    }

    // Every leg appears in exactly one duty.
    let mut leg_appearances: HashMap<u64, usize> = HashMap::new();
    for duty in scheduler.duties() {
        *leg_appearances.entry(duty.outbound_flight_id).or_default() += 1;
        if let Some(inbound) = duty.inbound_flight_id {
            *leg_appearances.entry(inbound).or_default() += 1;
        }
    }
    assert!(leg_appearances.values().all(|&count| count == 1));

    let mut duties_per_crew: HashMap<&str, Vec<(DateTime<Utc>, DateTime<Utc>)>> = HashMap::new();
    let mut duty_hours_per_crew_day: HashMap<(&str, NaiveDate), f64> = HashMap::new();

    for row in assignments {
        let member = crew_by_id[row.crew_id.as_str()];

        // Qualification covers the duty's aircraft type.
        assert!(
            member.qualifications.covers(&row.duty_aircraft_type),
            "{} is not qualified on {}",
            row.crew_id,
            row.duty_aircraft_type
        );

        // No assigned departure inside an approved time-off interval.
        for request in time_off {
            if request.crew_id == row.crew_id {
                assert!(
                    !request.contains(&row.duty_scheduled_departure_utc),
                    "{} rostered during time off",
                    row.crew_id
                );
            }
        }

        duties_per_crew.entry(row.crew_id.as_str()).or_default().push((
            row.duty_scheduled_departure_utc,
            row.duty_scheduled_arrival_utc,
        ));
        *duty_hours_per_crew_day
            .entry((
                row.crew_id.as_str(),
                row.duty_scheduled_departure_utc.date_naive(),
            ))
            .or_default() += row.duty_time_hours;
    }

    // Half-open duty intervals of one crew member are pairwise disjoint.
    for (crew_id, intervals) in &duties_per_crew {
        for (first_index, first) in intervals.iter().enumerate() {
            for second in intervals.iter().skip(first_index + 1) {
                assert!(
                    first.1 <= second.0 || second.1 <= first.0,
                    "{} has overlapping duties",
                    crew_id
                );
            }
        }
    }

    // Cumulative duty hours per calendar day stay inside the duty period.
    for ((crew_id, date), hours) in &duty_hours_per_crew_day {
        assert!(
            *hours <= 13.0 + 1e-9,
            "{} exceeds the duty period on {}",
            crew_id,
            date
        );
    }
}

#[test]
fn test_single_leg_single_crew() {
    let flights = vec![leg(
        1,
        "ELLX",
        "EGLL",
        "B738",
        "LX-ABC",
        "2025-10-01 08:00:00",
        "2025-10-01 09:30:00",
        (1, 1, 1),
    )];
    let crew = vec![
        crew_member("C1", CrewRole::Captain, "B738", false),
        crew_member("FO1", CrewRole::FirstOfficer, "B738", false),
        crew_member("FA1", CrewRole::FlightAttendant, "ALL", true),
    ];

    let mut scheduler =
        CrewScheduler::new(flights, crew, Vec::new(), Vec::new(), easa_regulations()).unwrap();
    let (status, assignments) = solve(&mut scheduler);

    assert_eq!(status, SolveStatus::Optimal);
    assert_eq!(scheduler.duties().len(), 1);
    assert_eq!(assignments.len(), 3);
    assert!(assignments.iter().any(|row| row.crew_role == "Captain"));
    assert!(assignments.iter().any(|row| row.crew_role == "First Officer"));
    assert!(assignments
        .iter()
        .any(|row| row.crew_role == "Cabin Crew" && row.crew_purser == "YES"));

    assert_roster_valid(&scheduler, &assignments, &[]);
}

#[test]
fn test_matched_return_becomes_one_duty() {
    let flights = vec![
        leg(
            1,
            "ELLX",
            "EGLL",
            "B738",
            "LX-ABC",
            "2025-10-01 08:00:00",
            "2025-10-01 09:30:00",
            (1, 1, 1),
        ),
        leg(
            2,
            "EGLL",
            "ELLX",
            "B738",
            "LX-ABC",
            "2025-10-01 11:00:00",
            "2025-10-01 12:30:00",
            (1, 1, 1),
        ),
    ];
    let crew = vec![
        crew_member("C1", CrewRole::Captain, "B738", false),
        crew_member("FO1", CrewRole::FirstOfficer, "B738", false),
        crew_member("FA1", CrewRole::FlightAttendant, "ALL", true),
    ];

    let mut scheduler =
        CrewScheduler::new(flights, crew, Vec::new(), Vec::new(), easa_regulations()).unwrap();
    let (status, assignments) = solve(&mut scheduler);

    assert_eq!(status, SolveStatus::Optimal);
    assert_eq!(scheduler.duties().len(), 1);

    let duty = &scheduler.duties()[0];
    assert_eq!(duty.sector_count, 2);
    // 1.5 h buffer plus the 08:00 to 12:30 block span.
    assert_eq!(duty.duty_time_hours, 6.0);

    assert_eq!(assignments.len(), 3);
    assert_roster_valid(&scheduler, &assignments, &[]);
}

#[test]
fn test_late_return_stays_two_duties() {
    let flights = vec![
        leg(
            1,
            "ELLX",
            "EGLL",
            "B738",
            "LX-ABC",
            "2025-10-01 08:00:00",
            "2025-10-01 09:30:00",
            (1, 0, 0),
        ),
        leg(
            2,
            "EGLL",
            "ELLX",
            "B738",
            "LX-ABC",
            "2025-10-01 14:00:00",
            "2025-10-01 15:30:00",
            (1, 0, 0),
        ),
    ];
    let crew = vec![crew_member("C1", CrewRole::Captain, "B738", false)];

    let mut scheduler =
        CrewScheduler::new(flights, crew, Vec::new(), Vec::new(), easa_regulations()).unwrap();
    let (status, assignments) = solve(&mut scheduler);

    assert_eq!(status, SolveStatus::Optimal);
    assert_eq!(scheduler.duties().len(), 2);
    assert_eq!(assignments.len(), 2);
    assert_roster_valid(&scheduler, &assignments, &[]);
}

#[test]
fn test_duty_period_cap_needs_second_captain() {
    let flights = vec![
        leg(
            1,
            "ELLX",
            "EGLL",
            "B738",
            "LX-ABC",
            "2025-10-01 06:00:00",
            "2025-10-01 11:30:00",
            (1, 0, 0),
        ),
        leg(
            2,
            "ELLX",
            "EDDF",
            "B738",
            "LX-DEF",
            "2025-10-01 13:00:00",
            "2025-10-01 18:30:00",
            (1, 0, 0),
        ),
    ];
    let single_captain = vec![crew_member("C1", CrewRole::Captain, "B738", false)];

    // Two 7.0-hour duties on one day break the 13-hour duty period for a
    // lone captain.
    let mut scheduler = CrewScheduler::new(
        flights.clone(),
        single_captain,
        Vec::new(),
        Vec::new(),
        easa_regulations(),
    )
    .unwrap();
    let (status, assignments) = solve(&mut scheduler);
    assert_eq!(status, SolveStatus::Infeasible);
    assert!(assignments.is_empty());

    let two_captains = vec![
        crew_member("C1", CrewRole::Captain, "B738", false),
        crew_member("C2", CrewRole::Captain, "B738", false),
    ];
    let mut scheduler = CrewScheduler::new(
        flights,
        two_captains,
        Vec::new(),
        Vec::new(),
        easa_regulations(),
    )
    .unwrap();
    let (status, assignments) = solve(&mut scheduler);

    assert_eq!(status, SolveStatus::Optimal);
    assert_eq!(assignments.len(), 2);

    // Each captain flies exactly one of the duties.
    assert_ne!(assignments[0].crew_id, assignments[1].crew_id);
    assert_roster_valid(&scheduler, &assignments, &[]);
}

#[test]
fn test_rolling_28_day_window_rejects_loaded_crew() {
    // 95 flight hours in the 27 days before the horizon; a six-hour duty
    // on 2025-10-01 would overshoot the 100-hour cap.
    let flights = vec![leg(
        1,
        "ELLX",
        "KJFK",
        "B738",
        "LX-ABC",
        "2025-10-01 08:00:00",
        "2025-10-01 14:00:00",
        (1, 0, 0),
    )];
    let crew = vec![crew_member("C1", CrewRole::Captain, "B738", false)];
    let loaded_history: Vec<_> = (0..10)
        .map(|index| {
            history(
                "C1",
                &format!("2025-09-{:02} 08:00:00", 5 + 2 * index),
                9.5,
                11.5,
            )
        })
        .collect();

    let mut scheduler =
        CrewScheduler::new(flights, crew, Vec::new(), loaded_history, easa_regulations()).unwrap();
    let (status, assignments) = solve(&mut scheduler);

    assert_eq!(status, SolveStatus::Infeasible);
    assert!(assignments.is_empty());
}

#[test]
fn test_rest_days_window_blocks_exhausted_crew() {
    // Twelve distinct work days in the 13 days before 2025-10-01 leave no
    // workable day in the 14-day window rooted there.
    let flights = vec![leg(
        1,
        "ELLX",
        "EGLL",
        "B738",
        "LX-ABC",
        "2025-10-01 08:00:00",
        "2025-10-01 09:30:00",
        (1, 0, 0),
    )];
    let crew = vec![crew_member("C1", CrewRole::Captain, "B738", false)];
    let exhausted_history: Vec<_> = (18..=29)
        .map(|day| history("C1", &format!("2025-09-{:02} 08:00:00", day), 2.0, 3.5))
        .collect();

    let mut scheduler = CrewScheduler::new(
        flights.clone(),
        crew.clone(),
        Vec::new(),
        exhausted_history,
        easa_regulations(),
    )
    .unwrap();
    let (status, _) = solve(&mut scheduler);
    assert_eq!(status, SolveStatus::Infeasible);

    // One rested day fewer and the same crew may fly again.
    let lighter_history: Vec<_> = (19..=29)
        .map(|day| history("C1", &format!("2025-09-{:02} 08:00:00", day), 2.0, 3.5))
        .collect();
    let mut scheduler =
        CrewScheduler::new(flights, crew, Vec::new(), lighter_history, easa_regulations()).unwrap();
    let (status, assignments) = solve(&mut scheduler);

    assert_eq!(status, SolveStatus::Optimal);
    assert_eq!(assignments.len(), 1);
}

#[test]
fn test_two_day_horizon_respects_all_properties() {
    let flights = vec![
        leg(
            4101,
            "ELLX",
            "EGLL",
            "B738",
            "LX-LBA",
            "2025-10-01 08:00:00",
            "2025-10-01 09:30:00",
            (1, 1, 4),
        ),
        leg(
            4102,
            "EGLL",
            "ELLX",
            "B738",
            "LX-LBA",
            "2025-10-01 11:00:00",
            "2025-10-01 12:30:00",
            (1, 1, 4),
        ),
        leg(
            4201,
            "ELLX",
            "EDDF",
            "DH8D",
            "LX-LQA",
            "2025-10-02 07:00:00",
            "2025-10-02 08:00:00",
            (1, 1, 2),
        ),
        leg(
            4202,
            "EDDF",
            "ELLX",
            "DH8D",
            "LX-LQA",
            "2025-10-02 09:30:00",
            "2025-10-02 10:30:00",
            (1, 1, 2),
        ),
    ];

    let crew = vec![
        crew_member("C1", CrewRole::Captain, "B738", false),
        crew_member("C2", CrewRole::Captain, "DH8D", false),
        crew_member("FO1", CrewRole::FirstOfficer, "B738", false),
        crew_member("FO2", CrewRole::FirstOfficer, "DH8D", false),
        crew_member("FA1", CrewRole::FlightAttendant, "ALL", true),
        crew_member("FA2", CrewRole::FlightAttendant, "ALL", false),
        crew_member("FA3", CrewRole::FlightAttendant, "ALL", false),
        crew_member("FA4", CrewRole::FlightAttendant, "ALL", true),
        crew_member("FA5", CrewRole::FlightAttendant, "ALL", false),
        crew_member("FA6", CrewRole::FlightAttendant, "ALL", false),
    ];

    let time_off = vec![TimeOffRequest {
        crew_id: "FA5".to_owned(),
        start_date: NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
    }];

    let mut scheduler = CrewScheduler::new(
        flights,
        crew,
        time_off.clone(),
        Vec::new(),
        easa_regulations(),
    )
    .unwrap();
    let (status, assignments) = solve(&mut scheduler);

    assert_eq!(status, SolveStatus::Optimal);
    assert_eq!(scheduler.duties().len(), 2);
    // 6 crew on the B738 rotation, 4 on the DH8D one.
    assert_eq!(assignments.len(), 10);

    // Both duties carry a purser.
    for duty in scheduler.duties() {
        assert!(assignments.iter().any(|row| row.duty_id == duty.duty_id
            && row.crew_role == "Cabin Crew"
            && row.crew_purser == "YES"));
    }

    assert_roster_valid(&scheduler, &assignments, &time_off);
}

#[test]
fn test_utilisation_counters_advance_between_rounds() {
    let flights = vec![leg(
        1,
        "ELLX",
        "EGLL",
        "B738",
        "LX-ABC",
        "2025-10-01 08:00:00",
        "2025-10-01 09:30:00",
        (1, 0, 0),
    )];
    let crew = vec![crew_member("C1", CrewRole::Captain, "B738", false)];

    let mut scheduler =
        CrewScheduler::new(flights, crew, Vec::new(), Vec::new(), easa_regulations()).unwrap();
    let (status, assignments) = solve(&mut scheduler);
    assert_eq!(status, SolveStatus::Optimal);

    let captain = &scheduler.crew()[0];
    assert_eq!(captain.current_month_flight_time_hours, 1.5);
    assert_eq!(captain.current_calendar_year_flight_time_hours, 1.5);
    assert_eq!(captain.last_11_calendar_months_flight_time_hours, 1.5);
    assert_eq!(captain.current_month_duty_time_hours, 3.0);

    assert_eq!(assignments[0].duty_time_hours, 3.0);
}

#[test]
fn test_extraction_is_idempotent() {
    use crew_rostering::roster::constraints::{coverage, ConstraintContext};
    use crew_rostering::roster::extract::extract_roster;
    use crew_rostering::roster::feasibility::filter_feasible;
    use crew_rostering::roster::indices::RosterIndices;
    use crew_rostering::roster::model::RosterModel;
    use crew_rostering::roster::pairing::build_duties;
    use crew_rostering::solver::ConstraintModel;

    let flights = vec![leg(
        1,
        "ELLX",
        "EGLL",
        "B738",
        "LX-ABC",
        "2025-10-01 08:00:00",
        "2025-10-01 09:30:00",
        (1, 0, 0),
    )];
    let crew = vec![crew_member("C1", CrewRole::Captain, "B738", false)];
    let crew_index: HashMap<String, usize> = [("C1".to_owned(), 0)].into_iter().collect();
    let regulations = easa_regulations();

    let duties = build_duties(&flights, regulations.max_flight_duty_period_hours);
    let feasible = filter_feasible(&crew, &duties, &[], &regulations);
    let indices = RosterIndices::build(&duties, &[]);

    let mut model = BacktrackModel::new();
    let vars = RosterModel::build(&mut model, &feasible, &duties, &indices);
    vars.objective_balance_workload(&mut model);

    let ctx = ConstraintContext {
        duties: &duties,
        crew: &crew,
        crew_index: &crew_index,
        feasible: &feasible,
        indices: &indices,
        vars: &vars,
    };
    coverage::apply(&mut model, &ctx);

    assert_eq!(model.solve(&SolveOptions::default()), SolveStatus::Optimal);

    let first = extract_roster(&model, &vars, &duties, &crew, &crew_index).unwrap();
    let second = extract_roster(&model, &vars, &duties, &crew, &crew_index).unwrap();

    assert_eq!(first.len(), 1);
    let keys = |rows: &[RosterAssignment]| {
        rows.iter()
            .map(|row| (row.crew_id.clone(), row.duty_id, row.crew_role.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&first), keys(&second));
}

#[test]
fn test_solves_are_deterministic() {
    let build = || {
        let flights = vec![
            leg(
                1,
                "ELLX",
                "EGLL",
                "B738",
                "LX-ABC",
                "2025-10-01 08:00:00",
                "2025-10-01 09:30:00",
                (1, 0, 2),
            ),
            leg(
                2,
                "ELLX",
                "EDDF",
                "B738",
                "LX-DEF",
                "2025-10-02 08:00:00",
                "2025-10-02 09:00:00",
                (1, 0, 2),
            ),
        ];
        let crew = vec![
            crew_member("C1", CrewRole::Captain, "B738", false),
            crew_member("C2", CrewRole::Captain, "B738", false),
            crew_member("FA1", CrewRole::FlightAttendant, "ALL", true),
            crew_member("FA2", CrewRole::FlightAttendant, "ALL", false),
            crew_member("FA3", CrewRole::FlightAttendant, "ALL", false),
        ];

        CrewScheduler::new(flights, crew, Vec::new(), Vec::new(), easa_regulations()).unwrap()
    };

    let (status_a, assignments_a) = solve(&mut build());
    let (status_b, assignments_b) = solve(&mut build());

    assert_eq!(status_a, status_b);

    let keys = |rows: &[RosterAssignment]| {
        rows.iter()
            .map(|row| (row.crew_id.clone(), row.duty_id, row.crew_role.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&assignments_a), keys(&assignments_b));
}
