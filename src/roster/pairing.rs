//! Packs flight legs into one- or two-sector duties.
//!
//! Two deterministic passes over the legs, ordered by departure time and
//! flight id: home-base round trips on the same airframe first, then a
//! relaxed pass without the airframe requirement. Whatever stays unpaired
//! becomes a single-sector duty. Every leg ends up in exactly one duty.

use crate::roster::duty::Duty;
use crate::roster::flight::FlightLeg;
use crate::roster::{round_hours, DUTY_BUFFER_HOURS, HOME_BASE_ICAO};
use chrono::Duration;

/// Latest a return leg may depart after the outbound arrival.
pub const MAX_TURNAROUND_HOURS: i64 = 4;

/// Build the duty table for the horizon.
///
/// `max_flight_duty_period_hours` gates pairing: a round trip whose
/// buffered flight time would not stay below it is left unpaired.
pub fn build_duties(flights: &[FlightLeg], max_flight_duty_period_hours: i64) -> Vec<Duty> {
    let mut order: Vec<usize> = (0..flights.len()).collect();
    order.sort_by_key(|&index| {
        (
            flights[index].scheduled_departure_utc,
            flights[index].flight_id,
        )
    });

    let mut paired = vec![false; flights.len()];
    let mut pairings: Vec<(usize, usize)> = Vec::new();

    find_return_flights(
        flights,
        &order,
        &mut paired,
        &mut pairings,
        max_flight_duty_period_hours,
        true,
    );
    find_return_flights(
        flights,
        &order,
        &mut paired,
        &mut pairings,
        max_flight_duty_period_hours,
        false,
    );

    let mut duties = Vec::with_capacity(pairings.len() + flights.len());

    for &(outbound_index, inbound_index) in &pairings {
        duties.push(round_trip_duty(
            duties.len(),
            &flights[outbound_index],
            &flights[inbound_index],
        ));
    }

    for &index in &order {
        if !paired[index] {
            duties.push(single_leg_duty(duties.len(), &flights[index]));
        }
    }

    roster_debug!(
        "(build_duties) {} legs packed into {} duties ({} round trips).",
        flights.len(),
        duties.len(),
        pairings.len()
    );

    duties
}

/// One pass of return-leg matching. Outbound legs must depart the home
/// base; the chronologically earliest acceptable return wins.
fn find_return_flights(
    flights: &[FlightLeg],
    order: &[usize],
    paired: &mut [bool],
    pairings: &mut Vec<(usize, usize)>,
    max_flight_duty_period_hours: i64,
    require_same_aircraft: bool,
) {
    for &outbound_index in order {
        if paired[outbound_index] {
            continue;
        }

        let outbound = &flights[outbound_index];
        if outbound.departure_icao != HOME_BASE_ICAO {
            continue;
        }

        let latest_return_departure =
            outbound.scheduled_arrival_utc + Duration::hours(MAX_TURNAROUND_HOURS);

        let candidate = order.iter().copied().find(|&inbound_index| {
            if inbound_index == outbound_index || paired[inbound_index] {
                return false;
            }

            let inbound = &flights[inbound_index];
            if inbound.departure_icao != outbound.arrival_icao
                || inbound.arrival_icao != outbound.departure_icao
            {
                return false;
            }

            if inbound.scheduled_departure_utc <= outbound.scheduled_arrival_utc
                || inbound.scheduled_departure_utc > latest_return_departure
            {
                return false;
            }

            if require_same_aircraft
                && (inbound.aircraft_type != outbound.aircraft_type
                    || inbound.aircraft_registration != outbound.aircraft_registration)
            {
                return false;
            }

            true
        });

        let Some(inbound_index) = candidate else {
            continue;
        };

        let inbound = &flights[inbound_index];
        let combined_duty_time_hours =
            DUTY_BUFFER_HOURS + outbound.flight_time_hours + inbound.flight_time_hours;

        if combined_duty_time_hours < max_flight_duty_period_hours as f64 {
            pairings.push((outbound_index, inbound_index));
            paired[outbound_index] = true;
            paired[inbound_index] = true;
        }
    }
}

fn round_trip_duty(duty_id: usize, outbound: &FlightLeg, inbound: &FlightLeg) -> Duty {
    let block_span = inbound.scheduled_arrival_utc - outbound.scheduled_departure_utc;
    let duty_time_hours =
        round_hours(DUTY_BUFFER_HOURS + block_span.num_seconds() as f64 / 3600.0);

    Duty {
        duty_id,
        outbound_flight_id: outbound.flight_id,
        inbound_flight_id: Some(inbound.flight_id),
        outbound_departure_icao: outbound.departure_icao.clone(),
        outbound_arrival_icao: outbound.arrival_icao.clone(),
        inbound_departure_icao: Some(inbound.departure_icao.clone()),
        inbound_arrival_icao: Some(inbound.arrival_icao.clone()),
        aircraft_type: outbound.aircraft_type.clone(),
        aircraft_registration: outbound.aircraft_registration.clone(),
        flight_time_hours: outbound.flight_time_hours + inbound.flight_time_hours,
        duty_time_hours,
        scheduled_departure_utc: outbound.scheduled_departure_utc,
        scheduled_outbound_arrival_utc: outbound.scheduled_arrival_utc,
        scheduled_inbound_departure_utc: Some(inbound.scheduled_departure_utc),
        scheduled_arrival_utc: inbound.scheduled_arrival_utc,
        sector_count: 2,
        captains_required: outbound.captains_required,
        first_officers_required: outbound.first_officers_required,
        cabin_crew_required: outbound.cabin_crew_required,
    }
}

fn single_leg_duty(duty_id: usize, leg: &FlightLeg) -> Duty {
    Duty {
        duty_id,
        outbound_flight_id: leg.flight_id,
        inbound_flight_id: None,
        outbound_departure_icao: leg.departure_icao.clone(),
        outbound_arrival_icao: leg.arrival_icao.clone(),
        inbound_departure_icao: None,
        inbound_arrival_icao: None,
        aircraft_type: leg.aircraft_type.clone(),
        aircraft_registration: leg.aircraft_registration.clone(),
        flight_time_hours: leg.flight_time_hours,
        duty_time_hours: DUTY_BUFFER_HOURS + leg.flight_time_hours,
        scheduled_departure_utc: leg.scheduled_departure_utc,
        scheduled_outbound_arrival_utc: leg.scheduled_arrival_utc,
        scheduled_inbound_departure_utc: None,
        scheduled_arrival_utc: leg.scheduled_arrival_utc,
        sector_count: 1,
        captains_required: leg.captains_required,
        first_officers_required: leg.first_officers_required,
        cabin_crew_required: leg.cabin_crew_required,
    }
}
