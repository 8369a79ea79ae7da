//! Calendar-year and rolling-12-month flight-hour caps.
//!
//! The hours a crew member already flew are subtracted from the cap and
//! the scheduled flight hours must fit into the remainder.

use super::ConstraintContext;
use crate::roster::centihours;
use crate::roster::crew::CrewRole;
use crate::solver::{BoolVar, ConstraintModel};

/// Which accumulated counter seeds the cap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PeriodKind {
    CalendarYear,
    RollingTwelveMonths,
}

pub fn apply<M: ConstraintModel>(
    model: &mut M,
    ctx: &ConstraintContext,
    kind: PeriodKind,
    max_hours_per_period: i64,
) -> usize {
    let mut emitted = 0;

    for role in CrewRole::ALL {
        let table = ctx.vars.role(role);

        for crew_id in ctx.feasible.qualified_for(role) {
            let Some(member) = ctx.crew_member(crew_id) else {
                continue;
            };

            let terms: Vec<(i64, BoolVar)> = table
                .crew_assignments(crew_id)
                .map(|assignment| {
                    (
                        ctx.duties[assignment.duty_id].flight_time_centi(),
                        assignment.var,
                    )
                })
                .collect();

            if terms.is_empty() {
                continue;
            }

            let hours_already_flown = match kind {
                PeriodKind::CalendarYear => member.current_calendar_year_flight_time_hours,
                PeriodKind::RollingTwelveMonths => {
                    member.last_11_calendar_months_flight_time_hours
                }
            };

            let remaining_centi = centihours(max_hours_per_period as f64 - hours_already_flown);
            model.add_linear_le(&terms, remaining_centi);
            emitted += 1;
        }
    }

    roster_debug!(
        "(apply) Added {} {:?} flight hour constraints.",
        emitted,
        kind
    );
    emitted
}
