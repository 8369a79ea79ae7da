//! Flight duty period cap, approximated per calendar day.
//!
//! The duty hours of everything a crew member works on one date must fit
//! inside the maximum flight duty period. A future revision may replace
//! the calendar-day binning with an interval-based cumulative constraint.

use super::ConstraintContext;
use crate::roster::crew::CrewRole;
use crate::solver::{BoolVar, ConstraintModel};

pub fn apply<M: ConstraintModel>(
    model: &mut M,
    ctx: &ConstraintContext,
    max_flight_duty_period_hours: i64,
) -> usize {
    let max_centi = max_flight_duty_period_hours * 100;
    let mut emitted = 0;

    for role in CrewRole::ALL {
        let table = ctx.vars.role(role);

        for crew_id in ctx.feasible.qualified_for(role) {
            let Some(dates) = table.crew_assignment_dates(crew_id) else {
                continue;
            };

            for candidates in dates.values() {
                let terms: Vec<(i64, BoolVar)> = candidates
                    .iter()
                    .map(|&index| {
                        let assignment = table.assignment(index);
                        (
                            ctx.duties[assignment.duty_id].duty_time_centi(),
                            assignment.var,
                        )
                    })
                    .collect();

                model.add_linear_le(&terms, max_centi);
                emitted += 1;
            }
        }
    }

    roster_debug!(
        "(apply) Added {} flight duty period constraints.",
        emitted
    );
    emitted
}
