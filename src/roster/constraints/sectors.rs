//! Per-day sector cap.
//!
//! A crew member's assignments on one date are bounded by half the daily
//! sector limit, and the bound is only emitted when the number of
//! candidate duties on that date exceeds the limit itself. Duties count
//! as one sector here regardless of their leg count.

use super::ConstraintContext;
use crate::roster::crew::CrewRole;
use crate::solver::{BoolVar, ConstraintModel};

pub fn apply<M: ConstraintModel>(
    model: &mut M,
    ctx: &ConstraintContext,
    max_sectors_day: i64,
) -> usize {
    let per_day_bound = max_sectors_day / 2;
    let mut emitted = 0;

    for role in CrewRole::ALL {
        let table = ctx.vars.role(role);

        for crew_id in ctx.feasible.qualified_for(role) {
            let Some(dates) = table.crew_assignment_dates(crew_id) else {
                continue;
            };

            for candidates in dates.values() {
                if candidates.len() as i64 > max_sectors_day {
                    let terms: Vec<(i64, BoolVar)> = candidates
                        .iter()
                        .map(|index| (1, table.assignment(*index).var))
                        .collect();

                    model.add_linear_le(&terms, per_day_bound);
                    emitted += 1;
                }
            }
        }
    }

    roster_debug!("(apply) Added {} max sectors constraints.", emitted);
    emitted
}
