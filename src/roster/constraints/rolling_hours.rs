//! Rolling-window duty/flight hour caps.
//!
//! For every window rooted at a horizon date, hours already worked in the
//! preceding days (from the historical records) plus the scheduled hours
//! inside the window must stay under the cap. Emitted as duty-hour 7-day
//! and 28-day instances and a flight-hour 28-day instance.

use super::ConstraintContext;
use crate::roster::centihours;
use crate::roster::crew::CrewRole;
use crate::roster::indices::HoursMode;
use crate::solver::{BoolVar, ConstraintModel};
use chrono::Duration;

pub fn apply<M: ConstraintModel>(
    model: &mut M,
    ctx: &ConstraintContext,
    max_hours_per_window: i64,
    rolling_days_window_size: i64,
    mode: HoursMode,
) -> usize {
    let max_centi = max_hours_per_window * 100;
    let mut emitted = 0;

    for role in CrewRole::ALL {
        let table = ctx.vars.role(role);

        for crew_id in ctx.feasible.qualified_for(role) {
            let Some(dates) = table.crew_assignment_dates(crew_id) else {
                continue;
            };

            for &window_start in &ctx.indices.unique_duty_dates {
                let window_end = window_start + Duration::days(rolling_days_window_size - 1);
                let historical_start = window_start - Duration::days(rolling_days_window_size - 1);
                let historical_end = window_start - Duration::days(1);

                let historical_centi = centihours(ctx.indices.historical_hours_in(
                    crew_id,
                    historical_start,
                    historical_end,
                    mode,
                ));

                let terms: Vec<(i64, BoolVar)> = dates
                    .range(window_start..=window_end)
                    .flat_map(|(_, indexes)| indexes.iter())
                    .map(|&index| {
                        let assignment = table.assignment(index);
                        let duty = &ctx.duties[assignment.duty_id];
                        let hours_centi = match mode {
                            HoursMode::Flight => duty.flight_time_centi(),
                            HoursMode::Duty => duty.duty_time_centi(),
                        };

                        (hours_centi, assignment.var)
                    })
                    .collect();

                if terms.is_empty() && historical_centi == 0 {
                    continue;
                }

                model.add_linear_le(&terms, max_centi - historical_centi);
                emitted += 1;
            }
        }
    }

    roster_debug!(
        "(apply) Added {} rolling {:?}-hour constraints over {} days.",
        emitted,
        mode,
        rolling_days_window_size
    );
    emitted
}
