//! Minimum weekly rest days over a sliding 14-day window.
//!
//! Ties every worked-today indicator to the day's assignments (an
//! assignment forces the indicator on, and an indicator without any
//! assignment is forced off), then bounds worked days per window:
//! historical work days before the horizon plus indicators inside the
//! window may not exceed `window - min_rest_days`.

use super::ConstraintContext;
use crate::roster::crew::CrewRole;
use crate::solver::{BoolVar, ConstraintModel};
use chrono::Duration;

pub fn apply<M: ConstraintModel>(
    model: &mut M,
    ctx: &ConstraintContext,
    min_weekly_rest_days: i64,
    period_days: i64,
) -> usize {
    let max_work_days = period_days - min_weekly_rest_days;
    let Some(schedule_start) = ctx.indices.schedule_start() else {
        return 0;
    };

    let mut link_count = 0;
    let mut emitted = 0;

    for role in CrewRole::ALL {
        let table = ctx.vars.role(role);

        for crew_id in ctx.feasible.qualified_for(role) {
            let Some(worked) = table.worked_for_crew(crew_id) else {
                continue;
            };

            // Link each indicator with the assignments of its day.
            for (&date, &worked_var) in worked {
                let day_vars: Vec<BoolVar> = table
                    .crew_assignments_on(crew_id, date)
                    .map(|assignment| assignment.var)
                    .collect();

                for &assignment_var in &day_vars {
                    model.add_linear_le(&[(1, assignment_var), (-1, worked_var)], 0);
                    link_count += 1;
                }

                let mut upper_link: Vec<(i64, BoolVar)> = vec![(1, worked_var)];
                upper_link.extend(day_vars.iter().map(|&var| (-1, var)));
                model.add_linear_le(&upper_link, 0);
                link_count += 1;
            }

            // Bound the worked days of every window rooted in the horizon.
            for &window_start in &ctx.indices.unique_duty_dates {
                let window_end = window_start + Duration::days(period_days - 1);
                let historical_start = window_start - Duration::days(period_days - 1);
                let historical_end = schedule_start - Duration::days(1);

                let historical_work_days = if historical_start < schedule_start {
                    ctx.indices
                        .historical_work_days_in(crew_id, historical_start, historical_end)
                } else {
                    0
                };

                let terms: Vec<(i64, BoolVar)> = worked
                    .range(window_start..=window_end)
                    .map(|(_, &var)| (1, var))
                    .collect();

                if terms.is_empty() && historical_work_days == 0 {
                    continue;
                }

                model.add_linear_le(&terms, max_work_days - historical_work_days);
                emitted += 1;
            }
        }
    }

    roster_debug!(
        "(apply) Added {} rest day constraints and {} worked-day links.",
        emitted,
        link_count
    );
    emitted
}
