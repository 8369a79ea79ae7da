//! Time-disjoint duties per crew member.
//!
//! Every feasible assignment gets an optional interval between the duty's
//! departure and arrival, in minutes since a fixed epoch, activated by the
//! assignment variable. One global no-overlap per crew member then rules
//! out double-booking without any pairwise constraints.

use super::ConstraintContext;
use crate::roster::crew::CrewRole;
use crate::solver::{ConstraintModel, IntervalVar};
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;

lazy_static! {
    /// Origin of the interval number line.
    static ref INTERVAL_EPOCH: DateTime<Utc> = match Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0) {
        chrono::LocalResult::Single(epoch) => epoch,
        _ => panic!("invalid interval epoch"),
    };
}

fn minutes_since_epoch(stamp: &DateTime<Utc>) -> i64 {
    (*stamp - *INTERVAL_EPOCH).num_minutes()
}

pub fn apply<M: ConstraintModel>(model: &mut M, ctx: &ConstraintContext) -> usize {
    let mut interval_count = 0;
    let mut group_count = 0;

    for role in CrewRole::ALL {
        let table = ctx.vars.role(role);

        for crew_id in ctx.feasible.qualified_for(role) {
            let intervals: Vec<IntervalVar> = table
                .crew_assignments(crew_id)
                .map(|assignment| {
                    let duty = &ctx.duties[assignment.duty_id];
                    let start = minutes_since_epoch(&duty.scheduled_departure_utc);
                    let end = minutes_since_epoch(&duty.scheduled_arrival_utc);

                    model.new_optional_interval(
                        start,
                        end - start,
                        end,
                        assignment.var,
                        &format!("interval_{}_{}", assignment.crew_id, assignment.duty_id),
                    )
                })
                .collect();

            if !intervals.is_empty() {
                model.add_no_overlap(&intervals);
                interval_count += intervals.len();
                group_count += 1;
            }
        }
    }

    roster_debug!(
        "(apply) Added {} interval variables in {} no-overlap groups.",
        interval_count,
        group_count
    );
    group_count
}
