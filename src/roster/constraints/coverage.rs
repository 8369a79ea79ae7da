//! Exact flight coverage: every duty gets precisely its required crew
//! per role, and at least one purser among the assigned cabin crew.

use super::ConstraintContext;
use crate::roster::crew::CrewRole;
use crate::solver::{BoolVar, ConstraintModel};

/// Emit the coverage equalities and purser minima.
///
/// The equality is emitted even when no feasible candidate survived for a
/// (duty, role) combination; an uncoverable duty must surface as solver
/// infeasibility rather than as an unmanned flight. The purser constraint
/// is skipped when no purser-capable variable exists for the duty.
pub fn apply<M: ConstraintModel>(model: &mut M, ctx: &ConstraintContext) -> usize {
    let mut emitted = 0;

    for duty in ctx.duties {
        for role in CrewRole::ALL {
            let terms: Vec<(i64, BoolVar)> = ctx
                .vars
                .role(role)
                .duty_assignments(duty.duty_id)
                .map(|assignment| (1, assignment.var))
                .collect();

            if terms.is_empty() && duty.required_for(role) > 0 {
                roster_warn!(
                    "(apply) Duty {} has no feasible {} candidates.",
                    duty.duty_id,
                    role
                );
            }

            model.add_linear_eq(&terms, duty.required_for(role) as i64);
            emitted += 1;
        }

        let pursers: Vec<(i64, BoolVar)> = ctx
            .vars
            .role(CrewRole::FlightAttendant)
            .duty_assignments(duty.duty_id)
            .filter(|assignment| {
                ctx.crew_member(&assignment.crew_id)
                    .map(|member| member.purser)
                    .unwrap_or(false)
            })
            .map(|assignment| (1, assignment.var))
            .collect();

        if !pursers.is_empty() {
            model.add_linear_ge(&pursers, 1);
            emitted += 1;
        }
    }

    roster_debug!("(apply) Added {} flight coverage constraints.", emitted);
    emitted
}
