//! The flight- and duty-time constraint families.
//!
//! Each family consumes the shared [`ConstraintContext`] and emits its
//! constraints against the variable tables through the abstract model.
//! Hour coefficients are integer centihours throughout.

pub mod coverage;
pub mod flight_duty_period;
pub mod overlap;
pub mod period_hours;
pub mod rest_days;
pub mod rolling_hours;
pub mod sectors;

#[cfg(test)]
pub(crate) mod test_fixtures;

use crate::roster::crew::{CrewId, CrewMember};
use crate::roster::duty::Duty;
use crate::roster::feasibility::FeasibleSet;
use crate::roster::indices::RosterIndices;
use crate::roster::model::RosterModel;
use std::collections::HashMap;

/// Read-only view of everything a constraint family may consult.
/// Families hold references only; the variable tables stay owned by the
/// model builder.
pub struct ConstraintContext<'a> {
    pub duties: &'a [Duty],
    pub crew: &'a [CrewMember],
    pub crew_index: &'a HashMap<CrewId, usize>,
    pub feasible: &'a FeasibleSet,
    pub indices: &'a RosterIndices,
    pub vars: &'a RosterModel,
}

impl ConstraintContext<'_> {
    pub fn crew_member(&self, crew_id: &str) -> Option<&CrewMember> {
        self.crew_index
            .get(crew_id)
            .and_then(|index| self.crew.get(*index))
    }
}
