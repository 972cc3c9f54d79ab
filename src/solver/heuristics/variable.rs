use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::solver::instance::{Instance, VariableId};

/// Strategies for choosing which unassigned variable to branch on next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VariableOrdering {
    /// The lowest-indexed unassigned variable.
    Ascending,
    /// The unassigned variable with the fewest remaining values (minimum
    /// remaining values, a fail-first strategy). Ties break on the lower
    /// index for determinism.
    SmallestDomain,
}

impl VariableOrdering {
    /// Selects the next variable to branch on, or `None` when every variable
    /// is assigned. The driver only asks while unassigned variables remain,
    /// so a `None` there is a driver bug, not a data condition.
    pub fn select(self, instance: &Instance) -> Option<VariableId> {
        match self {
            VariableOrdering::Ascending => instance.unassigned().get_min().copied(),
            VariableOrdering::SmallestDomain => instance
                .unassigned()
                .iter()
                .copied()
                .min_by_key(|&var| (instance.domain(var).len(), var)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::{instance::Instance, trail::Trail};

    fn instance() -> Instance {
        Instance::new(&[(0, 3), (0, 1), (0, 2)], vec![]).unwrap()
    }

    #[test]
    fn ascending_picks_the_lowest_index() {
        let mut instance = instance();
        assert_eq!(VariableOrdering::Ascending.select(&instance), Some(0));
        instance.mark_assigned(0);
        assert_eq!(VariableOrdering::Ascending.select(&instance), Some(1));
    }

    #[test]
    fn smallest_domain_prefers_fewest_remaining_values() {
        let instance = instance();
        assert_eq!(VariableOrdering::SmallestDomain.select(&instance), Some(1));
    }

    #[test]
    fn smallest_domain_ties_break_on_the_lower_index() {
        let mut instance = Instance::new(&[(0, 1), (5, 6)], vec![]).unwrap();
        assert_eq!(VariableOrdering::SmallestDomain.select(&instance), Some(0));
        instance.mark_assigned(0);
        instance.mark_assigned(1);
        assert_eq!(VariableOrdering::SmallestDomain.select(&instance), None);
    }

    #[test]
    fn selection_tracks_domain_prunes() {
        let mut instance = instance();
        let mut trail = Trail::new();
        trail.push(None);
        trail.record_prune(&mut instance, 0, 0);
        trail.record_prune(&mut instance, 0, 1);
        trail.record_prune(&mut instance, 0, 2);
        // Var 0 is down to one value, beating var 1's two.
        assert_eq!(VariableOrdering::SmallestDomain.select(&instance), Some(0));
    }
}
