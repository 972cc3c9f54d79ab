use clap::ValueEnum;
use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::solver::instance::{Instance, VariableId};

/// Strategies for choosing which value of the branch variable to try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ValueOrdering {
    /// The lowest value remaining in the domain.
    Ascending,
    /// One-step lookahead: the value whose assignment would leave the fewest
    /// unsupported values across the unassigned neighbours' domains. Ties
    /// break on the lower value.
    MinConflicts,
}

impl ValueOrdering {
    /// Selects the value to try for `var`, or `None` if its domain is empty.
    /// The driver never branches on a wiped-out variable, so `None` here is
    /// a driver bug.
    pub fn select(self, instance: &Instance, var: VariableId) -> Option<i64> {
        match self {
            ValueOrdering::Ascending => instance.domain(var).get_min().copied(),
            ValueOrdering::MinConflicts => instance
                .domain(var)
                .iter()
                .map(|&val| LookaheadPair::evaluate(instance, var, val))
                .min_by_key(LookaheadPair::lost_count)
                .map(|pair| pair.val),
        }
    }
}

/// The effect one candidate assignment `var = val` would have on each
/// unassigned neighbour, split into the values that keep support and the
/// values that would lose it.
///
/// This is a single support scan per neighbour value, independent of and
/// much cheaper than running full propagation for every candidate.
#[derive(Debug, Clone)]
pub struct LookaheadPair {
    pub var: VariableId,
    pub val: i64,
    /// Per unassigned neighbour: the values still compatible with `val`.
    pub supported: Vec<(VariableId, OrdSet<i64>)>,
    /// Per unassigned neighbour: the values that `val` would strand.
    pub lost: Vec<(VariableId, OrdSet<i64>)>,
}

impl LookaheadPair {
    pub fn evaluate(instance: &Instance, var: VariableId, val: i64) -> Self {
        let mut supported = Vec::new();
        let mut lost = Vec::new();

        for &id in instance.attached(var) {
            let constraint = instance.constraint(id);
            let other = constraint.other_var(var);
            if !instance.unassigned().contains(&other) {
                continue;
            }
            // Orient the support check as the arc (var, other).
            let reversed = constraint.second() == var;
            let mut keeps = OrdSet::new();
            let mut strands = OrdSet::new();
            for &other_val in instance.domain(other) {
                if constraint.supports(reversed, val, other_val) {
                    keeps.insert(other_val);
                } else {
                    strands.insert(other_val);
                }
            }
            supported.push((other, keeps));
            lost.push((other, strands));
        }

        Self {
            var,
            val,
            supported,
            lost,
        }
    }

    /// Total number of neighbour values that would become unsupported.
    pub fn lost_count(&self) -> usize {
        self.lost.iter().map(|(_, values)| values.len()).sum()
    }
}
