use tracing::debug;

use crate::solver::{
    consistency::Outcome,
    instance::{ConstraintId, Instance, Tuple, VariableId},
};

/// Everything one choice point changed: the variable it assigned (if any),
/// the values it pruned from domains, and the constraint tuples those prunes
/// invalidated.
#[derive(Debug, Default)]
struct StateChange {
    assigned_var: Option<VariableId>,
    domain_prunes: Vec<(VariableId, i64)>,
    tuple_removals: Vec<(ConstraintId, Tuple)>,
}

/// The undo log that makes backtracking exact.
///
/// A record is pushed at every choice point; all mutations made between a
/// `push` and the matching `revert` go through [`Trail::record_prune`], which
/// appends to the current record. Reverting a record re-inserts every value
/// and tuple it removed and restores its assigned variable to the unassigned
/// set, leaving the instance bit-identical to just before the push.
///
/// The bottom record is the root of the search and is never popped; `revert`
/// is a no-op (with a diagnostic) once only the root remains.
#[derive(Debug, Default)]
pub struct Trail {
    entries: Vec<StateChange>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Enters a new choice point. `assigned_var` is the variable fixed by
    /// this branch, or `None` for the root record and for right ("var != val")
    /// branches, which leave the variable unassigned.
    pub fn push(&mut self, assigned_var: Option<VariableId>) {
        self.entries.push(StateChange {
            assigned_var,
            ..StateChange::default()
        });
    }

    /// Pops the current record and undoes everything it logged.
    pub fn revert(&mut self, instance: &mut Instance) {
        if self.entries.len() <= 1 {
            debug!("trail is at its root record; nothing to revert");
            return;
        }
        let record = self.entries.pop().expect("trail underflow");
        for &(var, val) in &record.domain_prunes {
            instance.insert_value(var, val);
        }
        for &(id, tuple) in &record.tuple_removals {
            instance.insert_tuple(id, tuple);
        }
        if let Some(var) = record.assigned_var {
            instance.mark_unassigned(var);
        }
    }

    /// Removes `val` from `var`'s domain, logging the prune in the current
    /// record. If the domain survives, every constraint tuple pairing `val`
    /// with `var` is removed (and logged) as well, so tuple sets always
    /// describe the still-possible pairs.
    ///
    /// Returns [`Outcome::Wipeout`] when the prune empties the domain; the
    /// instance is left as-is and the caller unwinds through `revert`.
    pub fn record_prune(&mut self, instance: &mut Instance, var: VariableId, val: i64) -> Outcome {
        debug_assert!(
            instance.domain(var).contains(&val),
            "pruning a value that is not in the domain"
        );
        instance.remove_value(var, val);
        self.current().domain_prunes.push((var, val));
        if instance.domain(var).is_empty() {
            return Outcome::Wipeout;
        }
        self.remove_invalidated_tuples(instance, var, val);
        Outcome::Changed
    }

    /// Drops every tuple that pairs the removed `val` with `var` from the
    /// constraints touching `var`, logging each removal.
    fn remove_invalidated_tuples(&mut self, instance: &mut Instance, var: VariableId, val: i64) {
        let attached = instance.attached(var).to_vec();
        for id in attached {
            let doomed = instance.constraint(id).tuples_using(var, val);
            for tuple in doomed {
                instance.remove_tuple(id, &tuple);
                self.current().tuple_removals.push((id, tuple));
            }
        }
    }

    fn current(&mut self) -> &mut StateChange {
        self.entries.last_mut().expect("trail has no current record")
    }
}
