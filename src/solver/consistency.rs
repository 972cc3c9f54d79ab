use std::collections::{HashSet, VecDeque};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::solver::{
    instance::{Arc, Instance, VariableId},
    stats::SearchStats,
    trail::Trail,
};

/// The result of a revision or propagation pass.
///
/// `Wipeout` is the abort signal for an infeasible branch: it is ordinary
/// control flow, not an error, and the caller recovers by reverting the
/// enclosing trail record. The instance may be left partially revised when a
/// wipeout is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Changed,
    Wipeout,
}

impl Outcome {
    pub fn is_wipeout(self) -> bool {
        self == Outcome::Wipeout
    }

    fn merge(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::Wipeout, _) | (_, Outcome::Wipeout) => Outcome::Wipeout,
            (Outcome::Changed, _) | (_, Outcome::Changed) => Outcome::Changed,
            _ => Outcome::Unchanged,
        }
    }
}

/// One arc revision: every value of `arc.from`'s domain must be supported by
/// some value of `arc.to`'s domain under the constraint between them.
/// Unsupported values are pruned through the trail, which also strips the
/// constraint tuples they appeared in.
///
/// Counts as a single revision for statistics no matter how many values are
/// pruned. An arc between unconstrained variables revises to `Unchanged`.
pub fn revise(
    instance: &mut Instance,
    trail: &mut Trail,
    stats: &mut SearchStats,
    arc: &Arc,
) -> Outcome {
    stats.revisions_done += 1;
    let Some((id, reversed)) = instance.constraint_for_arc(arc) else {
        return Outcome::Unchanged;
    };

    let mut outcome = Outcome::Unchanged;
    let candidates: Vec<i64> = instance.domain(arc.from).iter().copied().collect();
    for v1 in candidates {
        let supported = instance
            .domain(arc.to)
            .iter()
            .any(|&v2| instance.constraint(id).supports(reversed, v1, v2));
        if !supported {
            trace!(from = arc.from, to = arc.to, val = v1, "unsupported value");
            if trail.record_prune(instance, arc.from, v1).is_wipeout() {
                return Outcome::Wipeout;
            }
            outcome = Outcome::Changed;
        }
    }
    outcome
}

/// The two propagation strategies, selected at construction time.
///
/// Both answer the same two questions: `prepare` (anything to establish
/// before search enters the tree) and `propagate` (what to re-check after a
/// variable's domain changes at a choice point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Propagation {
    /// Check each unassigned neighbour against the changed variable alone;
    /// no transitive re-checking. Cheap per node, weaker pruning.
    ForwardChecking,
    /// AC-3 to a fixed point: a whole-graph pass before search, then
    /// incremental passes seeded at the changed variable. Stronger pruning,
    /// higher constant cost.
    MaintainingArcConsistency,
}

impl Propagation {
    /// Root-level setup. MAC enforces whole-graph arc consistency before any
    /// assignment; a wipeout here means the instance has no solution and
    /// search is never entered. Forward checking needs no setup.
    pub fn prepare(self, instance: &mut Instance, trail: &mut Trail, stats: &mut SearchStats) -> Outcome {
        match self {
            Propagation::ForwardChecking => Outcome::Unchanged,
            Propagation::MaintainingArcConsistency => {
                let seed = instance.all_arcs();
                ac3(instance, trail, stats, seed)
            }
        }
    }

    /// Propagates after `var` was assigned or had a value excluded.
    /// `changed` reports whether that step actually shrank `var`'s domain.
    pub fn propagate(
        self,
        instance: &mut Instance,
        trail: &mut Trail,
        stats: &mut SearchStats,
        var: VariableId,
        changed: bool,
    ) -> Outcome {
        match self {
            Propagation::ForwardChecking => forward_check(instance, trail, stats, var),
            Propagation::MaintainingArcConsistency if changed => {
                let seed = instance.arcs_around(var);
                ac3(instance, trail, stats, seed)
            }
            Propagation::MaintainingArcConsistency => Outcome::Unchanged,
        }
    }
}

/// Forward checking: revise the arc `(y, var)` for every currently
/// unassigned `y` other than `var` itself. Shrinking `y`'s domain does not
/// trigger any further re-checking at this step.
fn forward_check(
    instance: &mut Instance,
    trail: &mut Trail,
    stats: &mut SearchStats,
    var: VariableId,
) -> Outcome {
    let future: Vec<VariableId> = instance
        .unassigned()
        .iter()
        .copied()
        .filter(|&y| y != var)
        .collect();

    let mut outcome = Outcome::Unchanged;
    for y in future {
        let revised = revise(instance, trail, stats, &Arc::new(y, var));
        if revised.is_wipeout() {
            return Outcome::Wipeout;
        }
        outcome = outcome.merge(revised);
    }
    outcome
}

/// AC-3: pop an arc, revise it, and if the revision shrank the source's
/// domain, enqueue every arc `(z, y)` whose target `y` is the variable just
/// narrowed and whose source `z` is a different neighbour of `y`. Runs to a
/// fixed point or aborts on the first wipeout.
fn ac3(
    instance: &mut Instance,
    trail: &mut Trail,
    stats: &mut SearchStats,
    seed: Vec<Arc>,
) -> Outcome {
    let mut worklist = WorkList::new();
    for arc in seed {
        worklist.push_back(arc);
    }

    let mut outcome = Outcome::Unchanged;
    while let Some(arc) = worklist.pop_front() {
        match revise(instance, trail, stats, &arc) {
            Outcome::Wipeout => return Outcome::Wipeout,
            Outcome::Changed => {
                outcome = Outcome::Changed;
                let attached = instance.attached(arc.from).to_vec();
                for id in attached {
                    let z = instance.constraint(id).other_var(arc.from);
                    if z != arc.to {
                        worklist.push_back(Arc::new(z, arc.from));
                    }
                }
            }
            Outcome::Unchanged => {}
        }
    }
    outcome
}

/// FIFO worklist of arcs with membership-based deduplication, so an arc
/// already queued for revision is not queued a second time.
struct WorkList {
    queue: VecDeque<Arc>,
    members: HashSet<Arc>,
}

impl WorkList {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            members: HashSet::new(),
        }
    }

    fn push_back(&mut self, arc: Arc) {
        if self.members.insert(arc) {
            self.queue.push_back(arc);
        }
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.members.remove(&arc);
        Some(arc)
    }
}
