use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::solver::{
    consistency::{Outcome, Propagation},
    heuristics::{value::ValueOrdering, variable::VariableOrdering},
    instance::{Instance, VariableId},
    stats::SearchStats,
    trail::Trail,
};

/// A complete assignment, one value per variable in index order.
pub type Assignment = Vec<i64>;

/// Configuration for one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// How many solutions to find before stopping; `0` finds all of them.
    pub solutions_to_find: u64,
    pub variable_ordering: VariableOrdering,
    pub value_ordering: ValueOrdering,
    pub propagation: Propagation,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solutions_to_find: 0,
            variable_ordering: VariableOrdering::Ascending,
            value_ordering: ValueOrdering::Ascending,
            propagation: Propagation::MaintainingArcConsistency,
        }
    }
}

/// Why the solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolveOutcome {
    /// The whole tree was explored.
    Exhausted,
    /// The configured solution quota was reached and search was cancelled.
    QuotaReached,
    /// The root consistency check wiped out a domain before any assignment;
    /// no search tree was entered. Only MAC performs root propagation.
    InitiallyInconsistent,
}

/// The result of a solve: every solution in discovery order, the counters,
/// and why the search stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveReport {
    pub solutions: Vec<Assignment>,
    pub stats: SearchStats,
    pub outcome: SolveOutcome,
}

impl SolveReport {
    pub fn is_satisfiable(&self) -> bool {
        !self.solutions.is_empty()
    }
}

/// The backtracking search driver.
///
/// Each step picks a variable and value, explores the left branch
/// (`var = val`) and then the right branch (`var != val`), propagating after
/// each change with the configured strategy and undoing every branch through
/// the trail. The driver is strictly single-threaded and recursive; an
/// `Instance` is owned by exactly one solve, so independent solves can run
/// on worker threads with no shared state.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs the solve to completion on its own instance.
    pub fn solve(&self, mut instance: Instance) -> SolveReport {
        let mut search = Search {
            instance: &mut instance,
            trail: Trail::new(),
            stats: SearchStats::default(),
            solutions: Vec::new(),
            config: &self.config,
        };

        // The root record brackets root-level propagation prunes.
        search.trail.push(None);

        let prepared = self.config.propagation.prepare(
            search.instance,
            &mut search.trail,
            &mut search.stats,
        );
        if prepared.is_wipeout() {
            debug!("initial instance is not arc consistent");
            return SolveReport {
                solutions: search.solutions,
                stats: search.stats,
                outcome: SolveOutcome::InitiallyInconsistent,
            };
        }

        let outcome = match search.step() {
            Control::Stop => SolveOutcome::QuotaReached,
            Control::Continue => SolveOutcome::Exhausted,
        };

        debug_assert_eq!(search.trail.depth(), 1, "trail must unwind to the root");
        SolveReport {
            solutions: search.solutions,
            stats: search.stats,
            outcome,
        }
    }
}

/// Signal threaded up the recursion: `Stop` cancels every pending branch
/// once the solution quota is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Stop,
}

struct Search<'a> {
    instance: &'a mut Instance,
    trail: Trail,
    stats: SearchStats,
    solutions: Vec<Assignment>,
    config: &'a SolverConfig,
}

impl Search<'_> {
    /// One recursive step: goal test, then the two branches for one
    /// (variable, value) choice. Returns whether to cancel the search.
    fn step(&mut self) -> Control {
        if self.instance.is_complete() {
            self.record_solution();
            let quota = self.config.solutions_to_find;
            return if quota > 0 && self.stats.solutions_found >= quota {
                Control::Stop
            } else {
                Control::Continue
            };
        }

        let Some(var) = self.config.variable_ordering.select(self.instance) else {
            unreachable!("variable selection with unassigned variables remaining");
        };
        let Some(val) = self.config.value_ordering.select(self.instance, var) else {
            unreachable!("value selection from an empty domain");
        };

        if self.left_branch(var, val) == Control::Stop {
            return Control::Stop;
        }
        self.right_branch(var, val)
    }

    /// `var = val`: prune every other value of `var`'s domain, propagate,
    /// recurse. A wipeout abandons the branch; either way the trail record
    /// is reverted before returning.
    fn left_branch(&mut self, var: VariableId, val: i64) -> Control {
        self.trail.push(Some(var));
        self.instance.mark_assigned(var);
        self.stats.nodes_explored += 1;
        debug!(var, val, "assign");

        let changed = self.assign(var, val);
        let propagated = self.config.propagation.propagate(
            self.instance,
            &mut self.trail,
            &mut self.stats,
            var,
            changed,
        );

        if propagated.is_wipeout() {
            debug!(var, val, "wipeout on left branch");
        } else if self.step() == Control::Stop {
            self.trail.revert(self.instance);
            return Control::Stop;
        }

        self.trail.revert(self.instance);
        Control::Continue
    }

    /// `var != val`: prune only `val` and, if the domain survives,
    /// propagate and recurse. The variable itself stays unassigned.
    fn right_branch(&mut self, var: VariableId, val: i64) -> Control {
        self.trail.push(None);
        self.stats.nodes_explored += 1;
        debug!(var, val, "exclude");

        let mut outcome = self.trail.record_prune(self.instance, var, val);
        if !outcome.is_wipeout() {
            outcome = self.config.propagation.propagate(
                self.instance,
                &mut self.trail,
                &mut self.stats,
                var,
                true,
            );
        }

        if outcome.is_wipeout() {
            debug!(var, val, "wipeout on right branch");
        } else if self.step() == Control::Stop {
            self.trail.revert(self.instance);
            return Control::Stop;
        }

        self.trail.revert(self.instance);
        Control::Continue
    }

    /// Prunes every value of `var`'s domain except `val`, reporting whether
    /// anything was removed. The kept value makes a wipeout here impossible
    /// unless the driver is broken.
    fn assign(&mut self, var: VariableId, val: i64) -> bool {
        let others: Vec<i64> = self
            .instance
            .domain(var)
            .iter()
            .copied()
            .filter(|&other| other != val)
            .collect();

        let mut changed = false;
        for other in others {
            if self
                .trail
                .record_prune(self.instance, var, other)
                .is_wipeout()
            {
                error!(var, val, "domain wipeout while assigning a variable");
            }
            changed = true;
        }
        changed
    }

    fn record_solution(&mut self) {
        let Some(assignment) = self.instance.assignment() else {
            unreachable!("all variables assigned but some domain is not a singleton");
        };
        debug!(?assignment, "found solution");
        self.stats.solutions_found += 1;
        self.solutions.push(assignment);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::{
        generators,
        solver::instance::{BinaryConstraint, Tuple},
    };

    fn solve_with(
        instance: Instance,
        propagation: Propagation,
        variable_ordering: VariableOrdering,
        value_ordering: ValueOrdering,
        solutions_to_find: u64,
    ) -> SolveReport {
        Solver::new(SolverConfig {
            solutions_to_find,
            variable_ordering,
            value_ordering,
            propagation,
        })
        .solve(instance)
    }

    fn all_configs() -> Vec<(Propagation, VariableOrdering, ValueOrdering)> {
        let mut configs = Vec::new();
        for propagation in [
            Propagation::ForwardChecking,
            Propagation::MaintainingArcConsistency,
        ] {
            for variable_ordering in [VariableOrdering::Ascending, VariableOrdering::SmallestDomain]
            {
                for value_ordering in [ValueOrdering::Ascending, ValueOrdering::MinConflicts] {
                    configs.push((propagation, variable_ordering, value_ordering));
                }
            }
        }
        configs
    }

    fn not_equal_tuples(values: impl Clone + IntoIterator<Item = i64>) -> Vec<Tuple> {
        values
            .clone()
            .into_iter()
            .flat_map(|a| values.clone().into_iter().map(move |b| (a, b)))
            .filter(|(a, b)| a != b)
            .collect()
    }

    /// Brute-force enumeration over the original domains and tuple lists.
    fn brute_force(bounds: &[(i64, i64)], constraints: &[BinaryConstraint]) -> Vec<Assignment> {
        let mut solutions = Vec::new();
        let mut assignment = vec![0; bounds.len()];
        enumerate(bounds, constraints, 0, &mut assignment, &mut solutions);
        solutions
    }

    fn enumerate(
        bounds: &[(i64, i64)],
        constraints: &[BinaryConstraint],
        var: usize,
        assignment: &mut Assignment,
        solutions: &mut Vec<Assignment>,
    ) {
        if var == bounds.len() {
            let ok = constraints.iter().all(|c| {
                c.tuples()
                    .contains(&(assignment[c.first()], assignment[c.second()]))
            });
            if ok {
                solutions.push(assignment.clone());
            }
            return;
        }
        for val in bounds[var].0..=bounds[var].1 {
            assignment[var] = val;
            enumerate(bounds, constraints, var + 1, assignment, solutions);
        }
    }

    fn sorted(mut solutions: Vec<Assignment>) -> Vec<Assignment> {
        solutions.sort();
        solutions
    }

    #[test]
    fn single_variable_no_constraints() {
        for (propagation, var_ord, val_ord) in all_configs() {
            let instance = Instance::new(&[(5, 5)], vec![]).unwrap();
            let report = solve_with(instance, propagation, var_ord, val_ord, 0);
            assert_eq!(report.solutions, vec![vec![5]]);
            assert_eq!(report.stats.revisions_done, 0);
            assert_eq!(report.outcome, SolveOutcome::Exhausted);
        }
    }

    #[test]
    fn four_queens_has_exactly_two_solutions_under_every_config() {
        let doc = generators::queens::n_queens(4);
        for (propagation, var_ord, val_ord) in all_configs() {
            let report = solve_with(doc.build().unwrap(), propagation, var_ord, val_ord, 0);
            assert_eq!(
                sorted(report.solutions),
                vec![vec![1, 3, 0, 2], vec![2, 0, 3, 1]],
                "config {:?}/{:?}/{:?}",
                propagation,
                var_ord,
                val_ord,
            );
        }
    }

    #[test]
    fn empty_tuple_list_is_initially_inconsistent_under_mac() {
        let instance =
            Instance::new(&[(1, 1), (1, 1)], vec![BinaryConstraint::new(0, 1, [])]).unwrap();
        let report = solve_with(
            instance,
            Propagation::MaintainingArcConsistency,
            VariableOrdering::Ascending,
            ValueOrdering::Ascending,
            0,
        );
        assert_eq!(report.outcome, SolveOutcome::InitiallyInconsistent);
        assert!(report.solutions.is_empty());
        // No search tree was entered at all.
        assert_eq!(report.stats.nodes_explored, 0);
    }

    #[test]
    fn empty_tuple_list_finds_no_solution_under_fc() {
        let instance =
            Instance::new(&[(1, 1), (1, 1)], vec![BinaryConstraint::new(0, 1, [])]).unwrap();
        let report = solve_with(
            instance,
            Propagation::ForwardChecking,
            VariableOrdering::Ascending,
            ValueOrdering::Ascending,
            0,
        );
        assert_eq!(report.outcome, SolveOutcome::Exhausted);
        assert!(report.solutions.is_empty());
    }

    #[test]
    fn pairwise_all_different_pigeonhole_is_unsatisfiable() {
        for propagation in [
            Propagation::ForwardChecking,
            Propagation::MaintainingArcConsistency,
        ] {
            let tuples = not_equal_tuples(1..=2);
            let constraints = vec![
                BinaryConstraint::new(0, 1, tuples.clone()),
                BinaryConstraint::new(1, 2, tuples.clone()),
                BinaryConstraint::new(0, 2, tuples),
            ];
            let instance = Instance::new(&[(1, 2), (1, 2), (1, 2)], constraints).unwrap();
            let report = solve_with(
                instance,
                propagation,
                VariableOrdering::Ascending,
                ValueOrdering::Ascending,
                0,
            );
            assert!(report.solutions.is_empty());
            assert!(report.stats.revisions_done > 0);
            assert!(report.stats.nodes_explored > 0);
        }
    }

    #[test]
    fn quota_cuts_the_search_short() {
        let doc = generators::queens::n_queens(4);
        let full = solve_with(
            doc.build().unwrap(),
            Propagation::MaintainingArcConsistency,
            VariableOrdering::Ascending,
            ValueOrdering::Ascending,
            0,
        );
        let quota = solve_with(
            doc.build().unwrap(),
            Propagation::MaintainingArcConsistency,
            VariableOrdering::Ascending,
            ValueOrdering::Ascending,
            1,
        );
        assert_eq!(full.solutions.len(), 2);
        assert_eq!(quota.solutions.len(), 1);
        assert_eq!(quota.outcome, SolveOutcome::QuotaReached);
        assert_eq!(quota.solutions[0], full.solutions[0]);
        assert!(quota.stats.nodes_explored < full.stats.nodes_explored);
    }

    #[test]
    fn solutions_satisfy_the_original_constraints() {
        let doc = generators::queens::n_queens(5);
        let instance = doc.build().unwrap();
        let constraints = instance.constraints().to_vec();
        let report = solve_with(
            instance,
            Propagation::ForwardChecking,
            VariableOrdering::SmallestDomain,
            ValueOrdering::MinConflicts,
            0,
        );
        assert_eq!(report.solutions.len(), 10);
        for solution in &report.solutions {
            for constraint in &constraints {
                assert!(constraint
                    .tuples()
                    .contains(&(solution[constraint.first()], solution[constraint.second()])));
            }
        }
    }

    fn arbitrary_instance() -> impl Strategy<
        Value = (Vec<(i64, i64)>, Vec<BinaryConstraint>),
    > {
        (2usize..=4).prop_flat_map(|n| {
            let bounds = prop::collection::vec((0i64..2, 0i64..3), n)
                .prop_map(|raw| raw.into_iter().map(|(lb, w)| (lb, lb + w)).collect::<Vec<_>>());
            let pairs: Vec<(usize, usize)> = (0..n)
                .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
                .collect();
            let tuple_sets = prop::collection::vec(
                prop::collection::vec((0i64..5, 0i64..5), 0..8),
                pairs.len(),
            );
            let mask = prop::collection::vec(any::<bool>(), pairs.len());
            (bounds, tuple_sets, mask).prop_map(move |(bounds, tuple_sets, mask)| {
                let constraints = pairs
                    .iter()
                    .zip(tuple_sets)
                    .zip(mask)
                    .filter(|(_, keep)| *keep)
                    .map(|(((i, j), tuples), _)| BinaryConstraint::new(*i, *j, tuples))
                    .collect();
                (bounds, constraints)
            })
        })
    }

    proptest! {
        /// Full search under either strategy finds exactly the brute-force
        /// solution set; propagation strength never affects correctness.
        #[test]
        fn both_strategies_match_brute_force((bounds, constraints) in arbitrary_instance()) {
            let expected = sorted(brute_force(&bounds, &constraints));
            for propagation in [
                Propagation::ForwardChecking,
                Propagation::MaintainingArcConsistency,
            ] {
                let instance = Instance::new(&bounds, constraints.clone()).unwrap();
                let report = solve_with(
                    instance,
                    propagation,
                    VariableOrdering::Ascending,
                    ValueOrdering::Ascending,
                    0,
                );
                prop_assert_eq!(sorted(report.solutions), expected.clone());
            }
        }
    }
}
