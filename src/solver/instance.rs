use im::OrdSet;

use crate::error::{Error, Result};

/// Variables are identified by their index; there is no separate object.
pub type VariableId = usize;
pub type ConstraintId = usize;

/// A compatible value pair `(v1, v2)`, oriented the same way as the
/// constraint that owns it.
pub type Tuple = (i64, i64);

/// A directed variable pair used to ask whether every value of `from`'s
/// domain is still supported by some value of `to`'s domain.
///
/// Exactly one [`BinaryConstraint`] is stored per variable pair, so an arc
/// may run against the stored direction; the lookup in
/// [`Instance::constraint_for_arc`] reports which way round it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    pub from: VariableId,
    pub to: VariableId,
}

impl Arc {
    pub fn new(from: VariableId, to: VariableId) -> Self {
        debug_assert_ne!(from, to, "an arc must be between two different variables");
        Self { from, to }
    }
}

/// A binary constraint given extensionally: a directed variable pair plus
/// the set of *currently still-possible* compatible value pairs.
///
/// The tuple set shrinks as search prunes values and is restored by the
/// trail on backtracking; it is not a static copy of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryConstraint {
    first: VariableId,
    second: VariableId,
    tuples: OrdSet<Tuple>,
}

impl BinaryConstraint {
    pub fn new(first: VariableId, second: VariableId, tuples: impl IntoIterator<Item = Tuple>) -> Self {
        Self {
            first,
            second,
            tuples: tuples.into_iter().collect(),
        }
    }

    pub fn first(&self) -> VariableId {
        self.first
    }

    pub fn second(&self) -> VariableId {
        self.second
    }

    pub fn contains_var(&self, var: VariableId) -> bool {
        self.first == var || self.second == var
    }

    /// The endpoint that is not `var`. `var` must be one of the two.
    pub fn other_var(&self, var: VariableId) -> VariableId {
        if self.first == var {
            self.second
        } else {
            self.first
        }
    }

    /// How the arc `(from, to)` lies relative to the stored direction:
    /// `Some(false)` if it matches `(first, second)`, `Some(true)` if it is
    /// the reverse, `None` if this constraint does not relate the pair.
    pub fn orientation(&self, arc: &Arc) -> Option<bool> {
        if self.first == arc.from && self.second == arc.to {
            Some(false)
        } else if self.first == arc.to && self.second == arc.from {
            Some(true)
        } else {
            None
        }
    }

    /// Whether the pair `(v1, v2)`, read in arc order, is still compatible.
    /// `reversed` is the flag reported by [`BinaryConstraint::orientation`].
    pub fn supports(&self, reversed: bool, v1: i64, v2: i64) -> bool {
        let pair = if reversed { (v2, v1) } else { (v1, v2) };
        self.tuples.contains(&pair)
    }

    pub fn tuples(&self) -> &OrdSet<Tuple> {
        &self.tuples
    }

    /// Tuples that pair `val` with variable `var`, i.e. the tuples that stop
    /// being possible once `val` leaves `var`'s domain.
    pub fn tuples_using(&self, var: VariableId, val: i64) -> Vec<Tuple> {
        let second_side = self.second == var;
        self.tuples
            .iter()
            .filter(|(v1, v2)| if second_side { *v2 == val } else { *v1 == val })
            .copied()
            .collect()
    }

    pub(crate) fn remove_tuple(&mut self, tuple: &Tuple) {
        self.tuples.remove(tuple);
    }

    pub(crate) fn insert_tuple(&mut self, tuple: Tuple) {
        self.tuples.insert(tuple);
    }
}

/// The single mutable object threaded through the whole search: every
/// variable's current domain, every constraint's current tuple set, and the
/// set of variables not yet fixed by the current branch.
///
/// Domains and tuple sets are only ever mutated through the trail's record
/// methods (plus the trail's own revert), which is what makes backtracking
/// exact: the union of the live trail's prunes and the current domain always
/// equals the original domain of every variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    domains: Vec<OrdSet<i64>>,
    constraints: Vec<BinaryConstraint>,
    unassigned: OrdSet<VariableId>,
    // Constraint ids touching each variable, built once at construction.
    attached: Vec<Vec<ConstraintId>>,
}

impl Instance {
    /// Builds an instance from per-variable inclusive domain bounds and a
    /// list of constraints, rejecting malformed input before any search
    /// starts: empty initial domains, out-of-range variable references,
    /// self-referential constraints and duplicate variable pairs.
    pub fn new(bounds: &[(i64, i64)], constraints: Vec<BinaryConstraint>) -> Result<Self> {
        let count = bounds.len();
        let mut domains = Vec::with_capacity(count);
        let mut unassigned = OrdSet::new();
        for (var, &(lower, upper)) in bounds.iter().enumerate() {
            if lower > upper {
                return Err(Error::EmptyInitialDomain { var, lower, upper });
            }
            domains.push((lower..=upper).collect());
            unassigned.insert(var);
        }

        let mut attached = vec![Vec::new(); count];
        for (id, constraint) in constraints.iter().enumerate() {
            for var in [constraint.first, constraint.second] {
                if var >= count {
                    return Err(Error::VariableOutOfRange { var, count });
                }
            }
            if constraint.first == constraint.second {
                return Err(Error::SelfReferentialConstraint {
                    var: constraint.first,
                });
            }
            let duplicate = constraints[..id].iter().any(|earlier| {
                earlier.contains_var(constraint.first) && earlier.contains_var(constraint.second)
            });
            if duplicate {
                return Err(Error::DuplicateConstraint {
                    first: constraint.first,
                    second: constraint.second,
                });
            }
            attached[constraint.first].push(id);
            attached[constraint.second].push(id);
        }

        Ok(Self {
            domains,
            constraints,
            unassigned,
            attached,
        })
    }

    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub fn domain(&self, var: VariableId) -> &OrdSet<i64> {
        &self.domains[var]
    }

    pub fn constraint(&self, id: ConstraintId) -> &BinaryConstraint {
        &self.constraints[id]
    }

    pub fn constraints(&self) -> &[BinaryConstraint] {
        &self.constraints
    }

    /// Ids of the constraints touching `var`.
    pub fn attached(&self, var: VariableId) -> &[ConstraintId] {
        &self.attached[var]
    }

    pub fn unassigned(&self) -> &OrdSet<VariableId> {
        &self.unassigned
    }

    /// Whether every variable has been fixed by the current branch.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// The complete assignment vector, if every domain is a singleton.
    pub fn assignment(&self) -> Option<Vec<i64>> {
        self.domains
            .iter()
            .map(|domain| {
                if domain.len() == 1 {
                    domain.get_min().copied()
                } else {
                    None
                }
            })
            .collect()
    }

    /// Finds the constraint relating the arc's variable pair, along with the
    /// `reversed` flag describing how the arc lies against the stored
    /// direction. `None` when the two variables are unconstrained.
    pub fn constraint_for_arc(&self, arc: &Arc) -> Option<(ConstraintId, bool)> {
        self.attached[arc.from].iter().find_map(|&id| {
            self.constraints[id]
                .orientation(arc)
                .map(|reversed| (id, reversed))
        })
    }

    /// Both arcs of every constraint touching `var`, used to seed
    /// incremental propagation after the variable's domain changes.
    pub fn arcs_around(&self, var: VariableId) -> Vec<Arc> {
        let mut arcs = Vec::with_capacity(self.attached[var].len() * 2);
        for &id in &self.attached[var] {
            let constraint = &self.constraints[id];
            arcs.push(Arc::new(constraint.first, constraint.second));
            arcs.push(Arc::new(constraint.second, constraint.first));
        }
        arcs
    }

    /// Both arcs of every constraint, used for the whole-graph consistency
    /// check at the root.
    pub fn all_arcs(&self) -> Vec<Arc> {
        let mut arcs = Vec::with_capacity(self.constraints.len() * 2);
        for constraint in &self.constraints {
            arcs.push(Arc::new(constraint.first, constraint.second));
            arcs.push(Arc::new(constraint.second, constraint.first));
        }
        arcs
    }

    pub(crate) fn remove_value(&mut self, var: VariableId, val: i64) {
        self.domains[var].remove(&val);
    }

    pub(crate) fn insert_value(&mut self, var: VariableId, val: i64) {
        self.domains[var].insert(val);
    }

    pub(crate) fn remove_tuple(&mut self, id: ConstraintId, tuple: &Tuple) {
        self.constraints[id].remove_tuple(tuple);
    }

    pub(crate) fn insert_tuple(&mut self, id: ConstraintId, tuple: Tuple) {
        self.constraints[id].insert_tuple(tuple);
    }

    pub(crate) fn mark_assigned(&mut self, var: VariableId) {
        self.unassigned.remove(&var);
    }

    pub(crate) fn mark_unassigned(&mut self, var: VariableId) {
        self.unassigned.insert(var);
    }
}
