use crate::reader::{ConstraintSpec, CspDocument};

/// Langford pairings: `k` occurrences of each number `1..=n`, arranged in a
/// sequence of `k * n` positions so the occurrences of number `m` sit
/// `m + 1` positions apart.
///
/// Variables come in `n` blocks of `k`; variable `(m - 1) * k + i` is the
/// position of the `i`-th occurrence of number `m`. Consecutive occurrences
/// are constrained to the required spacing, and every variable is
/// constrained to differ from all variables of later blocks.
pub fn langford(k: usize, n: usize) -> CspDocument {
    let seq_length = (k * n) as i64;
    let bounds = vec![(1, seq_length); k * n];

    let mut constraints = Vec::new();
    for block in 1..=n {
        for i in 0..k {
            let var = (block - 1) * k + i;
            if i < k - 1 {
                // Spacing between consecutive occurrences of this number.
                let gap = block as i64 + 1;
                let tuples: Vec<(i64, i64)> = (1..seq_length)
                    .filter(|pos| pos + gap <= seq_length)
                    .map(|pos| (pos, pos + gap))
                    .collect();
                constraints.push(ConstraintSpec {
                    first: var,
                    second: var + 1,
                    tuples,
                });
            }
            // No two occurrences may share a position with later blocks.
            for other in (block * k)..(k * n) {
                let tuples: Vec<(i64, i64)> = (1..=seq_length)
                    .flat_map(|v1| (1..=seq_length).map(move |v2| (v1, v2)))
                    .filter(|(v1, v2)| v1 != v2)
                    .collect();
                constraints.push(ConstraintSpec {
                    first: var,
                    second: other,
                    tuples,
                });
            }
        }
    }

    CspDocument {
        bounds,
        constraints,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::engine::{Solver, SolverConfig};

    #[test]
    fn l23_has_one_solution_up_to_reversal() {
        let report = Solver::new(SolverConfig::default()).solve(langford(2, 3).build().unwrap());
        // The sequence 2 3 1 2 1 3 and its mirror image.
        assert_eq!(report.solutions.len(), 2);
    }

    #[test]
    fn l22_is_unsatisfiable() {
        let report = Solver::new(SolverConfig::default()).solve(langford(2, 2).build().unwrap());
        assert!(report.solutions.is_empty());
    }

    #[test]
    fn spacing_tuples_sit_the_occurrences_apart() {
        let doc = langford(2, 3);
        let spacing = doc
            .constraints
            .iter()
            .find(|spec| spec.first == 0 && spec.second == 1)
            .unwrap();
        assert!(spacing.tuples.contains(&(1, 3)));
        assert!(!spacing.tuples.contains(&(1, 2)));
    }
}
