use crate::reader::{ConstraintSpec, CspDocument};

/// The N-Queens problem: one variable per row holding the queen's column,
/// with pairwise constraints forbidding shared columns and diagonals.
///
/// Solution counts per `n` are catalogued at <https://oeis.org/A000170>.
pub fn n_queens(n: usize) -> CspDocument {
    let bounds = vec![(0, n as i64 - 1); n];

    let mut constraints = Vec::new();
    for row1 in 0..n {
        for row2 in (row1 + 1)..n {
            let row_diff = (row2 - row1) as i64;
            let mut tuples = Vec::new();
            for col1 in 0..n as i64 {
                for col2 in 0..n as i64 {
                    if col1 != col2 && (col1 - col2).abs() != row_diff {
                        tuples.push((col1, col2));
                    }
                }
            }
            constraints.push(ConstraintSpec {
                first: row1,
                second: row2,
                tuples,
            });
        }
    }

    CspDocument {
        bounds,
        constraints,
    }
}
