use crate::reader::{ConstraintSpec, CspDocument};

/// A blank 9x9 Sudoku grid: 81 variables over `1..=9` with not-equal
/// constraints over every row, column and 3x3 subsquare pair.
///
/// Subsquare pairs that already share a row or column are skipped, since
/// the row and column passes cover them; exactly one constraint is stored
/// per cell pair.
pub fn blank_sudoku() -> CspDocument {
    let bounds = vec![(1, 9); 81];
    let mut constraints = Vec::new();

    // Rows.
    for row in 0..9 {
        for col1 in 0..8 {
            for col2 in (col1 + 1)..9 {
                constraints.push(not_equal(cell(row, col1), cell(row, col2)));
            }
        }
    }

    // Columns.
    for col in 0..9 {
        for row1 in 0..8 {
            for row2 in (row1 + 1)..9 {
                constraints.push(not_equal(cell(row1, col), cell(row2, col)));
            }
        }
    }

    // 3x3 subsquares, skipping pairs already covered above.
    for sub_row in (0..9).step_by(3) {
        for sub_col in (0..9).step_by(3) {
            let cells: Vec<usize> = (sub_row..sub_row + 3)
                .flat_map(|row| (sub_col..sub_col + 3).map(move |col| cell(row, col)))
                .collect();
            for (i, &a) in cells.iter().enumerate() {
                for &b in &cells[i + 1..] {
                    if a / 9 != b / 9 && a % 9 != b % 9 {
                        constraints.push(not_equal(a, b));
                    }
                }
            }
        }
    }

    CspDocument {
        bounds,
        constraints,
    }
}

fn cell(row: usize, col: usize) -> usize {
    row * 9 + col
}

fn not_equal(first: usize, second: usize) -> ConstraintSpec {
    let tuples = (1..=9)
        .flat_map(|v1| (1..=9).map(move |v2| (v1, v2)))
        .filter(|(v1, v2)| v1 != v2)
        .collect();
    ConstraintSpec {
        first,
        second,
        tuples,
    }
}
