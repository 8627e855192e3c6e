use crate::consts::PIVOT_EPSILON;

/// Solve the dense 3x3 system `a * x = b`.
///
/// Gauss-Jordan elimination with partial pivoting: each column swaps in the
/// row with the largest-magnitude candidate pivot. Returns `None` as soon as
/// a pivot falls below [`PIVOT_EPSILON`], so near-singular systems never
/// divide by a vanishing value.
pub fn solve3x3(a: [[f64; 3]; 3], b: [f64; 3]) -> Option<[f64; 3]> {
    let mut aug = [[0.0f64; 4]; 3];
    for (row, aug_row) in aug.iter_mut().enumerate() {
        aug_row[..3].copy_from_slice(&a[row]);
        aug_row[3] = b[row];
    }

    for col in 0..3 {
        let pivot = (col..3)
            .max_by(|&r1, &r2| aug[r1][col].abs().total_cmp(&aug[r2][col].abs()))
            .unwrap_or(col);
        aug.swap(col, pivot);

        let p = aug[col][col];
        if !(p.abs() >= PIVOT_EPSILON) {
            return None;
        }

        for row in 0..3 {
            if row == col {
                continue;
            }
            let factor = aug[row][col] / p;
            for j in col..4 {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    let x = [
        aug[0][3] / aug[0][0],
        aug[1][3] / aug[1][1],
        aug[2][3] / aug[2][2],
    ];
    x.iter().all(|v| v.is_finite()).then_some(x)
}
