use ndarray::Array2;

/// Statistics for a single 4-connected component of a binary mask.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentStats {
    /// Number of pixels in the component.
    pub area: usize,
    /// Sum of column indices over the component's pixels.
    pub sum_col: f64,
    /// Sum of row indices over the component's pixels.
    pub sum_row: f64,
    /// Bounding box: (min_row, max_row, min_col, max_col).
    pub bbox: (usize, usize, usize, usize),
}

impl ComponentStats {
    /// Unweighted centroid as `(x, y)` = `(col, row)`.
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.area.max(1) as f64;
        (self.sum_col / n, self.sum_row / n)
    }
}

/// Find the largest 4-connected component of `true` pixels.
///
/// Uses an iterative flood fill over an explicit stack bounded by `h * w`.
/// Components are discovered in row-major order; on equal areas the one
/// found first wins. Returns `None` for a mask with no `true` pixels.
pub fn largest_component(mask: &Array2<bool>) -> Option<ComponentStats> {
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return None;
    }

    let mut visited = Array2::<bool>::from_elem((h, w), false);
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(h * w);
    let mut best: Option<ComponentStats> = None;

    for start_row in 0..h {
        for start_col in 0..w {
            if !mask[[start_row, start_col]] || visited[[start_row, start_col]] {
                continue;
            }

            let mut stats = ComponentStats {
                area: 0,
                sum_col: 0.0,
                sum_row: 0.0,
                bbox: (start_row, start_row, start_col, start_col),
            };
            visited[[start_row, start_col]] = true;
            stack.push((start_row, start_col));

            while let Some((row, col)) = stack.pop() {
                stats.area += 1;
                stats.sum_row += row as f64;
                stats.sum_col += col as f64;
                stats.bbox.0 = stats.bbox.0.min(row);
                stats.bbox.1 = stats.bbox.1.max(row);
                stats.bbox.2 = stats.bbox.2.min(col);
                stats.bbox.3 = stats.bbox.3.max(col);

                if col > 0 {
                    push_if_unvisited(mask, &mut visited, &mut stack, row, col - 1);
                }
                if col + 1 < w {
                    push_if_unvisited(mask, &mut visited, &mut stack, row, col + 1);
                }
                if row > 0 {
                    push_if_unvisited(mask, &mut visited, &mut stack, row - 1, col);
                }
                if row + 1 < h {
                    push_if_unvisited(mask, &mut visited, &mut stack, row + 1, col);
                }
            }

            if best.as_ref().map_or(true, |b| stats.area > b.area) {
                best = Some(stats);
            }
        }
    }

    best
}

fn push_if_unvisited(
    mask: &Array2<bool>,
    visited: &mut Array2<bool>,
    stack: &mut Vec<(usize, usize)>,
    row: usize,
    col: usize,
) {
    if mask[[row, col]] && !visited[[row, col]] {
        visited[[row, col]] = true;
        stack.push((row, col));
    }
}
