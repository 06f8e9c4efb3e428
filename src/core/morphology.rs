//! Binary morphology for mask cleanup: closing to bridge speckle-sized gaps
//! along the coastline, hole filling for enclosed water misclassifications,
//! and dilation to buffer the coast against bright near-shore returns.
//!
//! All operations use the 4-connected cross neighborhood. Dilation treats
//! pixels outside the array as unmasked; erosion treats them as masked, so
//! closing does not open gaps along the scene edge.

use std::collections::VecDeque;

use ndarray::Array2;

pub fn binary_dilation(mask: &Array2<bool>, iterations: usize) -> Array2<bool> {
    let (rows, cols) = mask.dim();
    let mut current = mask.clone();
    for _ in 0..iterations {
        let mut next = current.clone();
        for r in 0..rows {
            for c in 0..cols {
                if current[[r, c]] {
                    continue;
                }
                let neighbor = (r > 0 && current[[r - 1, c]])
                    || (r + 1 < rows && current[[r + 1, c]])
                    || (c > 0 && current[[r, c - 1]])
                    || (c + 1 < cols && current[[r, c + 1]]);
                if neighbor {
                    next[[r, c]] = true;
                }
            }
        }
        current = next;
    }
    current
}

pub fn binary_erosion(mask: &Array2<bool>, iterations: usize) -> Array2<bool> {
    let (rows, cols) = mask.dim();
    let mut current = mask.clone();
    for _ in 0..iterations {
        let mut next = current.clone();
        for r in 0..rows {
            for c in 0..cols {
                if !current[[r, c]] {
                    continue;
                }
                let gap = (r > 0 && !current[[r - 1, c]])
                    || (r + 1 < rows && !current[[r + 1, c]])
                    || (c > 0 && !current[[r, c - 1]])
                    || (c + 1 < cols && !current[[r, c + 1]]);
                if gap {
                    next[[r, c]] = false;
                }
            }
        }
        current = next;
    }
    current
}

/// Dilation followed by erosion with the same iteration count.
pub fn binary_closing(mask: &Array2<bool>, iterations: usize) -> Array2<bool> {
    binary_erosion(&binary_dilation(mask, iterations), iterations)
}

/// Set every unmasked region not connected to the array border to masked.
/// On a land mask this removes lakes and misclassified inland water, which
/// would otherwise survive as false "ocean" islands inside the coastline.
pub fn fill_holes(mask: &Array2<bool>) -> Array2<bool> {
    let (rows, cols) = mask.dim();
    let mut reachable = Array2::from_elem((rows, cols), false);
    let mut queue = VecDeque::new();

    let seed = |r: usize, c: usize, queue: &mut VecDeque<(usize, usize)>| {
        if !mask[[r, c]] {
            queue.push_back((r, c));
        }
    };
    for c in 0..cols {
        seed(0, c, &mut queue);
        seed(rows - 1, c, &mut queue);
    }
    for r in 0..rows {
        seed(r, 0, &mut queue);
        seed(r, cols - 1, &mut queue);
    }

    while let Some((r, c)) = queue.pop_front() {
        if reachable[[r, c]] {
            continue;
        }
        reachable[[r, c]] = true;
        if r > 0 && !mask[[r - 1, c]] && !reachable[[r - 1, c]] {
            queue.push_back((r - 1, c));
        }
        if r + 1 < rows && !mask[[r + 1, c]] && !reachable[[r + 1, c]] {
            queue.push_back((r + 1, c));
        }
        if c > 0 && !mask[[r, c - 1]] && !reachable[[r, c - 1]] {
            queue.push_back((r, c - 1));
        }
        if c + 1 < cols && !mask[[r, c + 1]] && !reachable[[r, c + 1]] {
            queue.push_back((r, c + 1));
        }
    }

    let mut filled = mask.clone();
    for r in 0..rows {
        for c in 0..cols {
            if !mask[[r, c]] && !reachable[[r, c]] {
                filled[[r, c]] = true;
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dilation_grows_the_coast() {
        let mask = array![
            [false, false, false],
            [false, true, false],
            [false, false, false],
        ];
        let grown = binary_dilation(&mask, 1);
        assert_eq!(
            grown,
            array![
                [false, true, false],
                [true, true, true],
                [false, true, false],
            ]
        );
    }

    #[test]
    fn dilation_zero_iterations_is_identity() {
        let mask = array![[true, false], [false, false]];
        assert_eq!(binary_dilation(&mask, 0), mask);
    }

    #[test]
    fn closing_bridges_single_pixel_gaps() {
        let mask = array![
            [true, true, true, true, true],
            [true, true, false, true, true],
            [true, true, true, true, true],
        ];
        let closed = binary_closing(&mask, 1);
        assert!(closed[[1, 2]]);
    }

    #[test]
    fn closing_preserves_open_water() {
        // A wide channel must not be closed over.
        let mask = array![
            [true, false, false, false, true],
            [true, false, false, false, true],
            [true, false, false, false, true],
        ];
        let closed = binary_closing(&mask, 1);
        assert!(!closed[[1, 2]]);
    }

    #[test]
    fn fill_holes_fills_enclosed_water_only() {
        let mask = array![
            [true, true, true, true, false],
            [true, false, false, true, false],
            [true, true, true, true, false],
        ];
        let filled = fill_holes(&mask);
        // Enclosed hole becomes land; border-connected water survives.
        assert!(filled[[1, 1]]);
        assert!(filled[[1, 2]]);
        assert!(!filled[[0, 4]]);
        assert!(!filled[[1, 4]]);
    }

    #[test]
    fn erosion_keeps_scene_edges() {
        let mask = array![
            [true, true, true],
            [true, true, true],
            [true, true, true],
        ];
        assert_eq!(binary_erosion(&mask, 1), mask);
    }
}
