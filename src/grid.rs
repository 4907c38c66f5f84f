//! Uniform-grid spatial partition ("block list"): buckets agents into
//! square cells and enumerates near-pairs in a deterministic order so
//! the interaction driver visits the same pairs regardless of thread
//! count (spec.md §4.5, §5 Determinism).

use std::collections::HashMap;

use glam::DVec2;

/// Integer cell coordinate.
pub type CellIndex = (i64, i64);

/// A rebuilt-per-step uniform grid over a snapshot of agent positions.
#[derive(Debug, Clone)]
pub struct BlockList {
    cell_size: f64,
    /// Agent indices bucketed by cell, each bucket kept in ascending
    /// agent-index order.
    cells: HashMap<CellIndex, Vec<usize>>,
}

fn cell_of(position: DVec2, cell_size: f64) -> CellIndex {
    (
        (position.x / cell_size).floor() as i64,
        (position.y / cell_size).floor() as i64,
    )
}

impl BlockList {
    /// Builds a block list sized so that `cell_size` is at least
    /// `2*max_radius + sight_soc`, guaranteeing that every pair
    /// interaction within sight lies in the 3x3 neighborhood of an
    /// agent's own cell.
    pub fn build(positions: &[DVec2], active: &[bool], cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        let mut cells: HashMap<CellIndex, Vec<usize>> = HashMap::new();
        for (i, &pos) in positions.iter().enumerate() {
            if !active.get(i).copied().unwrap_or(true) {
                continue;
            }
            cells.entry(cell_of(pos, cell_size)).or_default().push(i);
        }
        for bucket in cells.values_mut() {
            bucket.sort_unstable();
        }
        Self { cells, cell_size }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cell_of(&self, position: DVec2) -> CellIndex {
        cell_of(position, self.cell_size)
    }

    /// Enumerates agent-agent pairs `(i, j)` with `i < j`, deterministic
    /// given the same positions: cells are visited in row-major order,
    /// and for each cell, the (>= current cell, row-major) half of its
    /// 3x3 neighborhood is visited to avoid double-counting.
    pub fn enumerate_pairs(&self) -> Vec<(usize, usize)> {
        let mut cell_keys: Vec<CellIndex> = self.cells.keys().copied().collect();
        cell_keys.sort_unstable();

        let mut pairs = Vec::new();
        for &c in &cell_keys {
            let bucket = &self.cells[&c];
            for &neighbor in &neighborhood_at_or_after(c) {
                if neighbor == c {
                    for (a, &i) in bucket.iter().enumerate() {
                        for &j in &bucket[a + 1..] {
                            pairs.push((i, j));
                        }
                    }
                } else if let Some(other) = self.cells.get(&neighbor) {
                    for &i in bucket {
                        for &j in other {
                            let (lo, hi) = if i < j { (i, j) } else { (j, i) };
                            pairs.push((lo, hi));
                        }
                    }
                }
            }
        }
        pairs
    }
}

/// The 5 neighbor offsets (of the full 3x3 neighborhood) that come at
/// or after `c` in row-major order, i.e. `(dy, dx)` with
/// `dy > 0 || (dy == 0 && dx >= 0)`.
fn neighborhood_at_or_after(c: CellIndex) -> [CellIndex; 5] {
    let (x, y) = c;
    [
        (x, y),
        (x + 1, y),
        (x - 1, y + 1),
        (x, y + 1),
        (x + 1, y + 1),
    ]
}

/// Brute-force O(N^2) pair enumerator. Must produce the same multiset
/// of pairs as [`BlockList::enumerate_pairs`] for any input (spec.md
/// §8, testable property 4).
pub fn enumerate_pairs_brute(active: &[bool]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let indices: Vec<usize> = active
        .iter()
        .enumerate()
        .filter_map(|(i, &a)| a.then_some(i))
        .collect();
    for (a, &i) in indices.iter().enumerate() {
        for &j in &indices[a + 1..] {
            pairs.push((i, j));
        }
    }
    pairs
}
