//! Static navigation field: an Eikonal-solved distance-to-target map
//! blended with a distance-to-obstacle map into a single merged
//! direction field agents look up by position.
//!
//! The "Eikonal solver" here is a multi-source Dijkstra search over the
//! 8-connected grid graph rather than a true fast-marching front; per
//! spec.md §9 this is an explicitly conforming substitute ("Dijkstra on
//! grid graph with 8-neighbor heuristic") as long as it stays within
//! one grid-step of the continuous solution, which a shortest-path
//! search over unit/diagonal edge weights does.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::DVec2;
use tracing::instrument;

use crate::error::{SimError, SimResult};
use crate::obstacle::ObstacleStore;

const SQRT2: f64 = std::f64::consts::SQRT_2;

/// Regular grid geometry shared by every field stored on it.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    pub origin: DVec2,
    pub step: f64,
    pub nx: usize,
    pub ny: usize,
}

impl Grid {
    fn len(&self) -> usize {
        self.nx * self.ny
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.nx + col
    }

    /// Maps a world position to a clamped `(row, col)` grid index.
    pub fn point_to_cell(&self, p: DVec2) -> (usize, usize) {
        let rel = (p - self.origin) / self.step;
        let col = rel.x.round().clamp(0.0, (self.nx - 1) as f64) as usize;
        let row = rel.y.round().clamp(0.0, (self.ny - 1) as f64) as usize;
        (row, col)
    }

    fn cell_center(&self, row: usize, col: usize) -> DVec2 {
        self.origin + DVec2::new(col as f64, row as f64) * self.step
    }
}

/// A static navigation field: distance-to-target, distance-to-obstacle,
/// and the merged direction field agents query each step.
#[derive(Debug, Clone)]
pub struct NavigationField {
    pub grid: Grid,
    pub distance_to_target: Vec<f64>,
    pub distance_to_obstacle: Vec<f64>,
    pub direction: Vec<DVec2>,
}

impl NavigationField {
    /// Builds the static navigation field over `[min, max]` with grid
    /// step `step`. `targets` and `obstacles` are line segments in
    /// world coordinates; `radius`/`value` control the obstacle-
    /// avoidance blend of spec.md §4.7/§4.9.
    #[instrument(level = "trace", skip_all)]
    pub fn build(
        min: DVec2,
        max: DVec2,
        step: f64,
        targets: &[(DVec2, DVec2)],
        obstacles: &ObstacleStore,
        radius: f64,
        value: f64,
    ) -> SimResult<Self> {
        if step <= 0.0 {
            return Err(SimError::DomainInvalid {
                reason: "navigation step must be positive".into(),
            });
        }
        if max.x <= min.x || max.y <= min.y {
            return Err(SimError::DomainInvalid {
                reason: "domain bounding box has zero or negative area".into(),
            });
        }

        let nx = ((max.x - min.x) / step).round() as usize + 1;
        let ny = ((max.y - min.y) / step).round() as usize + 1;
        let grid = Grid {
            origin: min,
            step,
            nx,
            ny,
        };

        let target_mask = rasterize_segments(&grid, targets.iter().copied());
        let obstacle_segments: Vec<(DVec2, DVec2)> =
            obstacles.iter().map(|o| (o.p0, o.p1)).collect();
        let obstacle_mask = rasterize_segments(&grid, obstacle_segments.iter().copied());

        if !target_mask.iter().any(|&m| m) {
            return Err(SimError::DomainInvalid {
                reason: "no target cells rasterized onto the navigation grid".into(),
            });
        }

        let distance_to_target = eikonal_distance(&grid, &target_mask, &obstacle_mask);
        let distance_to_obstacle = eikonal_distance(&grid, &obstacle_mask, &vec![false; grid.len()]);

        let dir_targets = direction_map(&grid, &distance_to_target);
        let dir_obstacles = direction_map(&grid, &distance_to_obstacle);
        let direction = merge_direction_maps(&distance_to_obstacle, &dir_obstacles, &dir_targets, radius, value);

        Ok(Self {
            grid,
            distance_to_target,
            distance_to_obstacle,
            direction,
        })
    }

    /// Looks up the merged direction at `position`, clamping to the
    /// grid bounds so an agent at the domain edge never indexes out of
    /// range.
    pub fn lookup(&self, position: DVec2) -> DVec2 {
        let (row, col) = self.grid.point_to_cell(position);
        self.direction[self.grid.index(row, col)]
    }
}

/// Marks every grid cell a segment passes through by sampling densely
/// along its length (>= 4 samples per grid step), mirroring
/// `skimage.draw.line`'s role in the original rasterizer.
fn rasterize_segments(grid: &Grid, segments: impl Iterator<Item = (DVec2, DVec2)>) -> Vec<bool> {
    let mut mask = vec![false; grid.len()];
    for (p0, p1) in segments {
        let length = (p1 - p0).length();
        let samples = ((length / grid.step).ceil() as usize * 4).max(1);
        for s in 0..=samples {
            let t = s as f64 / samples as f64;
            let p = p0.lerp(p1, t);
            let (row, col) = grid.point_to_cell(p);
            mask[grid.index(row, col)] = true;
        }
    }
    mask
}

#[derive(Copy, Clone, PartialEq)]
struct HeapEntry {
    dist: f64,
    index: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest distance.
        other.dist.partial_cmp(&self.dist).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Multi-source shortest-path distance over the 8-connected grid graph,
/// zero at `sources`, `f64::INFINITY` where unreachable or `blocked`.
fn eikonal_distance(grid: &Grid, sources: &[bool], blocked: &[bool]) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; grid.len()];
    let mut heap = BinaryHeap::new();

    for (i, &is_source) in sources.iter().enumerate() {
        if is_source && !blocked[i] {
            dist[i] = 0.0;
            heap.push(HeapEntry { dist: 0.0, index: i });
        }
    }

    const NEIGHBORS: [(i64, i64, f64); 8] = [
        (1, 0, 1.0),
        (-1, 0, 1.0),
        (0, 1, 1.0),
        (0, -1, 1.0),
        (1, 1, SQRT2),
        (1, -1, SQRT2),
        (-1, 1, SQRT2),
        (-1, -1, SQRT2),
    ];

    while let Some(HeapEntry { dist: d, index }) = heap.pop() {
        if d > dist[index] {
            continue;
        }
        let row = (index / grid.nx) as i64;
        let col = (index % grid.nx) as i64;

        for &(dr, dc, weight) in &NEIGHBORS {
            let nr = row + dr;
            let nc = col + dc;
            if nr < 0 || nc < 0 || nr as usize >= grid.ny || nc as usize >= grid.nx {
                continue;
            }
            let n_index = grid.index(nr as usize, nc as usize);
            if blocked[n_index] {
                continue;
            }
            let candidate = d + weight * grid.step;
            if candidate < dist[n_index] {
                dist[n_index] = candidate;
                heap.push(HeapEntry {
                    dist: candidate,
                    index: n_index,
                });
            }
        }
    }

    dist
}

/// Normalized negative gradient of `field` by centered differences,
/// falling back to one-sided differences at the grid boundary or next
/// to an infinite (unreachable) neighbor. Zero-magnitude gradients map
/// to the zero vector.
fn direction_map(grid: &Grid, field: &[f64]) -> Vec<DVec2> {
    let mut out = vec![DVec2::ZERO; grid.len()];
    for row in 0..grid.ny {
        for col in 0..grid.nx {
            let idx = grid.index(row, col);
            if !field[idx].is_finite() {
                continue;
            }
            let dx = partial_derivative(grid, field, row, col, 0, 1);
            let dy = partial_derivative(grid, field, row, col, 1, 0);
            let grad = DVec2::new(dx, dy);
            let len = grad.length();
            out[idx] = if len > 0.0 { -grad / len } else { DVec2::ZERO };
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn partial_derivative(
    grid: &Grid,
    field: &[f64],
    row: usize,
    col: usize,
    d_row: i64,
    d_col: i64,
) -> f64 {
    let forward = step_value(grid, field, row, col, d_row, d_col);
    let backward = step_value(grid, field, row, col, -d_row, -d_col);
    let here = field[grid.index(row, col)];

    match (forward, backward) {
        (Some(f), Some(b)) => (f - b) / (2.0 * grid.step),
        (Some(f), None) => (f - here) / grid.step,
        (None, Some(b)) => (here - b) / grid.step,
        (None, None) => 0.0,
    }
}

fn step_value(
    grid: &Grid,
    field: &[f64],
    row: usize,
    col: usize,
    d_row: i64,
    d_col: i64,
) -> Option<f64> {
    let nr = row as i64 + d_row;
    let nc = col as i64 + d_col;
    if nr < 0 || nc < 0 || nr as usize >= grid.ny || nc as usize >= grid.nx {
        return None;
    }
    let v = field[grid.index(nr as usize, nc as usize)];
    v.is_finite().then_some(v)
}

/// Blends the obstacle-avoidance and target direction maps: near
/// obstacles (`|phi| < 1.1*radius`) the merged direction leans on a
/// decreasing-strength obstacle term; further away it is pure target
/// direction. Matches `merge_dir_maps` in the original navigation
/// module.
fn merge_direction_maps(
    distance_to_obstacle: &[f64],
    dir_obstacles: &[DVec2],
    dir_targets: &[DVec2],
    radius: f64,
    value: f64,
) -> Vec<DVec2> {
    let mut merged = dir_targets.to_vec();
    if radius <= 0.0 {
        return merged;
    }
    for i in 0..merged.len() {
        let phi = distance_to_obstacle[i];
        if !phi.is_finite() {
            continue;
        }
        let x = phi.abs();
        if x < 1.1 * radius {
            let k = value.powf(x / radius);
            merged[i] = -k * dir_obstacles[i] + (1.0 - k) * dir_targets[i];
        }
    }
    merged
}
