//! Scenario assembly: non-overlapping agent placement by Monte-Carlo
//! rejection and truncated-normal body-parameter sampling.
//!
//! Grounded on `crowd_dynamics/parameters.py`'s `Parameters.random_position`
//! and `Parameters.agent`, and on the teacher's scenario-construction
//! idiom (`rand::thread_rng()`, `gen_range`) seen in the
//! `many_particles`/`collision` scenario builders.

use glam::DVec2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::agent::AgentStore;
use crate::config::{AgentTuning, BodyTypeConfig};
use crate::error::{SimError, SimResult};
use crate::obstacle::ObstacleStore;

/// Axis-aligned placement bounds.
#[derive(Debug, Clone, Copy)]
pub struct PlacementBounds {
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
}

impl PlacementBounds {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        DVec2::new(
            rng.gen_range(self.xlim.0..self.xlim.1),
            rng.gen_range(self.ylim.0..self.ylim.1),
        )
    }
}

/// Draws `count` non-overlapping positions for disks of the given
/// `radii` inside `bounds`, rejecting placements that overlap an
/// already-placed disk or any obstacle segment. Caps the search at
/// `100 * count` trials total, per spec.md §4.8.
pub fn random_position<R: Rng + ?Sized>(
    rng: &mut R,
    radii: &[f64],
    bounds: PlacementBounds,
    obstacles: &ObstacleStore,
) -> SimResult<Vec<DVec2>> {
    let count = radii.len();
    let mut positions: Vec<DVec2> = Vec::with_capacity(count);
    let max_trials = 100 * count.max(1);
    let mut trials = 0;

    while positions.len() < count {
        if trials >= max_trials {
            return Err(SimError::PlacementInfeasible {
                trials,
                agent_count: count,
            });
        }
        trials += 1;

        let candidate = bounds.sample(rng);
        let r = radii[positions.len()];

        let overlaps_agent = positions
            .iter()
            .zip(radii.iter())
            .any(|(&p, &pr)| (candidate - p).length() < r + pr);
        if overlaps_agent {
            continue;
        }

        let overlaps_wall = obstacles
            .iter()
            .any(|o| crate::geometry::distance_circle_line(candidate, r, o.p0, o.p1).0 < 0.0);
        if overlaps_wall {
            continue;
        }

        positions.push(candidate);
    }

    Ok(positions)
}

/// Samples `|N(mean, scale^2)|`-truncated-to-`[mean - 3*scale, mean + 3*scale]`
/// body parameters, matching `Parameters.truncnorm`'s symmetric `±3σ` cut.
fn sample_truncated<R: Rng + ?Sized>(rng: &mut R, mean: f64, scale: f64) -> f64 {
    if scale <= 0.0 {
        return mean;
    }
    let normal = Normal::new(mean, scale).expect("scale > 0 checked above");
    loop {
        let x = normal.sample(rng);
        if (x - mean).abs() <= 3.0 * scale {
            return x;
        }
    }
}

/// Builds a population of circular-model agents with non-overlapping
/// placements and truncated-normal body parameters.
pub fn build_circular_population<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    body: &BodyTypeConfig,
    tuning: &AgentTuning,
    bounds: PlacementBounds,
    obstacles: &ObstacleStore,
) -> SimResult<AgentStore> {
    let radii: Vec<f64> = (0..count)
        .map(|_| sample_truncated(rng, body.radius_mean, body.radius_scale))
        .collect();
    let positions = random_position(rng, &radii, bounds, obstacles)?;

    let mut agents = AgentStore::default();
    for (i, &position) in positions.iter().enumerate() {
        let mass = sample_truncated(rng, body.mass_mean, body.mass_scale);
        agents.push_circular(mass, radii[i], position, body.target_velocity, tuning);
    }
    Ok(agents)
}

/// Builds a population of three-circle-model agents with non-overlapping
/// torso placements, truncated-normal body parameters, and torso/shoulder
/// radii derived as fixed multiples of the sampled trunk radius.
pub fn build_three_circle_population<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    body: &BodyTypeConfig,
    tuning: &AgentTuning,
    bounds: PlacementBounds,
    obstacles: &ObstacleStore,
) -> SimResult<AgentStore> {
    let trunk_radii: Vec<f64> = (0..count)
        .map(|_| sample_truncated(rng, body.radius_mean, body.radius_scale))
        .collect();
    let positions = random_position(rng, &trunk_radii, bounds, obstacles)?;

    let mut agents = AgentStore::default();
    for (i, &position) in positions.iter().enumerate() {
        let mass = sample_truncated(rng, body.mass_mean, body.mass_scale);
        let orientation = rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
        let trunk = trunk_radii[i];
        agents.push_three_circle(
            mass,
            trunk,
            position,
            orientation,
            body.target_velocity,
            trunk * body.k_torso,
            trunk * body.k_shoulder,
            trunk * body.k_torso_shoulder,
            tuning,
            body.inertia_rot,
            body.target_angular_velocity,
        );
    }
    Ok(agents)
}
