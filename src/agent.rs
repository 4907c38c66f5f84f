//! Structure-of-arrays agent store.
//!
//! Mirrors the `translational`/`rotational`/`three_circle` field groups
//! of the original `crowddynamics.core.agent.agents` dtypes, but as a
//! plain Rust struct of `Vec`s rather than a numpy structured array.
//! The whole population shares one [`BodyModel`]; `active` agents are
//! the only ones visited by [`AgentStore::active_indices`].

use glam::DVec2;

use crate::error::{SimError, SimResult};
use crate::vector::rotate270;

/// Whole-population body-model tag. All agents in one [`AgentStore`]
/// share the same model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyModel {
    Circular,
    ThreeCircle,
}

/// Fixed per-agent geometric/dynamic parameters plus mutable motion
/// state, stored column-wise so the interaction driver can iterate
/// cache-friendly per field.
#[derive(Debug, Clone, Default)]
pub struct AgentStore {
    pub model: Option<BodyModel>,

    // Translational, always populated.
    pub mass: Vec<f64>,
    pub radius: Vec<f64>,
    pub position: Vec<DVec2>,
    pub velocity: Vec<DVec2>,
    pub target_velocity: Vec<f64>,
    pub target_direction: Vec<DVec2>,
    pub force: Vec<DVec2>,
    pub tau_adj: Vec<f64>,
    pub k_soc: Vec<f64>,
    pub tau_0: Vec<f64>,
    pub mu: Vec<f64>,
    pub kappa: Vec<f64>,
    pub damping: Vec<f64>,
    pub std_rand_force: Vec<f64>,
    pub sight_soc: Vec<f64>,
    pub sight_wall: Vec<f64>,
    pub force_social_max: Vec<f64>,
    pub force_wall_max: Vec<f64>,
    pub active: Vec<bool>,

    // Rotational, populated only for BodyModel::ThreeCircle.
    pub inertia_rot: Vec<f64>,
    pub orientation: Vec<f64>,
    pub angular_velocity: Vec<f64>,
    pub target_orientation: Vec<f64>,
    pub target_angular_velocity: Vec<f64>,
    pub torque: Vec<f64>,
    pub tau_rot: Vec<f64>,
    pub std_rand_torque: Vec<f64>,
    pub r_torso: Vec<f64>,
    pub r_shoulder: Vec<f64>,
    pub r_torso_shoulder: Vec<f64>,

    // Optional k-nearest-neighbor bookkeeping (spec.md §4.4 step 5).
    pub neighbors: Vec<Vec<usize>>,
    pub neighbor_distances: Vec<Vec<f64>>,
}

impl AgentStore {
    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    /// Active agent indices in ascending order, for deterministic
    /// enumeration.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| a.then_some(i))
    }

    /// Clears `active[index]`, e.g. once an agent reaches its target.
    /// Errors with [`SimError::IndexOutOfBounds`] rather than panicking,
    /// since callers (a [`crate::simulation::TargetSelector`]) may pass
    /// a computed index.
    pub fn deactivate(&mut self, index: usize) -> SimResult<()> {
        let len = self.len();
        match self.active.get_mut(index) {
            Some(active) => {
                *active = false;
                Ok(())
            }
            None => Err(SimError::IndexOutOfBounds { index, len }),
        }
    }

    /// Zeroes `force` and `torque` for every agent. Idempotent.
    pub fn reset_motion(&mut self) {
        for f in &mut self.force {
            *f = DVec2::ZERO;
        }
        for t in &mut self.torque {
            *t = 0.0;
        }
    }

    /// Left/right shoulder positions derived from torso position and
    /// orientation, per spec.md §3.1.
    pub fn shoulder_positions(&self, i: usize) -> (DVec2, DVec2) {
        let offset = rotate270(crate::vector::unit_vector(self.orientation[i]))
            * self.r_torso_shoulder[i];
        let position = self.position[i];
        (position - offset, position + offset)
    }

    /// Torso + shoulder disks for the three-circle distance kernels.
    /// Panics if `model` is not `ThreeCircle`; callers dispatch on
    /// `model` before calling this.
    pub fn three_circle(&self, i: usize) -> crate::geometry::ThreeCircle {
        let (ls, rs) = self.shoulder_positions(i);
        [
            (self.position[i], self.r_torso[i]),
            (ls, self.r_shoulder[i]),
            (rs, self.r_shoulder[i]),
        ]
    }

    /// Appends a new circular-model agent, returning its index.
    #[allow(clippy::too_many_arguments)]
    pub fn push_circular(
        &mut self,
        mass: f64,
        radius: f64,
        position: DVec2,
        target_velocity: f64,
        tuning: &crate::config::AgentTuning,
    ) -> usize {
        debug_assert!(self.model != Some(BodyModel::ThreeCircle));
        self.model = Some(BodyModel::Circular);
        let index = self.len();
        self.mass.push(mass);
        self.radius.push(radius);
        self.position.push(position);
        self.velocity.push(DVec2::ZERO);
        self.target_velocity.push(target_velocity);
        self.target_direction.push(DVec2::ZERO);
        self.force.push(DVec2::ZERO);
        self.tau_adj.push(tuning.tau_adj);
        self.k_soc.push(tuning.k_soc);
        self.tau_0.push(tuning.tau_0);
        self.mu.push(tuning.mu);
        self.kappa.push(tuning.kappa);
        self.damping.push(tuning.damping);
        self.std_rand_force.push(tuning.std_rand_force);
        self.sight_soc.push(tuning.sight_soc);
        self.sight_wall.push(tuning.sight_wall);
        self.force_social_max.push(tuning.force_social_max);
        self.force_wall_max.push(tuning.force_wall_max);
        self.active.push(true);
        self.neighbors.push(Vec::new());
        self.neighbor_distances.push(Vec::new());
        index
    }

    /// Appends a new three-circle-model agent, returning its index.
    #[allow(clippy::too_many_arguments)]
    pub fn push_three_circle(
        &mut self,
        mass: f64,
        radius: f64,
        position: DVec2,
        orientation: f64,
        target_velocity: f64,
        r_torso: f64,
        r_shoulder: f64,
        r_torso_shoulder: f64,
        tuning: &crate::config::AgentTuning,
        inertia_rot: f64,
        target_angular_velocity: f64,
    ) -> usize {
        debug_assert!(self.model != Some(BodyModel::Circular));
        self.model = Some(BodyModel::ThreeCircle);
        let index = self.push_circular(mass, radius, position, target_velocity, tuning);
        self.inertia_rot.push(inertia_rot);
        self.orientation.push(orientation);
        self.angular_velocity.push(0.0);
        self.target_orientation.push(orientation);
        self.target_angular_velocity.push(target_angular_velocity);
        self.torque.push(0.0);
        self.tau_rot.push(tuning.tau_rot);
        self.std_rand_torque.push(tuning.std_rand_torque);
        self.r_torso.push(r_torso);
        self.r_shoulder.push(r_shoulder);
        self.r_torso_shoulder.push(r_torso_shoulder);
        index
    }
}
