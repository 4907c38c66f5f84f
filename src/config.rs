//! Simulation configuration: every tunable named in the external
//! interfaces, collected into one immutable record so kernels read
//! values from here instead of module-level constants (the original
//! Python carried these as shared-mutable globals in
//! `crowddynamics.core.agent.agents`; here they live on the struct and
//! are set once at scenario assembly).

use serde::{Deserialize, Serialize};

/// Per-agent tunables shared by the whole population unless a scenario
/// samples them per body type. Defaults match the module-level
/// constants of the original `agents.py`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentTuning {
    pub tau_adj: f64,
    pub tau_rot: f64,
    pub k_soc: f64,
    pub tau_0: f64,
    pub mu: f64,
    pub kappa: f64,
    pub damping: f64,
    pub std_rand_force: f64,
    pub std_rand_torque: f64,
    pub sight_soc: f64,
    pub sight_wall: f64,
    pub force_social_max: f64,
    pub force_wall_max: f64,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            tau_adj: 0.5,
            tau_rot: 0.2,
            k_soc: 1.5,
            tau_0: 3.0,
            mu: 1.2e5,
            kappa: 4.0e4,
            damping: 500.0,
            std_rand_force: 0.1,
            std_rand_torque: 0.1,
            sight_soc: 3.0,
            sight_wall: 3.0,
            force_social_max: 2.0e3,
            force_wall_max: 2.0e3,
        }
    }
}

/// Truncated-normal sampling parameters and three-circle body
/// proportions for one named body type, e.g. `"adult"`.
/// Recovered from `crowd_dynamics/parameters.py::Parameters.agent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyTypeConfig {
    pub mass_mean: f64,
    pub mass_scale: f64,
    pub radius_mean: f64,
    pub radius_scale: f64,
    /// Torso radius as a multiple of the sampled body radius.
    pub k_torso: f64,
    /// Shoulder radius as a multiple of the sampled body radius.
    pub k_shoulder: f64,
    /// Torso-to-shoulder offset as a multiple of the sampled body radius.
    pub k_torso_shoulder: f64,
    pub inertia_rot: f64,
    pub target_velocity: f64,
    pub target_angular_velocity: f64,
}

impl Default for BodyTypeConfig {
    /// Values approximate the "adult" row of the original body-type table.
    fn default() -> Self {
        Self {
            mass_mean: 73.5,
            mass_scale: 15.0,
            radius_mean: 0.255,
            radius_scale: 0.035,
            k_torso: 0.5882,
            k_shoulder: 0.3725,
            k_torso_shoulder: 0.6275,
            inertia_rot: 4.0,
            target_velocity: 1.25,
            target_angular_velocity: 4.0,
        }
    }
}

/// Grid/navigation tunables from spec.md's Ingress list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Grid step size `h` in meters.
    pub step: f64,
    /// Obstacle-avoidance blend radius.
    pub radius: f64,
    /// Blend strength at distance `radius` from an obstacle, in `(0, 1)`.
    pub value: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            step: 0.01,
            radius: 0.3,
            value: 0.3,
        }
    }
}

/// Integrator and neighbor-list tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub dt_min: f64,
    pub dt_max: f64,
    pub neighbor_radius: f64,
    pub neighbor_capacity: usize,
    pub navigation: NavigationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt_min: 1.0e-4,
            dt_max: 0.1,
            neighbor_radius: 0.0,
            neighbor_capacity: 8,
            navigation: NavigationConfig::default(),
        }
    }
}
