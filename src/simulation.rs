//! Simulation driver: orchestrates the fixed per-step phase order
//! `reset → fluctuation → adjust → navigate → interact → integrate`.
//!
//! Mirrors the `TaskNode` pipeline of `crowddynamics.multiagent.algorithms`
//! (`Navigation → Orientation → Adjusting` plus a force/contact pass and
//! an integrator), but as a plain ordered sequence of function calls
//! rather than a task graph, per spec.md §9's "decorator-based task
//! wiring" redesign note.

use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{instrument, warn};

use crate::agent::{AgentStore, BodyModel};
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::force::{force_adjust, force_fluctuation, torque_adjust, torque_fluctuation};
use crate::integrator::{adaptive_timestep, integrate};
use crate::interaction::{agent_agent_interactions, agent_obstacle_interactions, PairSource};
use crate::navigation::NavigationField;
use crate::obstacle::ObstacleStore;
use crate::vector::angle;

/// Hook for dynamic target re-selection (e.g. multi-exit choice). The
/// original ships this as a no-op task node alongside `Navigation`;
/// we carry the same seam. Called once per step before the navigation
/// lookup, with the chance to rewrite any agent's lookup position or
/// deactivate an agent that has reached its target.
pub trait TargetSelector {
    fn select(&mut self, agents: &mut AgentStore);
}

/// Default selector: does nothing, matching the original's inert
/// `ExitSelection` placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpTargetSelector;

impl TargetSelector for NoOpTargetSelector {
    fn select(&mut self, _agents: &mut AgentStore) {}
}

/// A per-step snapshot of the Egress fields named in spec.md §6.
#[derive(Debug, Clone, Default)]
pub struct SimulationSnapshot {
    pub positions: Vec<DVec2>,
    pub velocities: Vec<DVec2>,
    pub orientations: Vec<f64>,
    pub angular_velocities: Vec<f64>,
    pub forces: Vec<DVec2>,
    pub torques: Vec<f64>,
    pub active: Vec<bool>,
    pub dt_used: f64,
    pub time_total: f64,
}

/// Owns the agent/obstacle state and drives it forward one step at a
/// time in the fixed phase order.
pub struct Simulation {
    pub agents: AgentStore,
    pub obstacles: ObstacleStore,
    pub navigation: Option<NavigationField>,
    pub config: SimulationConfig,
    pub target_selector: Box<dyn TargetSelector>,
    rng: StdRng,
    time_total: f64,
    last_dt: f64,
}

impl Simulation {
    pub fn new(
        agents: AgentStore,
        obstacles: ObstacleStore,
        navigation: Option<NavigationField>,
        config: SimulationConfig,
        seed: u64,
    ) -> Self {
        Self {
            agents,
            obstacles,
            navigation,
            config,
            target_selector: Box::new(NoOpTargetSelector),
            rng: StdRng::seed_from_u64(seed),
            time_total: 0.0,
            last_dt: 0.0,
        }
    }

    pub fn time_total(&self) -> f64 {
        self.time_total
    }

    /// Runs one full step: reset, fluctuation, adjusting, navigation +
    /// orientation (if a navigation field is present), interaction, and
    /// integration. Returns the adaptive `dt` actually used.
    #[instrument(level = "trace", skip_all)]
    pub fn step(&mut self) -> SimResult<f64> {
        self.agents.reset_motion();
        self.apply_fluctuation();
        self.apply_adjusting();

        if self.navigation.is_some() {
            self.target_selector.select(&mut self.agents);
            self.apply_navigation();
            self.apply_orientation();
        }

        let cell_size = self.cell_size();
        agent_agent_interactions(
            &mut self.agents,
            PairSource::BlockList,
            cell_size,
            self.config.neighbor_radius,
            self.config.neighbor_capacity,
        );
        agent_obstacle_interactions(&mut self.agents, &self.obstacles);

        let dt = adaptive_timestep(&self.agents, self.config.dt_min, self.config.dt_max);
        integrate(&mut self.agents, dt);

        self.check_numerical_stability(dt)?;
        self.time_total += dt;
        self.last_dt = dt;
        Ok(dt)
    }

    fn cell_size(&self) -> f64 {
        let mut max_radius = 0.0_f64;
        let mut max_sight = 0.0_f64;
        for i in self.agents.active_indices() {
            max_radius = max_radius.max(self.agents.radius[i]);
            max_sight = max_sight.max(self.agents.sight_soc[i]);
        }
        if max_radius == 0.0 {
            return 1.0;
        }
        2.0 * max_radius + max_sight
    }

    fn apply_fluctuation(&mut self) {
        let three_circle = self.agents.model == Some(BodyModel::ThreeCircle);
        for i in self.agents.active_indices().collect::<Vec<_>>() {
            self.agents.force[i] +=
                force_fluctuation(&mut self.rng, self.agents.mass[i], self.agents.std_rand_force[i]);
            if three_circle {
                self.agents.torque[i] += torque_fluctuation(
                    &mut self.rng,
                    self.agents.inertia_rot[i],
                    self.agents.std_rand_torque[i],
                );
            }
        }
    }

    fn apply_adjusting(&mut self) {
        let three_circle = self.agents.model == Some(BodyModel::ThreeCircle);
        for i in self.agents.active_indices().collect::<Vec<_>>() {
            self.agents.force[i] += force_adjust(
                self.agents.mass[i],
                self.agents.tau_adj[i],
                self.agents.target_velocity[i],
                self.agents.target_direction[i],
                self.agents.velocity[i],
            );
            if three_circle {
                self.agents.torque[i] += torque_adjust(
                    self.agents.inertia_rot[i],
                    self.agents.tau_rot[i],
                    self.agents.target_orientation[i],
                    self.agents.orientation[i],
                    self.agents.angular_velocity[i],
                );
            }
        }
    }

    fn apply_navigation(&mut self) {
        let Some(navigation) = &self.navigation else {
            return;
        };
        for i in self.agents.active_indices().collect::<Vec<_>>() {
            self.agents.target_direction[i] = navigation.lookup(self.agents.position[i]);
        }
    }

    /// Derives `target_orientation` from `atan2(target_direction)` for
    /// the three-circle model, matching the original pipeline's
    /// `Orientation` task node running between `Navigation` and
    /// `Adjusting`.
    fn apply_orientation(&mut self) {
        if self.agents.model != Some(BodyModel::ThreeCircle) {
            return;
        }
        for i in self.agents.active_indices().collect::<Vec<_>>() {
            let dir = self.agents.target_direction[i];
            if dir != DVec2::ZERO {
                self.agents.target_orientation[i] = angle(dir);
            }
        }
    }

    fn check_numerical_stability(&self, dt: f64) -> SimResult<()> {
        for i in self.agents.active_indices() {
            if !self.agents.position[i].is_finite() {
                return Err(SimError::NumericalInstability {
                    field: "position",
                    agent_index: i,
                    time: self.time_total + dt,
                });
            }
            if !self.agents.velocity[i].is_finite() {
                return Err(SimError::NumericalInstability {
                    field: "velocity",
                    agent_index: i,
                    time: self.time_total + dt,
                });
            }
            if !self.agents.force[i].is_finite() {
                warn!(agent = i, "non-finite force after integration");
                return Err(SimError::NumericalInstability {
                    field: "force",
                    agent_index: i,
                    time: self.time_total + dt,
                });
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        let three_circle = self.agents.model == Some(BodyModel::ThreeCircle);
        SimulationSnapshot {
            positions: self.agents.position.clone(),
            velocities: self.agents.velocity.clone(),
            orientations: if three_circle {
                self.agents.orientation.clone()
            } else {
                Vec::new()
            },
            angular_velocities: if three_circle {
                self.agents.angular_velocity.clone()
            } else {
                Vec::new()
            },
            forces: self.agents.force.clone(),
            torques: if three_circle {
                self.agents.torque.clone()
            } else {
                Vec::new()
            },
            active: self.agents.active.clone(),
            dt_used: self.last_dt,
            time_total: self.time_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentTuning;
    use glam::dvec2;

    fn head_on_agents() -> AgentStore {
        let tuning = AgentTuning::default();
        let mut agents = AgentStore::default();
        let i = agents.push_circular(70.0, 0.25, dvec2(3.0, 5.0), 1.5, &tuning);
        let j = agents.push_circular(70.0, 0.25, dvec2(7.0, 5.0), 1.5, &tuning);
        agents.target_direction[i] = dvec2(1.0, 0.0);
        agents.target_direction[j] = dvec2(-1.0, 0.0);
        agents
    }

    #[test]
    fn head_on_agents_never_overlap_and_decelerate() {
        let agents = head_on_agents();
        let obstacles = ObstacleStore::default();
        let mut sim = Simulation::new(agents, obstacles, None, SimulationConfig::default(), 7);

        for _ in 0..2000 {
            sim.step().expect("step should not error");
        }

        let d = (sim.agents.position[0] - sim.agents.position[1]).length();
        assert!(d >= 0.5 - 1e-3, "agents overlapped: distance={d}");
    }

    #[test]
    fn reset_then_integrate_keeps_time_monotonic() {
        let agents = head_on_agents();
        let obstacles = ObstacleStore::default();
        let mut sim = Simulation::new(agents, obstacles, None, SimulationConfig::default(), 1);
        let mut last = 0.0;
        for _ in 0..50 {
            sim.step().unwrap();
            assert!(sim.time_total() > last);
            last = sim.time_total();
        }
    }
}
