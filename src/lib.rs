//! Continuous-space, continuous-time 2D crowd dynamics simulation core.
//!
//! Agents are driven by an adjusting force toward a navigation-field
//! direction, an anticipatory social-repulsion force, damped contact
//! forces on overlap, and Gaussian fluctuation, inside a domain bounded
//! by linear obstacles. See [`simulation::Simulation`] for the
//! per-step driver and [`scenario`] for population construction.

pub mod agent;
pub mod config;
pub mod error;
pub mod force;
pub mod geometry;
pub mod grid;
pub mod integrator;
pub mod interaction;
pub mod navigation;
pub mod obstacle;
pub mod scenario;
pub mod simulation;
pub mod vector;

pub use agent::{AgentStore, BodyModel};
pub use config::{AgentTuning, BodyTypeConfig, NavigationConfig, SimulationConfig};
pub use error::{SimError, SimResult};
pub use navigation::NavigationField;
pub use obstacle::{Obstacle, ObstacleStore};
pub use simulation::{NoOpTargetSelector, Simulation, SimulationSnapshot, TargetSelector};
