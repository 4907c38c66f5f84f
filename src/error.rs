//! Error taxonomy for the simulation core.
//!
//! Setup errors abort construction; per-step errors abort the step and
//! surface to whatever drives the simulation loop. Transient numerical
//! edge cases inside the geometry/force kernels (a zero-length
//! separation, a degenerate quadratic) are not errors: they are
//! resolved locally with the well-defined fallbacks spec'd in the
//! kernels themselves.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("placement exhausted {trials} trials while seeding {agent_count} agents")]
    PlacementInfeasible { trials: usize, agent_count: usize },

    #[error("invalid domain: {reason}")]
    DomainInvalid { reason: String },

    #[error("numerical instability detected in {field} of agent {agent_index} at t={time}")]
    NumericalInstability {
        field: &'static str,
        agent_index: usize,
        time: f64,
    },

    #[error("index {index} out of bounds (len={len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type SimResult<T> = Result<T, SimError>;
