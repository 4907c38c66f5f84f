//! Adaptive-timestep symplectic (semi-implicit Euler) integrator.
//!
//! The timestep is bounded so no agent can travel more than half its
//! radius in one step (a CFL-like stability bound, spec.md §4.6).

use crate::agent::{AgentStore, BodyModel};
use crate::vector::wrap_angle;

/// Computes the adaptive `dt` for this step from the current velocity
/// and radius bound, clamped to `[dt_min, dt_max]`.
pub fn adaptive_timestep(agents: &AgentStore, dt_min: f64, dt_max: f64) -> f64 {
    let mut v_max = 0.0_f64;
    let mut r_min = f64::INFINITY;
    let mut v_target_max = 0.0_f64;

    for i in agents.active_indices() {
        v_max = v_max.max(agents.velocity[i].length());
        r_min = r_min.min(agents.radius[i]);
        v_target_max = v_target_max.max(agents.target_velocity[i]);
    }

    if !r_min.is_finite() {
        // No active agents: any dt within bounds is fine.
        return dt_max.clamp(dt_min, dt_max);
    }

    let denom = 2.0 * v_max.max(v_target_max);
    let dt = if denom > 0.0 {
        r_min / denom
    } else {
        dt_max
    };
    dt.clamp(dt_min, dt_max)
}

/// Advances every active agent's velocity and position (and, for the
/// three-circle model, angular velocity and orientation) by `dt` using
/// semi-implicit Euler, then resets `force`/`torque` to zero.
pub fn integrate(agents: &mut AgentStore, dt: f64) {
    let three_circle = agents.model == Some(BodyModel::ThreeCircle);

    for i in agents.active_indices().collect::<Vec<_>>() {
        let acc = agents.force[i] / agents.mass[i];
        agents.velocity[i] += acc * dt;
        agents.position[i] += agents.velocity[i] * dt;

        if three_circle {
            let alpha = agents.torque[i] / agents.inertia_rot[i];
            agents.angular_velocity[i] += alpha * dt;
            agents.orientation[i] = wrap_angle(agents.orientation[i] + agents.angular_velocity[i] * dt);
        }
    }

    agents.reset_motion();
}
