//! Pair enumeration and dispatch: computes social + contact forces (and
//! torques, for the three-circle model) for every agent-agent and
//! agent-obstacle pair within sight, accumulating into `force`/`torque`.

use glam::DVec2;
use tracing::{instrument, trace};

use crate::agent::{AgentStore, BodyModel};
use crate::force::{force_contact, force_social_anticipatory, force_social_helbing, HELBING_A, HELBING_B};
use crate::geometry::{distance_circle_circle, distance_circle_obstacle, distance_three_circle, distance_three_circle_line};
use crate::grid::BlockList;
use crate::obstacle::ObstacleStore;
use crate::vector::cross;

/// Which pair enumeration strategy to use for agent-agent interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSource {
    Brute,
    BlockList,
}

/// Computes and accumulates agent-agent social/contact forces (and
/// torques) for every pair within sight, using either the brute-force
/// or block-list enumerator. Both must produce identical accumulated
/// forces up to floating-point summation order (spec.md §4.5).
#[instrument(level = "trace", skip_all)]
pub fn agent_agent_interactions(
    agents: &mut AgentStore,
    source: PairSource,
    cell_size: f64,
    neighbor_radius: f64,
    neighbor_capacity: usize,
) {
    let pairs = match source {
        PairSource::Brute => crate::grid::enumerate_pairs_brute(&agents.active),
        PairSource::BlockList => {
            BlockList::build(&agents.position, &agents.active, cell_size).enumerate_pairs()
        }
    };

    let three_circle = agents.model == Some(BodyModel::ThreeCircle);

    for (i, j) in pairs {
        let (h, n, r_moment_i, r_moment_j) = if three_circle {
            let body_i = agents.three_circle(i);
            let body_j = agents.three_circle(j);
            let c = distance_three_circle(body_i, body_j);
            (c.h, c.normal, c.moment_a, c.moment_b)
        } else {
            let (h, n) = distance_circle_circle(
                agents.position[i],
                agents.radius[i],
                agents.position[j],
                agents.radius[j],
            );
            (h, n, DVec2::ZERO, DVec2::ZERO)
        };

        // Sight gating uses center-to-center (torso) distance, per the
        // original `agent_agent_interaction`'s `d = length(x_i - x_j)`
        // check, regardless of body model.
        let center_distance = (agents.position[i] - agents.position[j]).length();
        if center_distance > agents.sight_soc[i].min(agents.sight_soc[j]) {
            continue;
        }

        let x_ij = agents.position[i] - agents.position[j];
        let v_ij = agents.velocity[i] - agents.velocity[j];
        let r_ij = agents.radius[i] + agents.radius[j];
        let f_max = agents.force_social_max[i];

        let mut force_i = force_social_anticipatory(
            x_ij,
            v_ij,
            r_ij,
            agents.k_soc[i],
            agents.tau_0[i],
            f_max,
        );
        let mut force_j = -force_i;

        if h < 0.0 {
            let v_rel = agents.velocity[i] - agents.velocity[j];
            let f_c = force_contact(h, n, v_rel, agents.mu[i], agents.kappa[i], agents.damping[i]);
            force_i += f_c;
            force_j -= f_c;
        }

        trace!(i, j, h, ?force_i, "agent-agent interaction");

        agents.force[i] += force_i;
        agents.force[j] += force_j;

        if three_circle {
            agents.torque[i] += cross(r_moment_i, force_i);
            agents.torque[j] += cross(r_moment_j, force_j);
        }

        if neighbor_radius > 0.0 && h < neighbor_radius {
            insert_neighbor(agents, i, j, h, neighbor_capacity);
            insert_neighbor(agents, j, i, h, neighbor_capacity);
        }
    }
}

fn insert_neighbor(agents: &mut AgentStore, owner: usize, candidate: usize, h: f64, capacity: usize) {
    let list = &mut agents.neighbors[owner];
    let dists = &mut agents.neighbor_distances[owner];

    if list.len() < capacity {
        list.push(candidate);
        dists.push(h);
        return;
    }

    // Replace the current worst (max distance) neighbor if `h` is closer.
    let (max_idx, &max_val) = dists
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .expect("capacity > 0 implies non-empty");
    if h < max_val {
        list[max_idx] = candidate;
        dists[max_idx] = h;
    }
}

/// Computes and accumulates agent-obstacle social/contact forces for
/// every active agent against every obstacle within sight.
#[instrument(level = "trace", skip_all)]
pub fn agent_obstacle_interactions(agents: &mut AgentStore, obstacles: &ObstacleStore) {
    let three_circle = agents.model == Some(BodyModel::ThreeCircle);

    for i in agents.active_indices().collect::<Vec<_>>() {
        for obstacle in obstacles.iter() {
            let (h, n, r_moment) = if three_circle {
                let body = agents.three_circle(i);
                let c = distance_three_circle_line(body, obstacle);
                (c.h, c.normal, c.moment)
            } else {
                let (h, n) =
                    distance_circle_obstacle(agents.position[i], agents.radius[i], obstacle);
                (h, n, DVec2::ZERO)
            };

            if h > agents.sight_wall[i] {
                continue;
            }

            let mut force = force_social_helbing(h, n, HELBING_A, HELBING_B);
            if force.length() > agents.force_wall_max[i] {
                force *= agents.force_wall_max[i] / force.length();
            }

            if h < 0.0 {
                let f_c = force_contact(h, n, agents.velocity[i], agents.mu[i], agents.kappa[i], agents.damping[i]);
                force += f_c;
            }

            agents.force[i] += force;
            if three_circle {
                agents.torque[i] += cross(r_moment, force);
            }
        }
    }
}
