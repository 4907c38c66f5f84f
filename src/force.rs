//! Force and torque kernels: adjusting, fluctuation, Helbing social,
//! anticipatory ("power-law") social, and damped contact.
//!
//! Each kernel is a free function taking plain numbers/vectors so it
//! can be unit tested and called from both the circular and
//! three-circle dispatch paths in [`crate::interaction`].

use glam::DVec2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::vector::{dot, rotate270, unit_vector};

/// Helbing's original social-force constant `A`, in Newtons.
pub const HELBING_A: f64 = 2.0e3;
/// Helbing's original social-force decay length `B`, in meters.
pub const HELBING_B: f64 = 0.08;

/// Driving force toward the target velocity: `(m/tau_adj) * (v0 * e0 - v)`.
pub fn force_adjust(mass: f64, tau_adj: f64, target_velocity: f64, target_direction: DVec2, velocity: DVec2) -> DVec2 {
    (mass / tau_adj) * (target_velocity * target_direction - velocity)
}

/// Driving torque toward the target orientation, wrapped to `(-pi, pi]`
/// before scaling by `1/pi` as in the original rotational adjustment.
pub fn torque_adjust(
    inertia_rot: f64,
    tau_rot: f64,
    target_orientation: f64,
    orientation: f64,
    angular_velocity: f64,
) -> f64 {
    let wrapped = crate::vector::wrap_angle(target_orientation - orientation);
    (inertia_rot / tau_rot) * (wrapped / std::f64::consts::PI - angular_velocity)
}

/// Samples a fluctuation force: magnitude `|N(0, scale^2)|` truncated to
/// `[0, 3*scale]`, uniform random angle, scaled by `mass`.
pub fn force_fluctuation<R: Rng + ?Sized>(rng: &mut R, mass: f64, scale: f64) -> DVec2 {
    mass * unit_vector(rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI))
        * sample_truncated_half_normal(rng, scale)
}

/// Samples a fluctuation torque analogously, scaled by `inertia_rot`
/// and with a random sign instead of a random planar angle.
pub fn torque_fluctuation<R: Rng + ?Sized>(rng: &mut R, inertia_rot: f64, scale: f64) -> f64 {
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    inertia_rot * sign * sample_truncated_half_normal(rng, scale)
}

fn sample_truncated_half_normal<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    if scale <= 0.0 {
        return 0.0;
    }
    let normal = Normal::new(0.0, scale).expect("scale > 0 checked above");
    loop {
        let x = normal.sample(rng).abs();
        if x <= 3.0 * scale {
            return x;
        }
    }
}

/// Helbing's original exponential social force: `A * exp(-h/B) * n`.
pub fn force_social_helbing(h: f64, n: DVec2, a: f64, b: f64) -> DVec2 {
    a * (-h / b).exp() * n
}

/// Anticipatory ("power-law") social force between two bodies in
/// relative coordinates, per spec.md §4.3. Returns zero when the
/// quadratic for time-to-collision has no valid root.
pub fn force_social_anticipatory(
    x_ij: DVec2,
    v_ij: DVec2,
    r_ij: f64,
    k: f64,
    tau_0: f64,
    f_max: f64,
) -> DVec2 {
    let a = dot(v_ij, v_ij);
    let b = -dot(x_ij, v_ij);
    let c = dot(x_ij, x_ij) - r_ij * r_ij;
    let delta = b * b - a * c;

    if delta < 0.0 || a.abs() < 1.0e-3 {
        return DVec2::ZERO;
    }

    let sqrt_delta = delta.sqrt();
    let tau = (b - sqrt_delta) / a;

    if tau < 0.0 || tau > 999.0 {
        return DVec2::ZERO;
    }

    const M: f64 = 2.0;
    let direction = v_ij - (v_ij * b + x_ij * a) / sqrt_delta;
    let magnitude = -(k / (a * tau.powf(M))) * (-tau / tau_0).exp() * (M / tau + 1.0 / tau_0);
    let f = magnitude * direction;

    let len = f.length();
    if len > f_max && len > 0.0 {
        f * (f_max / len)
    } else {
        f
    }
}

/// Physical contact force with damping, applied when bodies overlap
/// (`h < 0`). `t` is the tangent at the contact (`rotate270(n)`).
pub fn force_contact(h: f64, n: DVec2, v: DVec2, mu: f64, kappa: f64, damping: f64) -> DVec2 {
    let t = rotate270(n);
    -h * (mu * n - kappa * dot(v, t) * t) + damping * dot(v, n) * n
}
