//! Analytic time-to-collision predictors.
//!
//! All functions are pure and side-effect free. Times are measured from the
//! caller's current instant (the caller adds the global clock), and `None` is
//! the "no collision" sentinel: separating pairs, trajectories that never
//! reach contact distance, and roots at or below the epsilon floor all report
//! `None`, never an error.

use crate::core::particle::Particle;

/// Collision times at or below this tolerance are treated as "just happened"
/// and excluded, so the event just resolved cannot re-trigger itself through
/// floating-point grazing at the contact point.
pub const EPS_TIME: f64 = 1e-8;

/// Time until disks `a` and `b` first touch, i.e. the smallest positive root
/// of `|dr + tau * dv| = a.radius + b.radius`, in reduced-discriminant form.
///
/// Returns `None` when the pair is separating (`dr . dv >= 0`) or the
/// discriminant is negative (the trajectories never close to contact
/// distance).
pub fn time_to_particle(a: &Particle, b: &Particle) -> Option<f64> {
    let dx = b.r[0] - a.r[0];
    let dy = b.r[1] - a.r[1];
    let dvx = b.v[0] - a.v[0];
    let dvy = b.v[1] - a.v[1];

    let dvdr = dx * dvx + dy * dvy;
    if dvdr >= 0.0 {
        return None;
    }
    // dvdr < 0 implies |dv| > 0, so the division below is safe.
    let dvdv = dvx * dvx + dvy * dvy;
    let drdr = dx * dx + dy * dy;
    let sigma = a.radius + b.radius;

    let disc = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
    if disc < 0.0 {
        return None;
    }

    let tau = -(dvdr + disc.sqrt()) / dvdv;
    if tau <= EPS_TIME || !tau.is_finite() {
        return None;
    }
    Some(tau)
}

/// Time until `p` touches the circular container wall of radius
/// `wall_radius` centered at the origin: smallest qualifying root of
/// `|r + tau * v| = wall_radius - p.radius`.
pub fn time_to_wall(p: &Particle, wall_radius: f64) -> Option<f64> {
    let effective = wall_radius - p.radius;
    let a = p.v[0] * p.v[0] + p.v[1] * p.v[1];
    let b = 2.0 * (p.r[0] * p.v[0] + p.r[1] * p.v[1]);
    let c = p.r[0] * p.r[0] + p.r[1] * p.r[1] - effective * effective;
    earliest_root(a, b, c)
}

/// Time until `p`'s boundary touches the fixed obstacle of radius
/// `obstacle_radius` centered at the origin, approached from outside:
/// same quadratic as the wall with contact distance
/// `obstacle_radius + p.radius`.
pub fn time_to_obstacle(p: &Particle, obstacle_radius: f64) -> Option<f64> {
    let effective = obstacle_radius + p.radius;
    let a = p.v[0] * p.v[0] + p.v[1] * p.v[1];
    let b = 2.0 * (p.r[0] * p.v[0] + p.r[1] * p.v[1]);
    let c = p.r[0] * p.r[0] + p.r[1] * p.r[1] - effective * effective;
    earliest_root(a, b, c)
}

/// Root-selection ladder for `a t^2 + b t + c = 0`: the smaller root above
/// the epsilon floor wins, else the other if it qualifies, else `None`.
/// A particle at rest (`a = 0`) never reaches the boundary.
fn earliest_root(a: f64, b: f64, c: f64) -> Option<f64> {
    if a <= 0.0 {
        return None;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    if t1 >= EPS_TIME && t2 >= EPS_TIME {
        Some(t1.min(t2))
    } else if t1 >= EPS_TIME {
        Some(t1)
    } else if t2 >= EPS_TIME {
        Some(t2)
    } else {
        None
    }
}
