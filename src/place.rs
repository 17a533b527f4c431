//! Initial particle placement.

use crate::config::SimConfig;
use crate::core::particle::Particle;
use crate::error::{Error, Result};
use rand::Rng;
use std::f64::consts::TAU;

const MAX_ATTEMPTS: usize = 1_000_000;

/// Scatter `config.particle_count` non-overlapping particles over the
/// annulus between the obstacle (if any) and the container wall, both
/// shrunk by the particle radius so every disk fits entirely inside the
/// domain. Radius and angle are sampled uniformly; velocities have
/// magnitude `config.speed` at a uniform random angle. Ids are assigned
/// 0..N in placement order.
///
/// # Errors
///
/// `InvalidParam` when the config is invalid, the annulus is empty, or a
/// particle cannot be placed without overlap within the attempt limit.
pub fn scatter<R: Rng>(config: &SimConfig, rng: &mut R) -> Result<Vec<Particle>> {
    config.validate()?;

    let inner = config.small_radius.unwrap_or(0.0) + config.particle_radius;
    let outer = config.big_radius - config.particle_radius;
    if inner >= outer {
        return Err(Error::InvalidParam(format!(
            "no room to place particles: annulus [{inner}, {outer}] is empty"
        )));
    }

    let mut particles: Vec<Particle> = Vec::with_capacity(config.particle_count);
    for id in 0..config.particle_count as u32 {
        let mut attempts = 0usize;
        let r = loop {
            if attempts >= MAX_ATTEMPTS {
                return Err(Error::InvalidParam(format!(
                    "failed to place particle {id} without overlap; try fewer particles or a smaller radius"
                )));
            }
            attempts += 1;
            let radius = rng.random_range(inner..=outer);
            let angle = rng.random_range(0.0..TAU);
            let r = [radius * angle.cos(), radius * angle.sin()];
            if !overlaps_existing(&particles, r, config.particle_radius) {
                break r;
            }
        };

        let heading = rng.random_range(0.0..TAU);
        let v = [config.speed * heading.cos(), config.speed * heading.sin()];
        particles.push(Particle::new(id, r, v, config.particle_radius, config.mass)?);
    }
    Ok(particles)
}

fn overlaps_existing(existing: &[Particle], r: [f64; 2], radius: f64) -> bool {
    let min_sq = (2.0 * radius) * (2.0 * radius);
    existing.iter().any(|p| {
        let dx = r[0] - p.r[0];
        let dy = r[1] - p.r[1];
        dx * dx + dy * dy < min_sq
    })
}
