use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// Positions closer to the origin than this cannot produce a usable radial
/// contact normal; bounces are rejected as degenerate instead of dividing.
const MIN_NORMAL: f64 = 1e-12;

/// A hard disk in D=2.
///
/// Fields:
/// - `id`: stable identifier, equal to the particle's index in the arena
/// - `r`: position [x, y], valid only as of the engine's current time
/// - `v`: velocity [vx, vy]
/// - `radius`: disk radius (>= 0; zero models a point particle)
/// - `mass`: particle mass (> 0)
/// - `collision_count`: epoch counter, incremented by every realized bounce;
///   scheduled events snapshot it and die when it drifts (lazy invalidation)
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable particle identifier (arena index).
    pub id: u32,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    /// Disk radius (>= 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Collision epoch (for event invalidation).
    pub collision_count: u64,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` is negative, `mass` is
    ///   non-positive, or any component is NaN/inf.
    pub fn new(id: u32, r: [f64; DIM], v: [f64; DIM], radius: f64, mass: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidParam("radius must be finite and >= 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            radius,
            mass,
            collision_count: 0,
        })
    }

    /// Ballistic motion: `r += v * dt`. Velocity and epoch are untouched.
    #[inline]
    pub fn drift(&mut self, dt: f64) {
        for k in 0..DIM {
            self.r[k] += self.v[k] * dt;
        }
    }

    /// Reflect velocity about the outward radial normal of the circular
    /// container wall (centered at the origin) and increment the epoch.
    ///
    /// The caller guarantees the particle actually sits on the wall; any
    /// physically reached wall event satisfies that. A particle exactly at
    /// the origin has no radial normal and yields
    /// `Error::DegenerateGeometry` with velocity and epoch untouched.
    pub fn bounce_off_wall(&mut self) -> Result<()> {
        self.reflect_radial()
    }

    /// Reflect off the fixed circular obstacle at the origin. Same radial
    /// reflection and guard as the wall case; increments the epoch.
    pub fn bounce_off_obstacle(&mut self) -> Result<()> {
        self.reflect_radial()
    }

    fn reflect_radial(&mut self) -> Result<()> {
        let norm = (self.r[0] * self.r[0] + self.r[1] * self.r[1]).sqrt();
        if norm <= MIN_NORMAL {
            return Err(Error::DegenerateGeometry { id: self.id });
        }
        let nx = self.r[0] / norm;
        let ny = self.r[1] / norm;
        let dot = self.v[0] * nx + self.v[1] * ny;

        self.v[0] -= 2.0 * dot * nx;
        self.v[1] -= 2.0 * dot * ny;

        self.bump_collision_count();
        Ok(())
    }

    /// Impulse-based elastic collision between two disks at contact.
    ///
    /// `d = other.r - self.r` has length `sigma = self.radius + other.radius`
    /// at the moment of contact; the impulse magnitude is
    /// `J = 2 m1 m2 (d . dv) / ((m1 + m2) sigma)` applied along `d / sigma`.
    /// Both epochs increment by exactly 1.
    ///
    /// Only invoked when a predicted collision fires, which guarantees the
    /// pair is approaching (`d . dv < 0`). A zero contact distance (two
    /// point particles) has no contact normal and yields
    /// `Error::DegenerateGeometry` with both participants untouched.
    pub fn bounce_off(&mut self, other: &mut Particle) -> Result<()> {
        let dx = other.r[0] - self.r[0];
        let dy = other.r[1] - self.r[1];
        let dvx = other.v[0] - self.v[0];
        let dvy = other.v[1] - self.v[1];
        let dvdr = dx * dvx + dy * dvy;
        let sigma = self.radius + other.radius;
        if sigma <= 0.0 {
            return Err(Error::DegenerateGeometry { id: self.id });
        }

        let magnitude =
            2.0 * self.mass * other.mass * dvdr / ((self.mass + other.mass) * sigma);

        let fx = magnitude * dx / sigma;
        let fy = magnitude * dy / sigma;

        self.v[0] += fx / self.mass;
        self.v[1] += fy / self.mass;
        other.v[0] -= fx / other.mass;
        other.v[1] -= fy / other.mass;

        self.bump_collision_count();
        other.bump_collision_count();
        Ok(())
    }

    /// Center distance to `other` minus `other`'s radius. This is the
    /// asymmetric surface metric the neighbor filter uses in non-periodic
    /// mode.
    #[inline]
    pub fn distance_to(&self, other: &Particle) -> f64 {
        let dx = self.r[0] - other.r[0];
        let dy = self.r[1] - other.r[1];
        (dx * dx + dy * dy).sqrt() - other.radius
    }

    /// Increment the collision epoch (used for event invalidation).
    #[inline]
    pub fn bump_collision_count(&mut self) {
        self.collision_count = self.collision_count.saturating_add(1);
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.v.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }

    /// Returns the particle's speed |v|.
    #[inline]
    pub fn speed(&self) -> f64 {
        (self.v[0] * self.v[0] + self.v[1] * self.v[1]).sqrt()
    }
}
