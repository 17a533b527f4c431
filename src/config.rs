use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Immutable run parameters.
///
/// Built once, validated, then handed to the engine by value; nothing
/// mutates a config after construction. Field names double as the JSON
/// keys of the `config.json` dumped into each run directory, so a file
/// written by one run reproduces another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Container radius R; the domain is the disk of radius R at the origin.
    pub big_radius: f64,
    /// Radius of the fixed central obstacle, `None` for an empty container.
    pub small_radius: Option<f64>,
    /// Radius of every mobile particle (zero means point particles).
    pub particle_radius: f64,
    /// Initial speed given to every particle (direction is randomized).
    pub speed: f64,
    /// Mass of every particle.
    pub mass: f64,
    /// Simulated time horizon; no event fires at or past this time.
    pub time_limit: f64,
    /// Interval between state snapshots.
    pub redraw_period: f64,
    /// Number of mobile particles.
    pub particle_count: usize,
    /// Wrap neighbor queries around the bounding box instead of clipping.
    pub periodic: bool,
    /// Cells per grid axis (M in the cell index method).
    pub grid_cells: usize,
    /// Neighbor cutoff radius; `None` derives `speed * redraw_period`.
    pub neighbor_radius: Option<f64>,
    /// RNG seed for reproducible placement; `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            big_radius: 0.05,
            small_radius: Some(0.005),
            particle_radius: 0.0005,
            speed: 0.05,
            mass: 1.0,
            time_limit: 10.0,
            redraw_period: 0.01,
            particle_count: 5,
            periodic: false,
            grid_cells: 5,
            neighbor_radius: None,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Check every parameter once, before any particle exists.
    ///
    /// # Errors
    ///
    /// `InvalidParam` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(Error::InvalidParam("particle_count must be > 0".into()));
        }
        if !self.big_radius.is_finite() || self.big_radius <= 0.0 {
            return Err(Error::InvalidParam(
                "big_radius must be finite and > 0".into(),
            ));
        }
        if !self.particle_radius.is_finite() || self.particle_radius < 0.0 {
            return Err(Error::InvalidParam(
                "particle_radius must be finite and >= 0".into(),
            ));
        }
        if self.particle_radius >= self.big_radius {
            return Err(Error::InvalidParam(
                "particle_radius must be smaller than big_radius".into(),
            ));
        }
        if let Some(small) = self.small_radius {
            if !small.is_finite() || small < 0.0 {
                return Err(Error::InvalidParam(
                    "small_radius must be finite and >= 0".into(),
                ));
            }
            // The annulus between obstacle and wall must have room for a
            // particle center.
            if small + 2.0 * self.particle_radius >= self.big_radius {
                return Err(Error::InvalidParam(
                    "small_radius leaves no room for particles inside big_radius".into(),
                ));
            }
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(Error::InvalidParam("speed must be finite and >= 0".into()));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !self.time_limit.is_finite() || self.time_limit <= 0.0 {
            return Err(Error::InvalidParam(
                "time_limit must be finite and > 0".into(),
            ));
        }
        if !self.redraw_period.is_finite() || self.redraw_period <= 0.0 {
            return Err(Error::InvalidParam(
                "redraw_period must be finite and > 0".into(),
            ));
        }
        if self.grid_cells == 0 {
            return Err(Error::InvalidParam("grid_cells must be > 0".into()));
        }
        if let Some(rc) = self.neighbor_radius {
            if !rc.is_finite() || rc < 0.0 {
                return Err(Error::InvalidParam(
                    "neighbor_radius must be finite and >= 0".into(),
                ));
            }
        }
        Ok(())
    }

    /// Side length of the square bounding box the grid covers.
    #[inline]
    pub fn domain_size(&self) -> f64 {
        2.0 * self.big_radius
    }

    /// Effective neighbor cutoff: the explicit radius, or the distance a
    /// particle covers in one snapshot period.
    #[inline]
    pub fn neighbor_cutoff(&self) -> f64 {
        self.neighbor_radius
            .unwrap_or(self.speed * self.redraw_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_particles_rejected() {
        let cfg = SimConfig {
            particle_count: 0,
            ..SimConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("particle_count"));
    }

    #[test]
    fn oversized_obstacle_rejected() {
        let cfg = SimConfig {
            small_radius: Some(0.05),
            ..SimConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("small_radius"));
    }

    #[test]
    fn nonpositive_period_rejected() {
        let cfg = SimConfig {
            redraw_period: 0.0,
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn legacy_key_set_loads_with_defaults_for_the_rest() {
        // Only the core keys, none of the newer knobs.
        let json = r#"{
            "big_radius": 0.06,
            "small_radius": 0.005,
            "particle_radius": 0.0005,
            "speed": 0.05,
            "mass": 1.0,
            "time_limit": 5.0,
            "redraw_period": 0.01,
            "particle_count": 100
        }"#;
        let cfg: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.big_radius, 0.06);
        assert_eq!(cfg.particle_count, 100);
        assert_eq!(cfg.grid_cells, 5);
        assert!(!cfg.periodic);
        assert!(cfg.seed.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn neighbor_cutoff_defaults_to_distance_per_period() {
        let cfg = SimConfig::default();
        assert!((cfg.neighbor_cutoff() - 0.05 * 0.01).abs() < 1e-15);
        let explicit = SimConfig {
            neighbor_radius: Some(0.002),
            ..cfg
        };
        assert_eq!(explicit.neighbor_cutoff(), 0.002);
    }
}
