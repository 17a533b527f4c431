use crate::core::particle::Particle;
use crate::error::{Error, Result};

/// Uniform M x M bucket grid over the square bounding box of the circular
/// domain, used to prune pairwise collision-prediction candidates.
///
/// The grid is a snapshot: it indexes the positions it was built from and
/// does not follow particles afterwards. Callers that need current
/// candidates rebuild it. Queries return a superset filtered by the cutoff
/// radius; exact contact times are always re-checked analytically.
#[derive(Debug)]
pub struct CellGrid {
    m: usize,
    /// Side length L of the bounding box, 2R for a container of radius R.
    domain: f64,
    rc: f64,
    periodic: bool,
    cells: Vec<Vec<u32>>,
}

impl CellGrid {
    /// Build from a snapshot of particle positions.
    ///
    /// Positions are mapped with `floor((coord + L/2) / (L/M))`, clamped
    /// into `[0, M-1]` so boundary and slightly out-of-domain coordinates
    /// land in the edge cells instead of out of range.
    ///
    /// # Errors
    ///
    /// `InvalidParam` when `m` is zero or `domain`/`rc` are not positive
    /// finite values (`rc` may be zero).
    pub fn build(
        particles: &[Particle],
        m: usize,
        domain: f64,
        rc: f64,
        periodic: bool,
    ) -> Result<Self> {
        if m == 0 {
            return Err(Error::InvalidParam("grid needs at least one cell".into()));
        }
        if !domain.is_finite() || domain <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "grid domain must be positive and finite, got {domain}"
            )));
        }
        if !rc.is_finite() || rc < 0.0 {
            return Err(Error::InvalidParam(format!(
                "cutoff radius must be non-negative and finite, got {rc}"
            )));
        }
        if domain / m as f64 <= rc {
            log::warn!(
                "cell size {} is not larger than cutoff {}; neighbors beyond the Moore ring will be missed",
                domain / m as f64,
                rc
            );
        }

        let mut grid = Self {
            m,
            domain,
            rc,
            periodic,
            cells: vec![Vec::new(); m * m],
        };
        for p in particles {
            let (row, col) = grid.cell_of(p.r);
            grid.cells[row * m + col].push(p.id);
        }
        Ok(grid)
    }

    /// (row, col) of a position, clamped into range.
    fn cell_of(&self, r: [f64; 2]) -> (usize, usize) {
        let cell_size = self.domain / self.m as f64;
        let index = |coord: f64| -> usize {
            let shifted = coord + self.domain / 2.0;
            let i = (shifted / cell_size).floor();
            (i.max(0.0) as usize).min(self.m - 1)
        };
        (index(r[1]), index(r[0]))
    }

    /// Candidate neighbor ids of `p`: occupants of its cell and the eight
    /// surrounding ones, kept when closer than the cutoff radius.
    ///
    /// Periodic mode wraps rows and columns modulo M (and measures distance
    /// with per-axis wrapped deltas); non-periodic mode skips offsets that
    /// fall off the grid. `p` itself is never returned. `particles` must be
    /// the same id-indexed slice the grid was built from.
    pub fn neighbors(&self, p: &Particle, particles: &[Particle]) -> Vec<u32> {
        let (row, col) = self.cell_of(p.r);
        let mut found = Vec::new();
        let mut visited = Vec::with_capacity(9);

        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                let cell = if self.periodic {
                    let m = self.m as i64;
                    let r = (row as i64 + dr).rem_euclid(m) as usize;
                    let c = (col as i64 + dc).rem_euclid(m) as usize;
                    r * self.m + c
                } else {
                    let r = row as i64 + dr;
                    let c = col as i64 + dc;
                    if r < 0 || c < 0 || r >= self.m as i64 || c >= self.m as i64 {
                        continue;
                    }
                    r as usize * self.m + c as usize
                };
                // Small M wraps several offsets onto the same cell.
                if visited.contains(&cell) {
                    continue;
                }
                visited.push(cell);

                for &id in &self.cells[cell] {
                    if id == p.id {
                        continue;
                    }
                    let q = &particles[id as usize];
                    if self.within_cutoff(p, q) {
                        found.push(id);
                    }
                }
            }
        }
        found
    }

    fn within_cutoff(&self, p: &Particle, q: &Particle) -> bool {
        if self.periodic {
            let wrap = |d: f64| {
                let d = d.abs();
                d.min(self.domain - d)
            };
            let dx = wrap(q.r[0] - p.r[0]);
            let dy = wrap(q.r[1] - p.r[1]);
            (dx * dx + dy * dy).sqrt() - q.radius < self.rc
        } else {
            p.distance_to(q) < self.rc
        }
    }

    #[cfg(test)]
    fn occupants(&self, row: usize, col: usize) -> &[u32] {
        &self.cells[row * self.m + col]
    }
}
