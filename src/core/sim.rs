use crate::config::SimConfig;
use crate::core::collide;
use crate::core::event::{Event, EventKind};
use crate::core::grid::CellGrid;
use crate::core::particle::Particle;
use crate::core::queue::EventQueue;
use crate::error::{Error, Result};
use crate::output::StateSink;
use crate::place;
use log::{debug, info, warn};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Lifecycle of a [`Simulation`]: built, running exactly once, done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Finished,
}

/// Event-driven hard-disk engine.
///
/// Owns the particle arena, the event queue and the clock. Between events
/// every particle moves ballistically; the engine advances by popping the
/// next valid event, drifting everyone to its time, resolving it, and
/// re-predicting for the particles it touched. A run ends when the queue
/// drains, which happens once every remaining event would fall at or past
/// the time limit.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    time_now: f64,
    pub particles: Vec<Particle>,
    queue: EventQueue,
    state: RunState,
    events_processed: u64,
}

impl Simulation {
    /// Build a simulation with randomly scattered particles, seeding the
    /// RNG from `config.seed` when present.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng: StdRng = match config.seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        let particles = place::scatter(&config, &mut rng)?;
        Self::with_particles(config, particles)
    }

    /// Build a simulation over an explicit particle arena.
    ///
    /// # Errors
    ///
    /// `InvalidParam` when the config fails validation, the arena is empty,
    /// or any particle's id differs from its index.
    pub fn with_particles(config: SimConfig, particles: Vec<Particle>) -> Result<Self> {
        config.validate()?;
        if particles.is_empty() {
            return Err(Error::InvalidParam(
                "at least one particle is required".into(),
            ));
        }
        for (i, p) in particles.iter().enumerate() {
            if p.id as usize != i {
                return Err(Error::InvalidParam(format!(
                    "particle id {} does not match its arena index {}",
                    p.id, i
                )));
            }
        }
        Ok(Self {
            config,
            time_now: 0.0,
            particles,
            queue: EventQueue::new(),
            state: RunState::Idle,
            events_processed: 0,
        })
    }

    /// Returns current simulation time.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// The particle arena in id order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Run parameters this engine was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Where this simulation is in its lifecycle.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Valid events dispatched so far (snapshot ticks included).
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Drive the simulation from t = 0 to the configured time limit,
    /// emitting a snapshot at t = 0 and at every tick.
    ///
    /// Single-shot: a second call is rejected. Sink failures and degenerate
    /// bounces are logged and survived; only construction-grade faults
    /// (NaN event times) abort the run.
    pub fn run<S: StateSink>(&mut self, sink: &mut S) -> Result<()> {
        if self.state != RunState::Idle {
            return Err(Error::InvalidParam(
                "run is single-shot; build a new simulation for another run".into(),
            ));
        }
        self.state = RunState::Running;
        let limit = self.config.time_limit;
        info!(
            "starting run: {} particles, time limit {}, snapshot period {}",
            self.particles.len(),
            limit,
            self.config.redraw_period
        );

        self.emit(sink, 0.0);
        self.seed_snapshot_ticks(limit)?;

        let grid = self.build_grid()?;
        for id in 0..self.particles.len() as u32 {
            self.predict_for(id, &grid)?;
        }

        loop {
            let next = {
                let particles = &self.particles;
                self.queue
                    .pop_next_valid(|id| particles[id as usize].collision_count)
            };
            let Some(event) = next else {
                break;
            };

            let t_ev = event.time_f64();
            self.drift_all(t_ev);
            self.time_now = t_ev;

            match event.kind {
                EventKind::Collision { a, b } => {
                    self.resolve_collision(a as usize, b as usize);
                    self.reschedule(&[a, b])?;
                }
                EventKind::WallHit { a } => {
                    self.resolve_radial_bounce(a as usize, "wall", Particle::bounce_off_wall);
                    self.reschedule(&[a])?;
                }
                EventKind::ObstacleHit { a } => {
                    self.resolve_radial_bounce(a as usize, "obstacle", Particle::bounce_off_obstacle);
                    self.reschedule(&[a])?;
                }
                EventKind::SnapshotTick => {
                    debug!("snapshot tick at t = {t_ev}");
                    self.emit(sink, t_ev);
                }
            }
            self.events_processed += 1;
        }

        self.state = RunState::Finished;
        info!(
            "run finished at t = {}: {} events processed",
            self.time_now, self.events_processed
        );
        Ok(())
    }

    // ============ Internal helpers ============

    /// One tick per period over (0, limit]; t = 0 is emitted directly.
    fn seed_snapshot_ticks(&mut self, limit: f64) -> Result<()> {
        let period = self.config.redraw_period;
        let mut k = 1u64;
        loop {
            let t = k as f64 * period;
            if t > limit {
                break;
            }
            self.queue.schedule(Event::snapshot_tick(t)?);
            k += 1;
        }
        Ok(())
    }

    fn build_grid(&self) -> Result<CellGrid> {
        CellGrid::build(
            &self.particles,
            self.config.grid_cells,
            self.config.domain_size(),
            self.config.neighbor_cutoff(),
            self.config.periodic,
        )
    }

    /// Fresh predictions for each id, against a grid rebuilt from current
    /// positions.
    fn reschedule(&mut self, ids: &[u32]) -> Result<()> {
        let grid = self.build_grid()?;
        for &id in ids {
            self.predict_for(id, &grid)?;
        }
        Ok(())
    }

    /// Schedule every future event of particle `id` landing before the time
    /// limit: wall hit, obstacle hit when an obstacle is configured, and
    /// pairwise collisions against the grid's candidates.
    fn predict_for(&mut self, id: u32, grid: &CellGrid) -> Result<()> {
        let limit = self.config.time_limit;
        let p = &self.particles[id as usize];

        if let Some(tau) = collide::time_to_wall(p, self.config.big_radius) {
            let t = self.time_now + tau;
            if t < limit {
                self.queue.schedule(Event::wall_hit(t, id, p.collision_count)?);
            }
        }

        if let Some(r0) = self.config.small_radius {
            if let Some(tau) = collide::time_to_obstacle(p, r0) {
                let t = self.time_now + tau;
                if t < limit {
                    self.queue
                        .schedule(Event::obstacle_hit(t, id, p.collision_count)?);
                }
            }
        }

        for j in grid.neighbors(p, &self.particles) {
            let q = &self.particles[j as usize];
            if let Some(tau) = collide::time_to_particle(p, q) {
                let t = self.time_now + tau;
                if t < limit {
                    // Canonical (low id, high id) order keeps duplicate
                    // predictions of the same pair byte-identical.
                    let ev = if id < j {
                        Event::collision(t, id, j, p.collision_count, q.collision_count)?
                    } else {
                        Event::collision(t, j, id, q.collision_count, p.collision_count)?
                    };
                    self.queue.schedule(ev);
                }
            }
        }
        Ok(())
    }

    /// Drift every particle to the given absolute time by linear motion.
    fn drift_all(&mut self, to_time: f64) {
        let dt = to_time - self.time_now;
        debug_assert!(dt >= -collide::EPS_TIME, "event time went backwards");
        if dt <= 0.0 {
            return;
        }
        for p in &mut self.particles {
            p.drift(dt);
        }
    }

    /// Elastic pair resolution. A degenerate contact is logged and skipped,
    /// with both epochs bumped by hand so events predicted for the pair
    /// still invalidate.
    fn resolve_collision(&mut self, i: usize, j: usize) {
        let t = self.time_now;
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let (head, tail) = self.particles.split_at_mut(hi);
        if let Err(e) = head[lo].bounce_off(&mut tail[0]) {
            warn!("skipping collision at t = {t}: {e}");
            head[lo].bump_collision_count();
            tail[0].bump_collision_count();
        }
    }

    /// Wall and obstacle bounces share the radial reflection and the same
    /// recovery path.
    fn resolve_radial_bounce(
        &mut self,
        i: usize,
        what: &str,
        bounce: fn(&mut Particle) -> Result<()>,
    ) {
        let t = self.time_now;
        let p = &mut self.particles[i];
        if let Err(e) = bounce(p) {
            warn!("skipping {what} bounce at t = {t}: {e}");
            p.bump_collision_count();
        }
    }

    /// Snapshot delivery never fails the run.
    fn emit<S: StateSink>(&self, sink: &mut S, time: f64) {
        if let Err(e) = sink.on_snapshot(time, &self.particles) {
            warn!("snapshot sink failed at t = {time}: {e}");
        }
    }
}
