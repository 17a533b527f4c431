//! Event-driven hard-disk simulator.
//!
//! Circular particles move ballistically inside a circular container,
//! optionally around a fixed central obstacle, and collide elastically with
//! each other and with the boundaries. Time jumps from event to event: a
//! priority queue holds analytically predicted collisions and snapshot
//! ticks, stale predictions die lazily through per-particle collision
//! epochs, and a uniform cell grid prunes which pairs are worth predicting.
//!
//! ```no_run
//! use disksim::{RecordingSink, SimConfig, Simulation};
//!
//! # fn main() -> disksim::Result<()> {
//! let config = SimConfig {
//!     particle_count: 100,
//!     seed: Some(42),
//!     ..SimConfig::default()
//! };
//! let mut sim = Simulation::new(config)?;
//! let mut sink = RecordingSink::new();
//! sim.run(&mut sink)?;
//! println!("{} frames recorded", sink.frames.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod place;

pub use config::SimConfig;
pub use core::{CellGrid, Event, EventKind, EventQueue, Particle, RunState, Simulation};
pub use error::{Error, Result};
pub use output::{Frame, RecordingSink, SnapshotWriter, StateSink};
