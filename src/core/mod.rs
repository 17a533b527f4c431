//! Core engine types: particles, collision math, events, the queue, the
//! neighbor grid and the simulation loop.

pub mod collide;
pub mod event;
pub mod grid;
pub mod particle;
pub mod queue;
pub mod sim;

pub use event::{Event, EventKind};
pub use grid::CellGrid;
pub use particle::Particle;
pub use queue::EventQueue;
pub use sim::{RunState, Simulation};
