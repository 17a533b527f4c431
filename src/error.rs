use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the hard-disk simulation core.
///
/// Two conditions that look like errors are deliberately absent: a collision
/// predictor finding no future contact reports `None` (the normal outcome for
/// separating or non-intersecting trajectories), and the event queue running
/// dry is the normal end of a run. Neither ever propagates as a failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or API parameter; aborts initialization.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A bounce was attempted with a zero-length contact normal (particle
    /// exactly at the origin for wall/obstacle bounces, or zero contact
    /// distance for a pair). Recoverable: the engine skips the bounce and
    /// keeps the run alive.
    #[error("degenerate geometry: particle {id} has a zero-length contact normal")]
    DegenerateGeometry { id: u32 },

    /// Propagated I/O errors from snapshot writers.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
