//! State emission boundary.
//!
//! The engine pushes snapshots through [`StateSink`] and never reads them
//! back; a sink failure is the caller's problem to log, not the engine's to
//! recover from.

use crate::core::particle::Particle;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Receiver of periodic state snapshots.
///
/// Called once at t = 0 and once per tick, with particles in stable id
/// order.
pub trait StateSink {
    fn on_snapshot(&mut self, time: f64, particles: &[Particle]) -> Result<()>;
}

/// Writes each snapshot as `snapshot-<time>.txt` in one directory, the time
/// zero-padded to five columns (`snapshot-00.25.txt`), one `x y` line per
/// particle with five decimals.
#[derive(Debug)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Create the target directory (and parents) if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl StateSink for SnapshotWriter {
    fn on_snapshot(&mut self, time: f64, particles: &[Particle]) -> Result<()> {
        let path = self.dir.join(format!("snapshot-{time:05.2}.txt"));
        let mut w = BufWriter::new(File::create(path)?);
        for p in particles {
            writeln!(w, "{:.5} {:.5}", p.r[0], p.r[1])?;
        }
        w.flush()?;
        Ok(())
    }
}

/// One recorded snapshot: the full kinematic state at an instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub time: f64,
    pub positions: Vec<[f64; 2]>,
    pub velocities: Vec<[f64; 2]>,
}

/// In-memory sink collecting every frame, for tests and library callers
/// that post-process a run instead of streaming it to disk.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Frame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateSink for RecordingSink {
    fn on_snapshot(&mut self, time: f64, particles: &[Particle]) -> Result<()> {
        self.frames.push(Frame {
            time,
            positions: particles.iter().map(|p| p.r).collect(),
            velocities: particles.iter().map(|p| p.v).collect(),
        });
        Ok(())
    }
}
