use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// Kinds of scheduled events.
///
/// At equal times the rank here breaks the tie deterministically:
/// `Collision` < `WallHit` < `ObstacleHit` < `SnapshotTick`, then
/// participant ids, then epoch snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Two-disk collision between particles `a` and `b`.
    Collision { a: u32, b: u32 },
    /// Particle `a` reaches the circular container wall.
    WallHit { a: u32 },
    /// Particle `a` reaches the fixed central obstacle.
    ObstacleHit { a: u32 },
    /// Output checkpoint with no participants; never invalidated.
    SnapshotTick,
}

impl EventKind {
    #[inline]
    fn order_key(&self) -> (u8, u32, u32) {
        match *self {
            EventKind::Collision { a, b } => (0, a, b),
            EventKind::WallHit { a } => (1, a, 0),
            EventKind::ObstacleHit { a } => (2, a, 0),
            EventKind::SnapshotTick => (3, 0, 0),
        }
    }
}

/// A scheduled event with the collision-epoch snapshots taken at creation.
///
/// Events are immutable once scheduled. Invalidation is lazy: an event whose
/// snapshots no longer match the participants' live epochs is discarded when
/// it surfaces from the queue, never removed eagerly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: NotNan<f64>,
    pub kind: EventKind,
    pub epoch_a: Option<u64>,
    pub epoch_b: Option<u64>,
}

impl Event {
    fn new(time: f64, kind: EventKind, epoch_a: Option<u64>, epoch_b: Option<u64>) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::InvalidParam(format!(
                "event time must be finite, got {time}"
            )));
        }
        let time =
            NotNan::new(time).map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        Ok(Self {
            time,
            kind,
            epoch_a,
            epoch_b,
        })
    }

    /// Two-disk collision, snapshotting both participants' epochs.
    pub fn collision(time: f64, a: u32, b: u32, epoch_a: u64, epoch_b: u64) -> Result<Self> {
        Self::new(time, EventKind::Collision { a, b }, Some(epoch_a), Some(epoch_b))
    }

    /// Wall hit for particle `a`, snapshotting its epoch.
    pub fn wall_hit(time: f64, a: u32, epoch: u64) -> Result<Self> {
        Self::new(time, EventKind::WallHit { a }, Some(epoch), None)
    }

    /// Obstacle hit for particle `a`, snapshotting its epoch.
    pub fn obstacle_hit(time: f64, a: u32, epoch: u64) -> Result<Self> {
        Self::new(time, EventKind::ObstacleHit { a }, Some(epoch), None)
    }

    /// Output checkpoint at `time`; carries no epochs and is always valid.
    pub fn snapshot_tick(time: f64) -> Result<Self> {
        Self::new(time, EventKind::SnapshotTick, None, None)
    }

    /// Raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// Participant ids in slot order. Single-participant kinds fill only the
    /// first slot; `SnapshotTick` fills neither.
    #[inline]
    pub fn participants(&self) -> [Option<u32>; 2] {
        match self.kind {
            EventKind::Collision { a, b } => [Some(a), Some(b)],
            EventKind::WallHit { a } | EventKind::ObstacleHit { a } => [Some(a), None],
            EventKind::SnapshotTick => [None, None],
        }
    }

    /// Participant ids paired with the epoch snapshotted for each at
    /// creation time.
    #[inline]
    fn stamps(&self) -> [Option<(u32, u64)>; 2] {
        let [a, b] = self.participants();
        [
            a.zip(self.epoch_a),
            b.zip(self.epoch_b),
        ]
    }

    /// True iff every participant's live epoch still matches the snapshot
    /// taken when this event was scheduled. `live_epoch` maps a particle id
    /// to its current collision epoch.
    pub fn is_valid<F>(&self, live_epoch: F) -> bool
    where
        F: Fn(u32) -> u64,
    {
        self.stamps()
            .into_iter()
            .flatten()
            .all(|(id, epoch)| live_epoch(id) == epoch)
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => {
                let a = self.kind.order_key();
                let b = other.kind.order_key();
                match a.cmp(&b) {
                    Ordering::Equal => (self.epoch_a, self.epoch_b)
                        .cmp(&(other.epoch_a, other.epoch_b)),
                    o => o,
                }
            }
            o => o,
        }
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
