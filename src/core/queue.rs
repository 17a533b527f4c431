use crate::core::event::Event;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Priority queue of pending events, soonest first.
///
/// Scheduling never removes or rewrites entries. Stale events (epoch
/// snapshots that no longer match the live particles) stay in the heap and
/// are skipped when they surface in [`EventQueue::pop_next_valid`].
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event. Duplicates and soon-to-be-stale entries are fine.
    #[inline]
    pub fn schedule(&mut self, event: Event) {
        self.heap.push(Reverse(event));
    }

    /// Pop events in (time, tie-break) order, silently dropping every stale
    /// one, until a valid event or an empty heap is found. `live_epoch` maps
    /// a particle id to its current collision epoch.
    pub fn pop_next_valid<F>(&mut self, live_epoch: F) -> Option<Event>
    where
        F: Fn(u32) -> u64,
    {
        while let Some(Reverse(event)) = self.heap.pop() {
            if event.is_valid(&live_epoch) {
                return Some(event);
            }
        }
        None
    }

    /// Number of pending entries, stale ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn empty_queue_pops_none() {
        let mut q = EventQueue::new();
        assert!(q.pop_next_valid(|_| 0).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn stale_entry_is_skipped_between_valid_events() -> Result<()> {
        // Three pending events: a stale one at t = 1.0 (snapshot epoch 0,
        // live epoch 1), and valid ones at t = 0.5 and t = 2.0. The valid
        // t = 0.5 event must surface first and the stale entry must be
        // consumed, leaving only t = 2.0 behind.
        let mut q = EventQueue::new();
        q.schedule(Event::wall_hit(1.0, 7, 0)?);
        q.schedule(Event::wall_hit(0.5, 3, 1)?);
        q.schedule(Event::wall_hit(2.0, 7, 1)?);

        let live = |_id: u32| 1u64;
        let first = q.pop_next_valid(live).expect("t = 0.5 must surface");
        assert_eq!(first.time_f64(), 0.5);

        let second = q.pop_next_valid(live).expect("t = 2.0 must surface");
        assert_eq!(second.time_f64(), 2.0);

        assert!(q.pop_next_valid(live).is_none());
        Ok(())
    }

    #[test]
    fn equal_times_pop_in_kind_rank_order() -> Result<()> {
        let mut q = EventQueue::new();
        q.schedule(Event::snapshot_tick(1.0)?);
        q.schedule(Event::collision(1.0, 0, 1, 0, 0)?);
        q.schedule(Event::wall_hit(1.0, 2, 0)?);

        let live = |_id: u32| 0u64;
        let kinds: Vec<_> = std::iter::from_fn(|| q.pop_next_valid(live))
            .map(|e| e.kind)
            .collect();
        assert!(matches!(
            kinds[..],
            [
                crate::core::event::EventKind::Collision { .. },
                crate::core::event::EventKind::WallHit { .. },
                crate::core::event::EventKind::SnapshotTick,
            ]
        ));
        Ok(())
    }

    #[test]
    fn all_stale_entries_drain_to_none() -> Result<()> {
        let mut q = EventQueue::new();
        q.schedule(Event::collision(0.1, 0, 1, 5, 5)?);
        q.schedule(Event::obstacle_hit(0.2, 0, 5)?);
        assert_eq!(q.len(), 2);
        assert!(q.pop_next_valid(|_| 6).is_none());
        assert!(q.is_empty());
        Ok(())
    }
}
