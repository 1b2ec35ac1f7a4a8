//! Per-tick publication of trajectory heads for consumers on other threads.
//!
//! The simulation publishes one immutable [`HeadSnapshot`] after each tick.
//! Readers clone the latest `Arc` and never see a tick in progress.

use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec3;

/// Latest position of every trajectory after a completed tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadSnapshot {
    /// Tick that produced this snapshot.
    pub tick: u64,
    /// Current positions in spawn order.
    pub heads: Vec<Vec3>,
}

type Slot = Arc<Mutex<Arc<HeadSnapshot>>>;

/// Create a connected publisher/reader pair holding an empty snapshot.
pub fn channel() -> (SnapshotPublisher, SnapshotReader) {
    let slot: Slot = Arc::new(Mutex::new(Arc::new(HeadSnapshot::default())));
    (
        SnapshotPublisher { slot: slot.clone() },
        SnapshotReader { slot },
    )
}

/// Write side, owned by the simulation.
#[derive(Debug)]
pub struct SnapshotPublisher {
    slot: Slot,
}

impl SnapshotPublisher {
    /// Replace the published snapshot.
    pub fn publish(&self, snapshot: HeadSnapshot) {
        let snapshot = Arc::new(snapshot);
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}

/// Read side. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Slot,
}

impl SnapshotReader {
    /// The most recently published snapshot.
    pub fn latest(&self) -> Arc<HeadSnapshot> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_reader_starts_empty() {
        let (_publisher, reader) = channel();
        let snap = reader.latest();
        assert_eq!(snap.tick, 0);
        assert!(snap.heads.is_empty());
    }

    #[test]
    fn test_reader_sees_latest_publication() {
        let (publisher, reader) = channel();
        publisher.publish(HeadSnapshot {
            tick: 1,
            heads: vec![Vec3::ONE],
        });
        let held = reader.latest();
        publisher.publish(HeadSnapshot {
            tick: 2,
            heads: vec![Vec3::ONE, Vec3::X],
        });

        // Earlier snapshot is unaffected by later publications
        assert_eq!(held.tick, 1);
        assert_eq!(held.heads.len(), 1);
        assert_eq!(reader.latest().tick, 2);
    }

    #[test]
    fn test_snapshots_are_whole_across_threads() {
        let (publisher, reader) = channel();
        let handle = thread::spawn(move || {
            for _ in 0..1000 {
                let snap = reader.latest();
                // Each published tick n carries exactly n heads
                assert_eq!(snap.heads.len() as u64, snap.tick);
            }
        });
        for tick in 1..200u64 {
            publisher.publish(HeadSnapshot {
                tick,
                heads: vec![Vec3::ZERO; tick as usize],
            });
        }
        handle.join().unwrap();
    }
}
