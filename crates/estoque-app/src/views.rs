use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// A listing slot refreshed by concurrent, unordered reloads. Each reload
/// takes a stamp before its request; a publish only lands if no
/// newer-stamped reload has published first, so a slow stale response can
/// never overwrite fresher data.
pub struct Versioned<T> {
    next: AtomicU64,
    slot: Mutex<Slot<T>>,
}

struct Slot<T> {
    stamp: u64,
    value: T,
}

impl<T: Clone> Versioned<T> {
    pub fn new(initial: T) -> Self {
        Self {
            next: AtomicU64::new(0),
            slot: Mutex::new(Slot {
                stamp: 0,
                value: initial,
            }),
        }
    }

    /// Claim a stamp for a reload that is about to start.
    pub fn begin(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish the reload's result. Returns false if a newer reload already
    /// published, in which case the value is discarded.
    pub fn publish(&self, stamp: u64, value: T) -> bool {
        let mut slot = self.slot.lock();
        if stamp <= slot.stamp {
            return false;
        }
        slot.stamp = stamp;
        slot.value = value;
        true
    }

    pub fn get(&self) -> T {
        self.slot.lock().value.clone()
    }
}

impl<T: Clone + Default> Default for Versioned<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
