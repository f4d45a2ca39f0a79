//! Read/write discipline for a table's items.
//!
//! Every read is strongly consistent: a write holds the table's exclusive
//! lock for its whole mutation and releases it only once the mutation is
//! complete, so any read that starts after a write returns observes it and no
//! read ever sees half of one. Readers share the lock and copy out what they
//! need before releasing it; the store's items are never handed out by
//! reference.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::Error;
use crate::store::ItemStore;

/// A value read from a table together with the commit sequence it reflects.
#[derive(Debug, Clone, PartialEq)]
pub struct Observed<T> {
    pub value: T,
    /// Number of writes committed to the table when the read was served.
    pub sequence: u64,
}

/// An item store guarded by a single-writer, multi-reader lock.
#[derive(Debug, Default)]
pub struct ConsistentStore {
    store: RwLock<ItemStore>,
    /// Bumped inside the write lock, so a reader holding the read lock always
    /// sees the sequence matching the store contents.
    committed: AtomicU64,
}

impl ConsistentStore {
    pub fn new(store: ItemStore) -> Self {
        Self {
            store: RwLock::new(store),
            committed: AtomicU64::new(0),
        }
    }

    /// Run a read against the latest committed state.
    pub fn read<F, R>(&self, f: F) -> Observed<R>
    where
        F: FnOnce(&ItemStore) -> R,
    {
        let guard = self.store.read();
        let sequence = self.committed.load(Ordering::Acquire);
        Observed {
            value: f(&guard),
            sequence,
        }
    }

    /// Run a mutation under the exclusive lock.
    ///
    /// The closure must validate before it mutates: an `Err` is returned to
    /// the caller as is and does not advance the commit sequence.
    pub fn write<F, R>(&self, f: F) -> Result<Observed<R>, Error>
    where
        F: FnOnce(&mut ItemStore) -> Result<R, Error>,
    {
        let mut guard = self.store.write();
        let value = f(&mut guard)?;
        let sequence = self.committed.fetch_add(1, Ordering::AcqRel) + 1;
        Ok(Observed { value, sequence })
    }

    /// Number of writes committed so far.
    pub fn committed_sequence(&self) -> u64 {
        self.committed.load(Ordering::Acquire)
    }
}
