//! In-memory poll store.
//!
//! ```text
//! DashMap<PollId, Arc<Slot>>          (sharded: lookups rarely contend)
//!                   │
//!                   └─ Slot { seq, RwLock<Poll> }   (one lock per poll)
//! ```
//!
//! The map shard guard is released before the poll lock is taken, so a
//! long-held poll lock never blocks lookups of other polls.

use crate::domain::Poll;
use crate::error::{StoreError, StoreResult};
use crate::ports::outbound::PollStore;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use shared_types::PollId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct Slot {
    /// Insertion sequence, used for listing order
    seq: u64,
    poll: RwLock<Poll>,
}

/// Concurrent in-memory [`PollStore`].
#[derive(Default)]
pub struct InMemoryPollStore {
    polls: DashMap<PollId, Arc<Slot>>,
    next_seq: AtomicU64,
}

impl InMemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, poll_id: &PollId) -> Option<Arc<Slot>> {
        self.polls.get(poll_id).map(|entry| Arc::clone(entry.value()))
    }
}

impl PollStore for InMemoryPollStore {
    fn insert(&self, poll: Poll) -> StoreResult<()> {
        let poll_id = poll.id();
        match self.polls.entry(poll_id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate { poll_id }),
            Entry::Vacant(vacant) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(Arc::new(Slot {
                    seq,
                    poll: RwLock::new(poll),
                }));
                Ok(())
            }
        }
    }

    fn read<R>(&self, poll_id: &PollId, f: impl FnOnce(&Poll) -> R) -> StoreResult<Option<R>> {
        Ok(self.slot(poll_id).map(|slot| f(&slot.poll.read())))
    }

    fn update<R>(
        &self,
        poll_id: &PollId,
        f: impl FnOnce(&mut Poll) -> R,
    ) -> StoreResult<Option<R>> {
        Ok(self.slot(poll_id).map(|slot| f(&mut slot.poll.write())))
    }

    fn scan<R>(&self, mut f: impl FnMut(&Poll) -> Option<R>) -> StoreResult<Vec<R>> {
        let mut slots: Vec<Arc<Slot>> = self
            .polls
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        slots.sort_by_key(|slot| slot.seq);

        Ok(slots
            .iter()
            .filter_map(|slot| f(&slot.poll.read()))
            .collect())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.polls.len())
    }
}
