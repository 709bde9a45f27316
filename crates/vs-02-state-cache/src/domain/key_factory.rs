//! # Session Key Factories
//!
//! Draw the sequence part of a server-side view key.

use shared_crypto::random_bytes;
use shared_types::{view_id_hash, Session, SerializedViewKey, ViewKeySequence};
use std::sync::atomic::{AtomicU32, Ordering};

use super::config::KeyStrategy;

/// Produces keys for views saved in a session.
pub trait ViewKeyFactory: Send + Sync + std::fmt::Debug {
    fn next_key(&self, session: &Session, view_id: &str) -> SerializedViewKey;
}

/// Build the factory for `strategy`.
pub fn key_factory(strategy: KeyStrategy) -> Box<dyn ViewKeyFactory> {
    match strategy {
        KeyStrategy::Counter => Box::new(CounterKeyFactory),
        KeyStrategy::Random => Box::new(RandomKeyFactory),
    }
}

/// Per-session sequence stored in the session extensions.
#[derive(Debug, Default)]
pub struct SequenceCounter(AtomicU32);

impl SequenceCounter {
    /// Next value, starting at 1 and wrapping back to 1 before overflow.
    pub fn next(&self) -> u32 {
        let previous = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(if current == u32::MAX { 1 } else { current + 1 })
            })
            .unwrap_or_else(|current| current);
        if previous == u32::MAX {
            1
        } else {
            previous + 1
        }
    }

    #[cfg(test)]
    pub(crate) fn starting_at(value: u32) -> Self {
        Self(AtomicU32::new(value))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CounterKeyFactory;

impl ViewKeyFactory for CounterKeyFactory {
    fn next_key(&self, session: &Session, view_id: &str) -> SerializedViewKey {
        let counter = session.get_or_insert_with(SequenceCounter::default);
        SerializedViewKey::counter(view_id, counter.next())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyFactory;

impl ViewKeyFactory for RandomKeyFactory {
    fn next_key(&self, _session: &Session, view_id: &str) -> SerializedViewKey {
        SerializedViewKey::new(view_id_hash(view_id), ViewKeySequence::Random(random_bytes()))
    }
}
