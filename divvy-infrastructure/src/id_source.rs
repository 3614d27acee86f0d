use std::sync::atomic::{AtomicU64, Ordering};

use arcstr::ArcStr;
use divvy_ledger::IdSource;
use uuid::Uuid;

/// Production id source backed by random v4 UUIDs.
#[derive(Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_token(&self) -> ArcStr {
        ArcStr::from(Uuid::new_v4().to_string())
    }
}

/// Deterministic id source for tests and scripted runs: `p-0`, `p-1`, ...
/// with a configurable prefix.
pub struct SequentialIdSource {
    prefix: &'static str,
    counter: AtomicU64,
}

impl SequentialIdSource {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdSource {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdSource for SequentialIdSource {
    fn next_token(&self) -> ArcStr {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        ArcStr::from(format!("{}-{n}", self.prefix))
    }
}
