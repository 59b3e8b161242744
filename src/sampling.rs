//! Burst + rate sampling
//!
//! Entries are bucketed by level and by an FNV-1a hash of their message. Each
//! bucket counts entries within a one-second tick: the first `initial` pass, and
//! after that only every `thereafter`-th. Buckets are plain atomics, so sampling
//! never takes a lock; hash collisions simply share a bucket.

use crate::config::SamplingConfig;
use crate::level::Level;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

const COUNTERS_PER_LEVEL: usize = 4096;
const TICK: Duration = Duration::from_secs(1);

#[derive(Default)]
struct Counter {
    reset_at: AtomicI64,
    count: AtomicU64,
}

impl Counter {
    /// Increment, starting a fresh tick first if the current one has elapsed
    fn inc_check_reset(&self, now: i64, tick: i64) -> u64 {
        let reset_after = self.reset_at.load(Ordering::Acquire);
        if reset_after > now {
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }

        self.count.store(1, Ordering::Release);
        if self
            .reset_at
            .compare_exchange(reset_after, now + tick, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // Another thread started the tick; count against it.
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }
        1
    }
}

pub(crate) struct Sampler {
    initial: u64,
    thereafter: u64,
    tick: i64,
    epoch: Instant,
    counters: Box<[Counter]>,
}

impl Sampler {
    pub(crate) fn new(config: SamplingConfig) -> Self {
        let counters = (0..Level::ALL.len() * COUNTERS_PER_LEVEL)
            .map(|_| Counter::default())
            .collect();
        Self {
            initial: u64::from(config.initial),
            thereafter: u64::from(config.thereafter),
            tick: TICK.as_nanos() as i64,
            epoch: Instant::now(),
            counters,
        }
    }

    /// Whether an entry should be written
    pub(crate) fn sample(&self, level: Level, message: &str) -> bool {
        // Offset by one tick so the zeroed counters start out expired.
        let now = self.epoch.elapsed().as_nanos() as i64 + self.tick;
        self.sample_at(level, message, now)
    }

    fn sample_at(&self, level: Level, message: &str, now: i64) -> bool {
        let slot = fnv32a(message) as usize % COUNTERS_PER_LEVEL;
        let counter = &self.counters[level.index() * COUNTERS_PER_LEVEL + slot];
        let n = counter.inc_check_reset(now, self.tick);

        if n <= self.initial {
            return true;
        }
        self.thereafter != 0 && (n - self.initial) % self.thereafter == 0
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("initial", &self.initial)
            .field("thereafter", &self.thereafter)
            .finish_non_exhaustive()
    }
}

fn fnv32a(s: &str) -> u32 {
    const OFFSET: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;
    s.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(PRIME))
}
