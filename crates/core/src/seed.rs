//! Deterministic draws from the generation stream.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Exclusive upper bound for per-room layout and decoration seeds.
pub const ROOM_SEED_LIMIT: i32 = 99_999;

pub(crate) fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform draw from `[min, max)`. An empty range yields `min`.
pub(crate) fn random_range(rng: &mut ChaCha8Rng, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    let span = (i64::from(max) - i64::from(min)) as u64;
    (i64::from(min) + (rng.next_u64() % span) as i64) as i32
}

pub(crate) fn random_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u64() % len as u64) as usize
}

/// Partial Fisher-Yates: the first `count` items become a uniform sample.
pub(crate) fn shuffle_prefix<T>(rng: &mut ChaCha8Rng, items: &mut [T], count: usize) {
    let count = count.min(items.len());
    for i in 0..count {
        let j = i + random_index(rng, items.len() - i);
        items.swap(i, j);
    }
}
