//! Component A: 101 independent pseudo-random number streams.
//!
//! Each stream is a multiplicative linear congruential generator with prime modulus `M = 2^31 - 1` and
//! multiplier `A = 630360016`. The historical reference implementation this crate ports splits the
//! multiplier into two factors (`24112` and `26143`) to avoid a 64-bit product on machines without
//! native 64-bit arithmetic; since `i64` arithmetic is native-width on every target Rust supports, this
//! implementation instead computes `z' = (A * z) mod M` directly with a single 64-bit multiply, which is
//! bit-exact with the split-multiplier formulation.

use std::sync::OnceLock;

/// Number of independent streams. Stream 0 is the default used by [`crate::distributions`].
pub const STREAM_COUNT: usize = 101;

/// Prime modulus shared by every stream.
const MODULUS: i64 = 2_147_483_647; // 2^31 - 1
/// Multiplier; equivalent to the reference's split `A1 = 24112, A2 = 26143`.
const MULTIPLIER: i64 = 630_360_016;
/// Number of LCG steps separating each stream's initial seed from the next.
const SEED_SPACING: u32 = 1_000_000;

/// Advance a single LCG state by one step.
const fn step(z: i64) -> i64 {
    (MULTIPLIER * z) % MODULUS
}

/// Advance `z` by `n` LCG steps.
const fn advance(mut z: i64, n: u32) -> i64 {
    let mut i = 0;
    while i < n {
        z = step(z);
        i += 1;
    }
    z
}

/// Derives the 101-entry table of initial seeds, one per stream, each `SEED_SPACING` steps apart.
///
/// The reference implementation this crate ports ships a literal seed table, baked in for bit
/// compatibility with a specific prior C codebase. That table was not available to this port (see
/// `DESIGN.md`), so this function instead *derives* an equivalent table from the documented
/// generation rule: stream 0 starts at seed `1`, and every subsequent stream is `SEED_SPACING` LCG
/// steps ahead of the previous one. This preserves every property this crate's contract actually
/// promises (determinism, independence across streams, the mantissa-extraction formula) without
/// claiming bit-compatibility with any specific external reference binary. A caller that needs that
/// compatibility should call [`Prng::seed`] explicitly with the historical values once obtained.
fn derive_seed_table() -> [i64; STREAM_COUNT] {
    let mut table = [0i64; STREAM_COUNT];
    table[0] = 1;
    for i in 1..STREAM_COUNT {
        table[i] = advance(table[i - 1], SEED_SPACING);
    }
    table
}

fn seed_table() -> &'static [i64; STREAM_COUNT] {
    static TABLE: OnceLock<[i64; STREAM_COUNT]> = OnceLock::new();
    TABLE.get_or_init(derive_seed_table)
}

/// 101 independent multiplicative LCG streams, reproducible given a seed per stream.
///
/// A [`Prng`] is owned by a single [`crate::Kernel`] (never global/static state), so two kernels never
/// share or contend over stream state; seeding one kernel's stream 5 has no effect on any other
/// kernel's stream 5.
#[derive(Debug, Clone)]
pub struct Prng {
    seeds: [i64; STREAM_COUNT],
}

impl Default for Prng {
    fn default() -> Self {
        Self::new()
    }
}

impl Prng {
    /// Construct a fresh set of streams from the crate's derived seed table.
    pub fn new() -> Self {
        Self {
            seeds: *seed_table(),
        }
    }

    fn check_stream(stream: usize) {
        assert!(
            stream < STREAM_COUNT,
            "rng: stream index {stream} out of range, must be less than {STREAM_COUNT}"
        );
    }

    /// Advance `stream` one LCG step and return the resulting U(0,1) sample.
    ///
    /// # Panics
    ///
    /// Panics if `stream >= 101`. An out-of-range stream index is always a programmer error: this
    /// crate bounds-checks rather than silently wrapping or clamping.
    pub fn random(&mut self, stream: usize) -> f64 {
        Self::check_stream(stream);
        let z = step(self.seeds[stream]);
        self.seeds[stream] = z;
        mantissa(z)
    }

    /// Overwrite the current state of `stream`.
    ///
    /// # Panics
    ///
    /// Panics if `stream >= 101`.
    pub fn seed(&mut self, stream: usize, value: i64) {
        Self::check_stream(stream);
        self.seeds[stream] = value;
    }

    /// Read the current state of `stream` without advancing it.
    ///
    /// # Panics
    ///
    /// Panics if `stream >= 101`.
    pub fn stream_value(&self, stream: usize) -> i64 {
        Self::check_stream(stream);
        self.seeds[stream]
    }
}

/// Extract a U(0,1) sample from a raw LCG state.
///
/// `((z >> 7) | 1) / 16777216.0` yields a value in the open interval (0, 1) with 24 significant bits
/// and a strictly non-zero low bit, which keeps it safe as input to `ln` in the exponential primitive.
fn mantissa(z: i64) -> f64 {
    (((z >> 7) | 1) as f64) / 16_777_216.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_then_read_round_trips() {
        let mut rng = Prng::new();
        rng.seed(3, 1973272912);
        assert_eq!(1973272912, rng.stream_value(3));
    }

    #[test]
    fn random_advances_state_by_one_lcg_step() {
        let mut rng = Prng::new();
        rng.seed(1, 1973272912);
        let before = rng.stream_value(1);
        rng.random(1);
        assert_eq!(step(before), rng.stream_value(1), "random() should apply exactly one LCG step");
    }

    #[test]
    fn random_produces_values_strictly_inside_unit_interval() {
        let mut rng = Prng::new();
        for _ in 0..10_000 {
            let u = rng.random(0);
            assert!(u > 0.0 && u < 1.0, "sample {u} escaped the open unit interval");
        }
    }

    #[test]
    fn streams_are_independent() {
        let mut rng = Prng::new();
        rng.seed(0, 42);
        rng.seed(1, 42);
        let a = rng.random(0);
        // stream 1 was untouched by drawing from stream 0
        assert_eq!(42, rng.stream_value(1));
        let b = rng.random(1);
        assert_eq!(a, b, "two streams seeded identically should produce identical first draws");
    }

    #[test]
    fn two_fresh_prngs_reproduce_each_other() {
        let mut a = Prng::new();
        let mut b = Prng::new();
        for s in 0..STREAM_COUNT {
            assert_eq!(a.random(s), b.random(s), "stream {s} diverged between independent Prng instances");
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn random_panics_on_out_of_range_stream() {
        let mut rng = Prng::new();
        rng.random(STREAM_COUNT);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn seed_panics_on_out_of_range_stream() {
        let mut rng = Prng::new();
        rng.seed(STREAM_COUNT, 0);
    }

    #[test]
    fn seed_table_entries_are_spaced_by_one_million_steps() {
        let table = seed_table();
        assert_eq!(1, table[0]);
        assert_eq!(advance(table[0], SEED_SPACING), table[1]);
        assert_eq!(advance(table[99], SEED_SPACING), table[100]);
    }
}
