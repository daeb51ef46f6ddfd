//! Component B: distribution primitives built on [`crate::rng::Prng`]'s stream 0.
//!
//! Deliberately out of scope: arbitrary user-supplied distributions. Hosts that need something other
//! than exponential or uniform service/arrival times can still draw raw U(0,1) samples from any stream
//! via [`Prng::random`] and transform them by hand.

use crate::rng::Prng;

impl Prng {
    /// Draw an exponentially distributed value with the given `mean`, using stream 0.
    ///
    /// Computed as `-mean * ln(U)`. The mantissa extraction in [`Prng::random`] guarantees `U` is
    /// strictly positive, so this never evaluates `ln` at zero.
    pub fn exponential(&mut self, mean: f64) -> f64 {
        -mean * self.random(0).ln()
    }

    /// Draw a uniformly distributed value in `[a, b)` (or `[b, a)` if `a > b`), using stream 0.
    pub fn uniform(&mut self, a: f64, b: f64) -> f64 {
        let (lo, hi) = if a > b { (b, a) } else { (a, b) };
        lo + (hi - lo) * self.random(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_is_always_nonnegative() {
        let mut rng = Prng::new();
        for _ in 0..1_000 {
            assert!(rng.exponential(10.0) >= 0.0);
        }
    }

    #[test]
    fn exponential_mean_is_approximately_correct() {
        let mut rng = Prng::new();
        let n = 200_000;
        let mean = 30.0;
        let sum: f64 = (0..n).map(|_| rng.exponential(mean)).sum();
        let sample_mean = sum / n as f64;
        let relative_error = (sample_mean - mean).abs() / mean;
        assert!(relative_error < 0.02, "sample mean {sample_mean} too far from {mean}");
    }

    #[test]
    fn uniform_swaps_out_of_order_bounds() {
        let mut rng = Prng::new();
        rng.seed(0, 1973272912);
        let mut rng2 = Prng::new();
        rng2.seed(0, 1973272912);
        assert_eq!(rng.uniform(10.0, 0.0), rng2.uniform(0.0, 10.0));
    }

    #[test]
    fn uniform_stays_within_bounds() {
        let mut rng = Prng::new();
        for _ in 0..10_000 {
            let u = rng.uniform(-5.0, 5.0);
            assert!((-5.0..5.0).contains(&u));
        }
    }
}
