//! Component E: online batch-means output analysis.
//!
//! Consumes a stream of scalar observations, groups them into equal-size batches after discarding an
//! initial transient, and reports a Student-t confidence half-width on the grand mean, signaling when
//! that half-width relative to the mean falls under a target precision.

/// Upper `p`-quantile of the standard normal distribution via the Hastings (1955) rational
/// approximation.
///
/// Accurate to within 1e-6 for `p` in `[1e-6, 1 - 1e-6]`. Ported coefficient-for-coefficient from the
/// MacDougall SMPL-lineage reference this module descends from; see `DESIGN.md`.
fn normal_quantile(p: f64) -> f64 {
    let q = p.min(1.0 - p);
    let z1 = (-2.0 * q.ln()).sqrt();
    let n = (0.010328 * z1 + 0.802853) * z1 + 2.515517;
    let d = ((0.001308 * z1 + 0.189269) * z1 + 1.43278) * z1 + 1.0;
    let z = z1 - n / d;
    if p > 0.5 {
        -z
    } else {
        z
    }
}

/// Upper `p`-quantile of Student's t distribution with `ndf` degrees of freedom, via a
/// Fisher-Cornish-style correction to [`normal_quantile`].
///
/// Accurate to within 1e-6 for `p` in `[1e-6, 1 - 1e-6]` and `ndf` in `[1, 100]`.
fn t_quantile(p: f64, ndf: f64) -> f64 {
    let q = p.min(1.0 - p);
    let z = normal_quantile(q).abs();
    let z2 = z * z;

    let h0 = 0.25 * z * (z2 + 1.0);
    let h1 = 0.010416667 * z * ((5.0 * z2 + 16.0) * z2 + 3.0);
    let h2 = 0.002604167 * z * (((3.0 * z2 + 19.0) * z2 + 17.0) * z2 - 15.0);
    let h3 = 0.000010851 * z * ((((79.0 * z2 + 776.0) * z2 + 1482.0) * z2 - 1920.0) * z2 - 945.0);
    let x = (((h3 / ndf + h2) / ndf + h1) / ndf + h0) / ndf;

    let t = z + x;
    if p > 0.5 {
        -t
    } else {
        t
    }
}

/// A completed batch-means estimate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BatchMeansResult {
    /// Grand mean across all completed batches.
    pub mean: f64,
    /// Half-width of the confidence interval on `mean` at the configured confidence level.
    pub half_width: f64,
    /// Number of completed batches the estimate is based on.
    pub num_batches: u64,
}

/// Minimum number of batches required before a result is reported, matching the reference
/// implementation's own safeguard against unstable low-sample-size t-quantiles.
const MIN_BATCHES: u64 = 10;

/// Online batch-means estimator for a single scalar observation stream.
#[derive(Debug, Default)]
pub struct BatchMeans {
    transient_remaining: u64,
    batch_size: u64,
    precision: f64,
    confidence_level: f64,

    in_batch_sum: f64,
    in_batch_count: u64,

    grand_sum: f64,
    grand_sum_sq: f64,
    num_batches: u64,

    last_result: Option<BatchMeansResult>,
}

impl BatchMeans {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reset all analyzer state and begin collecting under a new configuration.
    ///
    /// `transient_obs` observations are discarded before batching begins. `precision` is the target
    /// relative half-width (`half_width / mean`); `confidence_level` is e.g. `0.95`.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size == 0`: a zero-size batch can never complete, which is always a programmer
    /// error rather than a runtime condition.
    pub fn configure(&mut self, transient_obs: u64, batch_size: u64, precision: f64, confidence_level: f64) {
        assert!(batch_size > 0, "batch_means: batch_size must be nonzero");

        *self = Self {
            transient_remaining: transient_obs,
            batch_size,
            precision,
            confidence_level,
            ..Self::default()
        };
    }

    /// Feed one observation. Returns `true` when the confidence half-width relative to the grand mean
    /// has fallen at or below the configured precision, a signal that the host may stop simulating.
    pub fn observe(&mut self, value: f64) -> bool {
        if self.transient_remaining > 0 {
            self.transient_remaining -= 1;
            return false;
        }

        self.in_batch_sum += value;
        self.in_batch_count += 1;

        if self.in_batch_count < self.batch_size {
            return false;
        }

        let batch_mean = self.in_batch_sum / self.batch_size as f64;
        self.grand_sum += batch_mean;
        self.grand_sum_sq += batch_mean * batch_mean;
        self.num_batches += 1;
        self.in_batch_sum = 0.0;
        self.in_batch_count = 0;

        if self.num_batches < MIN_BATCHES {
            return false;
        }

        let num_batches = self.num_batches as f64;
        let grand_mean = self.grand_sum / num_batches;
        let sample_variance = (self.grand_sum_sq - num_batches * grand_mean * grand_mean) / (num_batches - 1.0);
        let half_width =
            t_quantile((1.0 - self.confidence_level) / 2.0, num_batches - 1.0) * (sample_variance / num_batches).sqrt();

        self.last_result = Some(BatchMeansResult {
            mean: grand_mean,
            half_width,
            num_batches: self.num_batches,
        });

        half_width / grand_mean <= self.precision
    }

    /// The most recently computed estimate, or `None` if fewer than 10 batches have completed.
    pub fn result(&self) -> Option<BatchMeansResult> {
        self.last_result
    }
}
