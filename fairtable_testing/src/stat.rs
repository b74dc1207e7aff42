//! Implements various empirical tests for testing hash functions.
use crate::{Generate, Jitter};
use ndarray::prelude::*;
use ndarray::Zip;
use num_traits::ToPrimitive;
use rand::prelude::*;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt::Debug;

/// Counts co-occurring categories of two equally sized 1-D arrays.
pub fn make_contingency_matrix<T>(x: &Array1<T>, y: &Array1<T>, num_categories: usize) -> Array2<f64>
where
    T: ToPrimitive,
{
    debug_assert_eq!(x.len(), y.len(), r#""x" and "y" must have equal length"#);

    let mut contingency = Array2::<f64>::zeros((num_categories, num_categories));
    Zip::from(x).and(y).for_each(|xv, yv| {
        let (Some(xix), Some(yix)) = (xv.to_usize(), yv.to_usize()) else {
            panic!("Categories must be non-negative integers");
        };
        contingency[[xix, yix]] += 1.0;
    });
    contingency
}

/// An aggregation of p-values from multiple runs of a statistical test.
#[derive(Debug)]
pub struct PValueAggregation {
    pub outcome: bool,
    pub alpha: f64,
    pub expected_passes: f64,
    pub num_passes: usize,
    pub uniformity: Chi2Statistic,
}

/// Aggregates test results from multiple runs of a statistical test.
///
/// # Notes
///
/// Based on [Bassham et al. (2010)], section 4.2: the pass count must reach the lower
/// confidence bound and the p-values themselves must be uniform over deciles.
///
/// [Bassham et al. (2010)]: https://doi.org/10.6028/NIST.SP.800-22r1a
pub fn aggregate_p_values(p_values: &Array1<f64>, alpha: f64) -> PValueAggregation {
    let num_trials = p_values.len() as f64;
    let pass_rate = 1.0 - alpha;
    let confidence = 3.0 * ((pass_rate * (1.0 - pass_rate)) / num_trials).sqrt();
    let expected_passes = num_trials * (pass_rate - confidence);
    let num_passes = p_values.iter().filter(|&&p| p >= alpha).count();

    let mut deciles = Array1::<f64>::zeros(10);
    for p in p_values {
        deciles[((p * 10.0).floor() as usize).min(9)] += 1.0;
    }
    let uniformity = chi2_uniformity(&deciles);

    PValueAggregation {
        outcome: num_passes as f64 >= expected_passes && uniformity.p_value > alpha,
        alpha,
        expected_passes,
        num_passes,
        uniformity,
    }
}

/// A result of a Chi-square test.
#[derive(Debug)]
pub struct Chi2Statistic {
    pub chi2: f64,
    pub dof: usize,
    pub p_value: f64,
}

/// Calculates the chi-square statistic, `dof` defaults to one less than the cell count.
pub fn chi2(observed: ArrayView1<f64>, expected: ArrayView1<f64>, dof: Option<usize>) -> Chi2Statistic {
    debug_assert_eq!(observed.len(), expected.len(), "Dimensions must match");
    let chi2 = Zip::from(observed)
        .and(expected)
        .fold(0.0, |acc, &obs, &exp| acc + (obs - exp).powi(2) / exp);

    let dof = dof.unwrap_or(observed.len() - 1);
    let p_value = match ChiSquared::new(dof as f64) {
        Ok(dist) => dist.sf(chi2),
        Err(err) => panic!("Invalid degrees of freedom {dof}: {err:?}"),
    };

    Chi2Statistic { chi2, dof, p_value }
}

/// Performs a Chi-square independence test.
pub fn chi2_independence(contingency: &Array2<f64>) -> Chi2Statistic {
    let row_sums = contingency.sum_axis(Axis(1));
    let col_sums = contingency.sum_axis(Axis(0));
    let total_sum = row_sums.sum();

    let expected = (&row_sums.insert_axis(Axis(1)) * &col_sums.insert_axis(Axis(0))) / total_sum;
    let dof = (contingency.nrows() - 1) * (contingency.ncols() - 1);
    let flat = |array: &Array2<f64>| Array1::from_iter(array.iter().copied());
    chi2(flat(contingency).view(), flat(&expected).view(), Some(dof))
}

/// Performs a Chi-square uniformity test.
pub fn chi2_uniformity(observed: &Array1<f64>) -> Chi2Statistic {
    let expected = Array1::from_elem(observed.dim(), observed.sum() / observed.len() as f64);
    chi2(observed.view(), expected.view(), None)
}

/// Counts how many of `keys` land in each of `num_buckets` home buckets.
///
/// `num_buckets` must be a power of two; the home bucket is the low bits of the hash.
pub fn bucket_histogram<K>(hash: &dyn Fn(&K) -> u64, keys: &[K], num_buckets: usize) -> Array1<f64> {
    debug_assert!(num_buckets.is_power_of_two(), r#""num_buckets" must be a power of two"#);
    let mask = num_buckets as u64 - 1;
    let mut histogram = Array1::<f64>::zeros(num_buckets);
    for key in keys {
        histogram[(hash(key) & mask) as usize] += 1.0;
    }
    histogram
}

/// Tests that home buckets of random keys are uniformly distributed.
///
/// Runs `num_trials` independent Chi-square uniformity tests over fresh keys and aggregates
/// their p-values.
///
/// # Panics
///
/// If the aggregated outcome is negative.
pub fn bucket_uniformity<R, K>(
    rng: &mut R,
    hash: &dyn Fn(&K) -> u64,
    num_buckets: usize,
    num_samples_per_bucket: usize,
    num_trials: usize,
    alpha: f64,
) where
    R: Rng,
    K: Generate<R>,
{
    let mut p_values = Array1::<f64>::zeros(num_trials);
    for trial in 0..num_trials {
        let keys: Vec<K> = (0..num_buckets * num_samples_per_bucket)
            .map(|_| K::generate(rng, &K::GenerateParams::default()))
            .collect();
        let histogram = bucket_histogram(hash, &keys, num_buckets);
        p_values[trial] = chi2_uniformity(&histogram).p_value;
    }
    let result = aggregate_p_values(&p_values, alpha);
    assert!(
        result.outcome,
        "Bucket uniformity test has failed:\n{:?}",
        result
    );
}

/// Tests that the home buckets of a key and of its one-bit jitter are independent.
///
/// # Panics
///
/// If the aggregated outcome of the independence tests is negative.
pub fn jitter_independence<R, K>(
    rng: &mut R,
    hash: &dyn Fn(&K) -> u64,
    num_buckets: usize,
    num_samples_per_cell: usize,
    num_trials: usize,
    alpha: f64,
) where
    R: Rng,
    K: Generate<R> + Jitter<R> + PartialEq + Debug,
{
    let mask = num_buckets as u64 - 1;
    let num_pairs = num_samples_per_cell * num_buckets.pow(2);
    let mut p_values = Array1::<f64>::zeros(num_trials);

    for trial in 0..num_trials {
        let mut hxs = Array1::<u64>::zeros(num_pairs);
        let mut hys = Array1::<u64>::zeros(num_pairs);
        let mut i = 0;
        while i < num_pairs {
            let x = K::generate(rng, &K::GenerateParams::default());
            let Some(y) = x.jitter(rng) else {
                continue;
            };
            hxs[i] = hash(&x) & mask;
            hys[i] = hash(&y) & mask;
            i += 1;
        }
        let contingency = make_contingency_matrix(&hxs, &hys, num_buckets);
        p_values[trial] = chi2_independence(&contingency).p_value;
    }

    let result = aggregate_p_values(&p_values, alpha);
    assert!(
        result.outcome,
        "Jitter independence test has failed:\n{:?}",
        result
    );
}

/// Tests that flipping one input bit flips each output bit with probability one half.
///
/// # Panics
///
/// If any output bit's flip rate deviates from `0.5` by more than `tolerance`.
pub fn avalanche<R, K>(rng: &mut R, hash: &dyn Fn(&K) -> u64, num_samples: usize, tolerance: f64)
where
    R: Rng,
    K: Generate<R> + Jitter<R>,
{
    let mut flips = [0usize; 64];
    let mut taken = 0;
    while taken < num_samples {
        let x = K::generate(rng, &K::GenerateParams::default());
        let Some(y) = x.jitter(rng) else {
            continue;
        };
        let diff = hash(&x) ^ hash(&y);
        for (bit, count) in flips.iter_mut().enumerate() {
            *count += (diff >> bit & 1) as usize;
        }
        taken += 1;
    }
    for (bit, &count) in flips.iter().enumerate() {
        let rate = count as f64 / num_samples as f64;
        assert!(
            (rate - 0.5).abs() <= tolerance,
            "Output bit {} flips at rate {}",
            bit,
            rate
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_chi2_uniformity_of_flat_histogram() {
        let observed = array![100.0, 100.0, 100.0, 100.0];
        let statistic = chi2_uniformity(&observed);
        assert_eq!(statistic.chi2, 0.0);
        assert_eq!(statistic.dof, 3);
        assert!((statistic.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_chi2_uniformity_rejects_skew() {
        let observed = array![400.0, 0.0, 0.0, 0.0];
        assert!(chi2_uniformity(&observed).p_value < 1e-6);
    }

    #[test]
    fn test_contingency_counts_pairs() {
        let contingency = make_contingency_matrix(&array![0u64, 1, 1, 2], &array![1u64, 1, 1, 0], 3);
        assert_eq!(
            contingency,
            array![[0.0, 1.0, 0.0], [0.0, 2.0, 0.0], [1.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_chi2_independence() {
        let independent = array![[25.0, 25.0], [25.0, 25.0]];
        assert!((chi2_independence(&independent).p_value - 1.0).abs() < 1e-9);
        let dependent = array![[50.0, 1.0], [1.0, 50.0]];
        let statistic = chi2_independence(&dependent);
        assert_eq!(statistic.dof, 1);
        assert!(statistic.p_value < 1e-6);
    }

    #[test]
    fn test_bucket_histogram_uses_low_bits() {
        let keys = [0u64, 1, 2, 3, 4, 5, 6, 7];
        let histogram = bucket_histogram(&|k: &u64| *k, &keys, 4);
        assert_eq!(histogram, array![2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "Bucket uniformity test has failed")]
    fn test_bucket_uniformity_catches_constant_hash() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        bucket_uniformity::<_, u64>(&mut rng, &|_| 0, 16, 10, 20, 0.01);
    }

    #[test]
    #[should_panic(expected = "flips at rate")]
    fn test_avalanche_catches_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        avalanche::<_, u64>(&mut rng, &|k| *k, 1000, 0.05);
    }
}
