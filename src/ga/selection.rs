//! Softmax parent selection.
//!
//! Fitness values are converted to a probability distribution by
//! exponentiating after subtracting the maximum (numerical stability),
//! then parent pairs are drawn with replacement. A degenerate weight
//! vector — all-zero or non-finite — is recovered locally by falling
//! back to uniform sampling; it is never a fatal error.

use rand::Rng;
use tracing::debug;

/// Converts fitness values to softmax selection probabilities.
///
/// The result is a valid distribution whenever the input is non-empty:
/// weights are non-negative and sum to 1 (within floating tolerance).
/// Non-finite fitness entries contribute zero weight; if every entry is
/// degenerate the distribution falls back to uniform.
pub fn softmax_weights(fitness: &[f64]) -> Vec<f64> {
    let n = fitness.len();
    if n == 0 {
        return Vec::new();
    }

    let max = fitness
        .iter()
        .copied()
        .filter(|f| f.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        debug!("no finite fitness values; falling back to uniform selection");
        return vec![1.0 / n as f64; n];
    }

    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| if f.is_finite() { (f - max).exp() } else { 0.0 })
        .collect();
    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        debug!(sum, "degenerate softmax weight sum; falling back to uniform selection");
        return vec![1.0 / n as f64; n];
    }

    weights.iter().map(|w| w / sum).collect()
}

/// Draws `num_pairs` parent index pairs from a weight distribution.
///
/// Parents are sampled with replacement across pairs. Within a pair,
/// selecting the same individual twice (self-pairing) is disallowed
/// unless `allow_self_pairing` is set; a population of one necessarily
/// self-pairs either way.
pub fn select_pairs<R: Rng>(
    weights: &[f64],
    num_pairs: usize,
    allow_self_pairing: bool,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    let mut pairs = Vec::with_capacity(num_pairs);
    for _ in 0..num_pairs {
        let first = sample_index(weights, rng);
        let mut second = sample_index(weights, rng);
        if !allow_self_pairing && n > 1 {
            let mut attempts = 0;
            while second == first && attempts < 32 {
                second = sample_index(weights, rng);
                attempts += 1;
            }
            // Near-degenerate distributions can keep landing on the same
            // index; force a distinct partner rather than looping forever.
            if second == first {
                second = (first + 1) % n;
            }
        }
        pairs.push((first, second));
    }
    pairs
}

/// Samples one index proportionally to `weights` via cumulative scan.
fn sample_index<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let threshold = rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    weights.len() - 1 // floating-point fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn assert_valid_distribution(weights: &[f64]) {
        assert!(weights.iter().all(|&w| w >= 0.0), "negative weight: {weights:?}");
        let sum: f64 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {sum}");
    }

    #[test]
    fn test_softmax_is_valid_distribution() {
        let weights = softmax_weights(&[1.0, 2.5, -3.0, 0.0]);
        assert_valid_distribution(&weights);
        // Higher fitness gets more weight.
        assert!(weights[1] > weights[0]);
        assert!(weights[0] > weights[2]);
    }

    #[test]
    fn test_softmax_stable_for_large_fitness() {
        let weights = softmax_weights(&[1e6, 1e6 + 1.0, 1e6 - 2.0]);
        assert_valid_distribution(&weights);
        assert!(weights[1] > weights[0]);
    }

    #[test]
    fn test_softmax_equal_fitness_is_uniform() {
        let weights = softmax_weights(&[5.0; 4]);
        assert_valid_distribution(&weights);
        for &w in &weights {
            assert!((w - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_degenerate_falls_back_to_uniform() {
        for fitness in [
            vec![f64::NEG_INFINITY; 3],
            vec![f64::NAN, f64::NAN, f64::NAN],
            vec![f64::INFINITY, f64::NEG_INFINITY, f64::NAN],
        ] {
            let weights = softmax_weights(&fitness);
            assert_valid_distribution(&weights);
            for &w in &weights {
                assert!(
                    (w - 1.0 / 3.0).abs() < 1e-12,
                    "expected uniform, got {weights:?}"
                );
            }
        }
    }

    #[test]
    fn test_softmax_empty_input() {
        assert!(softmax_weights(&[]).is_empty());
    }

    #[test]
    fn test_non_finite_entries_get_zero_weight() {
        let weights = softmax_weights(&[1.0, f64::NAN, 2.0]);
        assert_valid_distribution(&weights);
        assert_eq!(weights[1], 0.0);
    }

    #[test]
    fn test_selection_favors_high_fitness() {
        let weights = softmax_weights(&[0.0, 3.0, 0.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut counts = [0u32; 4];
        for (a, b) in select_pairs(&weights, 5000, true, &mut rng) {
            counts[a] += 1;
            counts[b] += 1;
        }
        assert!(
            counts[1] > counts[0] + counts[2] + counts[3],
            "expected index 1 to dominate, got {counts:?}"
        );
    }

    #[test]
    fn test_no_self_pairing_when_disallowed() {
        let weights = softmax_weights(&[1.0, 1.0, 1.0, 1.0]);
        let mut rng = SmallRng::seed_from_u64(7);
        for (a, b) in select_pairs(&weights, 2000, false, &mut rng) {
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_self_pairing_allowed_when_enabled() {
        // A heavily skewed distribution self-pairs almost every draw.
        let weights = softmax_weights(&[50.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(7);
        let pairs = select_pairs(&weights, 200, true, &mut rng);
        assert!(pairs.iter().any(|(a, b)| a == b));
    }

    #[test]
    fn test_population_of_one_must_self_pair() {
        let weights = softmax_weights(&[1.0]);
        let mut rng = SmallRng::seed_from_u64(7);
        let pairs = select_pairs(&weights, 10, false, &mut rng);
        assert_eq!(pairs.len(), 10);
        assert!(pairs.iter().all(|&(a, b)| a == 0 && b == 0));
    }

    proptest! {
        #[test]
        fn prop_softmax_always_a_distribution(
            fitness in proptest::collection::vec(-1e3f64..1e3, 1..64)
        ) {
            let weights = softmax_weights(&fitness);
            prop_assert_eq!(weights.len(), fitness.len());
            prop_assert!(weights.iter().all(|&w| w >= 0.0));
            let sum: f64 = weights.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}
