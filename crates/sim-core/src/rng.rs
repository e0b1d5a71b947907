//! Random Draw Helpers
//!
//! Small distribution helpers over the seeded generator. Every random draw
//! in a run flows through one `SmallRng`, so a run is a pure function of its
//! seed and configuration.

use rand::Rng;

/// Mean group-size budget used by both partitioning variants (Poisson λ).
pub const GROUP_SIZE_LAMBDA: f64 = 5.0;

/// Poisson-distributed count (Knuth product algorithm).
pub fn poisson<R: Rng>(rng: &mut R, lambda: f64) -> usize {
    let l = (-lambda).exp();
    let mut k = 0usize;
    let mut p = 1.0f64;
    loop {
        k += 1;
        p *= rng.gen::<f64>();
        if p <= l {
            return k - 1;
        }
    }
}

/// Bernoulli trial with the given success probability.
pub fn bernoulli<R: Rng>(rng: &mut R, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

/// Index drawn proportionally to `weights`. `None` when the weights sum to
/// zero or less.
pub fn weighted_index<R: Rng>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let mut remaining = rng.gen::<f64>() * total;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 || !w.is_finite() {
            continue;
        }
        remaining -= w;
        if remaining < 0.0 {
            return Some(i);
        }
    }
    weights.iter().rposition(|w| *w > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_poisson_mean_is_close_to_lambda() {
        let mut rng = SmallRng::seed_from_u64(7);
        let samples = 20_000;
        let sum: usize = (0..samples).map(|_| poisson(&mut rng, 5.0)).sum();
        let mean = sum as f64 / samples as f64;
        assert!((mean - 5.0).abs() < 0.1, "mean was {mean}");
    }

    #[test]
    fn test_bernoulli_extremes() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert!((0..100).all(|_| bernoulli(&mut rng, 1.0)));
        assert!((0..100).all(|_| !bernoulli(&mut rng, 0.0)));
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = SmallRng::seed_from_u64(7);
        let weights = [0.0, 3.0, 0.0];
        for _ in 0..50 {
            assert_eq!(weighted_index(&mut rng, &weights), Some(1));
        }
    }

    #[test]
    fn test_weighted_index_rejects_zero_sum() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(weighted_index(&mut rng, &[0.0, 0.0]), None);
        assert_eq!(weighted_index(&mut rng, &[]), None);
    }
}
