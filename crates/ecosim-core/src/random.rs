//! Exponential-distribution sampling for plant seed dispersal.

use rand::Rng;

/// Samples an exponential distribution with a fixed rate.
///
/// Dispersal distances drawn from this distribution give plants a strong
/// bias toward nearby cells with a diminishing chance of long-range spread.
#[derive(Debug, Clone, Copy)]
pub struct Exponential {
    lambda: f64,
}

impl Exponential {
    pub fn new(rate: f64) -> Self {
        debug_assert!(rate > 0.0, "exponential rate must be positive");
        Self { lambda: rate }
    }

    /// Draw a value via inverse transform sampling.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        (1.0 - u).ln() / -self.lambda
    }

    /// Draw a value truncated to a whole grid distance.
    pub fn sample_distance<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        self.sample(rng) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_samples_are_nonnegative() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let exp = Exponential::new(0.4);
        for _ in 0..1000 {
            assert!(exp.sample(&mut rng) >= 0.0);
        }
    }

    #[test]
    fn test_sample_mean_close_to_inverse_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let exp = Exponential::new(0.4);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| exp.sample(&mut rng)).sum::<f64>() / n as f64;
        // E[X] = 1 / lambda = 2.5
        assert!((mean - 2.5).abs() < 0.1, "mean was {mean}");
    }

    #[test]
    fn test_distance_truncates_toward_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let exp = Exponential::new(0.4);
        for _ in 0..1000 {
            let d = exp.sample_distance(&mut rng);
            assert!(d >= 0);
        }
    }
}
