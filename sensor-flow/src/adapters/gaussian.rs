use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::errors::SensorError;

/// Functionality to add some Gaussian noise.
#[derive(Clone, Debug)]
pub(super) struct GaussianNoise {
    normal: Normal<f32>,
}

impl GaussianNoise {
    /// Creates new distribution from mean and stdev
    pub(super) fn new(mean: f32, stdev: f32) -> Result<Self, SensorError> {
        let normal =
            Normal::new(mean, stdev).map_err(|e| SensorError::NoiseModel(e.to_string()))?;
        Ok(Self { normal })
    }

    /// Sample from distribution
    pub(super) fn draw_sample(&self, rng: &mut StdRng) -> f32 {
        self.normal.sample(rng)
    }

    /// Adds independent noise to every component
    pub(super) fn add_noise(&self, rng: &mut StdRng, data: &[f32]) -> Vec<f32> {
        data.iter().map(|d| d + self.draw_sample(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_gaussian_new() {
        let noise = GaussianNoise::new(0.0, 1.0).unwrap();
        assert_eq!(noise.normal.mean(), 0.0);
        assert_eq!(noise.normal.std_dev(), 1.0);
    }

    #[test]
    fn test_gaussian_rejects_invalid_stdev() {
        assert!(matches!(
            GaussianNoise::new(0.0, f32::NAN),
            Err(SensorError::NoiseModel(_))
        ));
    }

    #[test]
    fn test_add_noise() {
        let stdev = 0.5;
        let mut rng = StdRng::seed_from_u64(7);
        let noise = GaussianNoise::new(0.0, stdev).unwrap();
        let data = vec![1.0, 2.0, 3.0];
        let result = noise.add_noise(&mut rng, &data);
        assert_eq!(result.len(), data.len());
        for (noisy, clean) in result.iter().zip(data.iter()) {
            assert!((noisy - clean).abs() <= 5.0 * stdev);
        }
    }

    #[test]
    fn test_zero_stdev_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        let noise = GaussianNoise::new(0.0, 0.0).unwrap();
        assert_eq!(noise.add_noise(&mut rng, &[9.81]), vec![9.81]);
    }
}
