use futures::future;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};

use common::filters::{MovingAverage, NoiseFilter};
use common::traits::{ReadingFilter, Significance};
use common::types::Values;

/// Operators over streams of raw sensor readings.
pub trait ReadingStreamExt: Stream<Item = Values> + Send + Sized + 'static {
    /// Maps every reading to its first component, or `initial` when the reading is empty.
    fn scalar(self, initial: f32) -> BoxStream<'static, f32> {
        self.map(move |values| values.first().copied().unwrap_or(initial))
            .boxed()
    }

    /// Element-wise moving average over the last `window` readings.
    fn smoothed(self, window: usize) -> BoxStream<'static, Values> {
        let mut moving_average = MovingAverage::new(window);
        self.map(move |values| moving_average.filter(values)).boxed()
    }
}

impl<S> ReadingStreamExt for S where S: Stream<Item = Values> + Send + Sized + 'static {}

/// Noise rejection for scalar or vector streams.
pub trait NoiseStreamExt<T>: Stream<Item = T> + Send + Sized + 'static
where
    T: Significance + Clone + Send + 'static,
{
    /// Drops items that differ from the last delivered one by less than `threshold`.
    fn without_noise(self, threshold: f32) -> BoxStream<'static, T> {
        let mut noise_filter = NoiseFilter::new(threshold);
        self.filter_map(move |value| future::ready(noise_filter.accept(value)))
            .boxed()
    }
}

impl<S, T> NoiseStreamExt<T> for S
where
    S: Stream<Item = T> + Send + Sized + 'static,
    T: Significance + Clone + Send + 'static,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::NOISE_THRESHOLD;
    use futures::stream;

    #[tokio::test]
    async fn test_scalar_uses_first_component() {
        let readings = stream::iter(vec![vec![3.5], vec![], vec![1.0, 2.0]]);
        let scalars: Vec<f32> = readings.scalar(0.0).collect().await;
        assert_eq!(scalars, vec![3.5, 0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_scalar_without_noise() {
        let readings = stream::iter(vec![
            vec![100.0],
            vec![100.004],
            vec![99.998],
            vec![100.5],
            vec![100.505],
        ]);
        let delivered: Vec<f32> = readings
            .scalar(0.0)
            .without_noise(NOISE_THRESHOLD)
            .collect()
            .await;
        assert_eq!(delivered, vec![100.0, 100.5]);
    }

    #[tokio::test]
    async fn test_vector_without_noise() {
        let readings = stream::iter(vec![
            vec![0.0, 0.0, 9.81],
            vec![0.001, -0.001, 9.812],
            vec![0.3, 0.0, 9.81],
            vec![0.3, 0.0],
        ]);
        let delivered: Vec<Values> = readings.without_noise(NOISE_THRESHOLD).collect().await;
        assert_eq!(
            delivered,
            vec![vec![0.0, 0.0, 9.81], vec![0.3, 0.0, 9.81], vec![0.3, 0.0]]
        );
    }

    #[tokio::test]
    async fn test_smoothed_then_filtered() {
        let readings = stream::iter(vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]]);
        let delivered: Vec<Values> = readings
            .smoothed(2)
            .without_noise(NOISE_THRESHOLD)
            .collect()
            .await;
        assert_eq!(delivered, vec![vec![0.0], vec![0.5], vec![1.0]]);
    }
}
