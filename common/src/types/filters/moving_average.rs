use crate::traits::ReadingFilter;
use crate::types::buffers::CircularBuffer;
use crate::types::sensors::Values;

/// Element-wise moving average over the last `window_size` readings.
///
/// The window fills up progressively: until `window_size` readings have been seen,
/// the average is taken over the readings received so far. A reading whose number of
/// components differs from the ones in the window restarts the window.
///
/// ## Example
///
/// ```rust
/// use common::filters::MovingAverage;
/// use common::ReadingFilter;
///
/// let mut ma = MovingAverage::new(2);
/// assert_eq!(ma.filter(vec![1.0, 2.0]), vec![1.0, 2.0]);
/// assert_eq!(ma.filter(vec![3.0, 4.0]), vec![2.0, 3.0]);
/// assert_eq!(ma.filter(vec![5.0, 6.0]), vec![4.0, 5.0]);
/// ```
#[derive(Clone, Debug)]
pub struct MovingAverage {
    buffer: CircularBuffer<Values>,
    aggregate: Vec<f64>,
}

impl MovingAverage {
    /// Initializes new `MovingAverage` filter with `window_size` elements.
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: CircularBuffer::new(window_size),
            aggregate: Vec::new(),
        }
    }

    pub fn window_size(&self) -> usize {
        self.buffer.capacity()
    }

    fn reset(&mut self, components: usize) {
        self.buffer.clear();
        self.aggregate = vec![0.0; components];
    }
}

impl ReadingFilter for MovingAverage {
    /// Returns the smoothed reading
    fn filter(&mut self, values: Values) -> Values {
        if values.len() != self.aggregate.len() {
            self.reset(values.len());
        }
        for (sum, value) in self.aggregate.iter_mut().zip(values.iter()) {
            *sum += f64::from(*value);
        }
        if let Some(out) = self.buffer.push(values) {
            for (sum, value) in self.aggregate.iter_mut().zip(out.iter()) {
                *sum -= f64::from(*value);
            }
        }
        let n = self.buffer.len() as f64;
        self.aggregate.iter().map(|sum| (sum / n) as f32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static SAMPLE_1: Lazy<Values> = Lazy::new(|| vec![1.0, 1.0, 1.0]);
    static SAMPLE_2: Lazy<Values> = Lazy::new(|| vec![2.0, 2.0, 2.0]);
    static SAMPLE_3: Lazy<Values> = Lazy::new(|| vec![3.0, 3.0, 3.0]);
    static SAMPLE_4: Lazy<Values> = Lazy::new(|| vec![4.0, 4.0, 4.0]);
    static SAMPLE_5: Lazy<Values> = Lazy::new(|| vec![5.0, 5.0, 5.0]);

    fn close(a: &[f32], b: &[f32]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_moving_average() {
        let mut ma = MovingAverage::new(3);

        assert!(close(&ma.filter(SAMPLE_1.clone()), &SAMPLE_1));
        assert!(close(&ma.filter(SAMPLE_2.clone()), &[1.5, 1.5, 1.5]));
        assert!(close(&ma.filter(SAMPLE_3.clone()), &SAMPLE_2));
        assert!(close(&ma.filter(SAMPLE_4.clone()), &SAMPLE_3));
        assert!(close(&ma.filter(SAMPLE_5.clone()), &SAMPLE_4));
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let mut ma = MovingAverage::new(1);
        assert_eq!(ma.filter(vec![7.5]), vec![7.5]);
        assert_eq!(ma.filter(vec![-2.0]), vec![-2.0]);
    }

    #[test]
    fn test_component_change_restarts_window() {
        let mut ma = MovingAverage::new(4);
        ma.filter(vec![10.0]);
        ma.filter(vec![20.0]);
        assert!(close(&ma.filter(vec![1.0, 2.0, 3.0]), &[1.0, 2.0, 3.0]));
        assert!(ma.filter(vec![]).is_empty());
    }
}
