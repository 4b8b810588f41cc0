use crate::constants::NOISE_THRESHOLD;
use crate::traits::Significance;

/// Drops readings that differ from the last delivered one by less than `threshold`.
///
/// The first reading is always delivered. Later readings are compared against the
/// last reading this filter let through, not against the last one it received, so a
/// slow drift below the threshold per step is still reported once it accumulates.
#[derive(Clone, Debug)]
pub struct NoiseFilter<T> {
    threshold: f32,
    last: Option<T>,
}

impl<T: Significance + Clone> NoiseFilter<T> {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Returns the value when it has to be propagated.
    pub fn accept(&mut self, value: T) -> Option<T> {
        if let Some(last) = self.last.as_ref() {
            if last.is_insignificant_change(&value, self.threshold) {
                return None;
            }
        }
        self.last = Some(value.clone());
        Some(value)
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

impl<T: Significance + Clone> Default for NoiseFilter<T> {
    fn default() -> Self {
        Self::new(NOISE_THRESHOLD)
    }
}
