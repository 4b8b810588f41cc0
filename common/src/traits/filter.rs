/// Smoothing applied to each raw reading before it reaches the noise filter.
pub trait ReadingFilter: Send + Sync {
    /// Returns the filtered reading
    fn filter(&mut self, values: Vec<f32>) -> Vec<f32>;
}

/// Decides whether moving from `self` to `next` is measurement jitter.
pub trait Significance {
    /// Returns true when the change is below `threshold` and should be dropped.
    fn is_insignificant_change(&self, next: &Self, threshold: f32) -> bool;
}

impl Significance for f32 {
    fn is_insignificant_change(&self, next: &Self, threshold: f32) -> bool {
        (self - next).abs() < threshold
    }
}

impl Significance for [f32] {
    fn is_insignificant_change(&self, next: &Self, threshold: f32) -> bool {
        // a different number of components is always a real change
        self.len() == next.len()
            && self
                .iter()
                .zip(next.iter())
                .all(|(old, new)| old.is_insignificant_change(new, threshold))
    }
}

impl Significance for Vec<f32> {
    fn is_insignificant_change(&self, next: &Self, threshold: f32) -> bool {
        self.as_slice()
            .is_insignificant_change(next.as_slice(), threshold)
    }
}
