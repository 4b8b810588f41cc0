use nalgebra::DVector;

use common::buffers::CircularBuffer;

/// Euclidean norm of a reading, e.g. the total acceleration of an accelerometer sample.
pub fn magnitude(values: &[f32]) -> f32 {
    DVector::from_column_slice(values).norm()
}

/// Scrolling chart data: keeps the latest `capacity` points.
#[derive(Clone, Debug)]
pub struct ChartSeries {
    points: CircularBuffer<f32>,
}

impl ChartSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: CircularBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, point: f32) {
        self.points.push(point);
    }

    pub fn last(&self) -> Option<f32> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    /// Points from oldest to newest.
    pub fn points(&self) -> Vec<f32> {
        self.points.to_vec()
    }
}
