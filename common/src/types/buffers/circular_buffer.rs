use std::collections::VecDeque;

/// Bounded buffer holding at most `capacity` elements. Once full, pushing a new
/// element pops out the oldest one.
#[derive(Clone, Debug)]
pub struct CircularBuffer<T> {
    capacity: usize,
    buffer: VecDeque<T>,
}

impl<T: Clone> CircularBuffer<T> {
    /// Creates an empty CircularBuffer that keeps up to `capacity` elements of type `T`.
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// New element `elem` is pushed; the oldest is returned when the buffer was full.
    pub fn push(&mut self, elem: T) -> Option<T> {
        let out = if self.buffer.len() == self.capacity {
            self.buffer.pop_front()
        } else {
            None
        };
        self.buffer.push_back(elem);
        out
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Returns number of elements currently stored
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.buffer.iter().cloned().collect()
    }
}
