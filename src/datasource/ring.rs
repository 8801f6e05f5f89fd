//! Bounded FIFO of rows used by 1D accumulation mode.

use std::collections::VecDeque;

/// Fixed-capacity queue of rows; pushing past capacity evicts the oldest row.
#[derive(Debug, Clone)]
pub(crate) struct RowRing {
    rows: VecDeque<Vec<f64>>,
    capacity: usize,
}

impl RowRing {
    /// Create an empty ring. Capacity is floored at 1.
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rows: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of rows retained.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, dropping the oldest rows if it shrinks.
    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict();
    }

    /// Append a row, evicting the oldest rows beyond capacity.
    pub(crate) fn push(&mut self, row: Vec<f64>) {
        self.rows.push_back(row);
        self.evict();
    }

    /// Replace all rows with a single row.
    pub(crate) fn replace(&mut self, row: Vec<f64>) {
        self.rows.clear();
        self.rows.push_back(row);
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }

    /// Row by age, 0 being the oldest stored row.
    pub(crate) fn get(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub(crate) fn first(&self) -> Option<&[f64]> {
        self.get(0)
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    fn evict(&mut self) {
        while self.rows.len() > self.capacity {
            self.rows.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_oldest_rows() {
        let mut ring = RowRing::new(2);
        ring.push(vec![1.0]);
        ring.push(vec![2.0]);
        ring.push(vec![3.0]);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.get(0), Some(&[2.0][..]));
        assert_eq!(ring.get(1), Some(&[3.0][..]));
    }

    #[test]
    fn shrinking_capacity_drops_oldest() {
        let mut ring = RowRing::new(4);
        for i in 0..4 {
            ring.push(vec![i as f64]);
        }
        ring.set_capacity(1);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.first(), Some(&[3.0][..]));
    }

    #[test]
    fn zero_capacity_is_floored() {
        let ring = RowRing::new(0);
        assert_eq!(ring.capacity(), 1);
    }
}
