use crate::error::{Error, Result};

/// Binary min-heap with a fixed upper bound on its population.
///
/// Only `insert` and `extract_min` are exposed; the array layout stays private.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
    capacity: usize,
}

impl<T: Ord> MinHeap<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn insert(&mut self, value: T) -> Result<()> {
        if self.elements.len() >= self.capacity {
            return Err(Error::QueueFull {
                capacity: self.capacity,
            });
        }
        self.elements.push(value);
        self.sift_up(self.elements.len() - 1);
        Ok(())
    }

    pub fn extract_min(&mut self) -> Result<T> {
        if self.elements.is_empty() {
            return Err(Error::EmptyQueue);
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let result = self.elements.pop().ok_or(Error::EmptyQueue)?;
        self.sift_down(0);
        Ok(result)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.elements[i] >= self.elements[parent] {
                break;
            }
            self.elements.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.elements.len();
        loop {
            let l = 2 * i + 1;
            let r = l + 1;
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    fn valid_min_heap(&self) -> bool {
        (1..self.elements.len()).all(|i| self.elements[(i - 1) / 2] <= self.elements[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_ascending_order() {
        let mut heap = MinHeap::with_capacity(16);
        for value in [9, 4, 7, 1, 8, 2, 2, 6] {
            heap.insert(value).unwrap();
            assert!(heap.valid_min_heap());
        }

        let mut drained = Vec::new();
        while !heap.is_empty() {
            drained.push(heap.extract_min().unwrap());
            assert!(heap.valid_min_heap());
        }
        assert_eq!(drained, vec![1, 2, 2, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_interleaved_insert_extract() {
        let mut heap = MinHeap::with_capacity(8);
        heap.insert(5).unwrap();
        heap.insert(3).unwrap();
        assert_eq!(heap.extract_min().unwrap(), 3);
        heap.insert(1).unwrap();
        heap.insert(4).unwrap();
        assert_eq!(heap.extract_min().unwrap(), 1);
        assert_eq!(heap.extract_min().unwrap(), 4);
        assert_eq!(heap.extract_min().unwrap(), 5);
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn test_empty_queue() {
        let mut heap = MinHeap::<u32>::with_capacity(4);
        assert!(matches!(heap.extract_min(), Err(Error::EmptyQueue)));
    }

    #[test]
    fn test_capacity_bound() {
        let mut heap = MinHeap::with_capacity(2);
        heap.insert(1).unwrap();
        heap.insert(2).unwrap();
        assert!(matches!(
            heap.insert(3),
            Err(Error::QueueFull { capacity: 2 })
        ));
        assert_eq!(heap.len(), 2);
    }
}
