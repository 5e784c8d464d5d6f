//! Fixed-capacity ring buffer for rolling frame statistics

pub struct RingBuffer<T> {
    samples: Vec<T>,
    capacity: usize,
    index: usize,
}

impl<T: Copy + PartialOrd> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            index: 0,
        }
    }

    /// Push a sample, overwriting the oldest one once the buffer is full.
    pub fn push(&mut self, sample: T) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.index] = sample;
        }
        self.index = (self.index + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.index = 0;
    }

    /// Smallest and largest retained samples, or `None` when empty.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut iter = self.samples.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), sample| {
            (
                if sample < min { sample } else { min },
                if sample > max { sample } else { max },
            )
        }))
    }
}

impl RingBuffer<f64> {
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }

        let sum: f64 = self.samples.iter().sum();
        sum / self.samples.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_wraps() {
        let mut buffer = RingBuffer::new(3);

        buffer.push(10.0);
        assert_eq!(buffer.average(), 10.0);

        buffer.push(20.0);
        assert_eq!(buffer.average(), 15.0);

        buffer.push(30.0);
        assert_eq!(buffer.average(), 20.0);

        // Oldest sample (10) is overwritten
        buffer.push(40.0);
        assert_eq!(buffer.average(), 30.0);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.min_max(), Some((20.0, 40.0)));
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = RingBuffer::<f64>::new(4);
        assert!(buffer.is_empty());
        assert_eq!(buffer.average(), 0.0);
        assert_eq!(buffer.min_max(), None);
    }
}
