use crate::Price;

/// Fixed-capacity circular buffer over the trailing window.
#[derive(Clone, Debug)]
pub(crate) struct RingBuffer {
    buffer: Vec<Price>,
    head: usize,
    len: usize,
}

impl RingBuffer {
    #[must_use]
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "ring buffer capacity must be positive");

        Self {
            buffer: vec![0.0; capacity],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Stored values in slot order (not time order).
    #[inline]
    pub(crate) fn values(&self) -> &[Price] {
        &self.buffer[..self.len]
    }

    /// Appends `value`, returning the evicted oldest value once full.
    #[inline]
    pub(crate) fn push(&mut self, value: Price) -> Option<Price> {
        if self.is_full() {
            let old = self.buffer[self.head];

            self.buffer[self.head] = value;

            self.head += 1;
            if self.head == self.capacity() {
                self.head = 0;
            }

            Some(old)
        } else {
            self.buffer[self.len] = value;
            self.len += 1;

            None
        }
    }
}
