use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::ring_buffer::RingBuffer;

/// Reference-counted handle to a ring buffer
///
/// Cloning the handle adds a holder; the buffer is released when the last
/// holder is dropped. Access goes through a reader-writer lock, so at any
/// moment there is either one writer or any number of readers.
pub struct SharedRingBuffer<T> {
    inner: Arc<RwLock<RingBuffer<T>>>,
}

impl<T: Clone> SharedRingBuffer<T> {
    /// Create a shared buffer of `capacity` default-filled slots
    ///
    /// # Returns
    /// * `Ok(SharedRingBuffer)` on success
    /// * `Err(Error::InvalidArgument)` if capacity is 0
    pub fn new(capacity: usize, default_value: T) -> Result<Self> {
        RingBuffer::new(capacity, default_value).map(Self::from)
    }

    /// Create a shared buffer holding `items` in order.
    pub fn from_list<I>(items: I, default_value: T) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        RingBuffer::from_list(items, default_value).map(Self::from)
    }

    /// Clone of the value at logical `position`.
    pub fn get(&self, position: usize) -> T {
        self.inner.read().get(position)
    }

    /// Restore the slot at logical `position` to the default value.
    pub fn reset(&self, position: usize) -> &Self {
        self.inner.write().reset(position);
        self
    }

    /// Restore every slot to the default value and rewind head and tail.
    pub fn clear(&self) -> &Self {
        self.inner.write().clear();
        self
    }

    /// Snapshot of all slots in logical order.
    pub fn to_list(&self) -> Vec<T> {
        self.inner.read().to_list()
    }
}

impl<T> SharedRingBuffer<T> {
    /// Overwrite the slot at logical `position`. Returns the handle for chaining.
    pub fn set(&self, position: usize, value: T) -> &Self {
        self.inner.write().set(position, value);
        self
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Number of live handles to this buffer, including `self`.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Whether both handles refer to the same buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Shared access for several reads under one lock acquisition.
    pub fn read(&self) -> RwLockReadGuard<'_, RingBuffer<T>> {
        self.inner.read()
    }

    /// Exclusive access for several writes under one lock acquisition.
    pub fn write(&self) -> RwLockWriteGuard<'_, RingBuffer<T>> {
        self.inner.write()
    }
}

impl<T> From<RingBuffer<T>> for SharedRingBuffer<T> {
    fn from(buffer: RingBuffer<T>) -> Self {
        SharedRingBuffer {
            inner: Arc::new(RwLock::new(buffer)),
        }
    }
}

impl<T> Clone for SharedRingBuffer<T> {
    fn clone(&self) -> Self {
        SharedRingBuffer {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SharedRingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRingBuffer")
            // try_read: formatting must not block on a writer held by this thread
            .field("capacity", &self.inner.try_read().map(|rb| rb.capacity()))
            .field("holders", &self.holders())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::thread;

    #[test]
    fn test_clones_share_storage() {
        let a = SharedRingBuffer::new(3, 0).unwrap();
        let b = a.clone();
        assert_eq!(a.holders(), 2);
        assert!(a.ptr_eq(&b));

        b.set(1, 7);
        assert_eq!(a.get(1), 7);
        drop(b);
        assert_eq!(a.holders(), 1);
    }

    #[test]
    fn test_create_with_zero_capacity() {
        let result = SharedRingBuffer::new(0, 0);
        assert!(matches!(result.unwrap_err(), Error::InvalidArgument(_)));
    }

    #[test]
    fn test_chained_operations() {
        let rb = SharedRingBuffer::from_list(vec![1, 2, 3], 0).unwrap();
        rb.set(0, 9).reset(1).set(2, 8);
        assert_eq!(rb.to_list(), vec![9, 0, 8]);
        rb.clear();
        assert_eq!(rb.to_list(), vec![0, 0, 0]);
    }

    #[test]
    fn test_guarded_batch_access() {
        let rb = SharedRingBuffer::new(4, 0u32).unwrap();
        {
            let mut guard = rb.write();
            for i in 0..4 {
                guard.set(i, i as u32 * 10);
            }
        }
        let guard = rb.read();
        assert_eq!(guard.iter().copied().collect::<Vec<_>>(), vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_writers_on_many_threads() {
        let rb = SharedRingBuffer::new(8, 0usize).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let rb = rb.clone();
                thread::spawn(move || {
                    rb.set(i, i + 1);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(rb.holders(), 1);
        assert_eq!(rb.to_list(), (1..=8).collect::<Vec<_>>());
    }
}
