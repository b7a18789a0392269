use std::iter::FusedIterator;
use std::slice;

use tracing::{debug, trace};

use crate::capacity::Capacity;
use crate::error::{Error, Result};

/// Fixed-capacity ring buffer of default-filled slots
///
/// - Exactly `capacity` slots, all holding a value at all times
/// - Logical position `p` lives at physical index `(head + p) % capacity`
/// - Positions are never bounds-checked: any position wraps onto the ring
/// - `reset` and `clear` restore slots to the default value recorded at construction
///
/// The element type is opaque to the buffer. It is only moved in, cloned
/// out, and cloned from the default; never compared or inspected.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Physical slots, length == capacity, never resized
    storage: Box<[T]>,
    /// Physical index of logical position 0
    head: usize,
    /// Physical index carried alongside `head`; no addressing reads it
    tail: usize,
    /// Fill value for construction, `reset` and `clear`
    default_value: T,
}

impl<T: Clone> RingBuffer<T> {
    /// Create a ring buffer with every slot set to `default_value`
    ///
    /// # Arguments
    /// * `capacity` - Number of slots, must be at least 1
    /// * `default_value` - Fill value for new, reset and cleared slots
    ///
    /// # Returns
    /// * `Ok(RingBuffer)` on success
    /// * `Err(Error::InvalidArgument)` if capacity is 0
    pub fn new(capacity: usize, default_value: T) -> Result<Self> {
        Ok(Self::with_capacity(Capacity::new(capacity)?, default_value))
    }

    /// Create a ring buffer from an already validated capacity.
    pub fn with_capacity(capacity: Capacity, default_value: T) -> Self {
        let storage = vec![default_value.clone(); capacity.get()].into_boxed_slice();
        debug!(capacity = capacity.get(), "ring buffer created");

        RingBuffer {
            storage,
            head: 0,
            tail: 0,
            default_value,
        }
    }

    /// Build a ring buffer holding `items` in order
    ///
    /// The capacity is the number of items. Slot `i` holds the `i`-th item
    /// and head/tail start at 0, so `to_list` returns the items unchanged.
    ///
    /// # Arguments
    /// * `items` - Initial slot contents; consumed to the end
    /// * `default_value` - Fill value for later `reset` and `clear` calls
    ///
    /// # Returns
    /// * `Ok(RingBuffer)` on success
    /// * `Err(Error::InvalidArgument)` if `items` is empty
    pub fn from_list<I>(items: I, default_value: T) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let storage: Box<[T]> = items.into_iter().collect();
        if storage.is_empty() {
            return Err(Error::invalid_argument(
                "from_list needs at least one element, got an empty sequence",
            ));
        }
        debug!(capacity = storage.len(), "ring buffer loaded from list");

        Ok(RingBuffer {
            storage,
            head: 0,
            tail: 0,
            default_value,
        })
    }

    /// Clone of the value at logical `position`.
    pub fn get(&self, position: usize) -> T {
        self.get_ref(position).clone()
    }

    /// Restore the slot at logical `position` to the default value.
    pub fn reset(&mut self, position: usize) -> &mut Self {
        let value = self.default_value.clone();
        self.set(position, value)
    }

    /// Restore every slot to the default value and rewind head and tail to 0.
    pub fn clear(&mut self) -> &mut Self {
        let default_value = &self.default_value;
        self.storage
            .iter_mut()
            .for_each(|slot| *slot = default_value.clone());
        self.head = 0;
        self.tail = 0;
        debug!(capacity = self.storage.len(), "ring buffer cleared");
        self
    }

    /// Snapshot of all slots in logical order, starting at head
    ///
    /// The result always has `capacity` elements: physical `head..capacity`
    /// followed by `0..head`.
    pub fn to_list(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> RingBuffer<T> {
    /// Number of slots. Fixed for the lifetime of the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Physical index of logical position 0.
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Tail offset. Always a valid physical index; no operation reads it.
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Value restored by `reset` and `clear`.
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Map a logical position onto its physical slot
    ///
    /// Any position is accepted: positions at or beyond `capacity` alias
    /// onto `position % capacity`. The position is reduced before the head
    /// offset is added, so this cannot overflow.
    #[inline]
    pub fn physical_index(&self, position: usize) -> usize {
        let capacity = self.storage.len();
        (self.head + position % capacity) % capacity
    }

    /// Borrow the value at logical `position`.
    pub fn get_ref(&self, position: usize) -> &T {
        &self.storage[self.physical_index(position)]
    }

    /// Overwrite the slot at logical `position`
    ///
    /// Returns the buffer so calls can be chained. Head and tail are untouched.
    pub fn set(&mut self, position: usize, value: T) -> &mut Self {
        let index = self.physical_index(position);
        trace!(position, index, "ring buffer slot written");
        self.storage[index] = value;
        self
    }

    /// Iterate over every slot in logical order without cloning.
    pub fn iter(&self) -> Iter<'_, T> {
        let (wrapped, from_head) = self.storage.split_at(self.head);
        Iter {
            from_head: from_head.iter(),
            wrapped: wrapped.iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Logical-order iterator returned by [`RingBuffer::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    /// Physical `head..capacity`
    from_head: slice::Iter<'a, T>,
    /// Physical `0..head`, read after wrapping past the end
    wrapped: slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.from_head.next().or_else(|| self.wrapped.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.from_head.len() + self.wrapped.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
