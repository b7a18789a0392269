use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ring_buffer::RingBuffer;

static NEXT_REGISTRY_ID: AtomicU32 = AtomicU32::new(0);

/// Opaque reference to a ring buffer owned by a [`Registry`]
///
/// Handles are `Copy`; copying one does not extend the buffer's life.
/// Once the buffer is destroyed every copy resolves to `Error::InvalidHandle`,
/// including after the slot is reused for a new buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    registry: u32,
    index: usize,
    generation: u64,
}

struct Slot<T> {
    /// Bumped every time the occupant is destroyed
    generation: u64,
    buffer: Option<RingBuffer<T>>,
}

/// Arena of ring buffers addressed by generational handles
///
/// The registry owns every buffer it hands out a handle for. Buffers live
/// until `destroy` is called with their handle or the registry is dropped.
/// Mutating operations take `&mut self`; callers sharing a registry across
/// threads wrap it in their own lock.
pub struct Registry<T> {
    id: u32,
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    live: usize,
}

impl<T> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty registry with room for `slots` buffers before reallocating.
    pub fn with_capacity(slots: usize) -> Self {
        Registry {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(slots),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Take ownership of `buffer` and return its handle.
    pub fn insert(&mut self, buffer: RingBuffer<T>) -> Handle {
        let capacity = buffer.capacity();
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].buffer = Some(buffer);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    buffer: Some(buffer),
                });
                self.slots.len() - 1
            }
        };
        self.live += 1;

        let handle = Handle {
            registry: self.id,
            index,
            generation: self.slots[index].generation,
        };
        debug!(index, generation = handle.generation, capacity, "ring buffer registered");
        handle
    }

    /// Release the buffer behind `handle` and return it
    ///
    /// # Returns
    /// * `Ok(RingBuffer)` with the released buffer
    /// * `Err(Error::InvalidHandle)` if the handle was already destroyed or is foreign
    pub fn destroy(&mut self, handle: Handle) -> Result<RingBuffer<T>> {
        self.resolve(handle)?;
        let slot = &mut self.slots[handle.index];
        let buffer = slot.buffer.take().ok_or(Error::InvalidHandle)?;
        slot.generation += 1;
        self.free.push(handle.index);
        self.live -= 1;
        debug!(index = handle.index, generation = handle.generation, "ring buffer destroyed");
        Ok(buffer)
    }

    /// Whether `handle` refers to a live buffer in this registry.
    pub fn contains(&self, handle: Handle) -> bool {
        self.lookup(handle).is_some()
    }

    /// Number of live buffers.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the registry holds no live buffers.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Borrow the buffer behind `handle`.
    pub fn buffer(&self, handle: Handle) -> Result<&RingBuffer<T>> {
        self.lookup(handle).ok_or_else(|| stale(handle))
    }

    /// Mutably borrow the buffer behind `handle`.
    pub fn buffer_mut(&mut self, handle: Handle) -> Result<&mut RingBuffer<T>> {
        self.resolve(handle)?;
        self.slots[handle.index]
            .buffer
            .as_mut()
            .ok_or(Error::InvalidHandle)
    }

    /// Write `value` at logical `position`. Returns the handle for chaining.
    pub fn set(&mut self, handle: Handle, position: usize, value: T) -> Result<Handle> {
        self.buffer_mut(handle)?.set(position, value);
        Ok(handle)
    }

    fn lookup(&self, handle: Handle) -> Option<&RingBuffer<T>> {
        if handle.registry != self.id {
            return None;
        }
        let slot = self.slots.get(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.buffer.as_ref()
    }

    fn resolve(&self, handle: Handle) -> Result<()> {
        match self.lookup(handle) {
            Some(_) => Ok(()),
            None => Err(stale(handle)),
        }
    }
}

impl<T: Clone> Registry<T> {
    /// Create a buffer of `capacity` default-filled slots
    ///
    /// # Returns
    /// * `Ok(Handle)` for the new buffer
    /// * `Err(Error::InvalidArgument)` if capacity is 0
    pub fn create(&mut self, capacity: usize, default_value: T) -> Result<Handle> {
        let buffer = RingBuffer::new(capacity, default_value)?;
        Ok(self.insert(buffer))
    }

    /// Create a buffer holding `items` in order. See [`RingBuffer::from_list`].
    pub fn from_list<I>(&mut self, items: I, default_value: T) -> Result<Handle>
    where
        I: IntoIterator<Item = T>,
    {
        let buffer = RingBuffer::from_list(items, default_value)?;
        Ok(self.insert(buffer))
    }

    /// Clone of the value at logical `position`.
    pub fn get(&self, handle: Handle, position: usize) -> Result<T> {
        Ok(self.buffer(handle)?.get(position))
    }

    /// Restore the slot at logical `position` to the default value.
    pub fn reset(&mut self, handle: Handle, position: usize) -> Result<Handle> {
        self.buffer_mut(handle)?.reset(position);
        Ok(handle)
    }

    /// Restore every slot to the default value and rewind head and tail.
    pub fn clear(&mut self, handle: Handle) -> Result<Handle> {
        self.buffer_mut(handle)?.clear();
        Ok(handle)
    }

    /// Snapshot of all slots in logical order.
    pub fn to_list(&self, handle: Handle) -> Result<Vec<T>> {
        Ok(self.buffer(handle)?.to_list())
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("slots", &self.slots.len())
            .field("live", &self.live)
            .finish()
    }
}

fn stale(handle: Handle) -> Error {
    warn!(
        index = handle.index,
        generation = handle.generation,
        "handle does not refer to a live ring buffer"
    );
    Error::InvalidHandle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_read() {
        let mut registry = Registry::new();
        let h = registry.create(3, 0u8).unwrap();
        assert!(registry.contains(h));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.to_list(h).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_create_with_zero_capacity() {
        let mut registry = Registry::new();
        let result = registry.create(0, 0u8);
        assert!(matches!(result.unwrap_err(), Error::InvalidArgument(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_operations_chain_through_handle() {
        let mut registry = Registry::new();
        let h = registry.create(3, 0).unwrap();
        let h = registry.set(h, 0, 1).unwrap();
        let h = registry.set(h, 1, 2).unwrap();
        let h = registry.reset(h, 0).unwrap();
        assert_eq!(registry.to_list(h).unwrap(), vec![0, 2, 0]);
        let h = registry.clear(h).unwrap();
        assert_eq!(registry.to_list(h).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_destroyed_handle_is_invalid() {
        let mut registry = Registry::new();
        let h = registry.create(2, 'a').unwrap();
        let released = registry.destroy(h).unwrap();
        assert_eq!(released.to_list(), vec!['a', 'a']);

        assert!(!registry.contains(h));
        assert_eq!(registry.get(h, 0), Err(Error::InvalidHandle));
        assert_eq!(registry.set(h, 0, 'b'), Err(Error::InvalidHandle));
        assert_eq!(registry.reset(h, 0), Err(Error::InvalidHandle));
        assert_eq!(registry.clear(h), Err(Error::InvalidHandle));
        assert_eq!(registry.to_list(h), Err(Error::InvalidHandle));
        assert!(matches!(registry.destroy(h), Err(Error::InvalidHandle)));
    }

    #[test]
    fn test_reused_slot_rejects_stale_handle() {
        let mut registry = Registry::new();
        let old = registry.create(2, 0).unwrap();
        registry.destroy(old).unwrap();

        let new = registry.create(2, 5).unwrap();
        assert_eq!(new.index, old.index);
        assert_ne!(new, old);
        assert_eq!(registry.get(old, 0), Err(Error::InvalidHandle));
        assert_eq!(registry.get(new, 0), Ok(5));
    }

    #[test]
    fn test_foreign_handle_is_invalid() {
        let mut a = Registry::new();
        let mut b = Registry::new();
        let ha = a.create(1, 1).unwrap();
        let _hb = b.create(1, 2).unwrap();
        assert_eq!(b.get(ha, 0), Err(Error::InvalidHandle));
    }

    #[test]
    fn test_failed_write_leaves_buffers_untouched() {
        let mut registry = Registry::new();
        let live = registry.create(2, 0).unwrap();
        let dead = registry.create(2, 0).unwrap();
        registry.destroy(dead).unwrap();

        assert!(registry.set(dead, 0, 9).is_err());
        assert_eq!(registry.to_list(live).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_from_list_registers_buffer() {
        let mut registry = Registry::with_capacity(4);
        let h = registry.from_list(vec![1, 2, 3], 0).unwrap();
        assert_eq!(registry.buffer(h).unwrap().capacity(), 3);
        registry.reset(h, 0).unwrap();
        assert_eq!(registry.get(h, 0), Ok(0));
        assert!(registry.from_list(Vec::new(), 0).is_err());
        assert_eq!(registry.len(), 1);
    }
}
