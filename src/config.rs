use serde::Deserialize;

use crate::capacity::Capacity;
use crate::ring_buffer::RingBuffer;
use crate::shared::SharedRingBuffer;

/// Declarative description of a ring buffer
///
/// Deserializes from e.g. `{ "capacity": 8, "default": 0 }`. A capacity
/// that is negative, zero, or not an integer fails deserialization with the
/// same message `Error::InvalidArgument` carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BufferConfig<T> {
    /// Number of slots
    pub capacity: Capacity,
    /// Fill value for new, reset and cleared slots
    pub default: T,
}

impl<T: Clone> BufferConfig<T> {
    /// Describe a buffer of `capacity` slots filled with `default`.
    pub fn new(capacity: Capacity, default: T) -> Self {
        BufferConfig { capacity, default }
    }

    /// Build an owned buffer. Infallible: the capacity is already validated.
    pub fn build(&self) -> RingBuffer<T> {
        RingBuffer::with_capacity(self.capacity, self.default.clone())
    }

    /// Build a buffer behind a reference-counted handle.
    pub fn build_shared(&self) -> SharedRingBuffer<T> {
        SharedRingBuffer::from(self.build())
    }
}
