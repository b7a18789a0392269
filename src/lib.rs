//! # slotring - fixed-capacity default-filled ring buffer
//!
//! A generic ring buffer of exactly `capacity` slots, addressed by logical
//! positions that wrap around a head offset.
//!
//! ## Design
//!
//! - Capacity fixed at construction, at least 1
//! - Every slot always holds a value; unset slots hold the default value
//! - Logical position `p` maps to physical index `(head + p) % capacity`
//! - Positions are never bounds-checked: `get(capacity + 1)` reads slot 1
//! - `reset` restores one slot to the default, `clear` restores all of them
//! - Snapshots (`to_list`) read a full rotation starting at head
//!
//! Three ways to hold a buffer:
//!
//! - [`RingBuffer`]: owned value, `&mut self` mutation
//! - [`Registry`] + [`Handle`]: arena of buffers behind copyable handles;
//!   destroyed handles fail with [`Error::InvalidHandle`]
//! - [`SharedRingBuffer`]: reference-counted, lock-guarded; released when the
//!   last clone is dropped
//!
//! ## Example
//!
//! ```
//! use slotring::{Error, Registry};
//!
//! let mut buffers = Registry::new();
//! let h = buffers.create(3, 0).unwrap();
//!
//! buffers.set(h, 0, 10).unwrap();
//! buffers.set(h, 4, 11).unwrap(); // position 4 wraps onto slot 1
//! assert_eq!(buffers.to_list(h).unwrap(), vec![10, 11, 0]);
//!
//! buffers.reset(h, 0).unwrap();
//! assert_eq!(buffers.get(h, 0).unwrap(), 0);
//!
//! buffers.destroy(h).unwrap();
//! assert_eq!(buffers.get(h, 0), Err(Error::InvalidHandle));
//! ```

#![warn(missing_docs)]

mod capacity;
mod config;
mod error;
mod registry;
mod ring_buffer;
mod shared;

pub use capacity::Capacity;
pub use config::BufferConfig;
pub use error::{Error, Result};
pub use registry::{Handle, Registry};
pub use ring_buffer::{Iter, RingBuffer};
pub use shared::SharedRingBuffer;
