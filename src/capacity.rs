use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Number of slots in a ring buffer.
///
/// A `Capacity` is always at least 1, so a buffer built from one can
/// never reach the modulo-by-zero addressing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "i64")]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Validate a raw slot count.
    ///
    /// # Returns
    /// * `Ok(Capacity)` for any count of 1 or more
    /// * `Err(Error::InvalidArgument)` for 0
    pub fn new(slots: usize) -> Result<Self> {
        NonZeroUsize::new(slots)
            .map(Capacity)
            .ok_or_else(|| Error::invalid_argument("capacity must be at least 1, got 0"))
    }

    /// The slot count.
    #[inline]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Capacity {
    type Error = Error;

    fn try_from(slots: usize) -> Result<Self> {
        Capacity::new(slots)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = Error;

    fn try_from(slots: i64) -> Result<Self> {
        if slots < 0 {
            return Err(Error::invalid_argument(format!(
                "capacity must be a non-negative integer, got {slots}"
            )));
        }
        let slots = usize::try_from(slots).map_err(|_| {
            Error::invalid_argument(format!("capacity {slots} does not fit in usize"))
        })?;
        Capacity::new(slots)
    }
}

impl FromStr for Capacity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let slots: i64 = trimmed.parse().map_err(|_| {
            Error::invalid_argument(format!("capacity {trimmed:?} is not an integer"))
        })?;
        Capacity::try_from(slots)
    }
}

impl From<Capacity> for usize {
    fn from(capacity: Capacity) -> usize {
        capacity.get()
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
