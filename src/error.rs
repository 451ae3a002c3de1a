//! Error type shared by both trees.
//!
//! Every indexed operation validates its bounds before touching the node
//! array, so an `Err` always means the tree was left exactly as it was.

use std::fmt;

/// Rejected index or range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `index` is not below the tree length. For ranges this carries the
    /// right bound.
    OutOfRange { index: usize, len: usize },
    /// `left > right` on an inclusive range.
    InvalidRange { left: usize, right: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            Error::InvalidRange { left, right } => {
                write!(f, "invalid range: left {} is greater than right {}", left, right)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        #[cfg(feature = "tracing")]
        tracing::debug!(index, len, "index rejected");
        return Err(Error::OutOfRange { index, len });
    }
    Ok(())
}

/// Validates an inclusive `[left, right]` range. Ordering is checked first.
#[inline]
pub(crate) fn check_range(left: usize, right: usize, len: usize) -> Result<()> {
    if left > right {
        #[cfg(feature = "tracing")]
        tracing::debug!(left, right, len, "range rejected");
        return Err(Error::InvalidRange { left, right });
    }
    check_index(right, len)
}

/// Converts any `RangeBounds` into an inclusive pair, or `None` when the range
/// is empty but otherwise in bounds.
pub(crate) fn resolve_bounds<R>(range: R, len: usize) -> Result<Option<(usize, usize)>>
where
    R: std::ops::RangeBounds<usize>,
{
    use std::ops::Bound;

    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.checked_add(1).ok_or(Error::OutOfRange { index: s, len })?,
        Bound::Unbounded => 0,
    };
    // Exclusive end, so `0..0` is representable.
    let end = match range.end_bound() {
        Bound::Included(&e) => e.checked_add(1).ok_or(Error::OutOfRange { index: e, len })?,
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    if end > len {
        #[cfg(feature = "tracing")]
        tracing::debug!(start, end, len, "range rejected");
        return Err(Error::OutOfRange { index: end - 1, len });
    }
    if start > end {
        return Err(Error::InvalidRange { left: start, right: end.saturating_sub(1) });
    }
    if start == end {
        return Ok(None);
    }
    Ok(Some((start, end - 1)))
}
