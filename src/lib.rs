//! # lazy-segtree
//!
//! Generic segment trees over a fixed-length sequence.
//!
//! - [`LazySegmentTree`] supports range updates and range aggregate queries in
//!   O(log n) via lazy propagation, for any algebra implementing
//!   [`LazyAlgebra`].
//! - [`SegmentTree`] is the simpler sibling with point updates only, for any
//!   [`Monoid`].
//!
//! Common algebras (range add with sum/min/max, range assign, affine maps)
//! live in [`ops`]; [`FnAlgebra`] builds one from closures.
//!
//! ## Example
//!
//! ```rust
//! use lazy_segtree::{LazySegmentTree, ops::RangeAddSum};
//!
//! let mut tree = LazySegmentTree::from_vec(vec![1i64, 3, -2, 8, -7], RangeAddSum::new());
//! assert_eq!(tree.range_query(0, 4), Ok(3));
//!
//! tree.range_update(1, 3, 10).unwrap();
//! assert_eq!(tree.value_at(2), Ok(8));
//! assert_eq!(tree.range_query(1, 3), Ok(39));
//! assert_eq!(tree.total(), 33);
//! ```
//!
//! ## Exclusive access
//!
//! Queries on [`LazySegmentTree`] push pending tags towards the leaves, so
//! they take `&mut self`. Sharing a tree between threads therefore needs the
//! caller's own synchronization; the tree does no locking.

pub mod algebra;
pub mod error;
pub mod lazy;
pub mod ops;
pub mod segtree;

pub use algebra::{FnAlgebra, LazyAlgebra, Monoid};
pub use error::{Error, Result};
pub use lazy::LazySegmentTree;
pub use segtree::SegmentTree;

#[cfg(test)]
mod proptests;
