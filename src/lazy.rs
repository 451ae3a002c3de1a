//! Segment tree with lazy range updates.
//!
//! ## Layout
//!
//! Nodes live in one flat array, 1-indexed: node `k` covers some inclusive
//! range `[l, r]`, its children are `2k` (covering `[l, mid]`) and `2k + 1`
//! (covering `[mid + 1, r]`) with `mid = (l + r) / 2`. The root is node 1 and
//! covers `[0, len - 1]`. Slot 0 is unused. A leaf of a tree over `n`
//! elements sits at depth at most `ceil(log2 n)`, so `2 * n.next_power_of_two()`
//! slots are enough.
//!
//! ## Propagation
//!
//! Each slot stores an aggregate and an optional pending tag.
//! - A slot's aggregate is always fresh: applying a tag to a slot updates its
//!   aggregate immediately. Only the children are deferred.
//! - A pending tag means "both children still need this applied". Leaves never
//!   hold one.
//! - Every descent pushes the pending tag of a partially covered slot down
//!   before recursing, and every return recomputes the slot from its children.
//!
//! Because reads push tags down too, every read except [`total`] takes
//! `&mut self`.
//!
//! [`total`]: LazySegmentTree::total

use std::fmt;
use std::ops::{Add, RangeBounds};

use crate::algebra::LazyAlgebra;
use crate::error::{check_index, check_range, resolve_bounds, Result};

#[derive(Clone)]
struct Slot<N, T> {
    aggregate: N,
    pending: Option<T>,
}

/// Segment tree supporting range updates and range queries in O(log n).
///
/// The algebra `A` decides what is aggregated and how tags act; see
/// [`LazyAlgebra`] for the laws it must satisfy.
pub struct LazySegmentTree<A: LazyAlgebra> {
    slots: Vec<Slot<A::Item, A::Tag>>,
    len: usize,
    algebra: A,
}

impl<A: LazyAlgebra> LazySegmentTree<A> {
    /// Creates an empty tree.
    pub fn new(algebra: A) -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            algebra,
        }
    }

    /// Creates a tree over `len` default values.
    pub fn with_len(len: usize, algebra: A) -> Self
    where
        A::Value: Default,
    {
        Self::from_iter_with((0..len).map(|_| A::Value::default()), algebra)
    }

    /// Creates a tree over `len` copies of `fill`.
    pub fn from_elem(len: usize, fill: A::Value, algebra: A) -> Self
    where
        A::Value: Clone,
    {
        Self::from_iter_with(std::iter::repeat(fill).take(len), algebra)
    }

    pub fn from_vec(values: Vec<A::Value>, algebra: A) -> Self {
        Self::from_iter_with(values, algebra)
    }

    pub fn from_slice(values: &[A::Value], algebra: A) -> Self
    where
        A::Value: Clone,
    {
        Self::from_iter_with(values.iter().cloned(), algebra)
    }

    pub fn from_iter_with<I>(values: I, algebra: A) -> Self
    where
        I: IntoIterator<Item = A::Value>,
    {
        let mut tree = Self::new(algebra);
        tree.build(values);
        tree
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Alias for [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn algebra(&self) -> &A {
        &self.algebra
    }

    /// Replaces the whole contents with `values`. Nothing from the previous
    /// contents survives, including pending tags.
    pub fn build<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = A::Value>,
    {
        let leaves: Vec<A::Item> = values
            .into_iter()
            .map(|v| self.algebra.leaf(v))
            .collect();
        let len = leaves.len();

        self.slots = Vec::new();
        self.len = len;
        if len > 0 {
            let cap = 2 * len.next_power_of_two();
            self.slots = (0..cap)
                .map(|_| Slot {
                    aggregate: self.algebra.identity(),
                    pending: None,
                })
                .collect();
            let mut leaves = leaves.into_iter();
            self.build_rec(1, 0, len - 1, &mut leaves);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(len, slots = self.slots.len(), "lazy segment tree built");
    }

    /// Replaces the contents with `len` default values.
    pub fn reset(&mut self, len: usize)
    where
        A::Value: Default,
    {
        self.build((0..len).map(|_| A::Value::default()));
    }

    /// Drops every element and releases the node array.
    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.len = 0;

        #[cfg(feature = "tracing")]
        tracing::trace!("lazy segment tree cleared");
    }

    /// Moves the contents out, leaving `self` empty with the same algebra.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self::new(self.algebra.clone());

        #[cfg(feature = "tracing")]
        tracing::trace!(len = self.len, "lazy segment tree taken");

        std::mem::replace(self, empty)
    }

    /// Aggregate over the whole tree; the identity when empty.
    ///
    /// Unlike the other reads this needs only `&self`: the root is never
    /// stale.
    pub fn total(&self) -> A::Item {
        if self.len == 0 {
            return self.algebra.identity();
        }
        self.slots[1].aggregate.clone()
    }

    /// Effective aggregate of the element at `index`.
    ///
    /// Takes `&mut self` because pending tags on the path are pushed down.
    pub fn value_at(&mut self, index: usize) -> Result<A::Item> {
        check_index(index, self.len)?;

        let (mut node, mut l, mut r) = (1, 0, self.len - 1);
        while l < r {
            self.push_down(node, l, r);
            let mid = (l + r) / 2;
            if index <= mid {
                node = 2 * node;
                r = mid;
            } else {
                node = 2 * node + 1;
                l = mid + 1;
            }
        }
        Ok(self.slots[node].aggregate.clone())
    }

    /// Aggregate over the inclusive range `[left, right]`.
    ///
    /// Takes `&mut self`: partially covered nodes on the way have their
    /// pending tags pushed down. The result is unaffected.
    pub fn range_query(&mut self, left: usize, right: usize) -> Result<A::Item> {
        check_range(left, right, self.len)?;
        Ok(self.query_rec(1, 0, self.len - 1, left, right))
    }

    /// Aggregate over any `RangeBounds`; an empty in-bounds range yields the
    /// identity.
    pub fn query<R: RangeBounds<usize>>(&mut self, range: R) -> Result<A::Item> {
        match resolve_bounds(range, self.len)? {
            Some((left, right)) => Ok(self.query_rec(1, 0, self.len - 1, left, right)),
            None => Ok(self.algebra.identity()),
        }
    }

    /// Replaces the element at `index`, rebuilding its leaf aggregate.
    pub fn set(&mut self, index: usize, value: A::Value) -> Result<()> {
        check_index(index, self.len)?;
        self.point_rec(1, 0, self.len - 1, index, move |algebra, _| algebra.leaf(value));
        Ok(())
    }

    /// Applies `tag` to the single element at `index`.
    pub fn update(&mut self, index: usize, tag: A::Tag) -> Result<()> {
        check_index(index, self.len)?;
        self.point_rec(1, 0, self.len - 1, index, move |algebra, node| {
            algebra.apply(node, &tag, 1)
        });
        Ok(())
    }

    /// Adds `delta` to the effective aggregate at `index`.
    pub fn add(&mut self, index: usize, delta: A::Value) -> Result<()>
    where
        A::Item: Add<A::Value, Output = A::Item>,
    {
        check_index(index, self.len)?;
        self.point_rec(1, 0, self.len - 1, index, move |_, node| node.clone() + delta);
        Ok(())
    }

    /// Applies `tag` to every element of the inclusive range `[left, right]`.
    pub fn range_update(&mut self, left: usize, right: usize, tag: A::Tag) -> Result<()> {
        check_range(left, right, self.len)?;
        self.update_rec(1, 0, self.len - 1, left, right, &tag);
        Ok(())
    }

    /// [`range_update`](Self::range_update) over any `RangeBounds`. An empty
    /// in-bounds range is a no-op.
    pub fn range_update_bounds<R: RangeBounds<usize>>(&mut self, range: R, tag: A::Tag) -> Result<()> {
        if let Some((left, right)) = resolve_bounds(range, self.len)? {
            self.update_rec(1, 0, self.len - 1, left, right, &tag);
        }
        Ok(())
    }

    /// Effective aggregates of all elements, in index order.
    ///
    /// Pushes every pending tag down to the leaves; O(n).
    pub fn to_vec(&mut self) -> Vec<A::Item> {
        let mut out = Vec::with_capacity(self.len);
        if self.len > 0 {
            self.collect_rec(1, 0, self.len - 1, &mut out);
        }
        out
    }

    // =========================================================================
    // Propagation
    // =========================================================================

    fn build_rec<I>(&mut self, node: usize, l: usize, r: usize, leaves: &mut I)
    where
        I: Iterator<Item = A::Item>,
    {
        if l == r {
            if let Some(leaf) = leaves.next() {
                self.slots[node].aggregate = leaf;
            }
            return;
        }
        let mid = (l + r) / 2;
        self.build_rec(2 * node, l, mid, leaves);
        self.build_rec(2 * node + 1, mid + 1, r, leaves);
        self.pull_up(node);
    }

    /// Applies `tag` to the slot covering `[l, r]`, deferring it for the
    /// children if there are any.
    #[inline]
    fn apply_tag(&mut self, node: usize, l: usize, r: usize, tag: &A::Tag) {
        let slot = &mut self.slots[node];
        slot.aggregate = self.algebra.apply(&slot.aggregate, tag, r - l + 1);
        if l != r {
            slot.pending = Some(match slot.pending.take() {
                Some(older) => self.algebra.compose(&older, tag),
                None => tag.clone(),
            });
        }
    }

    #[inline]
    fn push_down(&mut self, node: usize, l: usize, r: usize) {
        if let Some(tag) = self.slots[node].pending.take() {
            let mid = (l + r) / 2;
            self.apply_tag(2 * node, l, mid, &tag);
            self.apply_tag(2 * node + 1, mid + 1, r, &tag);
        }
    }

    #[inline]
    fn pull_up(&mut self, node: usize) {
        let aggregate = self
            .algebra
            .combine(&self.slots[2 * node].aggregate, &self.slots[2 * node + 1].aggregate);
        self.slots[node].aggregate = aggregate;
    }

    fn update_rec(&mut self, node: usize, l: usize, r: usize, ql: usize, qr: usize, tag: &A::Tag) {
        if ql <= l && r <= qr {
            self.apply_tag(node, l, r, tag);
            return;
        }
        self.push_down(node, l, r);
        let mid = (l + r) / 2;
        if ql <= mid {
            self.update_rec(2 * node, l, mid, ql, qr, tag);
        }
        if qr > mid {
            self.update_rec(2 * node + 1, mid + 1, r, ql, qr, tag);
        }
        self.pull_up(node);
    }

    fn query_rec(&mut self, node: usize, l: usize, r: usize, ql: usize, qr: usize) -> A::Item {
        if ql <= l && r <= qr {
            return self.slots[node].aggregate.clone();
        }
        self.push_down(node, l, r);
        let mid = (l + r) / 2;
        if qr <= mid {
            return self.query_rec(2 * node, l, mid, ql, qr);
        }
        if ql > mid {
            return self.query_rec(2 * node + 1, mid + 1, r, ql, qr);
        }
        let left = self.query_rec(2 * node, l, mid, ql, qr);
        let right = self.query_rec(2 * node + 1, mid + 1, r, ql, qr);
        self.algebra.combine(&left, &right)
    }

    /// Descends to the leaf for `index`, replaces its aggregate with
    /// `f(algebra, current)`, and recomputes the path on the way back.
    fn point_rec<F>(&mut self, node: usize, l: usize, r: usize, index: usize, f: F)
    where
        F: FnOnce(&A, &A::Item) -> A::Item,
    {
        if l == r {
            let aggregate = f(&self.algebra, &self.slots[node].aggregate);
            self.slots[node].aggregate = aggregate;
            return;
        }
        self.push_down(node, l, r);
        let mid = (l + r) / 2;
        if index <= mid {
            self.point_rec(2 * node, l, mid, index, f);
        } else {
            self.point_rec(2 * node + 1, mid + 1, r, index, f);
        }
        self.pull_up(node);
    }

    fn collect_rec(&mut self, node: usize, l: usize, r: usize, out: &mut Vec<A::Item>) {
        if l == r {
            out.push(self.slots[node].aggregate.clone());
            return;
        }
        self.push_down(node, l, r);
        let mid = (l + r) / 2;
        self.collect_rec(2 * node, l, mid, out);
        self.collect_rec(2 * node + 1, mid + 1, r, out);
    }
}

impl<A> Default for LazySegmentTree<A>
where
    A: LazyAlgebra + Default,
{
    fn default() -> Self {
        Self::new(A::default())
    }
}

impl<A> Clone for LazySegmentTree<A>
where
    A: LazyAlgebra + Clone,
{
    /// Deep copy of the whole node array, pending tags included. O(n) in
    /// time and memory; the copy shares nothing with `self`.
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
            algebra: self.algebra.clone(),
        }
    }
}

impl<A> fmt::Debug for LazySegmentTree<A>
where
    A: LazyAlgebra,
    A::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySegmentTree")
            .field("len", &self.len)
            .field("total", &self.total())
            .finish()
    }
}
