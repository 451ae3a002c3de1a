//! Segment tree without lazy propagation.
//!
//! Bottom-up layout over `2n` slots: leaf `i` is at `n + i`, the parent of `k`
//! is `k >> 1`, and slot 0 is unused. Only point updates are supported, which
//! keeps every read `&self`.

use std::fmt;
use std::ops::RangeBounds;

use crate::algebra::Monoid;
use crate::error::{check_index, check_range, resolve_bounds, Result};

/// Point-update, range-query segment tree over a [`Monoid`].
pub struct SegmentTree<M: Monoid> {
    n: usize,
    sum: Vec<M::Item>,
    monoid: M,
}

impl<M: Monoid> SegmentTree<M> {
    pub fn new(monoid: M) -> Self {
        Self {
            n: 0,
            sum: Vec::new(),
            monoid,
        }
    }

    /// Creates a tree of `n` identity elements.
    pub fn with_len(n: usize, monoid: M) -> Self {
        let sum = (0..2 * n).map(|_| monoid.identity()).collect();
        Self { n, sum, monoid }
    }

    pub fn from_vec(values: Vec<M::Item>, monoid: M) -> Self {
        let mut tree = Self::new(monoid);
        tree.build(values);
        tree
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn monoid(&self) -> &M {
        &self.monoid
    }

    /// Replaces the contents with `values`.
    pub fn build<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = M::Item>,
    {
        let values: Vec<M::Item> = values.into_iter().collect();
        let n = values.len();
        let mut sum: Vec<M::Item> = (0..n).map(|_| self.monoid.identity()).collect();
        sum.extend(values);
        for i in (1..n).rev() {
            sum[i] = self.monoid.combine(&sum[i << 1], &sum[i << 1 | 1]);
        }
        self.n = n;
        self.sum = sum;

        #[cfg(feature = "tracing")]
        tracing::trace!(len = n, "segment tree built");
    }

    pub fn clear(&mut self) {
        self.n = 0;
        self.sum = Vec::new();
    }

    pub fn get(&self, index: usize) -> Result<&M::Item> {
        check_index(index, self.n)?;
        Ok(&self.sum[index + self.n])
    }

    pub fn set(&mut self, index: usize, value: M::Item) -> Result<()> {
        check_index(index, self.n)?;
        let mut k = index + self.n;
        self.sum[k] = value;
        while k > 1 {
            k >>= 1;
            self.sum[k] = self.monoid.combine(&self.sum[k << 1], &self.sum[k << 1 | 1]);
        }
        Ok(())
    }

    /// Aggregate over the inclusive range `[left, right]`.
    pub fn range_query(&self, left: usize, right: usize) -> Result<M::Item> {
        check_range(left, right, self.n)?;
        Ok(self.fold(left, right + 1))
    }

    /// Aggregate over any `RangeBounds`; an empty in-bounds range yields the
    /// identity.
    pub fn query<R: RangeBounds<usize>>(&self, range: R) -> Result<M::Item> {
        match resolve_bounds(range, self.n)? {
            Some((left, right)) => Ok(self.fold(left, right + 1)),
            None => Ok(self.monoid.identity()),
        }
    }

    /// Aggregate over the whole tree; the identity when empty.
    pub fn total(&self) -> M::Item {
        self.fold(0, self.n)
    }

    /// Half-open fold. Left and right partial results are kept apart so a
    /// non-commutative monoid still sees operands in index order.
    fn fold(&self, start: usize, end: usize) -> M::Item {
        let (mut start, mut end) = (start + self.n, end + self.n);
        let (mut acc_left, mut acc_right) = (self.monoid.identity(), self.monoid.identity());
        while start < end {
            if start & 1 != 0 {
                acc_left = self.monoid.combine(&acc_left, &self.sum[start]);
                start += 1;
            }
            if end & 1 != 0 {
                end -= 1;
                acc_right = self.monoid.combine(&self.sum[end], &acc_right);
            }
            start >>= 1;
            end >>= 1;
        }
        self.monoid.combine(&acc_left, &acc_right)
    }
}

impl<M> Clone for SegmentTree<M>
where
    M: Monoid + Clone,
{
    fn clone(&self) -> Self {
        Self {
            n: self.n,
            sum: self.sum.clone(),
            monoid: self.monoid.clone(),
        }
    }
}

impl<M> Default for SegmentTree<M>
where
    M: Monoid + Default,
{
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M> fmt::Debug for SegmentTree<M>
where
    M: Monoid,
    M::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.sum.iter().skip(self.n))
            .finish()
    }
}
