//! The algebra boundary between the trees and what they aggregate.
//!
//! The trees never inspect aggregates or tags. Everything they know about
//! them comes through these traits, so correctness of every query rests on the
//! implementor upholding the laws below. None of them can be checked at
//! runtime; a violating algebra yields wrong aggregates, not panics.
//!
//! ## Laws
//!
//! For a [`Monoid`]:
//! - `combine(combine(a, b), c) == combine(a, combine(b, c))`
//! - `combine(identity(), a) == a == combine(a, identity())`
//!
//! Additionally, for a [`LazyAlgebra`]:
//! - `compose(compose(t1, t2), t3) == compose(t1, compose(t2, t3))`
//! - `apply(combine(a, b), t, la + lb) == combine(apply(a, t, la), apply(b, t, lb))`
//! - `apply(apply(a, t1, len), t2, len) == apply(a, compose(t1, t2), len)`
//!
//! `combine` is not required to be commutative; both trees keep left operands
//! on the left.

use std::fmt;
use std::marker::PhantomData;

/// Associative combination with a neutral element.
pub trait Monoid {
    type Item: Clone;

    fn identity(&self) -> Self::Item;

    fn combine(&self, left: &Self::Item, right: &Self::Item) -> Self::Item;
}

/// A monoid of aggregates acted on by a monoid of tags.
///
/// `Item` (from [`Monoid`]) is the per-node aggregate. `Value` is what callers
/// store; it is turned into a leaf aggregate with [`leaf`](Self::leaf) and may
/// be a different type, e.g. `i64` values aggregated as `{ sum, len }`.
pub trait LazyAlgebra: Monoid {
    type Value;
    type Tag: Clone;

    /// Builds the leaf aggregate for one stored value.
    fn leaf(&self, value: Self::Value) -> Self::Item;

    /// Applies `tag` to an aggregate covering `len` elements.
    fn apply(&self, node: &Self::Item, tag: &Self::Tag, len: usize) -> Self::Item;

    /// Folds `newer` into an already pending `older` tag. The result must
    /// behave like applying `older` first, then `newer`.
    fn compose(&self, older: &Self::Tag, newer: &Self::Tag) -> Self::Tag;
}

/// A [`LazyAlgebra`] assembled from closures.
///
/// ```rust
/// use lazy_segtree::{FnAlgebra, LazySegmentTree};
///
/// let algebra = FnAlgebra::new(
///     |v: i64| v,
///     |a: &i64, b: &i64| a + b,
///     || 0i64,
///     |n: &i64, t: &i64, len: usize| n + t * len as i64,
///     |a: &i64, b: &i64| a + b,
/// );
/// let mut tree = LazySegmentTree::from_vec(vec![1, 2, 3], algebra);
/// tree.range_update(0, 2, 1).unwrap();
/// assert_eq!(tree.total(), 9);
/// ```
pub struct FnAlgebra<V, N, T, L, C, I, A, P> {
    leaf: L,
    combine: C,
    identity: I,
    apply: A,
    compose: P,
    _marker: PhantomData<fn(V) -> (N, T)>,
}

impl<V, N, T, L, C, I, A, P> FnAlgebra<V, N, T, L, C, I, A, P>
where
    L: Fn(V) -> N,
    C: Fn(&N, &N) -> N,
    I: Fn() -> N,
    A: Fn(&N, &T, usize) -> N,
    P: Fn(&T, &T) -> T,
{
    pub fn new(leaf: L, combine: C, identity: I, apply: A, compose: P) -> Self {
        Self {
            leaf,
            combine,
            identity,
            apply,
            compose,
            _marker: PhantomData,
        }
    }
}

impl<V, N, T, L, C, I, A, P> Monoid for FnAlgebra<V, N, T, L, C, I, A, P>
where
    N: Clone,
    C: Fn(&N, &N) -> N,
    I: Fn() -> N,
{
    type Item = N;

    #[inline]
    fn identity(&self) -> N {
        (self.identity)()
    }

    #[inline]
    fn combine(&self, left: &N, right: &N) -> N {
        (self.combine)(left, right)
    }
}

impl<V, N, T, L, C, I, A, P> LazyAlgebra for FnAlgebra<V, N, T, L, C, I, A, P>
where
    N: Clone,
    T: Clone,
    L: Fn(V) -> N,
    C: Fn(&N, &N) -> N,
    I: Fn() -> N,
    A: Fn(&N, &T, usize) -> N,
    P: Fn(&T, &T) -> T,
{
    type Value = V;
    type Tag = T;

    #[inline]
    fn leaf(&self, value: V) -> N {
        (self.leaf)(value)
    }

    #[inline]
    fn apply(&self, node: &N, tag: &T, len: usize) -> N {
        (self.apply)(node, tag, len)
    }

    #[inline]
    fn compose(&self, older: &T, newer: &T) -> T {
        (self.compose)(older, newer)
    }
}

impl<V, N, T, L, C, I, A, P> Clone for FnAlgebra<V, N, T, L, C, I, A, P>
where
    L: Clone,
    C: Clone,
    I: Clone,
    A: Clone,
    P: Clone,
{
    fn clone(&self) -> Self {
        Self {
            leaf: self.leaf.clone(),
            combine: self.combine.clone(),
            identity: self.identity.clone(),
            apply: self.apply.clone(),
            compose: self.compose.clone(),
            _marker: PhantomData,
        }
    }
}

impl<V, N, T, L, C, I, A, P> fmt::Debug for FnAlgebra<V, N, T, L, C, I, A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAlgebra").finish_non_exhaustive()
    }
}
