//! Ready-made algebras for the common cases.
//!
//! Plain monoids ([`Sum`], [`Min`], [`Max`]) plug into
//! [`SegmentTree`](crate::SegmentTree). The `Range*` types are
//! [`LazyAlgebra`]s for [`LazySegmentTree`](crate::LazySegmentTree).
//!
//! Integer overflow behaves as it does elsewhere in the program: it panics in
//! debug builds. Length-scaled tags go through [`Scalar::add_scaled`], which
//! stays exact when a covered length does not fit in the scalar type.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Mul};

use crate::algebra::{LazyAlgebra, Monoid};

/// Numeric element types usable with the built-in algebras.
pub trait Scalar:
    Copy + PartialOrd + Add<Output = Self> + Mul<Output = Self> + fmt::Debug
{
    const ZERO: Self;
    const ONE: Self;
    /// Neutral element for `max`.
    const LOWEST: Self;
    /// Neutral element for `min`.
    const HIGHEST: Self;

    /// `self + tag * len`.
    ///
    /// Exact whenever the final result fits in `Self`, even if `len` itself
    /// does not. Overflow of the final result follows the usual rules: it
    /// panics in debug builds and wraps in release.
    fn add_scaled(self, tag: Self, len: usize) -> Self;
}

// Up to 64 bits: evaluate in i128. Wrapping there and truncating afterwards
// agrees with wrapping in `$t`, since 2^bits divides 2^128.
macro_rules! impl_scalar_int {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const LOWEST: Self = <$t>::MIN;
                const HIGHEST: Self = <$t>::MAX;

                #[inline]
                fn add_scaled(self, tag: Self, len: usize) -> Self {
                    let (base, tag, len) = (self as i128, tag as i128, len as i128);
                    debug_assert!(
                        tag.checked_mul(len)
                            .and_then(|p| p.checked_add(base))
                            .and_then(|v| <$t>::try_from(v).ok())
                            .is_some(),
                        "attempt to add with overflow"
                    );
                    tag.wrapping_mul(len).wrapping_add(base) as $t
                }
            }
        )*
    };
}

impl_scalar_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// Any `usize` fits in a 128-bit integer, so plain arithmetic is exact.
macro_rules! impl_scalar_wide {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const LOWEST: Self = <$t>::MIN;
                const HIGHEST: Self = <$t>::MAX;

                #[inline]
                fn add_scaled(self, tag: Self, len: usize) -> Self {
                    self + tag * len as $t
                }
            }
        )*
    };
}

impl_scalar_wide!(i128, u128);

macro_rules! impl_scalar_float {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;
                const LOWEST: Self = <$t>::NEG_INFINITY;
                const HIGHEST: Self = <$t>::INFINITY;

                #[inline]
                fn add_scaled(self, tag: Self, len: usize) -> Self {
                    self + tag * len as $t
                }
            }
        )*
    };
}

impl_scalar_float!(f32, f64);

#[inline]
fn min_of<T: Scalar>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline]
fn max_of<T: Scalar>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

// Type-level markers carry no data; implement the std traits without
// requiring anything of `T`.
macro_rules! marker_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T>(PhantomData<fn() -> T>);

        impl<T> $name<T> {
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

// =============================================================================
// Plain monoids
// =============================================================================

marker_type!(
    /// Sum, identity zero.
    Sum
);
marker_type!(
    /// Minimum, identity [`Scalar::HIGHEST`].
    Min
);
marker_type!(
    /// Maximum, identity [`Scalar::LOWEST`].
    Max
);

impl<T: Scalar> Monoid for Sum<T> {
    type Item = T;

    fn identity(&self) -> T {
        T::ZERO
    }

    fn combine(&self, left: &T, right: &T) -> T {
        *left + *right
    }
}

impl<T: Scalar> Monoid for Min<T> {
    type Item = T;

    fn identity(&self) -> T {
        T::HIGHEST
    }

    fn combine(&self, left: &T, right: &T) -> T {
        min_of(*left, *right)
    }
}

impl<T: Scalar> Monoid for Max<T> {
    type Item = T;

    fn identity(&self) -> T {
        T::LOWEST
    }

    fn combine(&self, left: &T, right: &T) -> T {
        max_of(*left, *right)
    }
}

// =============================================================================
// Lazy algebras
// =============================================================================

marker_type!(
    /// Range add, range sum. Tag `d` adds `d` to every covered element.
    RangeAddSum
);
marker_type!(
    /// Range add, range minimum.
    RangeAddMin
);
marker_type!(
    /// Range add, range maximum.
    RangeAddMax
);
marker_type!(
    /// Range assign, range sum. Tag `x` overwrites every covered element.
    RangeAssignSum
);
marker_type!(
    /// Range affine map `x -> mul * x + add`, range sum.
    RangeAffineSum
);
marker_type!(
    /// Range add over [`SumLen`] nodes: each node carries its own length, so
    /// `apply` ignores the length the tree passes in.
    RangeAddSumLen
);

impl<T: Scalar> Monoid for RangeAddSum<T> {
    type Item = T;

    fn identity(&self) -> T {
        T::ZERO
    }

    fn combine(&self, left: &T, right: &T) -> T {
        *left + *right
    }
}

impl<T: Scalar> LazyAlgebra for RangeAddSum<T> {
    type Value = T;
    type Tag = T;

    fn leaf(&self, value: T) -> T {
        value
    }

    fn apply(&self, node: &T, tag: &T, len: usize) -> T {
        node.add_scaled(*tag, len)
    }

    fn compose(&self, older: &T, newer: &T) -> T {
        *older + *newer
    }
}

impl<T: Scalar> Monoid for RangeAddMin<T> {
    type Item = T;

    fn identity(&self) -> T {
        T::HIGHEST
    }

    fn combine(&self, left: &T, right: &T) -> T {
        min_of(*left, *right)
    }
}

impl<T: Scalar> LazyAlgebra for RangeAddMin<T> {
    type Value = T;
    type Tag = T;

    fn leaf(&self, value: T) -> T {
        value
    }

    fn apply(&self, node: &T, tag: &T, _len: usize) -> T {
        *node + *tag
    }

    fn compose(&self, older: &T, newer: &T) -> T {
        *older + *newer
    }
}

impl<T: Scalar> Monoid for RangeAddMax<T> {
    type Item = T;

    fn identity(&self) -> T {
        T::LOWEST
    }

    fn combine(&self, left: &T, right: &T) -> T {
        max_of(*left, *right)
    }
}

impl<T: Scalar> LazyAlgebra for RangeAddMax<T> {
    type Value = T;
    type Tag = T;

    fn leaf(&self, value: T) -> T {
        value
    }

    fn apply(&self, node: &T, tag: &T, _len: usize) -> T {
        *node + *tag
    }

    fn compose(&self, older: &T, newer: &T) -> T {
        *older + *newer
    }
}

impl<T: Scalar> Monoid for RangeAssignSum<T> {
    type Item = T;

    fn identity(&self) -> T {
        T::ZERO
    }

    fn combine(&self, left: &T, right: &T) -> T {
        *left + *right
    }
}

impl<T: Scalar> LazyAlgebra for RangeAssignSum<T> {
    type Value = T;
    type Tag = T;

    fn leaf(&self, value: T) -> T {
        value
    }

    fn apply(&self, _node: &T, tag: &T, len: usize) -> T {
        T::ZERO.add_scaled(*tag, len)
    }

    fn compose(&self, _older: &T, newer: &T) -> T {
        *newer
    }
}

/// Affine tag `x -> mul * x + add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affine<T> {
    pub mul: T,
    pub add: T,
}

impl<T: Scalar> Affine<T> {
    pub fn new(mul: T, add: T) -> Self {
        Self { mul, add }
    }

    /// `x -> x + add`.
    pub fn shift(add: T) -> Self {
        Self { mul: T::ONE, add }
    }

    /// `x -> mul * x`.
    pub fn scale(mul: T) -> Self {
        Self { mul, add: T::ZERO }
    }

    #[inline]
    pub fn eval(&self, x: T) -> T {
        self.mul * x + self.add
    }
}

impl<T: Scalar> Monoid for RangeAffineSum<T> {
    type Item = T;

    fn identity(&self) -> T {
        T::ZERO
    }

    fn combine(&self, left: &T, right: &T) -> T {
        *left + *right
    }
}

impl<T: Scalar> LazyAlgebra for RangeAffineSum<T> {
    type Value = T;
    type Tag = Affine<T>;

    fn leaf(&self, value: T) -> T {
        value
    }

    fn apply(&self, node: &T, tag: &Affine<T>, len: usize) -> T {
        (tag.mul * *node).add_scaled(tag.add, len)
    }

    fn compose(&self, older: &Affine<T>, newer: &Affine<T>) -> Affine<T> {
        // newer(older(x)) = n.mul * (o.mul * x + o.add) + n.add
        Affine {
            mul: newer.mul * older.mul,
            add: newer.mul * older.add + newer.add,
        }
    }
}

/// Sum aggregate that knows how many elements it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SumLen<T> {
    pub sum: T,
    pub len: usize,
}

impl<T: Scalar> Add<T> for SumLen<T> {
    type Output = SumLen<T>;

    /// Adds to the sum only; used for single-element deltas.
    fn add(self, delta: T) -> SumLen<T> {
        SumLen {
            sum: self.sum + delta,
            len: self.len,
        }
    }
}

impl<T: Scalar> Monoid for RangeAddSumLen<T> {
    type Item = SumLen<T>;

    fn identity(&self) -> SumLen<T> {
        SumLen {
            sum: T::ZERO,
            len: 0,
        }
    }

    fn combine(&self, left: &SumLen<T>, right: &SumLen<T>) -> SumLen<T> {
        SumLen {
            sum: left.sum + right.sum,
            len: left.len + right.len,
        }
    }
}

impl<T: Scalar> LazyAlgebra for RangeAddSumLen<T> {
    type Value = T;
    type Tag = T;

    fn leaf(&self, value: T) -> SumLen<T> {
        SumLen { sum: value, len: 1 }
    }

    fn apply(&self, node: &SumLen<T>, tag: &T, _len: usize) -> SumLen<T> {
        SumLen {
            sum: node.sum.add_scaled(*tag, node.len),
            len: node.len,
        }
    }

    fn compose(&self, older: &T, newer: &T) -> T {
        *older + *newer
    }
}
