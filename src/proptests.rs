use super::*;

use crate::ops::{Affine, Max, RangeAddMax, RangeAddSum, RangeAffineSum, Sum};
use proptest::prelude::*;
use proptest_derive::Arbitrary;

const MAX_LEN: usize = 48;

/// Raw positions are reduced modulo the tree length when an op runs, so the
/// same op list is valid for any length.
#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 3)]
    Set(
        #[proptest(strategy = "0usize..MAX_LEN")] usize,
        #[proptest(strategy = "-100i64..100")] i64,
    ),
    #[proptest(weight = 2)]
    Update(
        #[proptest(strategy = "0usize..MAX_LEN")] usize,
        #[proptest(strategy = "-20i64..20")] i64,
    ),
    Add(
        #[proptest(strategy = "0usize..MAX_LEN")] usize,
        #[proptest(strategy = "-20i64..20")] i64,
    ),
    #[proptest(weight = 4)]
    RangeUpdate(
        #[proptest(strategy = "0usize..MAX_LEN")] usize,
        #[proptest(strategy = "0usize..MAX_LEN")] usize,
        #[proptest(strategy = "-20i64..20")] i64,
    ),
    #[proptest(weight = 4)]
    Query(
        #[proptest(strategy = "0usize..MAX_LEN")] usize,
        #[proptest(strategy = "0usize..MAX_LEN")] usize,
    ),
    ValueAt(#[proptest(strategy = "0usize..MAX_LEN")] usize),
    Total,
}

fn ordered(a: usize, b: usize, n: usize) -> (usize, usize) {
    let (a, b) = (a % n, b % n);
    (a.min(b), a.max(b))
}

fn values_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-100i64..100, 1..=MAX_LEN)
}

#[derive(Clone, Debug)]
enum AffineOp {
    Apply(usize, usize, Affine<i64>),
    Query(usize, usize),
    Set(usize, i64),
}

fn affine_ops_strategy() -> impl Strategy<Value = Vec<AffineOp>> {
    // Multipliers stay in -1..=1 so repeated composition cannot overflow.
    let tag = (-1i64..=1, -10i64..10).prop_map(|(mul, add)| Affine::new(mul, add));
    let op = prop_oneof![
        45 => (0..MAX_LEN, 0..MAX_LEN, tag).prop_map(|(a, b, t)| AffineOp::Apply(a, b, t)),
        40 => (0..MAX_LEN, 0..MAX_LEN).prop_map(|(a, b)| AffineOp::Query(a, b)),
        15 => (0..MAX_LEN, -100i64..100).prop_map(|(i, v)| AffineOp::Set(i, v)),
    ];
    prop::collection::vec(op, 0..=300)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 20_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_range_add_sum_matches_vec(values in values_strategy(), ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        let n = values.len();
        let mut t = LazySegmentTree::from_vec(values.clone(), RangeAddSum::<i64>::new());
        let mut m = values;

        for op in ops {
            match op {
                Op::Set(i, v) => {
                    t.set(i % n, v).unwrap();
                    m[i % n] = v;
                }
                Op::Update(i, d) => {
                    t.update(i % n, d).unwrap();
                    m[i % n] += d;
                }
                Op::Add(i, d) => {
                    t.add(i % n, d).unwrap();
                    m[i % n] += d;
                }
                Op::RangeUpdate(a, b, d) => {
                    let (l, r) = ordered(a, b, n);
                    t.range_update(l, r, d).unwrap();
                    for x in &mut m[l..=r] {
                        *x += d;
                    }
                }
                Op::Query(a, b) => {
                    let (l, r) = ordered(a, b, n);
                    prop_assert_eq!(t.range_query(l, r), Ok(m[l..=r].iter().sum::<i64>()));
                }
                Op::ValueAt(i) => {
                    prop_assert_eq!(t.value_at(i % n), Ok(m[i % n]));
                }
                Op::Total => {
                    prop_assert_eq!(t.total(), m.iter().sum::<i64>());
                }
            }
        }

        prop_assert_eq!(t.to_vec(), m);
    }

    #[test]
    fn prop_range_add_max_matches_vec(values in values_strategy(), ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        let n = values.len();
        let mut t = LazySegmentTree::from_vec(values.clone(), RangeAddMax::<i64>::new());
        let mut m = values;

        for op in ops {
            match op {
                Op::Set(i, v) => {
                    t.set(i % n, v).unwrap();
                    m[i % n] = v;
                }
                Op::Update(i, d) | Op::Add(i, d) => {
                    t.update(i % n, d).unwrap();
                    m[i % n] += d;
                }
                Op::RangeUpdate(a, b, d) => {
                    let (l, r) = ordered(a, b, n);
                    t.range_update(l, r, d).unwrap();
                    for x in &mut m[l..=r] {
                        *x += d;
                    }
                }
                Op::Query(a, b) => {
                    let (l, r) = ordered(a, b, n);
                    prop_assert_eq!(t.range_query(l, r).ok(), m[l..=r].iter().copied().max());
                }
                Op::ValueAt(i) => {
                    prop_assert_eq!(t.value_at(i % n), Ok(m[i % n]));
                }
                Op::Total => {
                    prop_assert_eq!(Some(t.total()), m.iter().copied().max());
                }
            }
        }
    }

    #[test]
    fn prop_affine_sum_matches_vec(values in values_strategy(), ops in affine_ops_strategy()) {
        let n = values.len();
        let mut t = LazySegmentTree::from_vec(values.clone(), RangeAffineSum::<i64>::new());
        let mut m = values;

        for op in ops {
            match op {
                AffineOp::Apply(a, b, tag) => {
                    let (l, r) = ordered(a, b, n);
                    t.range_update(l, r, tag).unwrap();
                    for x in &mut m[l..=r] {
                        *x = tag.eval(*x);
                    }
                }
                AffineOp::Query(a, b) => {
                    let (l, r) = ordered(a, b, n);
                    prop_assert_eq!(t.range_query(l, r), Ok(m[l..=r].iter().sum::<i64>()));
                }
                AffineOp::Set(i, v) => {
                    t.set(i % n, v).unwrap();
                    m[i % n] = v;
                }
            }
        }

        prop_assert_eq!(t.to_vec(), m);
    }

    #[test]
    fn prop_build_total_is_fold(values in prop::collection::vec(-1000i64..1000, 0..=MAX_LEN)) {
        let mut t = LazySegmentTree::from_vec(values.clone(), RangeAddSum::<i64>::new());
        let expected: i64 = values.iter().sum();
        prop_assert_eq!(t.total(), expected);
        if !values.is_empty() {
            prop_assert_eq!(t.range_query(0, values.len() - 1), Ok(expected));
        }

        let plain = SegmentTree::from_vec(values.clone(), Max::<i64>::new());
        prop_assert_eq!(plain.total(), values.iter().copied().max().unwrap_or(i64::MIN));
    }

    #[test]
    fn prop_repeated_query_is_stable(
        values in values_strategy(),
        updates in prop::collection::vec((0..MAX_LEN, 0..MAX_LEN, -20i64..20), 0..=20),
        a in 0..MAX_LEN,
        b in 0..MAX_LEN,
    ) {
        let n = values.len();
        let mut t = LazySegmentTree::from_vec(values, RangeAddSum::<i64>::new());
        for (x, y, d) in updates {
            let (l, r) = ordered(x, y, n);
            t.range_update(l, r, d).unwrap();
        }
        let (l, r) = ordered(a, b, n);
        let first = t.range_query(l, r);
        let second = t.range_query(l, r);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_rejected_calls_do_not_mutate(
        values in values_strategy(),
        updates in prop::collection::vec((0..MAX_LEN, 0..MAX_LEN, -20i64..20), 0..=20),
        extra in 0usize..10,
    ) {
        let n = values.len();
        let mut t = LazySegmentTree::from_vec(values, RangeAddSum::<i64>::new());
        for (x, y, d) in updates {
            let (l, r) = ordered(x, y, n);
            t.range_update(l, r, d).unwrap();
        }
        let mut before = t.clone();

        prop_assert_eq!(t.set(n + extra, 1), Err(Error::OutOfRange { index: n + extra, len: n }));
        prop_assert_eq!(t.update(n + extra, 1), Err(Error::OutOfRange { index: n + extra, len: n }));
        prop_assert_eq!(t.range_update(0, n + extra, 1), Err(Error::OutOfRange { index: n + extra, len: n }));
        prop_assert!(t.range_query(n - 1, n + extra).is_err());
        if n > 1 {
            prop_assert_eq!(t.range_update(n - 1, 0, 1), Err(Error::InvalidRange { left: n - 1, right: 0 }));
        }

        prop_assert_eq!(t.to_vec(), before.to_vec());
    }

    #[test]
    fn prop_lazy_and_plain_agree_on_point_sets(
        values in values_strategy(),
        sets in prop::collection::vec((0..MAX_LEN, -100i64..100), 0..=100),
        queries in prop::collection::vec((0..MAX_LEN, 0..MAX_LEN), 1..=50),
    ) {
        let n = values.len();
        let mut lazy = LazySegmentTree::from_vec(values.clone(), RangeAddSum::<i64>::new());
        let mut plain = SegmentTree::from_vec(values, Sum::<i64>::new());
        for (i, v) in sets {
            lazy.set(i % n, v).unwrap();
            plain.set(i % n, v).unwrap();
        }
        for (a, b) in queries {
            let (l, r) = ordered(a, b, n);
            prop_assert_eq!(lazy.range_query(l, r), plain.range_query(l, r));
        }
    }
}

/// Every range update followed by every range query, for all small lengths.
#[test]
fn exhaustive_small_range_updates() {
    for n in 1..=9usize {
        let base: Vec<i64> = (0..n as i64).map(|i| (i * 7) % 5 - 2).collect();
        for ul in 0..n {
            for ur in ul..n {
                let mut t = LazySegmentTree::from_vec(base.clone(), RangeAddSum::new());
                let mut m = base.clone();
                t.range_update(ul, ur, 3).unwrap();
                for x in &mut m[ul..=ur] {
                    *x += 3;
                }
                for ql in 0..n {
                    for qr in ql..n {
                        assert_eq!(
                            t.range_query(ql, qr),
                            Ok(m[ql..=qr].iter().sum::<i64>()),
                            "n={n} update=[{ul},{ur}] query=[{ql},{qr}]"
                        );
                    }
                }
            }
        }
    }
}

/// Two overlapping updates in both orders; add commutes, so results match.
#[test]
fn exhaustive_overlapping_update_pairs() {
    let n = 7usize;
    let base: Vec<i64> = vec![5, -3, 2, 0, 9, -1, 4];
    let ranges: Vec<(usize, usize)> = (0..n).flat_map(|l| (l..n).map(move |r| (l, r))).collect();

    for &(a0, a1) in &ranges {
        for &(b0, b1) in &ranges {
            let mut first = LazySegmentTree::from_vec(base.clone(), RangeAddMax::new());
            let mut second = LazySegmentTree::from_vec(base.clone(), RangeAddMax::new());
            first.range_update(a0, a1, 4).unwrap();
            first.range_update(b0, b1, -6).unwrap();
            second.range_update(b0, b1, -6).unwrap();
            second.range_update(a0, a1, 4).unwrap();
            assert_eq!(first.to_vec(), second.to_vec());
            assert_eq!(first.total(), second.total());
        }
    }
}
