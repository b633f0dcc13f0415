//! Property-based tests: every run-length operation must decode to the plain elementwise or
//! dense-matrix result.

use crate::{BinOp, DenseMatrix, RleMatrix, RleVec};
use proptest::prelude::*;

// Values drawn as short runs, so encodings actually compress
fn runny_values(len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec((-4i64..5, 1usize..5), 0..=len).prop_map(move |runs| {
        let mut v: Vec<i64> = runs
            .into_iter()
            .flat_map(|(x, n)| std::iter::repeat(x).take(n))
            .take(len)
            .collect();
        v.resize(len, 0);
        v
    })
}

fn vec_pair() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    (0usize..40).prop_flat_map(|len| (runny_values(len), runny_values(len)))
}

// Column-major data for a rows x cols matrix
fn matrix(rows: usize, cols: usize) -> impl Strategy<Value = DenseMatrix> {
    prop::collection::vec(runny_values(rows), cols).prop_map(move |columns| {
        DenseMatrix::build(rows, cols, |i, j| columns[j][i])
    })
}

fn any_matrix() -> impl Strategy<Value = DenseMatrix> {
    (1usize..8, 1usize..8).prop_flat_map(|(r, c)| matrix(r, c))
}

fn same_shape_pair() -> impl Strategy<Value = (DenseMatrix, DenseMatrix)> {
    (1usize..8, 1usize..8).prop_flat_map(|(r, c)| (matrix(r, c), matrix(r, c)))
}

fn product_pair() -> impl Strategy<Value = (DenseMatrix, DenseMatrix)> {
    (1usize..7, 1usize..7, 1usize..7).prop_flat_map(|(r, k, c)| (matrix(r, k), matrix(k, c)))
}

proptest! {
    #[test]
    fn vec_elementwise((a, b) in vec_pair(), s in -3i64..4) {
        let (x, y) = (RleVec::from(a.clone()), RleVec::from(b.clone()));
        let zip = |f: fn(i64, i64) -> i64| -> Vec<i64> {
            a.iter().zip(&b).map(|(&p, &q)| f(p, q)).collect()
        };
        prop_assert_eq!((&x + &y).to_vec(), zip(|p, q| p + q));
        prop_assert_eq!((&x - &y).to_vec(), zip(|p, q| p - q));
        prop_assert_eq!((&x * &y).to_vec(), zip(|p, q| p * q));
        prop_assert_eq!(
            (&x * s).to_vec(),
            a.iter().map(|p| p * s).collect::<Vec<_>>()
        );
        prop_assert_eq!(x.dot(&y).unwrap(), zip(|p, q| p * q).iter().sum::<i64>());
    }

    #[test]
    fn vec_division((a, b) in vec_pair()) {
        let (x, y) = (RleVec::from(a.clone()), RleVec::from(b.clone()));
        let q = x.apply(BinOp::Div, &y);
        if b.contains(&0) {
            prop_assert!(q.is_err());
        } else {
            let expected: Vec<i64> = a.iter().zip(&b).map(|(p, q)| p / q).collect();
            prop_assert_eq!(q.unwrap().to_vec(), expected);
        }
    }

    #[test]
    fn vec_set_get(a in runny_values(30), i in 0usize..30, x in -5i64..6) {
        let mut v = RleVec::from(a.clone());
        let mut d = a;
        v.set(i, x);
        d[i] = x;
        prop_assert_eq!(v.to_vec(), d);
        prop_assert_eq!(v.get(i), x);
    }

    #[test]
    fn vec_slicing(a in runny_values(25), lo in 0usize..25, hi in 0usize..25) {
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        let v = RleVec::from(a.clone());
        prop_assert_eq!(v.slice(lo..hi).unwrap().to_vec(), a[lo..hi].to_vec());
        prop_assert_eq!(v.exclude(lo..hi).unwrap().to_vec(), [&a[..lo], &a[hi..]].concat());
    }

    #[test]
    fn matrix_elementwise((a, b) in same_shape_pair(), s in -3i64..4) {
        let (x, y) = (RleMatrix::from_dense(&a), RleMatrix::from_dense(&b));
        let sum = DenseMatrix::build(a.rows(), a.cols(), |i, j| a[(i, j)] + b[(i, j)]);
        let diff = DenseMatrix::build(a.rows(), a.cols(), |i, j| a[(i, j)] - b[(i, j)]);
        let scaled = DenseMatrix::build(a.rows(), a.cols(), |i, j| a[(i, j)] * s);
        prop_assert_eq!((&x + &y).to_dense(), sum);
        prop_assert_eq!((&x - &y).to_dense(), diff);
        prop_assert_eq!((&x * s).to_dense(), scaled);
    }

    #[test]
    fn matrix_product((a, b) in product_pair()) {
        let (x, y) = (RleMatrix::from_dense(&a), RleMatrix::from_dense(&b));
        prop_assert_eq!((&x * &y).to_dense(), &a * &b);
        prop_assert_eq!(&x * &b, &a * &b);
    }

    #[test]
    fn matrix_vector(a in any_matrix(), seed in runny_values(8)) {
        let x = RleMatrix::from_dense(&a);
        let v = RleVec::from(&seed[..a.cols()]);
        prop_assert_eq!(x.dot(&v).unwrap().to_vec(), a.mul_vec(&seed).unwrap());
    }

    #[test]
    fn transpose_involution(a in any_matrix()) {
        let x = RleMatrix::from_dense(&a);
        let t = x.transposed();
        prop_assert_eq!(t.to_dense(), a.transposed());
        prop_assert_eq!(t.transposed(), x.clone());

        let mut y = x.clone();
        y.transpose_inplace();
        prop_assert_eq!(y, t);
    }

    #[test]
    fn set_get(a in any_matrix(), i in 0usize..8, j in 0usize..8, v in -9i64..10) {
        let (i, j) = (i % a.rows(), j % a.cols());
        let mut x = RleMatrix::from_dense(&a);
        let mut d = a;
        x.set(i, j, v);
        d[(i, j)] = v;
        prop_assert_eq!(x.get(i, j), v);
        prop_assert_eq!(x.to_dense(), d);
    }

    #[test]
    fn structural_ops(a in any_matrix(), r in 0usize..8, c in 0usize..8) {
        let (r, c) = (r % (a.rows() + 1), c % (a.cols() + 1));
        let x = RleMatrix::from_dense(&a);
        let rows = a.to_rows();

        let top = x.slice(0..r, c..a.cols()).unwrap();
        let expected: Vec<Vec<i64>> = rows[..r].iter().map(|row| row[c..].to_vec()).collect();
        prop_assert_eq!(top.to_rows(), expected);

        let kept = x.exclude_rows(0..r).unwrap();
        prop_assert_eq!(kept.to_rows(), rows[r..].to_vec());

        let stacked = x.slice_rows(0..r).unwrap().vstack(&kept).unwrap();
        prop_assert_eq!(&stacked, &x);

        let joined = x
            .slice_cols(0..c)
            .unwrap()
            .hstack(&x.exclude_cols(0..c).unwrap())
            .unwrap();
        prop_assert_eq!(&joined, &x);
    }
}
