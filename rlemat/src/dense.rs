//! Conventional row-major integer matrices.
//!
//! [`DenseMatrix`] is the conversion target of [`crate::RleMatrix::to_dense`] and the scratch
//! representation for operations whose results do not compress well, such as products against
//! an uncompressed operand or cofactor expansion.

use crate::elimination::{gauss_jordan, RowOps};
use crate::error::{MatrixError, Result};
use std::{
    fmt,
    ops::{Index, IndexMut, Mul},
};

/// Largest order accepted by [`DenseMatrix::det_cofactor`]. Cofactor expansion does `n!` work.
pub const COFACTOR_HARD_LIMIT: usize = 12;

/// A matrix of integers stored in row-major order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl DenseMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        DenseMatrix {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut m = Self::zeros(size, size);
        for i in 0..size {
            m[(i, i)] = 1;
        }
        m
    }

    pub fn build(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> i64) -> Self {
        let data = (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .map(|(i, j)| f(i, j))
            .collect();
        DenseMatrix { rows, cols, data }
    }

    /// Creates a matrix from a list of rows.
    ///
    /// # Errors
    ///
    /// Fails with a shape fault if the rows have differing lengths.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(MatrixError::shape(
                format!("rows of length {}", cols),
                format!("row of length {}", bad.len()),
            ));
        }
        Ok(DenseMatrix {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self[(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: i64) {
        self[(i, j)] = value;
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[i64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [i64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn transposed(&self) -> Self {
        Self::build(self.cols, self.rows, |i, j| self[(j, i)])
    }

    /// Returns a copy with row `row` and column `col` removed
    pub fn minor(&self, row: usize, col: usize) -> Self {
        let data = (0..self.rows)
            .filter(|&i| i != row)
            .flat_map(|i| {
                self.row(i)
                    .iter()
                    .enumerate()
                    .filter(move |&(j, _)| j != col)
                    .map(|(_, &x)| x)
            })
            .collect();
        DenseMatrix {
            rows: self.rows.saturating_sub(1),
            cols: self.cols.saturating_sub(1),
            data,
        }
    }

    fn check_square(&self) -> Result<()> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Determinant by recursive cofactor expansion along row 0.
    ///
    /// This costs `O(n!)`; orders above [`COFACTOR_HARD_LIMIT`] are refused. Products are
    /// accumulated in checked `i128`.
    ///
    /// # Errors
    ///
    /// Non-square or shape fault, or [`MatrixError::Narrowing`] if the determinant does not fit
    /// in `i64`.
    pub fn det_cofactor(&self) -> Result<i64> {
        self.check_square()?;
        if self.rows > COFACTOR_HARD_LIMIT {
            return Err(MatrixError::shape(
                format!("order at most {}", COFACTOR_HARD_LIMIT),
                format!("order {}", self.rows),
            ));
        }
        narrow_det(self.cofactor_helper())
    }

    fn cofactor_helper(&self) -> Option<i128> {
        match self.rows {
            0 => Some(1),
            1 => Some(i128::from(self.data[0])),
            2 => {
                let [a, b, c, d] = [0, 1, 2, 3].map(|k| i128::from(self.data[k]));
                (a * d).checked_sub(b * c)
            }
            _ => {
                let mut det: i128 = 0;
                let mut sign = 1;
                for j in 0..self.cols {
                    let a = self[(0, j)];
                    if a != 0 {
                        let term = self
                            .minor(0, j)
                            .cofactor_helper()?
                            .checked_mul(sign * i128::from(a))?;
                        det = det.checked_add(term)?;
                    }
                    sign = -sign;
                }
                Some(det)
            }
        }
    }

    /// Determinant by fraction-free (Bareiss) elimination.
    ///
    /// Every division in the recurrence is exact, so the result is the exact integer
    /// determinant in `O(n^3)` operations. Intermediate values are held in checked `i128`.
    ///
    /// # Errors
    ///
    /// Non-square fault, or [`MatrixError::Narrowing`] if the determinant or an intermediate
    /// value overflows.
    pub fn det_bareiss(&self) -> Result<i64> {
        self.check_square()?;
        narrow_det(self.bareiss_helper())
    }

    fn bareiss_helper(&self) -> Option<i128> {
        let n = self.rows;
        if n == 0 {
            return Some(1);
        }
        let mut a: Vec<Vec<i128>> = (0..n)
            .map(|i| self.row(i).iter().map(|&x| i128::from(x)).collect())
            .collect();
        let mut sign: i128 = 1;
        let mut prev: i128 = 1;
        for k in 0..n - 1 {
            if a[k][k] == 0 {
                match (k + 1..n).find(|&i| a[i][k] != 0) {
                    Some(i) => {
                        a.swap(k, i);
                        sign = -sign;
                    }
                    None => return Some(0),
                }
            }
            for i in k + 1..n {
                for j in k + 1..n {
                    let lhs = a[i][j].checked_mul(a[k][k])?;
                    let rhs = a[i][k].checked_mul(a[k][j])?;
                    a[i][j] = lhs.checked_sub(rhs)?.checked_div(prev)?;
                }
            }
            prev = a[k][k];
        }
        a[n - 1][n - 1].checked_mul(sign)
    }

    /// Returns the Gauss-Jordan reduced form of an augmented matrix `[A|B]`.
    ///
    /// Same algorithm and truncation semantics as [`crate::RleMatrix::reduce`].
    pub fn reduce(&self) -> Result<Self> {
        let mut m = self.clone();
        gauss_jordan(&mut m)?;
        Ok(m)
    }

    /// Computes `self * v`, reading the first `cols` entries of `v`
    pub fn mul_vec(&self, v: &[i64]) -> Result<Vec<i64>> {
        if v.len() < self.cols {
            return Err(MatrixError::shape(
                format!("vector of length at least {}", self.cols),
                format!("vector of length {}", v.len()),
            ));
        }
        Ok((0..self.rows)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Matrix product
    pub fn try_mul(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        if self.cols != rhs.rows {
            return Err(MatrixError::shape(
                format!("{} rows on the right", self.cols),
                format!("{}x{}", rhs.rows, rhs.cols),
            ));
        }
        let mut res = DenseMatrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for (k, &a) in self.row(i).iter().enumerate() {
                if a != 0 {
                    for (r, &b) in res.row_mut(i).iter_mut().zip(rhs.row(k)) {
                        *r += a * b;
                    }
                }
            }
        }
        Ok(res)
    }
}

fn narrow_det(det: Option<i128>) -> Result<i64> {
    match det {
        Some(det) => i64::try_from(det).map_err(|_| MatrixError::Narrowing {
            value: format!("determinant {}", det),
        }),
        None => Err(MatrixError::Narrowing {
            value: "determinant of magnitude beyond i128".to_string(),
        }),
    }
}

impl RowOps for DenseMatrix {
    #[inline]
    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn entry(&self, row: usize, col: usize) -> i64 {
        self[(row, col)]
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a != b {
            for j in 0..self.cols {
                self.data.swap(a * self.cols + j, b * self.cols + j);
            }
        }
    }

    fn divide_row(&mut self, row: usize, divisor: i64) {
        for x in self.row_mut(row) {
            *x /= divisor;
        }
    }

    fn sub_scaled_row(&mut self, from: usize, to: usize, factor: i64) {
        for j in 0..self.cols {
            let x = self.data[from * self.cols + j];
            self.data[to * self.cols + j] -= factor * x;
        }
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = i64;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[index.0 * self.cols + index.1]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.data[index.0 * self.cols + index.1]
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for x in self.row(i) {
                write!(f, " {} ", x)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Mul for &DenseMatrix {
    type Output = DenseMatrix;
    fn mul(self, rhs: Self) -> Self::Output {
        self.try_mul(rhs).unwrap_or_else(|e| {
            panic!("Attempting to multiply matrices of incompatible dimensions: {e}")
        })
    }
}
