//! Elementwise arithmetic, products and powers of [`RleMatrix`].
//!
//! Binary operations against other matrix formats go through two closed enums rather than
//! runtime type inspection: [`Operand`] for elementwise arithmetic and [`MatrixRef`] for matrix
//! products. Each `match` over them is the full dispatch table for its operation.

use super::RleMatrix;
use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::rlevec::{BinOp, RleVec};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use tracing::debug;

/// Right-hand side of an elementwise matrix operation
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    /// The same value for every entry
    Scalar(i64),

    /// A vector of length `rows`, applied to every column
    Column(&'a RleVec),

    /// A vector of length `cols`, whose entry `j` applies to every entry of column `j`
    Row(&'a RleVec),

    /// A matrix of the same shape
    Matrix(&'a RleMatrix),
}

impl From<i64> for Operand<'_> {
    fn from(value: i64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a> From<&'a RleMatrix> for Operand<'a> {
    fn from(value: &'a RleMatrix) -> Self {
        Operand::Matrix(value)
    }
}

/// Right-hand side of a matrix product, one variant per supported storage format
#[derive(Clone, Copy, Debug)]
pub enum MatrixRef<'a> {
    Rle(&'a RleMatrix),
    Dense(&'a DenseMatrix),
}

impl<'a> From<&'a RleMatrix> for MatrixRef<'a> {
    fn from(value: &'a RleMatrix) -> Self {
        MatrixRef::Rle(value)
    }
}

impl<'a> From<&'a DenseMatrix> for MatrixRef<'a> {
    fn from(value: &'a DenseMatrix) -> Self {
        MatrixRef::Dense(value)
    }
}

/// Result of a matrix product, in the format chosen by the dispatch in [`RleMatrix::try_mul`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Product {
    Rle(RleMatrix),
    Dense(DenseMatrix),
}

impl Product {
    pub fn to_dense(&self) -> DenseMatrix {
        match self {
            Product::Rle(m) => m.to_dense(),
            Product::Dense(m) => m.clone(),
        }
    }
}

impl RleMatrix {
    /// Checks `rhs` against the shape of `self`, and against a zero divisor if `op` divides
    fn check_operand(&self, op: BinOp, rhs: Operand) -> Result<()> {
        let (expected, found) = match rhs {
            Operand::Scalar(_) => (0, 0),
            Operand::Column(v) => (self.rows, v.len()),
            Operand::Row(v) => (self.cols, v.len()),
            Operand::Matrix(m) => {
                if m.rows != self.rows || m.cols != self.cols {
                    return Err(MatrixError::shape(
                        format!("{}x{} matrix", self.rows, self.cols),
                        format!("{}x{} matrix", m.rows, m.cols),
                    ));
                }
                (0, 0)
            }
        };
        if expected != found {
            return Err(MatrixError::shape(
                format!("vector of length {}", expected),
                format!("vector of length {}", found),
            ));
        }

        if op == BinOp::Div {
            let has_zero = match rhs {
                Operand::Scalar(s) => s == 0,
                Operand::Column(v) | Operand::Row(v) => v.run_iter().any(|r| r.value == 0),
                Operand::Matrix(m) => m.columns.iter().any(|c| c.run_iter().any(|r| r.value == 0)),
            };
            if has_zero {
                return Err(MatrixError::DivisionByZero);
            }
        }
        Ok(())
    }

    /// Applies `op` to column `j` once the operand has been checked
    fn column_op(column: &RleVec, j: usize, op: BinOp, rhs: Operand) -> RleVec {
        match rhs {
            Operand::Scalar(s) => column.map(|a| op.apply_unchecked(a, s)),
            Operand::Column(v) => column.zip_runs(v, |a, b| op.apply_unchecked(a, b)),
            Operand::Row(v) => {
                let s = v.get(j);
                column.map(|a| op.apply_unchecked(a, s))
            }
            Operand::Matrix(m) => column.zip_runs(&m.columns[j], |a, b| op.apply_unchecked(a, b)),
        }
    }

    /// Elementwise `self op rhs`, returning a new matrix.
    ///
    /// # Errors
    ///
    /// Shape fault if `rhs` does not conform, domain fault on division by zero.
    pub fn apply<'a>(&self, op: BinOp, rhs: impl Into<Operand<'a>>) -> Result<RleMatrix> {
        let rhs = rhs.into();
        self.check_operand(op, rhs)?;
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, c)| Self::column_op(c, j, op, rhs))
            .collect();
        Ok(RleMatrix {
            rows: self.rows,
            cols: self.cols,
            columns,
        })
    }

    /// Elementwise `self op rhs`, overwriting `self` and returning it.
    ///
    /// The operand is checked before any column is touched, so on error the receiver keeps its
    /// previous contents. On success the previous contents are gone; any caller holding the
    /// returned reference observes the same, mutated matrix.
    pub fn apply_inplace<'a>(
        &mut self,
        op: BinOp,
        rhs: impl Into<Operand<'a>>,
    ) -> Result<&mut Self> {
        let rhs = rhs.into();
        self.check_operand(op, rhs)?;
        for (j, column) in self.columns.iter_mut().enumerate() {
            *column = Self::column_op(column, j, op, rhs);
        }
        Ok(self)
    }

    /// Multiplies every row elementwise by `v`, i.e. scales column `j` by `v[j]`
    pub fn mul_rows(&self, v: &RleVec) -> Result<RleMatrix> {
        self.apply(BinOp::Mul, Operand::Row(v))
    }

    /// Multiplies every column elementwise by `v`
    pub fn mul_cols(&self, v: &RleVec) -> Result<RleMatrix> {
        self.apply(BinOp::Mul, Operand::Column(v))
    }

    /// Truncating division by a scalar
    pub fn div_scalar(&self, divisor: i64) -> Result<RleMatrix> {
        self.apply(BinOp::Div, divisor)
    }

    pub fn checked_add(&self, rhs: &RleMatrix) -> Result<RleMatrix> {
        self.apply(BinOp::Add, rhs)
    }

    pub fn checked_sub(&self, rhs: &RleMatrix) -> Result<RleMatrix> {
        self.apply(BinOp::Sub, rhs)
    }

    /// Computes `self * v` for a vector with at least `cols` entries; extra entries are ignored.
    ///
    /// The product is accumulated as `sum_j v[j] * column_j`, so it stays run-length encoded
    /// throughout.
    pub fn dot(&self, v: &RleVec) -> Result<RleVec> {
        if v.len() < self.cols {
            return Err(MatrixError::shape(
                format!("vector of length at least {}", self.cols),
                format!("vector of length {}", v.len()),
            ));
        }
        let mut acc = RleVec::zeros(self.rows);
        for (column, x) in self.columns.iter().zip(v.iter()) {
            if x != 0 {
                acc = acc.zip_runs(column, |a, b| a + x * b);
            }
        }
        Ok(acc)
    }

    /// Computes `selfᵗ * other`: entry `(i, j)` of the result is the dot product of column `i`
    /// of `self` with column `j` of `other`
    pub fn mdot(&self, other: &RleMatrix) -> Result<RleMatrix> {
        if self.rows != other.rows {
            return Err(MatrixError::shape(
                format!("{} rows", self.rows),
                format!("{} rows", other.rows),
            ));
        }
        let columns = other
            .columns
            .iter()
            .map(|b| {
                self.columns
                    .iter()
                    .map(|a| a.dot(b))
                    .collect::<Result<RleVec>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RleMatrix {
            rows: self.cols,
            cols: other.cols,
            columns,
        })
    }

    /// Matrix product of two run-length encoded matrices, computed as `selfᵗ mdot other`
    pub fn matmul(&self, other: &RleMatrix) -> Result<RleMatrix> {
        if self.cols != other.rows {
            return Err(MatrixError::shape(
                format!("{} rows on the right", self.cols),
                format!("{}x{}", other.rows, other.cols),
            ));
        }
        self.transposed().mdot(other)
    }

    /// Matrix product against any supported format.
    ///
    /// | right operand | result                                    |
    /// |---------------|-------------------------------------------|
    /// | `Rle`         | `Rle`, via [`RleMatrix::matmul`]          |
    /// | `Dense`       | `Dense`, converting `self` with `to_dense` |
    pub fn try_mul<'a>(&self, rhs: impl Into<MatrixRef<'a>>) -> Result<Product> {
        match rhs.into() {
            MatrixRef::Rle(m) => Ok(Product::Rle(self.matmul(m)?)),
            MatrixRef::Dense(m) => {
                debug!(
                    rows = self.rows,
                    cols = self.cols,
                    "dense operand in product, converting left operand to dense"
                );
                Ok(Product::Dense(self.to_dense().try_mul(m)?))
            }
        }
    }

    /// Raises a square matrix to the power `p` by repeated squaring.
    ///
    /// `p = 0` gives the identity. Uses `O(log p)` matrix products.
    pub fn pow(&self, p: u32) -> Result<RleMatrix> {
        self.check_square()?;
        let mut result = RleMatrix::identity(self.rows);
        let mut base = self.clone();
        let mut p = p;
        let mut first = true;
        while p > 0 {
            if p & 1 == 1 {
                result = if first {
                    base.clone()
                } else {
                    result.matmul(&base)?
                };
                first = false;
            }
            p >>= 1;
            if p > 0 {
                base = base.matmul(&base)?;
            }
        }
        Ok(result)
    }
}

impl Add for &RleMatrix {
    type Output = RleMatrix;
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs)
            .unwrap_or_else(|e| panic!("Attempting to add matrices of incompatible shapes: {e}"))
    }
}

impl Sub for &RleMatrix {
    type Output = RleMatrix;
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).unwrap_or_else(|e| {
            panic!("Attempting to subtract matrices of incompatible shapes: {e}")
        })
    }
}

impl Neg for &RleMatrix {
    type Output = RleMatrix;
    fn neg(self) -> Self::Output {
        RleMatrix {
            rows: self.rows,
            cols: self.cols,
            columns: self.columns.iter().map(|c| -c).collect(),
        }
    }
}

impl Mul<i64> for &RleMatrix {
    type Output = RleMatrix;
    fn mul(self, rhs: i64) -> Self::Output {
        RleMatrix {
            rows: self.rows,
            cols: self.cols,
            columns: self.columns.iter().map(|c| c * rhs).collect(),
        }
    }
}

impl Mul for &RleMatrix {
    type Output = RleMatrix;
    fn mul(self, rhs: Self) -> Self::Output {
        self.matmul(rhs).unwrap_or_else(|e| {
            panic!("Attempting to multiply matrices of incompatible dimensions: {e}")
        })
    }
}

impl Mul<&DenseMatrix> for &RleMatrix {
    type Output = DenseMatrix;
    fn mul(self, rhs: &DenseMatrix) -> Self::Output {
        &self.to_dense() * rhs
    }
}

impl Mul<&RleVec> for &RleMatrix {
    type Output = RleVec;
    fn mul(self, rhs: &RleVec) -> Self::Output {
        self.dot(rhs)
            .unwrap_or_else(|e| panic!("Cannot multiply matrix by vector: {e}"))
    }
}

impl AddAssign<&RleMatrix> for RleMatrix {
    fn add_assign(&mut self, rhs: &RleMatrix) {
        if let Err(e) = self.apply_inplace(BinOp::Add, rhs) {
            panic!("Attempting to add matrices of incompatible shapes: {e}");
        }
    }
}

impl SubAssign<&RleMatrix> for RleMatrix {
    fn sub_assign(&mut self, rhs: &RleMatrix) {
        if let Err(e) = self.apply_inplace(BinOp::Sub, rhs) {
            panic!("Attempting to subtract matrices of incompatible shapes: {e}");
        }
    }
}

impl MulAssign<i64> for RleMatrix {
    fn mul_assign(&mut self, rhs: i64) {
        for column in &mut self.columns {
            *column *= rhs;
        }
    }
}
