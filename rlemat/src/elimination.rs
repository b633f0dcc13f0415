//! Gauss-Jordan reduction, inversion, LU factorization and the square-matrix quantities built on
//! them.
//!
//! All divisions truncate toward zero, so results are exact only when every division performed
//! along the way is exact (e.g. for matrices whose pivots are all ±1). A zero pivot that cannot
//! be replaced is reported as [`MatrixError::Singular`] and no result is produced.

use crate::error::{MatrixError, Result};
use crate::rlematrix::RleMatrix;
use crate::rlevec::{RleVec, RunWriter};
use tracing::{debug, trace, warn};

/// Largest order for which [`RleMatrix::det`] uses cofactor expansion. Above it the
/// determinant is computed by fraction-free elimination.
pub const COFACTOR_LIMIT: usize = 8;

/// Elementary row operations, along with the entry access needed to choose them
///
/// Implemented by both [`RleMatrix`] and [`crate::DenseMatrix`] so they share one elimination
/// routine.
pub trait RowOps {
    /// Returns `(rows, cols)`
    fn shape(&self) -> (usize, usize);
    fn entry(&self, row: usize, col: usize) -> i64;
    fn swap_rows(&mut self, a: usize, b: usize);
    /// Divides every entry of `row` by `divisor`, which must be nonzero
    fn divide_row(&mut self, row: usize, divisor: i64);
    /// Subtracts `factor` times row `from` from row `to`
    fn sub_scaled_row(&mut self, from: usize, to: usize, factor: i64);
}

/// Reduces an augmented matrix `[A|B]` so that its left square block becomes the identity
pub(crate) fn gauss_jordan<M: RowOps>(m: &mut M) -> Result<()> {
    let (rows, cols) = m.shape();
    if cols < rows {
        return Err(MatrixError::shape(
            format!("at least {} columns", rows),
            format!("{}x{} matrix", rows, cols),
        ));
    }

    for i in 0..rows {
        if m.entry(i, i) == 0 {
            let mut best = i;
            let mut best_abs = 0;
            for k in (i + 1)..rows {
                let a = m.entry(k, i).abs();
                if a > best_abs {
                    best = k;
                    best_abs = a;
                }
            }
            if best_abs == 0 {
                warn!(pivot = i, "no nonzero pivot available, matrix is singular");
                return Err(MatrixError::Singular { pivot: i });
            }
            debug!(from = best, to = i, "swapping rows for partial pivoting");
            m.swap_rows(i, best);
        }

        let pivot = m.entry(i, i);
        trace!(row = i, pivot, "normalizing pivot row");
        m.divide_row(i, pivot);
        for k in 0..rows {
            if k != i {
                let factor = m.entry(k, i);
                if factor != 0 {
                    m.sub_scaled_row(i, k, factor);
                }
            }
        }
    }
    Ok(())
}

impl RowOps for RleMatrix {
    #[inline]
    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn entry(&self, row: usize, col: usize) -> i64 {
        self.get(row, col)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for column in &mut self.columns {
            let (x, y) = (column.get(a), column.get(b));
            if x != y {
                column.set(a, y);
                column.set(b, x);
            }
        }
    }

    fn divide_row(&mut self, row: usize, divisor: i64) {
        for column in &mut self.columns {
            let x = column.get(row);
            column.set(row, x / divisor);
        }
    }

    fn sub_scaled_row(&mut self, from: usize, to: usize, factor: i64) {
        for column in &mut self.columns {
            let x = column.get(from);
            if x != 0 {
                let y = column.get(to);
                column.set(to, y - factor * x);
            }
        }
    }
}

impl RleMatrix {
    /// Returns the Gauss-Jordan reduced form of an augmented matrix `[A|B]` (requires
    /// `cols >= rows`), whose left square block is the identity.
    ///
    /// # Errors
    ///
    /// Shape fault if `cols < rows`, singularity fault if some column of `A` has no usable
    /// pivot.
    pub fn reduce(&self) -> Result<RleMatrix> {
        let mut m = self.clone();
        m.reduce_inplace()?;
        Ok(m)
    }

    /// Reduces `self` in place and returns it. See [`RleMatrix::reduce`].
    ///
    /// The previous contents are destroyed. On a singularity fault the receiver is left
    /// partially reduced and must not be read as a result.
    pub fn reduce_inplace(&mut self) -> Result<&mut Self> {
        gauss_jordan(self)?;
        Ok(self)
    }

    /// Computes the inverse by reducing `[A|I]` and keeping the right half
    pub fn inverse(&self) -> Result<RleMatrix> {
        self.check_square()?;
        let mut augmented = self.hstack(&RleMatrix::identity(self.rows))?;
        augmented.reduce_inplace()?;
        augmented.slice_cols(self.cols..2 * self.cols)
    }

    /// Computes the inverse by reducing `self` in place alongside the identity.
    ///
    /// On success the receiver is left equal to the identity matrix and the inverse is
    /// returned. On a singularity fault the receiver keeps its shape but holds partially
    /// reduced contents.
    pub fn inverse_inplace(&mut self) -> Result<RleMatrix> {
        self.check_square()?;
        let n = self.cols;
        self.columns.extend(RleMatrix::identity(n).columns);
        self.cols = 2 * n;

        let reduced = gauss_jordan(self);
        let inverse = self.columns.split_off(n);
        self.cols = n;
        reduced?;

        Ok(RleMatrix {
            rows: n,
            cols: n,
            columns: inverse,
        })
    }

    /// LU factorization without partial pivoting, by the Doolittle recurrence.
    ///
    /// Returns `(L, U)` with `L` unit lower triangular and `U` upper triangular. Every pivot
    /// `U(j, j)` used as a divisor must be nonzero; callers needing robustness should pivot
    /// beforehand.
    ///
    /// # Errors
    ///
    /// Non-square fault, or a singularity fault naming the first zero pivot used as a divisor.
    pub fn lud_npp(&self) -> Result<(RleMatrix, RleMatrix)> {
        self.check_square()?;
        let n = self.rows;
        let mut l = RleMatrix::identity(n);
        let mut u = RleMatrix::zeros(n, n);

        for i in 0..n {
            for k in i..n {
                let s: i64 = (0..i).map(|j| l.get(i, j) * u.get(j, k)).sum();
                u.set(i, k, self.get(i, k) - s);
            }
            let pivot = u.get(i, i);
            if pivot == 0 && i + 1 < n {
                warn!(pivot = i, "zero pivot in LU factorization");
                return Err(MatrixError::Singular { pivot: i });
            }
            for k in (i + 1)..n {
                let s: i64 = (0..i).map(|j| l.get(k, j) * u.get(j, i)).sum();
                l.set(k, i, (self.get(k, i) - s) / pivot);
            }
        }
        Ok((l, u))
    }

    /// In-place LU factorization without pivoting.
    ///
    /// Runs forward elimination storing each multiplier in the slot it eliminates, then moves
    /// the multipliers out into a unit lower triangular `L`, which is returned. The receiver is
    /// left holding `U`.
    ///
    /// A non-square fault is raised before anything is touched. On a singularity fault the
    /// receiver holds a partial elimination, with multipliers below the diagonal in the columns
    /// already processed, and must not be read as a result.
    pub fn lud_inplace(&mut self) -> Result<RleMatrix> {
        self.check_square()?;
        let n = self.rows;
        for k in 0..n {
            let pivot = self.get(k, k);
            if pivot == 0 && k + 1 < n {
                warn!(pivot = k, "zero pivot in LU factorization");
                return Err(MatrixError::Singular { pivot: k });
            }
            trace!(row = k, pivot, "eliminating below pivot");
            for i in (k + 1)..n {
                let factor = self.get(i, k) / pivot;
                self.set(i, k, factor);
                if factor != 0 {
                    for j in (k + 1)..n {
                        let value = self.get(i, j) - factor * self.get(k, j);
                        self.set(i, j, value);
                    }
                }
            }
        }

        let mut lower = Vec::with_capacity(n);
        for (j, column) in self.columns.iter_mut().enumerate() {
            let below = column.slice(j + 1..n)?;
            let mut w = RunWriter::with_capacity(below.num_runs() + 2);
            w.push(0, j);
            w.push(1, 1);
            for run in below.run_iter() {
                w.push(run.value, run.len);
            }
            lower.push(w.finish());
            *column = column.slice(0..j + 1)?.concat(&RleVec::zeros(n - j - 1));
        }
        Ok(RleMatrix {
            rows: n,
            cols: n,
            columns: lower,
        })
    }

    fn check_rhs(&self, b: &RleVec) -> Result<()> {
        self.check_square()?;
        if b.len() != self.rows {
            return Err(MatrixError::shape(
                format!("vector of length {}", self.rows),
                format!("vector of length {}", b.len()),
            ));
        }
        Ok(())
    }

    /// Solves `U x = y` for upper triangular `self` by back substitution, from the last row
    /// upward
    pub fn bsolve(&self, y: &RleVec) -> Result<RleVec> {
        self.check_rhs(y)?;
        let n = self.rows;
        let y = y.to_vec();
        let mut x = vec![0; n];
        for i in (0..n).rev() {
            let s: i64 = ((i + 1)..n).map(|j| self.get(i, j) * x[j]).sum();
            let d = self.get(i, i);
            if d == 0 {
                return Err(MatrixError::Singular { pivot: i });
            }
            x[i] = (y[i] - s) / d;
        }
        Ok(x.into())
    }

    /// Solves `L U x = b` given the factors of [`RleMatrix::lud_npp`]: forward substitution
    /// with the unit lower triangular `l`, then [`RleMatrix::bsolve`] with `u`
    pub fn solve_lu(l: &RleMatrix, u: &RleMatrix, b: &RleVec) -> Result<RleVec> {
        l.check_rhs(b)?;
        if u.rows != l.rows || u.cols != l.cols {
            return Err(MatrixError::shape(
                format!("{}x{} upper factor", l.rows, l.cols),
                format!("{}x{}", u.rows, u.cols),
            ));
        }
        let mut y = Vec::with_capacity(b.len());
        for (i, bi) in b.iter().enumerate() {
            let s: i64 = (0..i).map(|j| l.get(i, j) * y[j]).sum();
            y.push(bi - s);
        }
        u.bsolve(&y.into())
    }

    /// Solves `self x = b` via [`RleMatrix::lud_npp`]
    pub fn solve(&self, b: &RleVec) -> Result<RleVec> {
        self.check_rhs(b)?;
        let (l, u) = self.lud_npp()?;
        Self::solve_lu(&l, &u, b)
    }

    /// Determinant of a square matrix.
    ///
    /// Up to order [`COFACTOR_LIMIT`] this is cofactor expansion along row 0, which costs
    /// `O(n!)`. Larger matrices use exact fraction-free (Bareiss) elimination instead.
    pub fn det(&self) -> Result<i64> {
        self.check_square()?;
        let dense = self.to_dense();
        if self.rows <= COFACTOR_LIMIT {
            debug!(order = self.rows, "determinant by cofactor expansion");
            dense.det_cofactor()
        } else {
            debug!(order = self.rows, "determinant by fraction-free elimination");
            dense.det_bareiss()
        }
    }

    /// Sum of the main diagonal of a square matrix
    pub fn trace(&self) -> Result<i64> {
        self.check_square()?;
        Ok(self.diag(0)?.sum())
    }

    /// Basis vector of the null space of an `m x (m + 1)` matrix.
    ///
    /// Reduces the matrix, negates its last column and appends a trailing 1.
    pub fn nullspace(&self) -> Result<RleVec> {
        let mut m = self.clone();
        m.nullspace_inplace()
    }

    /// As [`RleMatrix::nullspace`], leaving the receiver in reduced form
    pub fn nullspace_inplace(&mut self) -> Result<RleVec> {
        if self.cols != self.rows + 1 {
            return Err(MatrixError::NullspaceShape {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.reduce_inplace()?;
        let mut basis = -&self.columns[self.rows];
        basis.push(1);
        Ok(basis)
    }
}
