pub mod arith;
pub mod csv;

use crate::dense::DenseMatrix;
use crate::error::{MatrixError, Result};
use crate::rlevec::{RleVec, RunWriter};
use rand::Rng;
use rustc_hash::FxHashMap;
use std::{
    fmt,
    ops::{Index, Range},
};

/// A matrix of integers, stored as a list of run-length encoded columns
///
/// Column `j` is an [`RleVec`] of length `rows`, so columns with long runs of repeated values
/// (e.g. mostly-zero or block-structured matrices) take space proportional to their number of
/// runs rather than their length.
///
/// Column-oriented operations (column slicing, horizontal concatenation, scaling) work directly
/// on runs. Row-oriented operations (row access, elimination steps) work cell by cell on each
/// column and cost a run lookup per cell.
#[derive(Clone, Debug)]
pub struct RleMatrix {
    /// the number of logical rows, which is the length of every column
    pub(crate) rows: usize,

    /// the number of columns, which is `columns.len()`
    pub(crate) cols: usize,

    /// the columns of the matrix, each exclusively owned
    pub(crate) columns: Vec<RleVec>,
}

fn unit_column(rows: usize, index: usize) -> RleVec {
    let mut w = RunWriter::with_capacity(3);
    if index < rows {
        w.push(0, index);
        w.push(1, 1);
        w.push(0, rows - index - 1);
    } else {
        w.push(0, rows);
    }
    w.finish()
}

fn check_range(range: &Range<usize>, bound: usize, what: &str) -> Result<()> {
    if range.start > range.end || range.end > bound {
        return Err(MatrixError::shape(
            format!("{} range within 0..{}", what, bound),
            format!("{}..{}", range.start, range.end),
        ));
    }
    Ok(())
}

impl RleMatrix {
    /// Gets the entry at row `i`, column `j`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.columns[j].get(i)
    }

    /// Sets the entry at row `i`, column `j`, splitting the run that covers it if needed
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: i64) {
        self.columns[j].set(i, value);
    }

    /// Builds a matrix from a function `f` giving the value of each entry
    pub fn build(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> i64) -> Self {
        let columns = (0..cols)
            .map(|j| {
                let mut w = RunWriter::default();
                for i in 0..rows {
                    w.push(f(i, j), 1);
                }
                w.finish()
            })
            .collect();
        RleMatrix {
            rows,
            cols,
            columns,
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        RleMatrix {
            rows,
            cols,
            columns: vec![RleVec::zeros(rows); cols],
        }
    }

    pub fn identity(size: usize) -> Self {
        Self::eye(size, size)
    }

    /// A `rows x cols` matrix with ones on the main diagonal and zeros elsewhere
    pub fn eye(rows: usize, cols: usize) -> Self {
        RleMatrix {
            rows,
            cols,
            columns: (0..cols).map(|j| unit_column(rows, j)).collect(),
        }
    }

    /// Creates a matrix whose columns are the given vectors. The vectors are moved, not copied.
    ///
    /// # Errors
    ///
    /// Fails with a shape fault if the vectors have differing lengths.
    pub fn from_columns(columns: Vec<RleVec>) -> Result<Self> {
        let rows = columns.first().map_or(0, RleVec::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(MatrixError::shape(
                format!("columns of length {}", rows),
                format!("column of length {}", bad.len()),
            ));
        }
        Ok(RleMatrix {
            rows,
            cols: columns.len(),
            columns,
        })
    }

    /// Creates a matrix whose rows are the given vectors
    pub fn from_row_vectors(rows: &[RleVec]) -> Result<Self> {
        Ok(Self::from_columns(rows.to_vec())?.transposed())
    }

    /// Creates a matrix from dense row data
    ///
    /// # Errors
    ///
    /// Fails with a shape fault if the rows have differing lengths.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self> {
        Ok(Self::from_dense(&DenseMatrix::from_rows(rows)?))
    }

    pub fn from_dense(dense: &DenseMatrix) -> Self {
        Self::build(dense.rows(), dense.cols(), |i, j| dense[(i, j)])
    }

    /// Creates a random matrix whose columns consist of runs of length `1..=max_run`, with
    /// values drawn from `values`
    pub fn random(
        rng: &mut impl Rng,
        rows: usize,
        cols: usize,
        values: Range<i64>,
        max_run: usize,
    ) -> Self {
        let columns = (0..cols)
            .map(|_| {
                let mut w = RunWriter::default();
                let mut filled = 0;
                while filled < rows {
                    let len = rng.random_range(1..=max_run.max(1)).min(rows - filled);
                    w.push(rng.random_range(values.clone()), len);
                    filled += len;
                }
                w.finish()
            })
            .collect();
        RleMatrix {
            rows,
            cols,
            columns,
        }
    }

    /// Creates a random square matrix with determinant 1 whose Gauss-Jordan elimination only
    /// ever divides by 1.
    ///
    /// The matrix is a product `L * U` of random unit lower and unit upper triangular matrices,
    /// so its inverse, LU factors and linear solves are exact in integer arithmetic.
    pub fn random_unimodular(rng: &mut impl Rng, size: usize) -> Self {
        let mut random_entry = |i: usize, j: usize, lower: bool| -> i64 {
            if i == j {
                1
            } else if (i > j) == lower {
                rng.random_range(-2..3)
            } else {
                0
            }
        };
        let l = DenseMatrix::build(size, size, |i, j| random_entry(i, j, true));
        let u = DenseMatrix::build(size, size, |i, j| random_entry(i, j, false));
        Self::from_dense(&(&l * &u))
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

    pub(crate) fn check_square(&self) -> Result<()> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Total number of runs over all columns
    pub fn num_runs(&self) -> usize {
        self.columns.iter().map(|c| c.num_runs()).sum()
    }

    /// Counts how many entries hold each distinct value
    pub fn histogram(&self) -> FxHashMap<i64, usize> {
        let mut counts = FxHashMap::default();
        for column in &self.columns {
            for (value, n) in column.histogram() {
                *counts.entry(value).or_insert(0) += n;
            }
        }
        counts
    }

    #[inline]
    pub fn column(&self, j: usize) -> &RleVec {
        &self.columns[j]
    }

    #[inline]
    pub fn columns(&self) -> &[RleVec] {
        &self.columns
    }

    /// Returns a copy of row `i`
    pub fn row(&self, i: usize) -> RleVec {
        self.columns.iter().map(|c| c.get(i)).collect()
    }

    /// Overwrites row `i` with `values`
    pub fn set_row(&mut self, i: usize, values: &RleVec) -> Result<()> {
        if i >= self.rows || values.len() != self.cols {
            return Err(MatrixError::shape(
                format!("row index below {} and {} values", self.rows, self.cols),
                format!("row {} with {} values", i, values.len()),
            ));
        }
        for (column, value) in self.columns.iter_mut().zip(values.iter()) {
            column.set(i, value);
        }
        Ok(())
    }

    /// Replaces column `j` with `values`
    pub fn set_column(&mut self, j: usize, values: RleVec) -> Result<()> {
        if j >= self.cols || values.len() != self.rows {
            return Err(MatrixError::shape(
                format!("column index below {} and {} values", self.cols, self.rows),
                format!("column {} with {} values", j, values.len()),
            ));
        }
        self.columns[j] = values;
        Ok(())
    }

    fn map_columns(&self, rows: usize, f: impl FnMut(&RleVec) -> Result<RleVec>) -> Result<Self> {
        let columns = self.columns.iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(RleMatrix {
            rows,
            cols: columns.len(),
            columns,
        })
    }

    /// Returns the rows in `range`
    pub fn slice_rows(&self, range: Range<usize>) -> Result<Self> {
        check_range(&range, self.rows, "row")?;
        self.map_columns(range.len(), |c| c.slice(range.clone()))
    }

    /// Returns the columns in `range`
    pub fn slice_cols(&self, range: Range<usize>) -> Result<Self> {
        check_range(&range, self.cols, "column")?;
        Ok(RleMatrix {
            rows: self.rows,
            cols: range.len(),
            columns: self.columns[range].to_vec(),
        })
    }

    /// Returns the block of entries in `rows x cols`
    pub fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self> {
        self.slice_cols(cols)?.slice_rows(rows)
    }

    /// Returns a copy with the rows in `range` removed
    pub fn exclude_rows(&self, range: Range<usize>) -> Result<Self> {
        check_range(&range, self.rows, "row")?;
        self.map_columns(self.rows - range.len(), |c| c.exclude(range.clone()))
    }

    /// Returns a copy with the columns in `range` removed
    pub fn exclude_cols(&self, range: Range<usize>) -> Result<Self> {
        check_range(&range, self.cols, "column")?;
        let columns: Vec<RleVec> = self.columns[..range.start]
            .iter()
            .chain(&self.columns[range.end..])
            .cloned()
            .collect();
        Ok(RleMatrix {
            rows: self.rows,
            cols: columns.len(),
            columns,
        })
    }

    /// Returns the rows at `indices`, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        self.map_columns(indices.len(), |c| c.select(indices))
    }

    /// Returns the columns at `indices`, in the given order
    pub fn select_cols(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&j| j >= self.cols) {
            return Err(MatrixError::shape(
                format!("column index below {}", self.cols),
                bad,
            ));
        }
        Ok(RleMatrix {
            rows: self.rows,
            cols: indices.len(),
            columns: indices.iter().map(|&j| self.columns[j].clone()).collect(),
        })
    }

    fn check_row_len(&self, row: &RleVec) -> Result<()> {
        if row.len() != self.cols {
            return Err(MatrixError::shape(
                format!("row of length {}", self.cols),
                format!("row of length {}", row.len()),
            ));
        }
        Ok(())
    }

    /// Returns a copy with `row` inserted above the first row
    pub fn prepend_row(&self, row: &RleVec) -> Result<Self> {
        self.check_row_len(row)?;
        let columns = self
            .columns
            .iter()
            .zip(row.iter())
            .map(|(c, value)| RleVec::constant(value, 1).concat(c))
            .collect();
        Ok(RleMatrix {
            rows: self.rows + 1,
            cols: self.cols,
            columns,
        })
    }

    /// Returns a copy with `row` added below the last row
    pub fn append_row(&self, row: &RleVec) -> Result<Self> {
        self.check_row_len(row)?;
        let columns = self
            .columns
            .iter()
            .zip(row.iter())
            .map(|(c, value)| c.concat(&RleVec::constant(value, 1)))
            .collect();
        Ok(RleMatrix {
            rows: self.rows + 1,
            cols: self.cols,
            columns,
        })
    }

    fn check_column_len(&self, column: &RleVec) -> Result<()> {
        if column.len() != self.rows {
            return Err(MatrixError::shape(
                format!("column of length {}", self.rows),
                format!("column of length {}", column.len()),
            ));
        }
        Ok(())
    }

    /// Returns a copy with `column` inserted before the first column
    pub fn prepend_col(&self, column: RleVec) -> Result<Self> {
        self.check_column_len(&column)?;
        let mut columns = Vec::with_capacity(self.cols + 1);
        columns.push(column);
        columns.extend(self.columns.iter().cloned());
        Ok(RleMatrix {
            rows: self.rows,
            cols: self.cols + 1,
            columns,
        })
    }

    /// Returns a copy with `column` added after the last column
    pub fn append_col(&self, column: RleVec) -> Result<Self> {
        self.check_column_len(&column)?;
        let mut m = self.clone();
        m.columns.push(column);
        m.cols += 1;
        Ok(m)
    }

    /// Concatenates `other` to the right of `self`. This only moves column vectors around.
    pub fn hstack(&self, other: &RleMatrix) -> Result<Self> {
        if self.rows != other.rows {
            return Err(MatrixError::shape(
                format!("{} rows", self.rows),
                format!("{} rows", other.rows),
            ));
        }
        let mut m = self.clone();
        m.columns.extend(other.columns.iter().cloned());
        m.cols += other.cols;
        Ok(m)
    }

    /// Concatenates `other` below `self`, rebuilding the run list of every column
    pub fn vstack(&self, other: &RleMatrix) -> Result<Self> {
        if self.cols != other.cols {
            return Err(MatrixError::shape(
                format!("{} columns", self.cols),
                format!("{} columns", other.cols),
            ));
        }
        let columns = self
            .columns
            .iter()
            .zip(&other.columns)
            .map(|(top, bottom)| top.concat(bottom))
            .collect();
        Ok(RleMatrix {
            rows: self.rows + other.rows,
            cols: self.cols,
            columns,
        })
    }

    /// Returns a transposed copy of the matrix
    ///
    /// Reads the matrix row by row, holding one decoding cursor per column, and emits each row
    /// as a column of the result.
    pub fn transposed(&self) -> Self {
        let mut cursors: Vec<_> = self.columns.iter().map(|c| c.iter()).collect();
        let columns = (0..self.rows)
            .map(|_| cursors.iter_mut().filter_map(Iterator::next).collect())
            .collect();
        RleMatrix {
            rows: self.cols,
            cols: self.rows,
            columns,
        }
    }

    /// Transposes the matrix in place
    #[inline]
    pub fn transpose_inplace(&mut self) {
        *self = self.transposed();
    }

    /// Start position and length of diagonal `k` (0 main, positive above, negative below)
    fn diag_extent(&self, k: isize) -> Result<((usize, usize), usize)> {
        let offset = k.unsigned_abs();
        let (start, bound) = if k >= 0 {
            ((0, offset), self.cols)
        } else {
            ((offset, 0), self.rows)
        };
        if offset >= bound && !(k == 0 && bound == 0) {
            return Err(MatrixError::shape(
                format!("diagonal within a {}x{} matrix", self.rows, self.cols),
                format!("diagonal {}", k),
            ));
        }
        let len = (self.rows - start.0).min(self.cols - start.1);
        Ok((start, len))
    }

    /// Returns diagonal `k` as a vector: `k = 0` is the main diagonal, `k > 0` lies above it
    /// and `k < 0` below it
    pub fn diag(&self, k: isize) -> Result<RleVec> {
        let ((i0, j0), len) = self.diag_extent(k)?;
        Ok((0..len).map(|t| self.get(i0 + t, j0 + t)).collect())
    }

    /// Overwrites diagonal `k` with `values`
    pub fn set_diag(&mut self, k: isize, values: &RleVec) -> Result<()> {
        let ((i0, j0), len) = self.diag_extent(k)?;
        if values.len() != len {
            return Err(MatrixError::shape(
                format!("{} diagonal values", len),
                format!("{} values", values.len()),
            ));
        }
        for (t, value) in values.iter().enumerate() {
            self.set(i0 + t, j0 + t, value);
        }
        Ok(())
    }

    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.rows, self.cols);
        for (j, column) in self.columns.iter().enumerate() {
            for run in column.run_iter() {
                for i in run.start..run.end() {
                    dense[(i, j)] = run.value;
                }
            }
        }
        dense
    }

    /// Decodes the matrix into a list of rows
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.to_dense().to_rows()
    }

    /// Decodes the matrix into rows of `i32`
    ///
    /// # Errors
    ///
    /// Fails with [`MatrixError::Narrowing`] on the first entry outside the `i32` range.
    pub fn to_i32_rows(&self) -> Result<Vec<Vec<i32>>> {
        self.to_rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, x)| {
                        i32::try_from(x).map_err(|_| MatrixError::Narrowing {
                            value: format!("entry {} at ({}, {})", x, i, j),
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

/// Two matrices are equal if they have the same shape and decode to the same entries, however
/// their columns happen to be split into runs
impl PartialEq for RleMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.columns == other.columns
    }
}

impl Eq for RleMatrix {}

impl From<&DenseMatrix> for RleMatrix {
    fn from(dense: &DenseMatrix) -> Self {
        RleMatrix::from_dense(dense)
    }
}

impl From<&RleMatrix> for DenseMatrix {
    fn from(matrix: &RleMatrix) -> Self {
        matrix.to_dense()
    }
}

impl Index<(usize, usize)> for RleMatrix {
    type Output = i64;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.columns[index.1][index.0]
    }
}

impl fmt::Display for RleMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let t = self.transposed();
        for row in &t.columns {
            for x in row.iter() {
                write!(f, " {} ", x)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn sample() -> RleMatrix {
        RleMatrix::from_rows(&[vec![1, 2, 2], vec![1, 0, 2], vec![1, 0, 5], vec![4, 0, 5]])
            .unwrap()
    }

    #[test]
    fn identity() {
        let m = RleMatrix::identity(50);
        for i in 0..50 {
            for j in 0..50 {
                assert_eq!(m[(i, j)], i64::from(i == j));
            }
        }
        assert!(m.num_runs() <= 3 * 50);

        let e = RleMatrix::eye(2, 4);
        assert_eq!(e.to_rows(), vec![vec![1, 0, 0, 0], vec![0, 1, 0, 0]]);
    }

    #[test]
    fn construction() {
        let m = sample();
        assert_eq!((m.rows(), m.cols()), (4, 3));
        assert_eq!(m.column(0).num_runs(), 2);
        assert_eq!(m.num_runs(), 6);
        assert_eq!(RleMatrix::from_dense(&m.to_dense()), m);

        let rows: Vec<RleVec> = m.to_rows().into_iter().map(RleVec::from).collect();
        assert_eq!(RleMatrix::from_row_vectors(&rows).unwrap(), m);

        let cols = vec![RleVec::zeros(2), RleVec::zeros(3)];
        assert!(matches!(RleMatrix::from_columns(cols), Err(MatrixError::Shape { .. })));
        assert!(RleMatrix::from_rows(&[vec![1], vec![1, 2]]).is_err());
    }

    #[test]
    fn get_set_row_col() {
        let mut m = sample();
        m.set(1, 1, 9);
        assert_eq!(m.get(1, 1), 9);
        assert_eq!(m.row(1).to_vec(), vec![1, 9, 2]);
        m.set_row(3, &RleVec::from(vec![7, 7, 7])).unwrap();
        assert_eq!(m.row(3).to_vec(), vec![7, 7, 7]);
        assert!(m.set_row(4, &RleVec::zeros(3)).is_err());
        assert!(m.set_row(0, &RleVec::zeros(2)).is_err());
        m.set_column(0, RleVec::constant(3, 4)).unwrap();
        assert_eq!(m.column(0).to_vec(), vec![3, 3, 3, 3]);
        assert!(m.set_column(0, RleVec::zeros(5)).is_err());
    }

    #[test]
    fn slicing() {
        let m = sample();
        assert_eq!(
            m.slice_rows(1..3).unwrap().to_rows(),
            vec![vec![1, 0, 2], vec![1, 0, 5]]
        );
        assert_eq!(
            m.slice_cols(1..3).unwrap().to_rows(),
            vec![vec![2, 2], vec![0, 2], vec![0, 5], vec![0, 5]]
        );
        assert_eq!(m.slice(2..4, 0..2).unwrap().to_rows(), vec![vec![1, 0], vec![4, 0]]);
        assert_eq!(
            m.exclude_rows(0..2).unwrap().to_rows(),
            vec![vec![1, 0, 5], vec![4, 0, 5]]
        );
        assert_eq!(
            m.exclude_cols(1..2).unwrap().to_rows(),
            vec![vec![1, 2], vec![1, 2], vec![1, 5], vec![4, 5]]
        );
        assert_eq!(
            m.select_rows(&[3, 0]).unwrap().to_rows(),
            vec![vec![4, 0, 5], vec![1, 2, 2]]
        );
        assert_eq!(m.select_cols(&[2, 2]).unwrap().column(1).to_vec(), vec![2, 2, 5, 5]);
        assert!(m.select_cols(&[3]).is_err());
        assert!(m.slice_rows(2..5).is_err());
        assert!(m.exclude_cols(3..4).is_err());
    }

    #[test]
    fn prepend_append_stack() {
        let m = RleMatrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        let r = RleVec::from(vec![9, 8]);
        assert_eq!(
            m.prepend_row(&r).unwrap().to_rows(),
            vec![vec![9, 8], vec![1, 2], vec![3, 4]]
        );
        assert_eq!(
            m.append_row(&r).unwrap().to_rows(),
            vec![vec![1, 2], vec![3, 4], vec![9, 8]]
        );
        assert_eq!(
            m.prepend_col(r.clone()).unwrap().to_rows(),
            vec![vec![9, 1, 2], vec![8, 3, 4]]
        );
        assert_eq!(
            m.append_col(r.clone()).unwrap().to_rows(),
            vec![vec![1, 2, 9], vec![3, 4, 8]]
        );
        assert!(m.append_row(&RleVec::zeros(3)).is_err());

        assert_eq!(
            m.hstack(&m).unwrap().to_rows(),
            vec![vec![1, 2, 1, 2], vec![3, 4, 3, 4]]
        );
        assert_eq!(
            m.vstack(&m).unwrap().to_rows(),
            vec![vec![1, 2], vec![3, 4], vec![1, 2], vec![3, 4]]
        );
        assert!(m.hstack(&RleMatrix::zeros(3, 1)).is_err());
        assert!(m.vstack(&RleMatrix::zeros(1, 3)).is_err());
    }

    #[test]
    fn transpose() {
        let mut rng = SmallRng::seed_from_u64(1);
        let m = RleMatrix::random(&mut rng, 10, 4, -2..3, 4);
        let n = m.transposed();
        for i in 0..m.rows() {
            for j in 0..m.cols() {
                assert_eq!(m[(i, j)], n[(j, i)]);
            }
        }
        assert_eq!(n.transposed(), m);

        let mut n = RleMatrix::random(&mut rng, 30, 70, 0..2, 10);
        let m = n.clone();
        n.transpose_inplace();
        assert_eq!((n.rows(), n.cols()), (70, 30));
        n.transpose_inplace();
        assert_eq!(n, m);
    }

    #[test]
    fn diagonals() {
        let mut m = RleMatrix::build(3, 4, |i, j| (10 * i + j) as i64);
        assert_eq!(m.diag(0).unwrap().to_vec(), vec![0, 11, 22]);
        assert_eq!(m.diag(1).unwrap().to_vec(), vec![1, 12, 23]);
        assert_eq!(m.diag(3).unwrap().to_vec(), vec![3]);
        assert_eq!(m.diag(-2).unwrap().to_vec(), vec![20]);
        assert!(m.diag(4).is_err());
        assert!(m.diag(-3).is_err());

        m.set_diag(-1, &RleVec::from(vec![-1, -2])).unwrap();
        assert_eq!(m.get(1, 0), -1);
        assert_eq!(m.get(2, 1), -2);
        assert!(m.set_diag(0, &RleVec::zeros(4)).is_err());
    }

    #[test]
    fn conversions() {
        let m = sample();
        let d = DenseMatrix::from(&m);
        assert_eq!(d.to_rows(), m.to_rows());
        assert_eq!(m.to_i32_rows().unwrap()[3], vec![4, 0, 5]);

        let mut big = m.clone();
        big.set(0, 0, i64::from(i32::MAX) + 1);
        assert!(matches!(
            big.to_i32_rows(),
            Err(MatrixError::Narrowing { .. })
        ));
        assert_eq!(format!("{}", RleMatrix::identity(2)), " 1  0 \n 0  1 \n");
    }

    #[test]
    fn histogram_and_equality() {
        let m = sample();
        let h = m.histogram();
        assert_eq!(h[&0], 3);
        assert_eq!(h[&5], 2);
        assert_eq!(h.values().sum::<usize>(), 12);

        let mut n = m.clone();
        n.set(0, 0, 8);
        n.set(0, 0, 1);
        assert_eq!(n, m);
        assert_ne!(m, m.transposed());
    }
}
