use crate::error::{MatrixError, Result};
use crate::run::{Run, RunSlice};
use rustc_hash::FxHashMap;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Index, Mul, MulAssign, Neg, Range, Sub, SubAssign};

/// An elementwise binary operation on integers
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Truncating integer division
    Div,
}

impl BinOp {
    /// Applies the operation, failing on division by zero
    #[inline]
    pub fn apply(self, a: i64, b: i64) -> Result<i64> {
        if self == BinOp::Div && b == 0 {
            return Err(MatrixError::DivisionByZero);
        }
        Ok(self.apply_unchecked(a, b))
    }

    /// Applies the operation, assuming the divisor (if any) has already been checked
    #[inline]
    pub(crate) fn apply_unchecked(self, a: i64, b: i64) -> i64 {
        match self {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a / b,
        }
    }
}

/// Accumulates runs left to right, merging neighbours that hold the same value
#[derive(Default)]
pub(crate) struct RunWriter {
    runs: Vec<Run>,
    len: usize,
}

impl RunWriter {
    #[inline]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        RunWriter {
            runs: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: i64, len: usize) {
        if len == 0 {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.value == value => last.len += len,
            _ => self.runs.push(Run::new(value, self.len, len)),
        }
        self.len += len;
    }

    #[inline]
    pub(crate) fn finish(self) -> RleVec {
        RleVec {
            len: self.len,
            runs: self.runs,
        }
    }
}

/// A run-length encoded vector of integers.
///
/// The vector owns a list of [`Run`]s sorted by `start` that together cover `0..len` exactly.
/// Operations in this crate keep adjacent runs merged whenever they produce new runs, but
/// equality and every numeric result depend only on the decoded values.
///
/// # Examples
///
/// ```
/// use rlemat::RleVec;
///
/// let mut v = RleVec::from(vec![3, 3, 3, 3, 0, 0]);
/// assert_eq!(v.num_runs(), 2);
/// v.set(1, 5);
/// assert_eq!(v.to_vec(), vec![3, 5, 3, 3, 0, 0]);
/// assert_eq!(v.num_runs(), 4);
/// ```
///
/// # Note
///
/// Read-only run queries (iteration, segment sums, min/max) are reached by dereferencing to
/// [`RunSlice`].
#[derive(Clone, Debug, Default)]
pub struct RleVec {
    len: usize,
    runs: Vec<Run>,
}

impl RleVec {
    /// A vector of `len` copies of `value`
    pub fn constant(value: i64, len: usize) -> Self {
        let mut w = RunWriter::with_capacity(1);
        w.push(value, len);
        w.finish()
    }

    #[inline]
    pub fn zeros(len: usize) -> Self {
        Self::constant(0, len)
    }

    /// Creates a vector from an explicit run list.
    ///
    /// # Errors
    ///
    /// Fails with a shape fault unless the runs are non-empty, sorted, and contiguous from 0.
    pub fn from_runs(runs: Vec<Run>) -> Result<Self> {
        let mut w = RunWriter::with_capacity(runs.len());
        for run in runs {
            if run.len == 0 || run.start != w.len {
                return Err(MatrixError::shape(
                    format!("non-empty run starting at {}", w.len),
                    format!("run of length {} starting at {}", run.len, run.start),
                ));
            }
            w.push(run.value, run.len);
        }
        Ok(w.finish())
    }

    /// Number of logical entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the run view of this vector
    #[inline]
    pub fn runs(&self) -> &RunSlice {
        RunSlice::from_runs(&self.runs)
    }

    #[inline]
    fn position(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "index {} out of bounds for vector of length {}",
            index,
            self.len
        );
        self.runs.partition_point(|r| r.end() <= index)
    }

    /// Returns the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn get(&self, index: usize) -> i64 {
        self.runs[self.position(index)].value
    }

    /// Sets the value at `index`, splitting the run that covers it into at most three runs and
    /// merging the new entry into equal neighbours.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    pub fn set(&mut self, index: usize, value: i64) {
        let pos = self.position(index);
        let run = self.runs[pos];
        if run.value == value {
            return;
        }

        let before = index - run.start;
        let after = run.end() - index - 1;
        let mut pieces = Vec::with_capacity(3);
        if before > 0 {
            pieces.push(Run::new(run.value, run.start, before));
        }
        pieces.push(Run::new(value, index, 1));
        if after > 0 {
            pieces.push(Run::new(run.value, index + 1, after));
        }
        self.runs.splice(pos..pos + 1, pieces);

        let mut p = pos + usize::from(before > 0);
        if p + 1 < self.runs.len() && self.runs[p + 1].value == value {
            self.runs[p].len += self.runs[p + 1].len;
            self.runs.remove(p + 1);
        }
        if p > 0 && self.runs[p - 1].value == value {
            self.runs[p - 1].len += self.runs[p].len;
            self.runs.remove(p);
            p -= 1;
        }
        debug_assert_eq!(self.runs[p].value, value);
    }

    /// Appends a value to the end of the vector
    pub fn push(&mut self, value: i64) {
        match self.runs.last_mut() {
            Some(last) if last.value == value => last.len += 1,
            _ => self.runs.push(Run::new(value, self.len, 1)),
        }
        self.len += 1;
    }

    /// Merges adjacent runs holding equal values
    pub fn compact(&mut self) {
        let mut w = RunWriter::with_capacity(self.runs.len());
        for run in &self.runs {
            w.push(run.value, run.len);
        }
        *self = w.finish();
    }

    /// Decodes the vector
    #[inline]
    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.len {
            return Err(MatrixError::shape(
                format!("range within 0..{}", self.len),
                format!("{}..{}", range.start, range.end),
            ));
        }
        Ok(())
    }

    fn write_segment(&self, w: &mut RunWriter, from: usize, to: usize) {
        let first = self.runs.partition_point(|r| r.end() <= from);
        for run in &self.runs[first..] {
            if run.start >= to {
                break;
            }
            w.push(run.value, run.end().min(to) - run.start.max(from));
        }
    }

    /// Returns the entries in `range` as a new vector
    pub fn slice(&self, range: Range<usize>) -> Result<RleVec> {
        self.check_range(&range)?;
        let mut w = RunWriter::default();
        self.write_segment(&mut w, range.start, range.end);
        Ok(w.finish())
    }

    /// Returns a copy of the vector with the entries in `range` removed
    pub fn exclude(&self, range: Range<usize>) -> Result<RleVec> {
        self.check_range(&range)?;
        let mut w = RunWriter::with_capacity(self.runs.len());
        self.write_segment(&mut w, 0, range.start);
        self.write_segment(&mut w, range.end, self.len);
        Ok(w.finish())
    }

    /// Returns the entries at `indices`, in the given order (repeats allowed)
    pub fn select(&self, indices: &[usize]) -> Result<RleVec> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len) {
            return Err(MatrixError::shape(
                format!("index below {}", self.len),
                bad,
            ));
        }
        let mut w = RunWriter::default();
        for &i in indices {
            w.push(self.get(i), 1);
        }
        Ok(w.finish())
    }

    /// Returns `self` followed by `other`
    pub fn concat(&self, other: &RleVec) -> RleVec {
        let mut w = RunWriter::with_capacity(self.runs.len() + other.runs.len());
        for run in self.runs.iter().chain(other.runs.iter()) {
            w.push(run.value, run.len);
        }
        w.finish()
    }

    /// Applies `f` to every run value
    pub fn map(&self, mut f: impl FnMut(i64) -> i64) -> RleVec {
        let mut w = RunWriter::with_capacity(self.runs.len());
        for run in &self.runs {
            w.push(f(run.value), run.len);
        }
        w.finish()
    }

    /// Combines two equal-length vectors run by run.
    ///
    /// Walks both run lists together, emitting one output run per aligned segment, so the cost
    /// is proportional to the combined number of runs.
    pub(crate) fn zip_runs(&self, other: &RleVec, mut f: impl FnMut(i64, i64) -> i64) -> RleVec {
        debug_assert_eq!(self.len, other.len);
        let mut w = RunWriter::with_capacity(self.runs.len().max(other.runs.len()));
        let (mut i, mut j, mut pos) = (0, 0, 0);
        while pos < self.len {
            let (a, b) = (self.runs[i], other.runs[j]);
            let end = a.end().min(b.end());
            w.push(f(a.value, b.value), end - pos);
            pos = end;
            if a.end() == end {
                i += 1;
            }
            if b.end() == end {
                j += 1;
            }
        }
        w.finish()
    }

    fn check_same_len(&self, other: &RleVec) -> Result<()> {
        if self.len != other.len {
            return Err(MatrixError::shape(
                format!("vector of length {}", self.len),
                format!("vector of length {}", other.len),
            ));
        }
        Ok(())
    }

    /// Elementwise `self op other`
    ///
    /// # Errors
    ///
    /// Shape fault on a length mismatch, domain fault if dividing by a vector containing 0.
    pub fn apply(&self, op: BinOp, other: &RleVec) -> Result<RleVec> {
        self.check_same_len(other)?;
        if op == BinOp::Div && other.runs.iter().any(|r| r.value == 0) {
            return Err(MatrixError::DivisionByZero);
        }
        Ok(self.zip_runs(other, |a, b| op.apply_unchecked(a, b)))
    }

    /// Elementwise `self op scalar`
    ///
    /// # Errors
    ///
    /// Domain fault if dividing by 0.
    pub fn apply_scalar(&self, op: BinOp, scalar: i64) -> Result<RleVec> {
        op.apply(0, scalar)?;
        Ok(self.map(|a| op.apply_unchecked(a, scalar)))
    }

    /// In-place form of [`RleVec::apply`]. The receiver is left untouched on error.
    pub fn apply_inplace(&mut self, op: BinOp, other: &RleVec) -> Result<&mut Self> {
        *self = self.apply(op, other)?;
        Ok(self)
    }

    /// In-place form of [`RleVec::apply_scalar`]. The receiver is left untouched on error.
    pub fn apply_scalar_inplace(&mut self, op: BinOp, scalar: i64) -> Result<&mut Self> {
        *self = self.apply_scalar(op, scalar)?;
        Ok(self)
    }

    /// Truncating division by a scalar
    #[inline]
    pub fn div_scalar(&self, divisor: i64) -> Result<RleVec> {
        self.apply_scalar(BinOp::Div, divisor)
    }

    /// Elementwise truncating division
    #[inline]
    pub fn div(&self, other: &RleVec) -> Result<RleVec> {
        self.apply(BinOp::Div, other)
    }

    /// Computes the dot product of two vectors of equal length.
    ///
    /// Each run of `self` contributes its value times the segment sum of `other` over the same
    /// indices.
    pub fn dot(&self, other: &RleVec) -> Result<i64> {
        self.check_same_len(other)?;
        let other = other.runs();
        Ok(self
            .runs
            .iter()
            .map(|r| r.value * other.segment_sum(r.start, r.end()))
            .sum())
    }

    /// Sum of squares of the entries
    pub fn norm_squared(&self) -> i64 {
        self.runs.iter().map(|r| r.value * r.value * r.len as i64).sum()
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        (self.norm_squared() as f64).sqrt()
    }

    /// Counts how many entries hold each distinct value, computed from the runs
    pub fn histogram(&self) -> FxHashMap<i64, usize> {
        let mut counts = FxHashMap::default();
        for run in &self.runs {
            *counts.entry(run.value).or_insert(0) += run.len;
        }
        counts
    }
}

impl Deref for RleVec {
    type Target = RunSlice;
    fn deref(&self) -> &Self::Target {
        self.runs()
    }
}

/// Two vectors are equal if they decode to the same values, regardless of how they are split
/// into runs
impl PartialEq for RleVec {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for RleVec {}

/// `v[i]` is equivalent to `v.get(i)`, borrowing the value from the covering run
impl Index<usize> for RleVec {
    type Output = i64;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.runs[self.position(index)].value
    }
}

impl FromIterator<i64> for RleVec {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        let mut w = RunWriter::default();
        for value in iter {
            w.push(value, 1);
        }
        w.finish()
    }
}

impl From<&[i64]> for RleVec {
    fn from(value: &[i64]) -> Self {
        value.iter().copied().collect()
    }
}

impl From<Vec<i64>> for RleVec {
    fn from(value: Vec<i64>) -> Self {
        value.into_iter().collect()
    }
}

impl From<&RleVec> for Vec<i64> {
    fn from(value: &RleVec) -> Self {
        value.to_vec()
    }
}

impl fmt::Display for RleVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

macro_rules! vec_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&RleVec> for &RleVec {
            type Output = RleVec;

            fn $method(self, rhs: &RleVec) -> Self::Output {
                assert_eq!(
                    self.len(),
                    rhs.len(),
                    "RleVecs must have the same length for elementwise operations"
                );
                self.zip_runs(rhs, |a, b| $op.apply_unchecked(a, b))
            }
        }

        impl $trait<i64> for &RleVec {
            type Output = RleVec;

            fn $method(self, rhs: i64) -> Self::Output {
                self.map(|a| $op.apply_unchecked(a, rhs))
            }
        }
    };
}

vec_binop!(Add, add, BinOp::Add);
vec_binop!(Sub, sub, BinOp::Sub);
vec_binop!(Mul, mul, BinOp::Mul);

impl Neg for &RleVec {
    type Output = RleVec;

    fn neg(self) -> Self::Output {
        self.map(|a| -a)
    }
}

impl AddAssign<&RleVec> for RleVec {
    fn add_assign(&mut self, rhs: &RleVec) {
        *self = &*self + rhs;
    }
}

impl SubAssign<&RleVec> for RleVec {
    fn sub_assign(&mut self, rhs: &RleVec) {
        *self = &*self - rhs;
    }
}

impl AddAssign<i64> for RleVec {
    fn add_assign(&mut self, rhs: i64) {
        *self = &*self + rhs;
    }
}

impl MulAssign<i64> for RleVec {
    fn mul_assign(&mut self, rhs: i64) {
        *self = &*self * rhs;
    }
}
