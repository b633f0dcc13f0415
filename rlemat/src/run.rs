use ref_cast::RefCast;
use std::ops::{Index, Range};

/// A span of `len` copies of `value`, beginning at offset `start` of its vector
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Run {
    pub value: i64,
    pub start: usize,
    pub len: usize,
}

impl Run {
    #[inline]
    pub fn new(value: i64, start: usize, len: usize) -> Self {
        Run { value, start, len }
    }

    /// One past the last index covered by this run
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end()
    }
}

/// A sequence of runs, represented as a slice of [`Run`]s.
///
/// The runs are assumed sorted by `start` and non-overlapping. This is the borrowed view that
/// [`crate::RleVec`] dereferences to, and it carries all the read-only run-aware queries.
#[derive(RefCast, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct RunSlice([Run]);

/// Iterator over the decoded values of a [`RunSlice`].
///
/// Yields each run's value `len` times, so the output has one item per covered index.
#[derive(Clone)]
pub struct RunIter<'a> {
    inner: std::slice::Iter<'a, Run>,
    value: i64,
    remaining: usize,
}

impl Iterator for RunIter<'_> {
    type Item = i64;
    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining == 0 {
            let run = self.inner.next()?;
            self.value = run.value;
            self.remaining = run.len;
        }
        self.remaining -= 1;
        Some(self.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest: usize = self.inner.clone().map(|r| r.len).sum();
        let n = self.remaining + rest;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RunIter<'_> {}

impl RunSlice {
    #[inline]
    pub fn from_runs(runs: &[Run]) -> &RunSlice {
        RunSlice::ref_cast(runs)
    }

    /// Number of runs in the slice, which is at most the number of covered indices
    #[inline]
    pub fn num_runs(&self) -> usize {
        self.0.len()
    }

    /// Number of indices covered from the first run's start to the last run's end
    pub fn span(&self) -> usize {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => last.end() - first.start,
            _ => 0,
        }
    }

    /// Returns the position of the run containing `index`, using binary search over run ends
    pub fn find(&self, index: usize) -> Option<usize> {
        let pos = self.0.partition_point(|r| r.end() <= index);
        if pos < self.0.len() && self.0[pos].contains(index) {
            Some(pos)
        } else {
            None
        }
    }

    /// Returns the value stored at `index`, or `None` if no run covers it
    #[inline]
    pub fn value_at(&self, index: usize) -> Option<i64> {
        self.find(index).map(|pos| self.0[pos].value)
    }

    /// Returns an iterator over the decoded values, one item per covered index
    #[inline]
    pub fn iter(&self) -> RunIter<'_> {
        RunIter {
            inner: self.0.iter(),
            value: 0,
            remaining: 0,
        }
    }

    /// Returns an iterator over the runs themselves
    #[inline]
    pub fn run_iter(&self) -> std::slice::Iter<'_, Run> {
        self.0.iter()
    }

    /// Sum of the decoded values in `from..to`.
    ///
    /// Each overlapping run contributes `value * overlap`, so the cost is proportional to the
    /// number of runs touched rather than the width of the segment.
    pub fn segment_sum(&self, from: usize, to: usize) -> i64 {
        let mut sum = 0;
        let first = self.0.partition_point(|r| r.end() <= from);
        for run in &self.0[first..] {
            if run.start >= to {
                break;
            }
            let overlap = run.end().min(to) - run.start.max(from);
            sum += run.value * overlap as i64;
        }
        sum
    }

    /// Sum of all decoded values
    #[inline]
    pub fn sum(&self) -> i64 {
        self.0.iter().map(|r| r.value * r.len as i64).sum()
    }

    #[inline]
    pub fn min(&self) -> Option<i64> {
        self.0.iter().map(|r| r.value).min()
    }

    #[inline]
    pub fn max(&self) -> Option<i64> {
        self.0.iter().map(|r| r.value).max()
    }
}

impl Index<usize> for RunSlice {
    type Output = Run;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.0.index(index)
    }
}

impl Index<Range<usize>> for RunSlice {
    type Output = RunSlice;

    fn index(&self, index: Range<usize>) -> &Self::Output {
        RunSlice::ref_cast(&self.0[index])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Vec<Run> {
        // [4, 4, 4, -1, 7, 7]
        vec![Run::new(4, 0, 3), Run::new(-1, 3, 1), Run::new(7, 4, 2)]
    }

    #[test]
    fn find_and_value_at() {
        let runs = sample();
        let s = RunSlice::from_runs(&runs);
        assert_eq!(s.find(0), Some(0));
        assert_eq!(s.find(2), Some(0));
        assert_eq!(s.find(3), Some(1));
        assert_eq!(s.find(5), Some(2));
        assert_eq!(s.find(6), None);
        assert_eq!(s.value_at(4), Some(7));
        assert_eq!(s.value_at(10), None);
    }

    #[test]
    fn iter_expands_runs() {
        let runs = sample();
        let s = RunSlice::from_runs(&runs);
        let values: Vec<i64> = s.iter().collect();
        assert_eq!(values, vec![4, 4, 4, -1, 7, 7]);
        assert_eq!(s.iter().len(), 6);
    }

    #[test]
    fn segment_sum_matches_dense() {
        let runs = sample();
        let s = RunSlice::from_runs(&runs);
        let dense: Vec<i64> = s.iter().collect();
        for from in 0..=dense.len() {
            for to in from..=dense.len() {
                let expected: i64 = dense[from..to].iter().sum();
                assert_eq!(s.segment_sum(from, to), expected, "segment {from}..{to}");
            }
        }
    }

    #[test]
    fn reductions() {
        let runs = sample();
        let s = RunSlice::from_runs(&runs);
        assert_eq!(s.sum(), 12 - 1 + 14);
        assert_eq!(s.min(), Some(-1));
        assert_eq!(s.max(), Some(7));
        assert_eq!(s.span(), 6);
        assert_eq!(s[1..3].num_runs(), 2);
        assert_eq!(s[1..3].span(), 3);
    }
}
