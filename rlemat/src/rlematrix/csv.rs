//! Flat CSV text export and import.
//!
//! One line per matrix row, entries separated by commas, no header.

use super::RleMatrix;
use crate::error::{MatrixError, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

impl RleMatrix {
    /// Writes the matrix to `path` as comma-separated rows.
    ///
    /// # Errors
    ///
    /// [`MatrixError::Io`] if the file cannot be created or written.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_csv_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the matrix as comma-separated rows to any writer
    pub fn write_csv_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        // one pass over the runs, rather than a column lookup per entry
        for row in self.transposed().columns.iter() {
            let mut first = true;
            for x in row.iter() {
                if !first {
                    write!(writer, ",")?;
                }
                write!(writer, "{}", x)?;
                first = false;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Reads a matrix written by [`RleMatrix::write_csv`]
    pub fn read_csv(path: impl AsRef<Path>) -> Result<RleMatrix> {
        RleMatrix::from_csv_reader(BufReader::new(File::open(path)?))
    }

    /// Parses comma-separated integer rows. Blank lines are skipped, except that input made up
    /// only of `n` blank lines reads as an `n x 0` matrix, which is what
    /// [`RleMatrix::write_csv_to`] emits for one. A matrix with no rows writes nothing and reads
    /// back as `0 x 0`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::Parse`] for a malformed entry (with its 1-based line number),
    /// a shape fault for rows of differing length, [`MatrixError::Io`] on a read failure.
    pub fn from_csv_reader<R: BufRead>(reader: R) -> Result<RleMatrix> {
        let mut rows: Vec<Vec<i64>> = Vec::new();
        let mut blank = 0;
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                blank += 1;
                continue;
            }
            let row = line
                .split(',')
                .map(|field| {
                    let field = field.trim();
                    field.parse::<i64>().map_err(|e| MatrixError::Parse {
                        line: n + 1,
                        message: format!("bad entry {:?}: {}", field, e),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }
        if rows.is_empty() {
            return Ok(RleMatrix::zeros(blank, 0));
        }
        RleMatrix::from_rows(&rows)
    }
}
