use thiserror::Error;

/// Faults raised by matrix and vector operations
///
/// Numeric faults (shape, singularity, domain) are kept apart from I/O faults so callers of
/// [`crate::RleMatrix::write_csv`] can tell a failed write from bad data.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Dimensions of the operands do not line up
    #[error("shape mismatch: expected {expected}, found {found}")]
    Shape { expected: String, found: String },

    /// Elimination hit a zero pivot with no nonzero replacement
    #[error("matrix is singular: zero pivot in column {pivot}")]
    Singular { pivot: usize },

    /// Division by a zero scalar or a zero vector entry
    #[error("division by zero")]
    DivisionByZero,

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Nullspace is only defined here for `m x (m + 1)` systems
    #[error("nullspace requires an m x (m + 1) matrix, got {rows}x{cols}")]
    NullspaceShape { rows: usize, cols: usize },

    /// A result does not fit the requested integer type. `value` describes what overflowed.
    #[error("{value} does not fit in the target integer type")]
    Narrowing { value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl MatrixError {
    /// Convenience constructor for [`MatrixError::Shape`]
    pub(crate) fn shape(expected: impl ToString, found: impl ToString) -> Self {
        MatrixError::Shape {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, MatrixError>;
