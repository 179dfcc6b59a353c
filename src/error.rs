//! Errors shared by the factorizations and the descent solvers

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NumericsError>;

/// Which half of the bracket-then-bisect line search gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    /// Doubling the step until the directional derivative stops decreasing.
    Bracketing,
    /// Halving the bracket around the stationary point.
    Bisection,
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStage::Bracketing => write!(f, "bracketing"),
            SearchStage::Bisection => write!(f, "bisection"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumericsError {
    /// Quadratic form matrix differs from its transpose at `(row, col)`.
    NotSymmetric { row: usize, col: usize },

    /// An operand has the wrong dimension.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A zero-length operand where at least one entry is required.
    EmptyInput { what: &'static str },

    /// The line search hit its iteration cap.
    SearchDidNotConverge { stage: SearchStage, iterations: usize },

    /// Zero pivot on the diagonal of R during back substitution.
    Singular { index: usize },
}

impl std::error::Error for NumericsError {}

impl fmt::Display for NumericsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericsError::NotSymmetric { row, col } => {
                write!(f, "Matrix is not symmetric: entry ({row}, {col}) differs from ({col}, {row})")
            }
            NumericsError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(f, "Shape mismatch for {what}: expected {expected}, found {found}"),
            NumericsError::EmptyInput { what } => write!(f, "Empty input: {what}"),
            NumericsError::SearchDidNotConverge { stage, iterations } => {
                write!(f, "Line search did not converge: {stage} stopped after {iterations} iterations")
            }
            NumericsError::Singular { index } => {
                write!(f, "Matrix is singular: zero pivot at index {index}")
            }
        }
    }
}

/// Fails with [`NumericsError::ShapeMismatch`] unless `found == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(NumericsError::ShapeMismatch {
            what,
            expected,
            found,
        })
    }
}
