//! Error types for the symbolic factorization pipeline

use thiserror::Error;

/// Result type alias using the crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the symbolic factorization pipeline
///
/// Every failure is terminal for the call that produced it: no partial
/// structural result is ever committed. Callers may re-attempt the whole
/// symbolic pass with corrected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input matrix is not square
    #[error("dimension mismatch: matrix is {n_rows}x{n_cols}, expected square")]
    DimensionMismatch {
        /// Number of rows
        n_rows: usize,
        /// Number of columns
        n_cols: usize,
    },

    /// The elimination forest does not match the matrix it is used with
    #[error("forest mismatch: forest has {forest_nodes} nodes, matrix has {n_rows} rows")]
    ForestMismatch {
        /// Number of nodes in the forest
        forest_nodes: usize,
        /// Number of rows in the matrix
        n_rows: usize,
    },

    /// A required quantity is not representable in the index type
    #[error("index overflow: {required} exceeds the range of index type {index_type}")]
    IndexOverflow {
        /// Name of the index type
        index_type: &'static str,
        /// The value that could not be represented
        required: usize,
    },

    /// An output buffer does not have the expected length
    #[error("output buffer for '{what}' has length {got}, expected {expected}")]
    OutputSizeMismatch {
        /// Which buffer was wrong
        what: &'static str,
        /// Actual length
        got: usize,
        /// Required length
        expected: usize,
    },
}

impl Error {
    /// Builds an [`Error::IndexOverflow`] for index type `I`
    pub(crate) fn index_overflow<I>(required: usize) -> Self {
        Error::IndexOverflow {
            index_type: std::any::type_name::<I>(),
            required,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DimensionMismatch {
            n_rows: 3,
            n_cols: 4,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: matrix is 3x4, expected square"
        );

        let err = Error::index_overflow::<i16>(40_000);
        assert!(err.to_string().contains("i16"));
        assert!(err.to_string().contains("40000"));
    }
}
