//! # CHOLSYM: Symbolic Cholesky Factorization for Multicore Systems
//!
//! CHOLSYM computes the structure of the lower-triangular factor of a
//! sparse symmetric Cholesky factorization — the elimination order and the
//! exact nonzero pattern — before any numeric value is touched.
//!
//! ## Overview
//!
//! This library implements the symbolic phase in Rust, with a focus on:
//!
//! - A single generic algorithm shared by a sequential and a rayon-based
//!   parallel backend, with bit-identical structural output
//! - Flat index arrays for the elimination forest, so every traversal is a
//!   bounded array walk safe for parallel execution
//! - Memory-frugal operation through one reusable scratch buffer of
//!   exactly `nnz + n` index elements
//!
//! ## Algorithm Components
//!
//! The symbolic pipeline consists of four barriered stages:
//!
//! 1. **Elimination forest**: parent pointers via a path-compressed
//!    ancestor walk over the lower triangle, then an iterative postorder
//!    numbering ([`compute_elimination_forest`]).
//!
//! 2. **Mapping and sorting**: each row's strictly-lower column indices are
//!    translated into postorder ranks and canonicalized by sorting
//!    ([`map_rows_to_postorder`]).
//!
//! 3. **Counting**: per-row ancestor walks tally the fill-in of every row
//!    of L ([`symbolic_count`]); an exclusive prefix sum turns the counts
//!    into row offsets.
//!
//! 4. **Factorization**: the identical walks emit the column pattern of L
//!    ([`symbolic_factorize`]).
//!
//! ## Usage
//!
//! ```
//! use cholsym::{symbolic_cholesky, ParallelExecutor, SequentialExecutor, SparseMatrixCSR};
//!
//! // 4x4 arrowhead pattern: rows 0-2 are diagonal-only, row 3 is full
//! let mtx = SparseMatrixCSR::<usize, f64>::new(
//!     4,
//!     4,
//!     vec![0, 1, 2, 3, 7],
//!     vec![0, 1, 2, 0, 1, 2, 3],
//!     vec![4.0, 4.0, 4.0, 1.0, 1.0, 1.0, 4.0],
//! );
//!
//! let symbolic = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();
//! assert_eq!(symbolic.row_nnz, vec![1, 1, 1, 4]);
//!
//! // the parallel executor produces the identical structure
//! let parallel = symbolic_cholesky(&mtx, &ParallelExecutor::new()).unwrap();
//! assert_eq!(parallel.factor.col_idx, symbolic.factor.col_idx);
//! ```

pub mod error;
pub mod executor;
pub mod forest;
pub mod matrix;
pub mod symbolic;
pub mod utils;

// Re-export primary components
pub use error::{Error, Result};
pub use executor::{Executor, ParallelExecutor, RowSchedule, SequentialExecutor};
pub use forest::{compute_elimination_forest, EliminationForest};
pub use matrix::{IndexType, SparseMatrixCSR};
pub use symbolic::{
    map_rows_to_postorder, symbolic_cholesky, symbolic_count, symbolic_factorize,
    SymbolicFactorization, SymbolicScratch,
};
pub use utils::{from_sprs_csr, to_sprs_csr};

/// Version information for the CHOLSYM library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
