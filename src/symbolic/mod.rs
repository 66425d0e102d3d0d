//! Symbolic phase of sparse symmetric Cholesky factorization
//!
//! Before any numeric value is computed, this pipeline determines the exact
//! nonzero pattern of the lower-triangular factor L:
//!
//! 1. [`map_rows_to_postorder`] — translate each row's strictly-lower
//!    column indices into elimination-forest postorder ranks and sort them
//! 2. [`symbolic_count`] — count the fill-in of every row of L
//! 3. an exclusive prefix sum over the counts (see
//!    [`Executor::exclusive_prefix_sum`])
//! 4. [`symbolic_factorize`] — emit the column pattern of L
//!
//! The stages are globally barriered: each executor call returns only once
//! every row has been processed, counting assumes fully mapped and sorted
//! rows, and factorization assumes final row offsets. Rows share no mutable
//! state within a stage, so any backend may process them in any order.
//!
//! [`symbolic_cholesky`] drives all four stages; the individual steps are
//! public so a numeric factorization can run the pipeline itself and reuse
//! the scratch buffer across calls.

pub mod mapping;
pub mod traversal;

pub use mapping::map_rows_to_postorder;
pub use traversal::{symbolic_count, symbolic_factorize};

use std::fmt;

use num_traits::Num;

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::forest::{compute_elimination_forest, EliminationForest};
use crate::matrix::{IndexType, SparseMatrixCSR};

/// Scratch storage shared by the mapping, counting and factorize steps
///
/// One buffer of exactly `nnz + n_rows` index elements: the first `nnz`
/// positions hold the postorder-mapped column indices of every row
/// (`postorder_cols`), the last `n_rows` positions hold each row's boundary
/// between strictly-lower entries and the rest (`lower_ends`, as absolute
/// offsets into `postorder_cols`).
///
/// Construction validates that `nnz + n_rows` is representable in the index
/// type, so every offset stored inside the buffer is too.
#[derive(Debug, Clone)]
pub struct SymbolicScratch<I> {
    buffer: Vec<I>,
    nnz: usize,
}

impl<I: IndexType> SymbolicScratch<I> {
    /// Allocates scratch storage for a matrix with `nnz` stored entries and
    /// `n_rows` rows
    ///
    /// # Errors
    ///
    /// [`Error::IndexOverflow`] if `nnz + n_rows` exceeds the range of `I`.
    pub fn new(nnz: usize, n_rows: usize) -> Result<Self> {
        let len = nnz
            .checked_add(n_rows)
            .ok_or_else(|| Error::index_overflow::<I>(usize::MAX))?;
        I::try_from_usize(len).ok_or_else(|| Error::index_overflow::<I>(len))?;
        Ok(Self {
            buffer: vec![I::default(); len],
            nnz,
        })
    }

    /// Total number of index elements held
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if the scratch holds no elements
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The postorder-mapped column indices, one segment per matrix row
    pub fn postorder_cols(&self) -> &[I] {
        &self.buffer[..self.nnz]
    }

    /// Per-row boundaries between strictly-lower entries and the rest
    pub fn lower_ends(&self) -> &[I] {
        &self.buffer[self.nnz..]
    }

    pub(crate) fn split(&self) -> (&[I], &[I]) {
        self.buffer.split_at(self.nnz)
    }

    pub(crate) fn split_mut(&mut self) -> (&mut [I], &mut [I]) {
        self.buffer.split_at_mut(self.nnz)
    }

    pub(crate) fn check(&self, nnz: usize, n_rows: usize) -> Result<()> {
        if self.nnz != nnz || self.buffer.len() != nnz + n_rows {
            return Err(Error::OutputSizeMismatch {
                what: "scratch storage",
                got: self.buffer.len(),
                expected: nnz + n_rows,
            });
        }
        Ok(())
    }
}

/// Checks the square-matrix and forest-size preconditions shared by every
/// pipeline step
pub(crate) fn validate_inputs<I, T>(
    mtx: &SparseMatrixCSR<I, T>,
    forest: &EliminationForest<I>,
) -> Result<()>
where
    I: IndexType,
    T: Copy + Num,
{
    if mtx.n_rows != mtx.n_cols {
        return Err(Error::DimensionMismatch {
            n_rows: mtx.n_rows,
            n_cols: mtx.n_cols,
        });
    }
    if forest.len() != mtx.n_rows {
        return Err(Error::ForestMismatch {
            forest_nodes: forest.len(),
            n_rows: mtx.n_rows,
        });
    }
    Ok(())
}

/// Result of the symbolic phase
///
/// The factor carries the structure of L (row pointers and column indices,
/// each row closed by its diagonal entry) with zeroed values, ready for the
/// numeric factorization to fill. `row_nnz[i]` equals the number of stored
/// entries in row i of the factor, diagonal included.
#[derive(Clone)]
pub struct SymbolicFactorization<I, T> {
    /// The elimination forest the pattern was derived from
    pub forest: EliminationForest<I>,

    /// Nonzero count per row of L, diagonal included
    pub row_nnz: Vec<I>,

    /// Structure of the factor L with zeroed values
    pub factor: SparseMatrixCSR<I, T>,
}

impl<I: IndexType + fmt::Debug, T: fmt::Debug + Copy + Num> fmt::Debug
    for SymbolicFactorization<I, T>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolicFactorization")
            .field("forest", &self.forest)
            .field("row_nnz", &self.row_nnz)
            .field("factor", &self.factor)
            .finish()
    }
}

/// Runs the full symbolic Cholesky pipeline on a symmetric sparse matrix
///
/// Only the lower triangle of `mtx` is read; upper-triangular entries are
/// tolerated and ignored, and a stored diagonal is not required. The
/// structural output is identical for every executor.
///
/// A zero-sized matrix returns immediately with empty outputs; the
/// elimination forest is not built in that case.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if `mtx` is not square
/// - [`Error::IndexOverflow`] if `nnz + n_rows` or the factor's total
///   nonzero count is not representable in `I`
///
/// # Examples
///
/// ```
/// use cholsym::{symbolic_cholesky, SequentialExecutor, SparseMatrixCSR};
///
/// // a diagonal matrix factors into itself, structurally
/// let mtx = SparseMatrixCSR::<usize, f64>::identity(3);
/// let symbolic = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();
///
/// assert_eq!(symbolic.row_nnz, vec![1, 1, 1]);
/// assert_eq!(symbolic.factor.col_idx, vec![0, 1, 2]);
/// ```
pub fn symbolic_cholesky<I, T, E>(
    mtx: &SparseMatrixCSR<I, T>,
    exec: &E,
) -> Result<SymbolicFactorization<I, T>>
where
    I: IndexType,
    T: Copy + Num,
    E: Executor,
{
    if mtx.n_rows != mtx.n_cols {
        return Err(Error::DimensionMismatch {
            n_rows: mtx.n_rows,
            n_cols: mtx.n_cols,
        });
    }
    let n_rows = mtx.n_rows;
    if n_rows == 0 {
        return Ok(SymbolicFactorization {
            forest: EliminationForest::empty(),
            row_nnz: Vec::new(),
            factor: SparseMatrixCSR::zeros(0, 0),
        });
    }

    let forest = compute_elimination_forest(mtx)?;
    log::debug!(
        "elimination forest built: {} nodes, executor '{}'",
        forest.len(),
        exec.name()
    );

    let mut scratch = SymbolicScratch::new(mtx.nnz(), n_rows)?;
    map_rows_to_postorder(exec, mtx, &forest, &mut scratch)?;

    let mut row_nnz = vec![I::default(); n_rows];
    symbolic_count(exec, mtx, &forest, &scratch, &mut row_nnz)?;

    let mut out_row_ptrs = vec![I::default(); n_rows + 1];
    let factor_nnz = exec.exclusive_prefix_sum(&row_nnz, &mut out_row_ptrs)?;
    log::debug!("symbolic count done: {} nonzeros in L", factor_nnz);

    let mut out_cols = vec![I::default(); factor_nnz];
    symbolic_factorize(exec, mtx, &forest, &scratch, &out_row_ptrs, &mut out_cols)?;

    let factor = SparseMatrixCSR::new(
        n_rows,
        n_rows,
        out_row_ptrs,
        out_cols,
        vec![T::zero(); factor_nnz],
    );
    Ok(SymbolicFactorization {
        forest,
        row_nnz,
        factor,
    })
}
