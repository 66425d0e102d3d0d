//! Fill-in counting and pattern emission
//!
//! Both passes perform the same row-subtree traversal: for every
//! strictly-lower entry of a row (in ascending postorder), walk the
//! ancestor chain until the walk of the next entry takes over. The counting
//! pass only tallies visits; the factorize pass writes the visited columns
//! into the output pattern. Keeping the two passes structurally identical
//! is what guarantees that the counts from pass one exactly size the
//! storage consumed by pass two, so the traversal body exists once and the
//! passes differ only in their visit action.

use num_traits::Num;

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::forest::EliminationForest;
use crate::matrix::{IndexType, SparseMatrixCSR};
use crate::symbolic::{validate_inputs, SymbolicScratch};

/// Walks the row subtree spanned by one row's sorted strictly-lower entries
///
/// Every entry's ancestor chain is followed while its ranks stay below the
/// next entry's rank; the final entry is bounded by the row's own diagonal
/// rank. Since entries are sorted and every ancestor path eventually merges
/// into the path of a larger rank, each node of the row subtree is visited
/// exactly once — the bound is what skips ancestors another walk of the
/// same row covers, keeping total work linear in nnz plus fill.
#[inline]
fn walk_row_subtree<I: IndexType>(
    row_begin: usize,
    lower_end: usize,
    diag_rank: usize,
    postorder_cols: &[I],
    postorder_parents: &[I],
    mut visit: impl FnMut(usize),
) {
    for nz in row_begin..lower_end {
        let mut node = postorder_cols[nz].index();
        let bound = if nz + 1 < lower_end {
            postorder_cols[nz + 1].index()
        } else {
            diag_rank
        };
        while node < bound {
            visit(node);
            node = postorder_parents[node].index();
        }
    }
}

/// Counts the nonzeros of every row of the factor L, diagonal included
///
/// Rows are processed independently; `row_nnz[i]` receives the number of
/// entries row i of L will hold. This pass touches no column storage — the
/// caller turns the counts into row offsets with an exclusive prefix sum
/// before calling [`symbolic_factorize`].
///
/// Requires the scratch to have been filled by
/// [`crate::symbolic::map_rows_to_postorder`] for this matrix and forest.
///
/// # Errors
///
/// Precondition violations (non-square matrix, mismatched forest or
/// scratch, wrongly sized `row_nnz`) are reported synchronously before any
/// row is processed.
pub fn symbolic_count<I, T, E>(
    exec: &E,
    mtx: &SparseMatrixCSR<I, T>,
    forest: &EliminationForest<I>,
    scratch: &SymbolicScratch<I>,
    row_nnz: &mut [I],
) -> Result<()>
where
    I: IndexType,
    T: Copy + Num,
    E: Executor,
{
    validate_inputs(mtx, forest)?;
    scratch.check(mtx.nnz(), mtx.n_rows)?;
    if row_nnz.len() != mtx.n_rows {
        return Err(Error::OutputSizeMismatch {
            what: "row_nnz",
            got: row_nnz.len(),
            expected: mtx.n_rows,
        });
    }

    let (postorder_cols, lower_ends) = scratch.split();
    let row_ptr = mtx.row_ptr.as_slice();
    let inv_postorder = forest.inv_postorder.as_slice();
    let postorder_parents = forest.postorder_parents.as_slice();

    exec.for_each_row(row_nnz, |row| {
        // the diagonal entry of L is always present, stored or not
        let mut count = 1usize;
        walk_row_subtree(
            row_ptr[row].index(),
            lower_ends[row].index(),
            inv_postorder[row].index(),
            postorder_cols,
            postorder_parents,
            |_| count += 1,
        );
        I::from_usize(count)
    });

    Ok(())
}

/// Emits the column pattern of the factor L
///
/// Re-runs the traversal of [`symbolic_count`] and writes each visited
/// node's original row index (via `forest.postorder`) into `out_cols`,
/// starting at `out_row_ptrs[row]`; every row is closed by its diagonal
/// entry. For each row the number of emitted columns equals the count from
/// the counting pass.
///
/// `out_row_ptrs` must be the exclusive prefix sum of the counts produced
/// by [`symbolic_count`] for the same matrix, forest and scratch, and
/// `out_cols` must have exactly that total length.
///
/// # Errors
///
/// Precondition violations are reported synchronously before any row is
/// processed; no partial pattern is ever observable.
pub fn symbolic_factorize<I, T, E>(
    exec: &E,
    mtx: &SparseMatrixCSR<I, T>,
    forest: &EliminationForest<I>,
    scratch: &SymbolicScratch<I>,
    out_row_ptrs: &[I],
    out_cols: &mut [I],
) -> Result<()>
where
    I: IndexType,
    T: Copy + Num,
    E: Executor,
{
    validate_inputs(mtx, forest)?;
    scratch.check(mtx.nnz(), mtx.n_rows)?;
    if out_row_ptrs.len() != mtx.n_rows + 1 {
        return Err(Error::OutputSizeMismatch {
            what: "out_row_ptrs",
            got: out_row_ptrs.len(),
            expected: mtx.n_rows + 1,
        });
    }
    let factor_nnz = out_row_ptrs[mtx.n_rows].index();
    if out_cols.len() != factor_nnz {
        return Err(Error::OutputSizeMismatch {
            what: "out_cols",
            got: out_cols.len(),
            expected: factor_nnz,
        });
    }

    let (postorder_cols, lower_ends) = scratch.split();
    let row_ptr = mtx.row_ptr.as_slice();
    let postorder = forest.postorder.as_slice();
    let inv_postorder = forest.inv_postorder.as_slice();
    let postorder_parents = forest.postorder_parents.as_slice();

    exec.for_each_row_segment(out_row_ptrs, out_cols, |row, out_row| {
        let mut emitted = 0usize;
        walk_row_subtree(
            row_ptr[row].index(),
            lower_ends[row].index(),
            inv_postorder[row].index(),
            postorder_cols,
            postorder_parents,
            |node| {
                out_row[emitted] = postorder[node];
                emitted += 1;
            },
        );
        // diagonal entry closes the row, back in original numbering
        out_row[emitted] = I::from_usize(row);
        emitted += 1;
        debug_assert_eq!(emitted, out_row.len());
    });

    Ok(())
}
