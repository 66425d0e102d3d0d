//! Postorder index mapping and per-row canonicalization
//!
//! The counting and factorize traversals assume that every row's
//! strictly-lower entries are expressed as elimination-forest postorder
//! ranks in ascending order. This step establishes that form: it maps each
//! row's columns into postorder space, records where the strictly-lower
//! part of each row ends, and sorts every mapped segment.

use num_traits::Num;

use crate::error::Result;
use crate::executor::Executor;
use crate::forest::EliminationForest;
use crate::matrix::{IndexType, SparseMatrixCSR};
use crate::symbolic::{validate_inputs, SymbolicScratch};

/// Maps every row's strictly-lower column indices into postorder rank space
/// and sorts each mapped segment ascending
///
/// After this call, for every row `i`:
/// - `scratch.postorder_cols()[row_ptr[i] .. lower_ends[i]]` holds the
///   postorder ranks of row i's strictly-lower columns, sorted ascending
/// - `scratch.lower_ends()[i]` is the absolute offset one past the last
///   strictly-lower entry
///
/// Positions past `lower_ends[i]` within the row's segment are never read
/// by later stages. Columns are unique within a row by the matrix contract,
/// so no deduplication is performed and the sorted order is canonical.
///
/// # Errors
///
/// [`crate::Error::DimensionMismatch`] / [`crate::Error::ForestMismatch`] /
/// [`crate::Error::OutputSizeMismatch`] if the matrix, forest and scratch
/// do not belong together. No partial state is committed on failure.
pub fn map_rows_to_postorder<I, T, E>(
    exec: &E,
    mtx: &SparseMatrixCSR<I, T>,
    forest: &EliminationForest<I>,
    scratch: &mut SymbolicScratch<I>,
) -> Result<()>
where
    I: IndexType,
    T: Copy + Num,
    E: Executor,
{
    validate_inputs(mtx, forest)?;
    scratch.check(mtx.nnz(), mtx.n_rows)?;

    let (postorder_cols, lower_ends) = scratch.split_mut();
    let row_ptr = mtx.row_ptr.as_slice();
    let col_idx = mtx.col_idx.as_slice();
    let inv_postorder = forest.inv_postorder.as_slice();

    // pass 1: locate each row's strictly-lower boundary
    exec.for_each_row(lower_ends, |row| {
        let begin = row_ptr[row].index();
        let end = row_ptr[row + 1].index();
        let lower = col_idx[begin..end]
            .iter()
            .filter(|col| col.index() < row)
            .count();
        I::from_usize(begin + lower)
    });

    // pass 2: map strictly-lower columns to postorder ranks, then sort the
    // mapped prefix of each row segment
    let lower_ends: &[I] = lower_ends;
    exec.for_each_row_segment(row_ptr, postorder_cols, |row, segment| {
        let begin = row_ptr[row].index();
        let end = row_ptr[row + 1].index();
        let mut mapped = 0usize;
        for nz in begin..end {
            let col = col_idx[nz].index();
            if col < row {
                segment[mapped] = inv_postorder[col];
                mapped += 1;
            }
        }
        // ranks are unique within a row, so an unstable sort is canonical
        segment[..mapped].sort_unstable();
        debug_assert_eq!(begin + mapped, lower_ends[row].index());
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SequentialExecutor;
    use crate::forest::compute_elimination_forest;

    fn structural(n: usize, row_ptr: Vec<usize>, col_idx: Vec<usize>) -> SparseMatrixCSR<usize, f64> {
        let nnz = col_idx.len();
        SparseMatrixCSR::new(n, n, row_ptr, col_idx, vec![1.0; nnz])
    }

    #[test]
    fn test_diagonal_rows_have_empty_lower_parts() {
        let mtx = SparseMatrixCSR::<usize, f64>::identity(4);
        let forest = compute_elimination_forest(&mtx).unwrap();
        let mut scratch = SymbolicScratch::new(mtx.nnz(), mtx.n_rows).unwrap();

        map_rows_to_postorder(&SequentialExecutor, &mtx, &forest, &mut scratch).unwrap();

        // every boundary sits at its row's start
        assert_eq!(scratch.lower_ends(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_mapped_segments_are_sorted() {
        // row 3 stores its lower columns out of order: {2, 0, 1}
        let mtx = structural(4, vec![0, 1, 2, 3, 7], vec![0, 1, 2, 2, 0, 1, 3]);
        let forest = compute_elimination_forest(&mtx).unwrap();
        let mut scratch = SymbolicScratch::new(mtx.nnz(), mtx.n_rows).unwrap();

        map_rows_to_postorder(&SequentialExecutor, &mtx, &forest, &mut scratch).unwrap();

        // arrowhead forest postorders nodes 0..2 before 3; the mapped and
        // sorted lower part of row 3 is the rank sequence [0, 1, 2]
        assert_eq!(scratch.lower_ends()[3], 6);
        assert_eq!(&scratch.postorder_cols()[3..6], &[0, 1, 2]);
    }

    #[test]
    fn test_upper_entries_are_ignored() {
        // full symmetric tridiagonal pattern, both triangles stored
        let mtx = structural(
            3,
            vec![0, 2, 5, 7],
            vec![0, 1, 0, 1, 2, 1, 2],
        );
        let forest = compute_elimination_forest(&mtx).unwrap();
        let mut scratch = SymbolicScratch::new(mtx.nnz(), mtx.n_rows).unwrap();

        map_rows_to_postorder(&SequentialExecutor, &mtx, &forest, &mut scratch).unwrap();

        // row 0 has no lower entries; rows 1 and 2 each have exactly one
        assert_eq!(scratch.lower_ends(), &[0, 3, 6]);
        assert_eq!(scratch.postorder_cols()[2], 0);
        assert_eq!(scratch.postorder_cols()[5], 1);
    }

    #[test]
    fn test_forest_mismatch_rejected() {
        let mtx = SparseMatrixCSR::<usize, f64>::identity(4);
        let other = SparseMatrixCSR::<usize, f64>::identity(3);
        let forest = compute_elimination_forest(&other).unwrap();
        let mut scratch = SymbolicScratch::new(mtx.nnz(), mtx.n_rows).unwrap();

        let err = map_rows_to_postorder(&SequentialExecutor, &mtx, &forest, &mut scratch);
        assert!(err.is_err());
    }
}
