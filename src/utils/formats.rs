//! Utilities for converting between our matrix format and external libraries

use num_traits::Num;
use sprs::CsMatI;

use crate::matrix::{IndexType, SparseMatrixCSR};

/// Converts our CSR matrix format to sprs CsMatI format
///
/// The matrix must have ascending column indices within every row (the
/// input convention of the symbolic pipeline); sprs enforces this. Factor
/// patterns produced by the factorize step store each row in elimination
/// order rather than ascending column order and are not convertible here
/// without sorting first.
pub fn to_sprs_csr<I, T>(matrix: &SparseMatrixCSR<I, T>) -> CsMatI<T, I>
where
    I: IndexType,
    T: Copy + Num + Default,
{
    CsMatI::new(
        (matrix.n_rows, matrix.n_cols),
        matrix.row_ptr.clone(),
        matrix.col_idx.clone(),
        matrix.values.clone(),
    )
}

/// Converts sprs CsMatI in CSR format to our SparseMatrixCSR format
pub fn from_sprs_csr<I, T>(matrix: CsMatI<T, I>) -> SparseMatrixCSR<I, T>
where
    I: IndexType,
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(shape.0, shape.1, indptr, indices, data)
}
