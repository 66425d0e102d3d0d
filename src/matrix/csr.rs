//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;

use num_traits::Num;

use crate::matrix::IndexType;

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// The container is generic over the index type `I` so the same structure can
/// be stored with 32-bit indices on large problems, and over the value type
/// `T`. The symbolic factorization pipeline reads only `row_ptr` and
/// `col_idx`; values are carried for the numeric phase.
#[derive(Clone)]
pub struct SparseMatrixCSR<I, T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<I>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<I>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<I, T> SparseMatrixCSR<I, T>
where
    I: IndexType,
    T: Copy + Num,
{
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Arguments
    ///
    /// * `n_rows` - Number of rows
    /// * `n_cols` - Number of columns
    /// * `row_ptr` - Row pointers
    /// * `col_idx` - Column indices
    /// * `values` - Non-zero values
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1
    /// - col_idx.len() must equal values.len()
    /// - row_ptr[n_rows] must equal col_idx.len()
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<I>,
        col_idx: Vec<I>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), n_rows + 1, "row_ptr.len() must be n_rows + 1");
        assert_eq!(
            col_idx.len(),
            values.len(),
            "col_idx.len() must equal values.len()"
        );
        assert_eq!(
            row_ptr[n_rows].index(),
            col_idx.len(),
            "row_ptr[n_rows] must equal col_idx.len()"
        );

        // Check that column indices are within bounds
        for &col in &col_idx {
            assert!(
                col.index() < n_cols,
                "Column index {} out of bounds (n_cols = {})",
                col.index(),
                n_cols
            );
        }

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns the half-open range of `col_idx`/`values` positions for row i
    pub fn row_range(&self, i: usize) -> std::ops::Range<usize> {
        assert!(i < self.n_rows, "Row index out of bounds");
        self.row_ptr[i].index()..self.row_ptr[i + 1].index()
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        let range = self.row_range(i);

        self.col_idx[range.clone()]
            .iter()
            .zip(&self.values[range])
            .map(|(&col, val)| (col.index(), val))
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        let row_ptr = vec![I::default(); n_rows + 1];
        let col_idx = Vec::new();
        let values = Vec::new();

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Creates an identity matrix of the given size
    ///
    /// # Panics
    ///
    /// Panics if `n` is not representable in the index type `I`.
    pub fn identity(n: usize) -> Self {
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);

        for i in 0..=n {
            row_ptr.push(I::from_usize(i));
        }

        for i in 0..n {
            col_idx.push(I::from_usize(i));
            values.push(T::one());
        }

        Self {
            n_rows: n,
            n_cols: n,
            row_ptr,
            col_idx,
            values,
        }
    }
}

impl<I: IndexType, T: fmt::Debug + Copy + Num> fmt::Debug for SparseMatrixCSR<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        // Print a sample of the matrix content
        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let range = self.row_range(i);

                if range.is_empty() {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(range.len());

                    for j in range.start..(range.start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j].index(), self.values[j])?;
                    }

                    if range.len() > max_elements {
                        write!(f, "... ({} more)", range.len() - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
