// Matrix data structures and the index-type abstraction

pub mod csr;

pub use csr::SparseMatrixCSR;

use sprs::SpIndex;

/// Index types usable for matrix, forest and factor indices
///
/// This is [`sprs::SpIndex`] (usize plus the fixed-width integer types)
/// narrowed with `Ord` so per-row index segments can be sorted. Conversions
/// go through `index()` / `from_usize()`; fallible paths use
/// `try_from_usize()` so narrow index types fail loudly instead of wrapping.
pub trait IndexType: SpIndex + Ord {}

impl<I: SpIndex + Ord> IndexType for I {}
