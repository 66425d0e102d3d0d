//! Elimination forest construction and postorder numbering
//!
//! The elimination forest encodes, for every row of a symmetric sparse
//! matrix, the next row its elimination contributes fill-in to. The symbolic
//! factorization traversals run entirely in postorder rank space, so the
//! forest is built once per factorization and stored as three flat index
//! arrays rather than linked nodes: every traversal downstream becomes a
//! bounded array walk.

use num_traits::Num;

use crate::error::{Error, Result};
use crate::matrix::{IndexType, SparseMatrixCSR};

/// Elimination forest of a symmetric sparse matrix, in postorder rank space
///
/// All three arrays have one entry per matrix row. `postorder` maps a
/// postorder rank to the original row index and `inv_postorder` is its
/// inverse. `postorder_parents[rank]` is the postorder rank of the node's
/// parent, or the sentinel `len()` for forest roots.
///
/// Invariant: `postorder_parents[rank] > rank` for every non-root node — a
/// node is always eliminated strictly before its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EliminationForest<I> {
    /// Postorder rank -> original row index (a permutation of `[0, n)`)
    pub postorder: Vec<I>,

    /// Original row index -> postorder rank
    pub inv_postorder: Vec<I>,

    /// Postorder rank -> parent's postorder rank, or `len()` for roots
    pub postorder_parents: Vec<I>,
}

impl<I: IndexType> EliminationForest<I> {
    /// Creates the forest over zero rows
    pub fn empty() -> Self {
        Self {
            postorder: Vec::new(),
            inv_postorder: Vec::new(),
            postorder_parents: Vec::new(),
        }
    }

    /// Number of nodes (= rows of the matrix the forest was built from)
    pub fn len(&self) -> usize {
        self.postorder.len()
    }

    /// Returns true if the forest has no nodes
    pub fn is_empty(&self) -> bool {
        self.postorder.is_empty()
    }

    /// The parent sentinel marking forest roots
    pub fn root_sentinel(&self) -> usize {
        self.len()
    }

    /// Returns true if the node at `rank` is a forest root
    pub fn is_root(&self, rank: usize) -> bool {
        self.postorder_parents[rank].index() == self.root_sentinel()
    }
}

/// Computes the elimination forest of a square symmetric sparse matrix
///
/// Rows are processed in increasing order; for every strictly-lower nonzero
/// (row, col) the current ancestor chain of `col` is followed, with path
/// compression, until an unset ancestor is found, whose parent becomes
/// `row`. Total work is O(nnz · α(n)). Parent pointers are then re-expressed
/// in postorder rank space via an iterative depth-first traversal.
///
/// The traversal visits roots and siblings in increasing original row index,
/// so the postorder numbering is reproducible across runs and backends.
///
/// Only the lower triangle of the matrix is inspected; entries on or above
/// the diagonal are ignored.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if the matrix is not square
/// - [`Error::IndexOverflow`] if the node count (used as root sentinel) is
///   not representable in `I`
pub fn compute_elimination_forest<I, T>(
    mtx: &SparseMatrixCSR<I, T>,
) -> Result<EliminationForest<I>>
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
    let n = mtx.n_rows;
    // the sentinel value n must itself fit in the index type
    I::try_from_usize(n).ok_or_else(|| Error::index_overflow::<I>(n))?;
    if n == 0 {
        return Ok(EliminationForest::empty());
    }

    // Parent pointers in original numbering, sentinel n for roots.
    // `ancestors` is the path-compressed union-find-like structure: it tracks,
    // for every node, the root of the subtree it currently belongs to, and is
    // overwritten with `row` as chains are traversed so repeated walks from
    // the same subtree terminate early.
    let mut parents = vec![n; n];
    let mut ancestors = vec![n; n];

    for row in 0..n {
        for nz in mtx.row_range(row) {
            let col = mtx.col_idx[nz].index();
            if col >= row {
                continue;
            }
            let mut node = col;
            while ancestors[node] != n && ancestors[node] != row {
                let next = ancestors[node];
                ancestors[node] = row;
                node = next;
            }
            if ancestors[node] == n {
                ancestors[node] = row;
                parents[node] = row;
            }
        }
    }

    Ok(postorder_forest(&parents))
}

/// Builds the postordered forest representation from original-numbering
/// parent pointers (sentinel `n` for roots)
fn postorder_forest<I: IndexType>(parents: &[usize]) -> EliminationForest<I> {
    let n = parents.len();

    // Child adjacency in CSR form. Rows are scanned in increasing order, so
    // each node's child list comes out sorted by original row index, which
    // fixes the traversal order for nodes with multiple children.
    let mut child_ptr = vec![0usize; n + 1];
    for &parent in parents {
        if parent != n {
            child_ptr[parent + 1] += 1;
        }
    }
    for i in 0..n {
        child_ptr[i + 1] += child_ptr[i];
    }
    let mut next_slot = child_ptr.clone();
    let mut children = vec![0usize; child_ptr[n]];
    for (node, &parent) in parents.iter().enumerate() {
        if parent != n {
            children[next_slot[parent]] = node;
            next_slot[parent] += 1;
        }
    }

    // Iterative postorder DFS: children before parents, roots in increasing
    // original index.
    let mut postorder = Vec::with_capacity(n);
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for root in 0..n {
        if parents[root] != n {
            continue;
        }
        stack.push((root, 0));
        while let Some(top) = stack.last_mut() {
            let (node, visited) = *top;
            let degree = child_ptr[node + 1] - child_ptr[node];
            if visited < degree {
                top.1 += 1;
                stack.push((children[child_ptr[node] + visited], 0));
            } else {
                postorder.push(node);
                stack.pop();
            }
        }
    }
    debug_assert_eq!(postorder.len(), n);

    let mut inv_postorder = vec![0usize; n];
    for (rank, &node) in postorder.iter().enumerate() {
        inv_postorder[node] = rank;
    }

    let postorder_parents: Vec<I> = postorder
        .iter()
        .map(|&node| {
            let parent = parents[node];
            if parent == n {
                I::from_usize(n)
            } else {
                I::from_usize(inv_postorder[parent])
            }
        })
        .collect();

    // every non-root parent rank is strictly larger than the child's rank
    debug_assert!(postorder_parents
        .iter()
        .enumerate()
        .all(|(rank, parent)| parent.index() > rank));

    EliminationForest {
        postorder: postorder.into_iter().map(I::from_usize).collect(),
        inv_postorder: inv_postorder.into_iter().map(I::from_usize).collect(),
        postorder_parents,
    }
}
