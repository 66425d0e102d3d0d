//! End-to-end tests for the symbolic Cholesky pipeline

use cholsym::{symbolic_cholesky, Error, SequentialExecutor, SparseMatrixCSR};

/// Builds a structural matrix (all values 1.0) from its pattern
fn structural(n: usize, row_ptr: Vec<usize>, col_idx: Vec<usize>) -> SparseMatrixCSR<usize, f64> {
    let nnz = col_idx.len();
    SparseMatrixCSR::new(n, n, row_ptr, col_idx, vec![1.0; nnz])
}

/// Reference oracle: symbolic right-looking Cholesky on a dense boolean
/// lower triangle. Eliminating column k fills (i, j) for every pair of
/// rows i >= j below k in column k's pattern.
fn dense_symbolic_cholesky(mtx: &SparseMatrixCSR<usize, f64>) -> Vec<Vec<usize>> {
    let n = mtx.n_rows;
    let mut lower = vec![vec![false; n]; n];
    for i in 0..n {
        lower[i][i] = true;
        for (j, _) in mtx.row_iter(i) {
            if j < i {
                lower[i][j] = true;
            } else if j > i {
                lower[j][i] = true;
            }
        }
    }
    for k in 0..n {
        let below: Vec<usize> = (k + 1..n).filter(|&i| lower[i][k]).collect();
        for (a, &i) in below.iter().enumerate() {
            for &j in &below[..=a] {
                lower[i][j] = true;
            }
        }
    }
    (0..n)
        .map(|i| (0..=i).filter(|&j| lower[i][j]).collect())
        .collect()
}

#[test]
fn test_empty_matrix_returns_immediately() {
    let mtx = SparseMatrixCSR::<usize, f64>::zeros(0, 0);
    let symbolic = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();

    assert!(symbolic.row_nnz.is_empty());
    assert!(symbolic.forest.is_empty());
    assert_eq!(symbolic.factor.n_rows, 0);
    assert_eq!(symbolic.factor.nnz(), 0);
}

#[test]
fn test_pure_diagonal_factors_into_itself() {
    let mtx = SparseMatrixCSR::<usize, f64>::identity(5);
    let symbolic = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();

    // five isolated roots, no fill
    assert_eq!(symbolic.forest.len(), 5);
    assert!((0..5).all(|rank| symbolic.forest.is_root(rank)));
    assert_eq!(symbolic.row_nnz, vec![1, 1, 1, 1, 1]);
    assert_eq!(symbolic.factor.row_ptr, mtx.row_ptr);
    assert_eq!(symbolic.factor.col_idx, mtx.col_idx);
}

#[test]
fn test_arrowhead_scenario() {
    let mtx = structural(4, vec![0, 1, 2, 3, 7], vec![0, 1, 2, 0, 1, 2, 3]);
    let symbolic = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();

    // every node's parent is row 3
    assert_eq!(symbolic.forest.postorder_parents, vec![3, 3, 3, 4]);
    assert_eq!(symbolic.row_nnz, vec![1, 1, 1, 4]);
}

#[test]
fn test_tridiagonal_has_no_fill() {
    // lower part of a 5x5 tridiagonal matrix
    let mtx = structural(
        5,
        vec![0, 1, 3, 5, 7, 9],
        vec![0, 0, 1, 1, 2, 2, 3, 3, 4],
    );
    let symbolic = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();

    assert_eq!(symbolic.row_nnz, vec![1, 2, 2, 2, 2]);
    assert_eq!(symbolic.factor.col_idx, mtx.col_idx);
    assert_eq!(symbolic.factor.row_ptr, mtx.row_ptr);
}

#[test]
fn test_fill_in_matches_dense_oracle() {
    // two chains merging under a shared root, plus a detached row
    let mtx = structural(
        7,
        vec![0, 1, 2, 4, 6, 9, 11, 12],
        vec![0, 1, 0, 2, 1, 3, 2, 3, 4, 0, 5, 6],
    );
    let symbolic = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();
    let oracle = dense_symbolic_cholesky(&mtx);

    for row in 0..7 {
        assert_eq!(symbolic.row_nnz[row], oracle[row].len(), "row {}", row);
        let begin = symbolic.factor.row_ptr[row];
        let end = symbolic.factor.row_ptr[row + 1];
        let mut emitted: Vec<usize> = symbolic.factor.col_idx[begin..end].to_vec();
        emitted.sort_unstable();
        assert_eq!(emitted, oracle[row], "row {}", row);
    }
}

#[test]
fn test_factor_values_are_zeroed_for_numeric_phase() {
    let mtx = structural(4, vec![0, 1, 2, 3, 7], vec![0, 1, 2, 0, 1, 2, 3]);
    let symbolic = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();

    assert_eq!(symbolic.factor.values.len(), symbolic.factor.nnz());
    assert!(symbolic.factor.values.iter().all(|&v| v == 0.0));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let mtx = structural(
        6,
        vec![0, 1, 2, 4, 6, 9, 11],
        vec![0, 1, 0, 2, 1, 3, 2, 3, 4, 0, 5],
    );

    let first = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();
    let second = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap();

    assert_eq!(first.forest, second.forest);
    assert_eq!(first.row_nnz, second.row_nnz);
    assert_eq!(first.factor.row_ptr, second.factor.row_ptr);
    assert_eq!(first.factor.col_idx, second.factor.col_idx);
}

#[test]
fn test_non_square_rejected() {
    let mtx = SparseMatrixCSR::<usize, f64>::zeros(3, 4);
    let err = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap_err();
    assert_eq!(
        err,
        Error::DimensionMismatch {
            n_rows: 3,
            n_cols: 4
        }
    );
}

#[test]
fn test_scratch_overflow_rejected() {
    // 1000 rows of i16-indexed data whose nnz fits the index type but whose
    // scratch requirement nnz + n does not: rows 0..32 hold only their
    // diagonal, every later row holds its 32 nearest lower neighbors plus
    // the diagonal. nnz = 32 + 968 * 33 = 31976, nnz + n = 32976 > i16::MAX.
    let n: usize = 1000;
    let mut row_ptr: Vec<i16> = Vec::with_capacity(n + 1);
    let mut col_idx: Vec<i16> = Vec::new();
    row_ptr.push(0);
    for i in 0..n {
        if i >= 32 {
            for j in (i - 32)..i {
                col_idx.push(j as i16);
            }
        }
        col_idx.push(i as i16);
        row_ptr.push(col_idx.len() as i16);
    }
    let nnz = col_idx.len();
    assert_eq!(nnz, 31_976);
    let mtx = SparseMatrixCSR::<i16, f64>::new(n, n, row_ptr, col_idx, vec![1.0; nnz]);

    let err = symbolic_cholesky(&mtx, &SequentialExecutor).unwrap_err();
    assert!(matches!(err, Error::IndexOverflow { required: 32_976, .. }));
}
