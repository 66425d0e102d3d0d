//! Parallel executor built on rayon
//!
//! Rows are dispatched to rayon tasks in blocks shaped by a [`RowSchedule`].
//! All structural output is required to match the sequential executor
//! exactly: rows never share mutable state, per-row output slices are
//! disjoint, and the prefix sum is a deterministic two-pass scan, so the
//! partitioning never leaks into the results.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::executor::{split_row_segments, Executor, RowSchedule};
use crate::matrix::IndexType;

/// Executor that processes row blocks on the rayon thread pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelExecutor {
    schedule: RowSchedule,
}

impl ParallelExecutor {
    /// Creates a parallel executor with the default schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parallel executor with an explicit partitioning policy
    pub fn with_schedule(schedule: RowSchedule) -> Self {
        Self { schedule }
    }

    /// The partitioning policy in use
    pub fn schedule(&self) -> RowSchedule {
        self.schedule
    }
}

impl Executor for ParallelExecutor {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn for_each_row<I, F>(&self, out: &mut [I], op: F)
    where
        I: IndexType,
        F: Fn(usize) -> I + Send + Sync,
    {
        out.par_iter_mut()
            .enumerate()
            .with_min_len(self.schedule.min_rows_per_task.max(1))
            .for_each(|(row, slot)| *slot = op(row));
    }

    fn for_each_row_segment<I, F>(&self, offsets: &[I], data: &mut [I], op: F)
    where
        I: IndexType,
        F: Fn(usize, &mut [I]) + Send + Sync,
    {
        split_row_segments(offsets, data)
            .into_par_iter()
            .enumerate()
            .with_min_len(self.schedule.min_rows_per_task.max(1))
            .for_each(|(row, segment)| op(row, segment));
    }

    fn exclusive_prefix_sum<I>(&self, counts: &[I], ptrs: &mut [I]) -> Result<usize>
    where
        I: IndexType,
    {
        assert_eq!(ptrs.len(), counts.len() + 1, "ptrs.len() must be counts.len() + 1");

        let chunk = self.schedule.prefix_chunk_rows.max(1);

        // pass 1: per-chunk totals
        let chunk_sums: Vec<usize> = counts
            .par_chunks(chunk)
            .map(|c| c.iter().map(|count| count.index()).sum())
            .collect();

        // sequential scan over the (few) chunk totals
        let mut chunk_bases = Vec::with_capacity(chunk_sums.len());
        let mut total = 0usize;
        for &sum in &chunk_sums {
            chunk_bases.push(total);
            total += sum;
        }
        // one representability check covers every intermediate offset
        I::try_from_usize(total).ok_or_else(|| Error::index_overflow::<I>(total))?;

        // pass 2: fill each chunk from its base
        ptrs[..counts.len()]
            .par_chunks_mut(chunk)
            .zip(counts.par_chunks(chunk))
            .zip(chunk_bases.par_iter())
            .for_each(|((ptr_chunk, count_chunk), &base)| {
                let mut running = base;
                for (ptr, count) in ptr_chunk.iter_mut().zip(count_chunk) {
                    *ptr = I::from_usize(running);
                    running += count.index();
                }
            });
        ptrs[counts.len()] = I::from_usize(total);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SequentialExecutor;

    #[test]
    fn test_matches_sequential_prefix_sum() {
        let counts: Vec<usize> = (0..1000).map(|i| (i * 7 + 3) % 13).collect();

        let mut seq_ptrs = vec![0usize; counts.len() + 1];
        let seq_total = SequentialExecutor
            .exclusive_prefix_sum(&counts, &mut seq_ptrs)
            .unwrap();

        // force several chunks
        let exec = ParallelExecutor::with_schedule(RowSchedule {
            prefix_chunk_rows: 64,
            ..RowSchedule::default()
        });
        let mut par_ptrs = vec![0usize; counts.len() + 1];
        let par_total = exec.exclusive_prefix_sum(&counts, &mut par_ptrs).unwrap();

        assert_eq!(seq_total, par_total);
        assert_eq!(seq_ptrs, par_ptrs);
    }

    #[test]
    fn test_prefix_sum_overflow_detected() {
        let exec = ParallelExecutor::new();
        let counts: Vec<i16> = vec![i16::MAX; 2];
        let mut ptrs = vec![0i16; 3];
        assert!(exec.exclusive_prefix_sum(&counts, &mut ptrs).is_err());
    }

    #[test]
    fn test_row_segments_disjoint_writes() {
        let exec = ParallelExecutor::new();
        let offsets: Vec<usize> = vec![0, 3, 3, 4, 10];
        let mut data = vec![0usize; 10];
        exec.for_each_row_segment(&offsets, &mut data, |row, seg| {
            for slot in seg.iter_mut() {
                *slot = row + 1;
            }
        });
        assert_eq!(data, vec![1, 1, 1, 3, 4, 4, 4, 4, 4, 4]);
    }
}
