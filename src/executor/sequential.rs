//! Sequential executor: the reference realization of the dispatch contract
//!
//! Every method is a plain loop. The parallel backend is validated against
//! this one, so this implementation favors being obviously correct over
//! being fast.

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::matrix::IndexType;

/// Executor that processes rows one after another on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn for_each_row<I, F>(&self, out: &mut [I], op: F)
    where
        I: IndexType,
        F: Fn(usize) -> I + Send + Sync,
    {
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = op(row);
        }
    }

    fn for_each_row_segment<I, F>(&self, offsets: &[I], data: &mut [I], op: F)
    where
        I: IndexType,
        F: Fn(usize, &mut [I]) + Send + Sync,
    {
        let n_rows = offsets.len().saturating_sub(1);
        for row in 0..n_rows {
            let begin = offsets[row].index();
            let end = offsets[row + 1].index();
            op(row, &mut data[begin..end]);
        }
    }

    fn exclusive_prefix_sum<I>(&self, counts: &[I], ptrs: &mut [I]) -> Result<usize>
    where
        I: IndexType,
    {
        assert_eq!(ptrs.len(), counts.len() + 1, "ptrs.len() must be counts.len() + 1");

        let mut total = 0usize;
        for (count, ptr) in counts.iter().zip(ptrs.iter_mut()) {
            *ptr = I::try_from_usize(total).ok_or_else(|| Error::index_overflow::<I>(total))?;
            total += count.index();
        }
        ptrs[counts.len()] =
            I::try_from_usize(total).ok_or_else(|| Error::index_overflow::<I>(total))?;
        Ok(total)
    }
}
