//! Work partitioning policy for the parallel executor

/// Row partitioning policy for parallel dispatch
///
/// The schedule only shapes how rows are split into tasks; it never affects
/// the structural output of any pipeline step. A bad schedule costs time,
/// not correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSchedule {
    /// Minimum number of rows handed to one parallel task
    ///
    /// Raising this amortizes task overhead for cheap per-row work; lowering
    /// it improves load balance when row costs are skewed.
    pub min_rows_per_task: usize,

    /// Chunk size used by the two-pass parallel prefix sum
    pub prefix_chunk_rows: usize,
}

impl Default for RowSchedule {
    fn default() -> Self {
        Self {
            min_rows_per_task: 64,
            prefix_chunk_rows: 4096,
        }
    }
}

impl RowSchedule {
    /// Derives a schedule from the row count and the available cores
    ///
    /// Aims for a handful of tasks per core so rayon can balance skewed rows
    /// without drowning small problems in task overhead.
    pub fn for_rows(n_rows: usize) -> Self {
        let n_threads = num_cpus::get().max(1);
        let min_rows_per_task = (n_rows / (n_threads * 8)).max(1);
        Self {
            min_rows_per_task,
            ..Self::default()
        }
    }
}
