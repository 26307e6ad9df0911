//! Batch sorting strategies.
//!
//! Both strategies take a read-only [`Batch`] and produce a [`Processed`] result where
//! `sorted_arrays[i]` is the ascending sort of `batch[i]`. The caller's arrays are never mutated;
//! every sort works on its own copy.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::task::JoinSet;

/// One request's worth of integer arrays.
pub type Batch = Vec<Vec<i64>>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Output of a strategy run.
pub struct Processed {
    pub sorted_arrays: Batch,
    /// Wall-clock time from the start of processing until the last sort finished.
    pub elapsed: Duration,
}

impl Processed {
    /// Elapsed time in nanoseconds, saturating at `u64::MAX`.
    pub fn time_ns(&self) -> u64 {
        u64::try_from(self.elapsed.as_nanos()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How a batch is executed.
pub enum Strategy {
    /// One array after the other on a single thread.
    Sequential,
    /// One blocking-pool task per array, joined before returning.
    Concurrent,
}

impl Strategy {
    /// HTTP route serving this strategy.
    pub fn route(self) -> &'static str {
        match self {
            Self::Sequential => "/process-single",
            Self::Concurrent => "/process-concurrent",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Concurrent => "concurrent",
        }
    }

    /// Run the strategy over `batch`.
    ///
    /// The sequential path is a plain synchronous function; it is moved onto the blocking pool so
    /// large batches don't stall the async workers. Its timing is still taken inside
    /// [`process_sequential`], so the hop is not counted.
    pub async fn run(self, batch: Arc<Batch>) -> anyhow::Result<Processed> {
        match self {
            Self::Sequential => {
                Ok(tokio::task::spawn_blocking(move || process_sequential(&batch)).await?)
            }
            Self::Concurrent => process_concurrent(batch).await,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

fn sorted_copy(array: &[i64]) -> Vec<i64> {
    let mut sorted = array.to_vec();
    sorted.sort_unstable();
    sorted
}

/// Sort every array of `batch` in order on the calling thread.
pub fn process_sequential(batch: &[Vec<i64>]) -> Processed {
    let started = Instant::now();
    let sorted_arrays = batch.iter().map(|array| sorted_copy(array)).collect();
    Processed {
        sorted_arrays,
        elapsed: started.elapsed(),
    }
}

/// Sort every array of `batch` on its own blocking-pool task.
///
/// Tasks hand `(index, sorted)` back to this function, which is the only writer of the result
/// slots, so completion order never affects the output. Returns once all `batch.len()` tasks have
/// been joined. The only error is a task that panicked.
pub async fn process_concurrent(batch: Arc<Batch>) -> anyhow::Result<Processed> {
    let started = Instant::now();

    let mut tasks = JoinSet::new();
    for idx in 0..batch.len() {
        let batch = Arc::clone(&batch);
        tasks.spawn_blocking(move || (idx, sorted_copy(&batch[idx])));
    }

    let mut slots: Vec<Option<Vec<i64>>> = vec![None; batch.len()];
    while let Some(joined) = tasks.join_next().await {
        let (idx, sorted) = joined?;
        slots[idx] = Some(sorted);
    }
    let elapsed = started.elapsed();

    Ok(Processed {
        sorted_arrays: slots.into_iter().flatten().collect(),
        elapsed,
    })
}
