//! Batched Concurrent Execution
//!
//! Generic bounded-concurrency task runner: partitions the input into
//! consecutive chunks, runs every task of a chunk concurrently, and only
//! starts the next chunk once the current one has fully resolved. Output
//! order equals input order regardless of completion order.
//!
//! Failure policy is fail-fast: one rejecting task fails its chunk's wait
//! and the whole run, and later chunks are never started. Callers that need
//! partial tolerance catch failures inside the processor and encode them as
//! values.

use std::future::Future;

use tracing::debug;

/// Run `processor` over `items` with at most `batch_size` tasks in flight.
///
/// `on_batch_start` is invoked before each chunk with the 1-based chunk
/// index and the total chunk count. The processor receives each item with
/// its original index. A `batch_size` of zero is treated as one.
pub async fn process_in_batches<T, R, E, P, Fut, C>(
    items: Vec<T>,
    batch_size: usize,
    mut on_batch_start: C,
    processor: P,
) -> Result<Vec<R>, E>
where
    P: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    C: FnMut(usize, usize),
{
    let batch_size = batch_size.max(1);
    let total_batches = items.len().div_ceil(batch_size);
    let mut results = Vec::with_capacity(items.len());

    let mut remaining = items.into_iter().enumerate().peekable();
    let mut batch_index = 0;

    while remaining.peek().is_some() {
        batch_index += 1;
        on_batch_start(batch_index, total_batches);

        let chunk: Vec<(usize, T)> = remaining.by_ref().take(batch_size).collect();
        debug!(
            batch = batch_index,
            total = total_batches,
            size = chunk.len(),
            "batch: starting chunk"
        );

        // All futures of the chunk are created before any is awaited; the
        // first rejection abandons the chunk and everything after it.
        let chunk_futures = chunk
            .into_iter()
            .map(|(index, item)| processor(item, index));
        let chunk_results = futures_util::future::try_join_all(chunk_futures).await?;
        results.extend(chunk_results);
    }

    Ok(results)
}
