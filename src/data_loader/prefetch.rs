//! Prefetch helper for the data loader.
//!
//! Forwards a batch stream through a bounded channel so that up to
//! `cap` ready batches sit ahead of the consumer. Must be called from
//! within a tokio runtime.

use crate::data_loader::DatasetError;
use futures_core::stream::Stream;
use futures_util::StreamExt;
use tokio::sync::mpsc::{Receiver, channel};

/// Spawn an async prefetcher over `src`.
///
/// The returned `Receiver` yields the stream's items with up to `cap`
/// in flight. Production stops at the first error or when the receiver
/// is dropped.
pub fn spawn_prefetch<T, S>(cap: usize, mut src: S) -> Receiver<Result<T, DatasetError>>
where
    S: Stream<Item = Result<T, DatasetError>> + Send + Unpin + 'static,
    T: Send + 'static,
{
    let (tx, rx) = channel(cap.max(1));
    tokio::spawn(async move {
        while let Some(item) = src.next().await {
            let stop = item.is_err();
            if tx.send(item).await.is_err() {
                break;
            }
            if stop {
                break;
            }
        }
    });
    rx
}
