//! Async batch loader.
//!
//! * Handles **map-style** and **iterable** datasets transparently.
//! * Map-style order comes from a sampler: sequential, or shuffled
//!   without replacement when `opts.shuffle` is set.
//! * `num_workers` item fetches run concurrently; reassembly preserves
//!   the sampler's index order within and across batches.
//! * Yields `Result<Vec<Item>, DatasetError>` where each `Vec` is a
//!   batch; the final partial batch is kept unless `drop_last`.

use crate::data_loader::dataset::{Dataset, DatasetError};
use crate::data_loader::image_folder::{ImageBatch, ImageSample, collate};
use crate::data_loader::options::LoaderOptions;
use crate::data_loader::prefetch::spawn_prefetch;
use crate::data_loader::sampler::{Sampler, SequentialSampler, ShuffleSampler};

use async_stream::try_stream;
use futures_core::stream::Stream;
use futures_util::StreamExt;
use futures_util::stream;
use log::debug;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;

/// Stream of batches produced by a [`DataLoader`].
pub type BatchStream<T> =
    Pin<Box<dyn Stream<Item = Result<Vec<T>, DatasetError>> + Send + 'static>>;

/// High-level iterator that produces batched samples from a dataset.
pub struct DataLoader<D>
where
    D: Dataset,
{
    dataset: Arc<D>,
    opts: LoaderOptions,
}

impl<D> DataLoader<D>
where
    D: Dataset,
{
    /// Create a new loader owning its dataset.
    pub fn new(dataset: D, opts: LoaderOptions) -> Self {
        Self::from_arc(Arc::new(dataset), opts)
    }

    /// Create a new loader over a shared dataset. Several loaders (or
    /// epochs) can reuse one dataset this way without re-indexing.
    pub fn from_arc(dataset: Arc<D>, opts: LoaderOptions) -> Self {
        Self { dataset, opts }
    }

    /// The options this loader was built with.
    pub fn options(&self) -> &LoaderOptions {
        &self.opts
    }

    /// Return an **async stream** over the dataset that yields batches.
    /// One call is one full pass. Must be called within a tokio runtime
    /// when `opts.prefetch > 0`.
    ///
    /// ```ignore
    /// # use imgdlio::{DataLoader, LoaderOptions};
    /// # async fn demo<D: imgdlio::Dataset>(ds: D) -> anyhow::Result<()> {
    /// let loader = DataLoader::new(ds, LoaderOptions::default());
    /// let mut batches = loader.stream();
    /// while let Some(batch) = batches.next().await {
    ///     let items = batch?; // Vec<D::Item>
    ///     // training step ...
    /// }
    /// # Ok(()) }
    /// ```
    pub fn stream(self) -> BatchStream<D::Item> {
        let ds = self.dataset.clone();
        let opts = self.opts.clone();

        debug!(
            "loader pass: batch_size={} shuffle={} workers={} prefetch={}",
            opts.batch_size,
            opts.shuffle,
            opts.effective_workers(),
            opts.prefetch
        );

        let prefetch = opts.prefetch;
        let base: BatchStream<D::Item> = Box::pin(try_stream! {
            let bs = opts.batch_size;

            // -------- Iterable dataset -----------------------------------
            // Batched as delivered; sampling does not apply.
            if let Some(mut st) = ds.as_stream() {
                let mut acc = Vec::with_capacity(bs);
                while let Some(item) = st.next().await {
                    acc.push(item?);
                    if acc.len() == bs {
                        yield std::mem::take(&mut acc);
                    }
                }
                if !acc.is_empty() && !opts.drop_last {
                    yield acc;
                }
                return;
            }

            // -------- Map-style dataset -----------------------------------
            match ds.len() {
                Some(total) => {
                    let mut sampler: Box<dyn Sampler> = if opts.shuffle {
                        Box::new(ShuffleSampler::new(total, opts.seed))
                    } else {
                        Box::new(SequentialSampler::new(total))
                    };
                    let indices: Vec<usize> =
                        std::iter::from_fn(|| sampler.next_index()).collect();

                    // Up to `workers` gets in flight; `buffered` keeps
                    // completion order equal to index order.
                    let workers = opts.effective_workers().max(1);
                    let fetcher = ds.clone();
                    let mut fetched = stream::iter(indices)
                        .map(move |i| {
                            let ds = fetcher.clone();
                            async move { ds.get(i).await }
                        })
                        .buffered(workers);

                    let mut batch = Vec::with_capacity(bs);
                    while let Some(item) = fetched.next().await {
                        batch.push(item?);
                        if batch.len() == bs {
                            yield std::mem::take(&mut batch);
                        }
                    }
                    if !batch.is_empty() && !opts.drop_last {
                        yield batch;
                    }
                }
                None => {
                    // Unknown length - only sequential probing makes sense.
                    if opts.shuffle {
                        Err(DatasetError::Unsupported)?;
                    }
                    let mut index = 0usize;
                    loop {
                        let mut batch = Vec::with_capacity(bs);
                        for _ in 0..bs {
                            match ds.get(index).await {
                                Ok(item) => batch.push(item),
                                Err(DatasetError::IndexOutOfRange(_)) => {
                                    if !batch.is_empty() && !opts.drop_last {
                                        yield batch;
                                    }
                                    return;
                                }
                                Err(e) => Err(e)?,
                            }
                            index += 1;
                        }
                        yield batch;
                    }
                }
            }
        });

        if prefetch > 0 {
            let rx = spawn_prefetch(prefetch, base);
            Box::pin(ReceiverStream::new(rx))
        } else {
            base
        }
    }
}

impl<D> DataLoader<D>
where
    D: Dataset<Item = ImageSample>,
{
    /// Like [`Self::stream`], but collates each `Vec<ImageSample>` into
    /// a stacked [`ImageBatch`] of `(images, labels)` arrays.
    pub fn batches(
        self,
    ) -> Pin<Box<dyn Stream<Item = Result<ImageBatch, DatasetError>> + Send + 'static>> {
        Box::pin(self.stream().map(|r| r.and_then(collate)))
    }
}

impl<D> std::fmt::Debug for DataLoader<D>
where
    D: Dataset,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoader")
            .field("batch_size", &self.opts.batch_size)
            .field("shuffle", &self.opts.shuffle)
            .finish()
    }
}
