//! Core dataset abstractions for imgdlio's data-loader layer.
//!
//! A [`Dataset`] is a logical collection of samples. Map-style datasets
//! support random access through [`Dataset::get`] and report their
//! length; iterable-only datasets deliver data solely via `as_stream`.

use async_trait::async_trait;
use futures_core::stream::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;
use anyhow::{self, Error as AnyError};

/// A boxed, pinned, sendable async stream of fallible items.
pub type DynStream<T> =
    Pin<Box<dyn Stream<Item = Result<T, DatasetError>> + Send + 'static>>;

/// Item-level error type for dataset & loader operations.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("index out of range: {0}")]
    IndexOutOfRange(usize),

    #[error("operation not supported for this dataset type")]
    Unsupported,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("setup required: {0}")]
    Setup(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image decode error at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error(transparent)]
    Transform(#[from] crate::transform::TransformError),

    #[error(transparent)]
    Backend(#[from] AnyError),
}

impl From<String> for DatasetError {
    fn from(s: String) -> Self {
        DatasetError::Backend(AnyError::msg(s))
    }
}

impl From<&str> for DatasetError {
    fn from(s: &str) -> Self {
        DatasetError::Backend(AnyError::msg(s.to_string()))
    }
}

/// A logical collection of **samples** (e.g. decoded images of an
/// image-folder tree, rows of an in-memory table).
///
/// Implementors fall into two broad categories:
///
/// * **Map-style** – support random access through [`Dataset::get`];
///   `len()` normally returns `Some(_)`.
/// * **Iterable** – deliver data solely via `as_stream`; `len()` often
///   returns `None`.
#[async_trait]
pub trait Dataset: Send + Sync + 'static {
    /// Concrete Rust type produced for each sample. For an image
    /// pipeline this is typically [`crate::ImageSample`]; simpler
    /// datasets may yield scalars or raw byte buffers.
    type Item: Send + 'static;

    /// Total number of samples if known *a priori*; otherwise `None`.
    fn len(&self) -> Option<usize>;

    /// Retrieve a sample by zero-based index. Iterable-only datasets may
    /// return `DatasetError::Unsupported`.
    async fn get(&self, index: usize) -> Result<Self::Item, DatasetError>;

    /// Provide an async stream of samples if the dataset is iterable.
    /// Map-style datasets can simply keep the default (`None`).
    fn as_stream(&self) -> Option<DynStream<Self::Item>> {
        None
    }

    /// Convenience helper.
    fn is_empty(&self) -> bool {
        self.len().map(|n| n == 0).unwrap_or(false)
    }
}
