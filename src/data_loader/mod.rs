// src/data_loader/mod.rs

//! Public API surface for the imgdlio data_loader layer.

pub mod dataloader;
pub mod dataset;
pub mod image_folder;
pub mod options;
pub mod prefetch;
pub mod sampler;

// Re-export the key types at this level:
pub use dataloader::{BatchStream, DataLoader};
pub use dataset::{Dataset, DatasetError, DynStream};
pub use image_folder::{ImageBatch, ImageFolderDataset, ImageSample, collate};
pub use options::LoaderOptions;
pub use sampler::{Sampler, SequentialSampler, ShuffleSampler};
