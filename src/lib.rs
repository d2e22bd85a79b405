// src/lib.rs
//
// Crate root — public re-exports.

//! imgdlio: an async image-classification data pipeline.
//!
//! Folders of images become a map-style [`Dataset`] (folder position =
//! class label), a [`TransformPipeline`] turns decoded images into
//! model-ready tensors, and a [`DataLoader`] batches them with
//! shuffling and parallel prefetch. [`DataModule`] ties a
//! train/validation split together behind one config.

pub mod config;
pub mod constants;
pub mod data_loader;
pub mod data_module;
pub mod transform;

pub use config::DataModuleConfig;
pub use data_loader::{
    BatchStream, DataLoader, Dataset, DatasetError, DynStream, ImageBatch, ImageFolderDataset,
    ImageSample, LoaderOptions, collate,
};
pub use data_module::DataModule;
pub use transform::{ImageTransform, TransformError, TransformPipeline};
