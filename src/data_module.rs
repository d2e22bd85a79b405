// src/data_module.rs

//! Orchestration of the train/validation split: dataset construction
//! and loader factories.

use crate::config::DataModuleConfig;
use crate::data_loader::{DataLoader, Dataset, DatasetError, ImageFolderDataset, LoaderOptions};
use crate::transform::{ImageTransform, TransformPipeline};
use log::info;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Owns the train and validation datasets and hands out batch loaders.
///
/// Datasets are built lazily by [`DataModule::setup`], not at
/// construction time, so a module can be configured long before the
/// data directories need to exist.
pub struct DataModule {
    cfg: DataModuleConfig,
    train_transform: Option<Arc<dyn ImageTransform>>,
    val_transform: Option<Arc<dyn ImageTransform>>,
    train_set: Option<Arc<ImageFolderDataset>>,
    val_set: Option<Arc<ImageFolderDataset>>,
    pass_count: AtomicU64,
}

impl DataModule {
    /// Create a module from a validated config and optional transforms.
    ///
    /// When a transform is `None`, `setup` falls back to the default
    /// pipeline for that split ([`TransformPipeline::train_default`] /
    /// [`TransformPipeline::val_default`]).
    pub fn new(
        cfg: DataModuleConfig,
        train_transform: Option<Arc<dyn ImageTransform>>,
        val_transform: Option<Arc<dyn ImageTransform>>,
    ) -> Result<Self, DatasetError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            train_transform,
            val_transform,
            train_set: None,
            val_set: None,
            pass_count: AtomicU64::new(0),
        })
    }

    /// Build the train and validation datasets. A missing class folder
    /// fails here, not at first batch.
    pub fn setup(&mut self) -> Result<(), DatasetError> {
        let train_t = self
            .train_transform
            .clone()
            .unwrap_or_else(|| Arc::new(TransformPipeline::train_default()));
        let val_t = self
            .val_transform
            .clone()
            .unwrap_or_else(|| Arc::new(TransformPipeline::val_default()));

        let train = ImageFolderDataset::new(&self.cfg.train_paths(), Some(train_t))?;
        let val = ImageFolderDataset::new(&self.cfg.val_paths(), Some(val_t))?;

        info!(
            "data module ready: {} train / {} val examples, {} classes",
            train.len().unwrap_or(0),
            val.len().unwrap_or(0),
            self.cfg.num_classes()
        );

        self.train_set = Some(Arc::new(train));
        self.val_set = Some(Arc::new(val));
        Ok(())
    }

    /// Shuffled loader over the training set. Each call is a fresh
    /// pass: with a configured seed the order is reproducible but still
    /// differs per pass, without one it is freshly random.
    pub fn train_loader(&self) -> Result<DataLoader<ImageFolderDataset>, DatasetError> {
        let ds = self
            .train_set
            .clone()
            .ok_or_else(|| DatasetError::Setup("call setup() before train_loader()".into()))?;
        let pass = self.pass_count.fetch_add(1, Ordering::Relaxed);
        let seed = match self.cfg.seed {
            Some(s) => s.wrapping_add(pass),
            None => rand::rng().random(),
        };
        let opts = LoaderOptions::default()
            .with_batch_size(self.cfg.batch_size)
            .shuffle(true, seed)
            .num_workers(self.cfg.num_workers);
        Ok(DataLoader::from_arc(ds, opts))
    }

    /// Sequential (unshuffled) loader over the validation set.
    pub fn val_loader(&self) -> Result<DataLoader<ImageFolderDataset>, DatasetError> {
        let ds = self
            .val_set
            .clone()
            .ok_or_else(|| DatasetError::Setup("call setup() before val_loader()".into()))?;
        let opts = LoaderOptions::default()
            .with_batch_size(self.cfg.batch_size)
            .num_workers(self.cfg.num_workers);
        Ok(DataLoader::from_arc(ds, opts))
    }

    /// The training dataset, if `setup` has run.
    pub fn train_set(&self) -> Option<&Arc<ImageFolderDataset>> {
        self.train_set.as_ref()
    }

    /// The validation dataset, if `setup` has run.
    pub fn val_set(&self) -> Option<&Arc<ImageFolderDataset>> {
        self.val_set.as_ref()
    }

    /// The configuration this module was built with.
    pub fn config(&self) -> &DataModuleConfig {
        &self.cfg
    }
}

impl std::fmt::Debug for DataModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataModule")
            .field("config", &self.cfg)
            .field("is_setup", &self.train_set.is_some())
            .finish()
    }
}
