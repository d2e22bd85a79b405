// src/config.rs
//
// Explicit configuration for the data module. The husky/wolf folder
// layout is only the default; every path, the batch size and the
// worker count are overridable.

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_NUM_WORKERS, DEFAULT_TRAIN_FOLDERS, DEFAULT_VAL_FOLDERS,
};
use crate::data_loader::DatasetError;
use std::path::{Path, PathBuf};

/// Configuration for a [`crate::DataModule`].
///
/// Folder lists are ordered: a folder's position is its class label,
/// for both splits. Train and validation folder lists must therefore
/// have the same length.
#[derive(Debug, Clone)]
pub struct DataModuleConfig {
    /// Directory the class folders live under.
    pub base_dir: PathBuf,
    /// Training class folders, in label order.
    pub train_folders: Vec<String>,
    /// Validation class folders, in label order.
    pub val_folders: Vec<String>,
    /// Samples per batch.
    pub batch_size: usize,
    /// Parallel fetch workers per loader. `0` means auto (CPU count).
    pub num_workers: usize,
    /// Shuffle seed. `None` draws a fresh seed per training pass, so
    /// successive epochs see different orders; `Some` gives
    /// reproducible runs.
    pub seed: Option<u64>,
}

impl Default for DataModuleConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            train_folders: DEFAULT_TRAIN_FOLDERS.iter().map(|s| s.to_string()).collect(),
            val_folders: DEFAULT_VAL_FOLDERS.iter().map(|s| s.to_string()).collect(),
            batch_size: DEFAULT_BATCH_SIZE,
            num_workers: DEFAULT_NUM_WORKERS,
            seed: None,
        }
    }
}

impl DataModuleConfig {
    /// Builder-style helper: set the base directory.
    pub fn with_base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_dir = dir.as_ref().to_owned();
        self
    }

    /// Builder-style helper: set the training class folders (label order).
    pub fn with_train_folders<S: Into<String>>(mut self, folders: Vec<S>) -> Self {
        self.train_folders = folders.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper: set the validation class folders (label order).
    pub fn with_val_folders<S: Into<String>>(mut self, folders: Vec<S>) -> Self {
        self.val_folders = folders.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper: set the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Builder-style helper: set the worker count (`0` = auto).
    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    /// Builder-style helper: fix the shuffle seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration before any filesystem work happens.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.batch_size == 0 {
            return Err(DatasetError::InvalidConfig(
                "batch_size must be positive".into(),
            ));
        }
        if self.train_folders.len() < 2 {
            return Err(DatasetError::InvalidConfig(format!(
                "need at least 2 train class folders, got {}",
                self.train_folders.len()
            )));
        }
        if self.val_folders.len() != self.train_folders.len() {
            return Err(DatasetError::InvalidConfig(format!(
                "train and val label spaces differ: {} vs {} folders",
                self.train_folders.len(),
                self.val_folders.len()
            )));
        }
        Ok(())
    }

    /// Absolute-ish paths of the training class folders, label order.
    pub fn train_paths(&self) -> Vec<PathBuf> {
        self.train_folders.iter().map(|f| self.base_dir.join(f)).collect()
    }

    /// Absolute-ish paths of the validation class folders, label order.
    pub fn val_paths(&self) -> Vec<PathBuf> {
        self.val_folders.iter().map(|f| self.base_dir.join(f)).collect()
    }

    /// Number of classes (same for both splits once validated).
    pub fn num_classes(&self) -> usize {
        self.train_folders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_and_binary() {
        let cfg = DataModuleConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.num_classes(), 2);
        assert_eq!(cfg.train_folders, vec!["husky_train", "wolf_train"]);
        assert_eq!(cfg.val_folders, vec!["husky_test", "wolf_test"]);
    }

    #[test]
    fn zero_batch_size_rejected() {
        let err = DataModuleConfig::default().with_batch_size(0).validate().unwrap_err();
        assert!(matches!(err, DatasetError::InvalidConfig(_)));
    }

    #[test]
    fn single_class_rejected() {
        let err = DataModuleConfig::default()
            .with_train_folders(vec!["only"])
            .with_val_folders(vec!["only"])
            .validate()
            .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidConfig(_)));
    }

    #[test]
    fn mismatched_label_spaces_rejected() {
        let err = DataModuleConfig::default()
            .with_train_folders(vec!["a", "b", "c"])
            .with_val_folders(vec!["a", "b"])
            .validate()
            .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidConfig(_)));
    }

    #[test]
    fn paths_join_base_dir_in_label_order() {
        let cfg = DataModuleConfig::default().with_base_dir("/data/pets");
        let paths = cfg.train_paths();
        assert_eq!(paths[0], PathBuf::from("/data/pets/husky_train"));
        assert_eq!(paths[1], PathBuf::from("/data/pets/wolf_train"));
    }
}
