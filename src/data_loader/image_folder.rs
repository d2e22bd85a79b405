// src/data_loader/image_folder.rs
//
// Image-folder dataset: one folder per class, folder position in the
// input list is the class label.

use crate::data_loader::{Dataset, DatasetError};
use crate::transform::{ImageTransform, to_raw_hwc};
use async_trait::async_trait;
use log::{info, warn};
use ndarray::{Array1, Array3, Array4, Axis};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One decoded sample: the image representation plus its class label.
///
/// With a transform configured, `image` is whatever the pipeline
/// produced (CHW `f32` for [`crate::transform::TransformPipeline`]);
/// with none, it is the raw RGB image as HWC `f32` with values in
/// `0..=255`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    pub image: Array3<f32>,
    pub label: i64,
}

/// A batch of samples stacked along a new leading axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    pub images: Array4<f32>,
    pub labels: Array1<i64>,
}

impl ImageBatch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Stack samples into a single batch. All images must share a shape;
/// a mismatch (e.g. untransformed images of different sizes) is an
/// error, not a panic.
pub fn collate(samples: Vec<ImageSample>) -> Result<ImageBatch, DatasetError> {
    if samples.is_empty() {
        return Err(DatasetError::Shape("cannot collate an empty batch".into()));
    }
    let shape = samples[0].image.dim();
    for (i, s) in samples.iter().enumerate() {
        if s.image.dim() != shape {
            return Err(DatasetError::Shape(format!(
                "image {} has shape {:?}, expected {:?}",
                i,
                s.image.dim(),
                shape
            )));
        }
    }
    let views: Vec<_> = samples.iter().map(|s| s.image.view()).collect();
    let images = ndarray::stack(Axis(0), &views)
        .map_err(|e| DatasetError::Shape(e.to_string()))?;
    let labels = Array1::from_iter(samples.iter().map(|s| s.label));
    Ok(ImageBatch { images, labels })
}

/// Map-style dataset over per-class image folders.
///
/// Construction takes a filesystem snapshot: each folder's top-level
/// entries become examples labelled with the folder's position in the
/// input list. The example list never changes afterwards, so `get` is
/// safe to call from any number of concurrent loader workers.
///
/// Every `get` re-reads and re-decodes the file; there is no decoded
/// cache. That is a deliberate simplicity choice at this scale.
#[derive(Clone)]
pub struct ImageFolderDataset {
    examples: Vec<(PathBuf, i64)>,
    transform: Option<Arc<dyn ImageTransform>>,
}

impl ImageFolderDataset {
    /// Build the example index from `folders`, in order. Entries within
    /// a folder are sorted by path so the index is stable across runs;
    /// labels depend only on folder order, not on file order.
    pub fn new<P: AsRef<Path>>(
        folders: &[P],
        transform: Option<Arc<dyn ImageTransform>>,
    ) -> Result<Self, DatasetError> {
        if folders.len() < 2 {
            return Err(DatasetError::InvalidConfig(format!(
                "classification needs at least 2 class folders, got {}",
                folders.len()
            )));
        }

        let mut examples = Vec::new();
        for (label, folder) in folders.iter().enumerate() {
            let folder = folder.as_ref();
            let mut files = Self::list_files(folder)?;
            if files.is_empty() {
                warn!("class folder {} is empty", folder.display());
            }
            files.sort();
            examples.extend(files.into_iter().map(|p| (p, label as i64)));
        }

        info!(
            "indexed {} examples across {} class folders",
            examples.len(),
            folders.len()
        );

        Ok(Self { examples, transform })
    }

    /// List a folder's top-level files. No recursion: the layout
    /// contract is one flat folder per class.
    fn list_files(folder: &Path) -> Result<Vec<PathBuf>, DatasetError> {
        let entries = std::fs::read_dir(folder).map_err(|e| DatasetError::Io {
            path: folder.to_owned(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DatasetError::Io {
                path: folder.to_owned(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// The `(path, label)` example at `index`, without decoding.
    pub fn example(&self, index: usize) -> Result<(&Path, i64), DatasetError> {
        self.examples
            .get(index)
            .map(|(p, l)| (p.as_path(), *l))
            .ok_or(DatasetError::IndexOutOfRange(index))
    }

    async fn decode(&self, path: &Path) -> Result<image::RgbImage, DatasetError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| DatasetError::Io {
            path: path.to_owned(),
            source: e,
        })?;
        let img = image::load_from_memory(&bytes).map_err(|e| DatasetError::Decode {
            path: path.to_owned(),
            source: e,
        })?;
        // Canonical RGB channel order, whatever the file held
        // (grayscale and RGBA inputs included). Downstream transforms
        // and the eventual model assume RGB.
        Ok(img.to_rgb8())
    }
}

#[async_trait]
impl Dataset for ImageFolderDataset {
    type Item = ImageSample;

    fn len(&self) -> Option<usize> {
        Some(self.examples.len())
    }

    async fn get(&self, index: usize) -> Result<Self::Item, DatasetError> {
        let (path, label) = {
            let (p, l) = self.example(index)?;
            (p.to_owned(), l)
        };
        let rgb = self.decode(&path).await?;
        let image = match &self.transform {
            Some(t) => t.apply(rgb)?,
            None => to_raw_hwc(&rgb),
        };
        Ok(ImageSample { image, label })
    }
}

impl std::fmt::Debug for ImageFolderDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFolderDataset")
            .field("examples", &self.examples.len())
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}
