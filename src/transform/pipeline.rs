// src/transform/pipeline.rs

//! The augmentation pipeline applied between decode and batching.

use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array3;
use rand::Rng;

use crate::constants::{DEFAULT_CROP_SIZE, DEFAULT_RESIZE_SIZE, IMAGENET_MEAN, IMAGENET_STD};
use crate::transform::TransformError;
use crate::transform::convert::to_tensor;

/// A preprocessing function from a decoded RGB image to the tensor the
/// rest of the pipeline consumes.
///
/// Implementors must be shareable across loader workers; random
/// augmentations should draw from the thread RNG rather than holding
/// RNG state.
pub trait ImageTransform: Send + Sync {
    fn apply(&self, image: RgbImage) -> Result<Array3<f32>, TransformError>;
}

/// One image-space step of a [`TransformPipeline`].
#[derive(Debug, Clone)]
enum Step {
    Resize { width: u32, height: u32 },
    RandomCrop { width: u32, height: u32 },
    CenterCrop { width: u32, height: u32 },
    RandomHorizontalFlip { p: f64 },
    RandomRotate90,
}

/// A composed augmentation pipeline.
///
/// Image-space steps run in the order they were added; the final
/// tensor-conversion (CHW, `[0, 1]`) is implicit, with per-channel
/// normalization applied last when configured.
///
/// ```ignore
/// use imgdlio::transform::TransformPipeline;
/// use imgdlio::constants::{IMAGENET_MEAN, IMAGENET_STD};
///
/// let train = TransformPipeline::new()
///     .resize(256, 256)
///     .random_crop(224, 224)
///     .random_horizontal_flip(0.5)
///     .random_rotate90()
///     .normalize(IMAGENET_MEAN, IMAGENET_STD);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    steps: Vec<Step>,
    normalize: Option<([f32; 3], [f32; 3])>,
}

impl TransformPipeline {
    /// Empty pipeline: decode output is converted to a CHW tensor with
    /// no augmentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize to an exact `width x height` (bilinear).
    pub fn resize(mut self, width: u32, height: u32) -> Self {
        self.steps.push(Step::Resize { width, height });
        self
    }

    /// Crop a `width x height` window at a uniformly random position.
    pub fn random_crop(mut self, width: u32, height: u32) -> Self {
        self.steps.push(Step::RandomCrop { width, height });
        self
    }

    /// Crop a centered `width x height` window.
    pub fn center_crop(mut self, width: u32, height: u32) -> Self {
        self.steps.push(Step::CenterCrop { width, height });
        self
    }

    /// Mirror horizontally with probability `p`.
    pub fn random_horizontal_flip(mut self, p: f64) -> Self {
        self.steps.push(Step::RandomHorizontalFlip { p });
        self
    }

    /// Rotate by a uniformly random multiple of 90 degrees (0, 90, 180
    /// or 270).
    pub fn random_rotate90(mut self) -> Self {
        self.steps.push(Step::RandomRotate90);
        self
    }

    /// Normalize per channel: `(value - mean) / std`, applied after the
    /// `[0, 1]` tensor conversion. RGB channel order.
    pub fn normalize(mut self, mean: [f32; 3], std: [f32; 3]) -> Self {
        self.normalize = Some((mean, std));
        self
    }

    /// The default training pipeline: resize, random crop, random
    /// horizontal flip, random 90-degree rotation, ImageNet
    /// normalization, tensor conversion.
    pub fn train_default() -> Self {
        Self::new()
            .resize(DEFAULT_RESIZE_SIZE, DEFAULT_RESIZE_SIZE)
            .random_crop(DEFAULT_CROP_SIZE, DEFAULT_CROP_SIZE)
            .random_horizontal_flip(0.5)
            .random_rotate90()
            .normalize(IMAGENET_MEAN, IMAGENET_STD)
    }

    /// The default evaluation pipeline: deterministic resize and center
    /// crop with the same normalization as [`Self::train_default`].
    pub fn val_default() -> Self {
        Self::new()
            .resize(DEFAULT_RESIZE_SIZE, DEFAULT_RESIZE_SIZE)
            .center_crop(DEFAULT_CROP_SIZE, DEFAULT_CROP_SIZE)
            .normalize(IMAGENET_MEAN, IMAGENET_STD)
    }

    fn apply_step(step: &Step, img: RgbImage) -> Result<RgbImage, TransformError> {
        match *step {
            Step::Resize { width, height } => {
                Ok(imageops::resize(&img, width, height, FilterType::Triangle))
            }
            Step::RandomCrop { width, height } => {
                let (img_w, img_h) = img.dimensions();
                if width > img_w || height > img_h {
                    return Err(TransformError::CropTooLarge {
                        crop_w: width,
                        crop_h: height,
                        img_w,
                        img_h,
                    });
                }
                let mut rng = rand::rng();
                let x = rng.random_range(0..=(img_w - width));
                let y = rng.random_range(0..=(img_h - height));
                Ok(imageops::crop_imm(&img, x, y, width, height).to_image())
            }
            Step::CenterCrop { width, height } => {
                let (img_w, img_h) = img.dimensions();
                if width > img_w || height > img_h {
                    return Err(TransformError::CropTooLarge {
                        crop_w: width,
                        crop_h: height,
                        img_w,
                        img_h,
                    });
                }
                let x = (img_w - width) / 2;
                let y = (img_h - height) / 2;
                Ok(imageops::crop_imm(&img, x, y, width, height).to_image())
            }
            Step::RandomHorizontalFlip { p } => {
                if rand::rng().random_bool(p.clamp(0.0, 1.0)) {
                    Ok(imageops::flip_horizontal(&img))
                } else {
                    Ok(img)
                }
            }
            Step::RandomRotate90 => {
                let k: u32 = rand::rng().random_range(0..4);
                Ok(match k {
                    0 => img,
                    1 => imageops::rotate90(&img),
                    2 => imageops::rotate180(&img),
                    _ => imageops::rotate270(&img),
                })
            }
        }
    }
}

impl ImageTransform for TransformPipeline {
    fn apply(&self, image: RgbImage) -> Result<Array3<f32>, TransformError> {
        let mut img = image;
        for step in &self.steps {
            img = Self::apply_step(step, img)?;
        }
        let mut tensor = to_tensor(&img);
        if let Some((mean, std)) = self.normalize {
            for c in 0..3 {
                tensor
                    .index_axis_mut(ndarray::Axis(0), c)
                    .mapv_inplace(|v| (v - mean[c]) / std[c]);
            }
        }
        Ok(tensor)
    }
}
