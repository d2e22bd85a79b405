// src/transform/mod.rs

//! Image augmentation & preprocessing for the data-loader layer.
//!
//! A [`TransformPipeline`] takes a decoded RGB image and produces the
//! CHW `f32` tensor the training loop consumes. Random steps (crop,
//! flip, rotate) draw from the thread RNG, so two applications of the
//! same pipeline to the same image may differ; the deterministic steps
//! (resize, center crop, normalize) do not.

pub mod convert;
pub mod pipeline;

pub use convert::{bgr_to_rgb, to_raw_hwc, to_tensor};
pub use pipeline::{ImageTransform, TransformPipeline};

use thiserror::Error;

/// Errors raised while applying a transform pipeline.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("crop size {crop_w}x{crop_h} exceeds image size {img_w}x{img_h}")]
    CropTooLarge {
        crop_w: u32,
        crop_h: u32,
        img_w: u32,
        img_h: u32,
    },

    #[error("invalid transform parameter: {0}")]
    InvalidParameter(String),
}
