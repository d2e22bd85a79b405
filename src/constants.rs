// src/constants.rs
//
// Centralized constants for imgdlio to avoid hardcoded values throughout the codebase

/// Default number of samples per batch.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Default number of parallel fetch workers for the batch loader.
pub const DEFAULT_NUM_WORKERS: usize = 4;

/// Default edge length images are resized to before cropping.
pub const DEFAULT_RESIZE_SIZE: u32 = 256;

/// Default edge length of the (random or center) crop fed to the model.
pub const DEFAULT_CROP_SIZE: u32 = 224;

/// Per-channel normalization mean (ImageNet statistics, RGB order).
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel normalization std (ImageNet statistics, RGB order).
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Default class-folder names for the training split. Position in the
/// list is the class label: husky -> 0, wolf -> 1.
pub const DEFAULT_TRAIN_FOLDERS: [&str; 2] = ["husky_train", "wolf_train"];

/// Default class-folder names for the validation split, same positional
/// label assignment as the training split.
pub const DEFAULT_VAL_FOLDERS: [&str; 2] = ["husky_test", "wolf_test"];
