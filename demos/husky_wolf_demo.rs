// demos/husky_wolf_demo.rs
//
// End-to-end walkthrough: build a husky/wolf folder tree, configure a
// DataModule, and drain one training epoch plus one validation pass.

use anyhow::Result;
use image::{Rgb, RgbImage};
use imgdlio::{DataModule, DataModuleConfig};
use std::path::Path;
use std::time::Instant;
use tempfile::TempDir;
use tokio_stream::StreamExt;

/// Create a synthetic class folder of solid-color "photographs".
fn create_class_folder(base: &Path, name: &str, count: usize, color: [u8; 3]) -> Result<()> {
    let dir = base.join(name);
    std::fs::create_dir_all(&dir)?;
    for i in 0..count {
        RgbImage::from_pixel(64, 64, Rgb(color)).save(dir.join(format!("img_{i:03}.png")))?;
    }
    println!("  {} -> {} images", name, count);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    println!("Creating synthetic dataset...");
    let tmp = TempDir::new()?;
    create_class_folder(tmp.path(), "husky_train", 12, [200, 190, 180])?;
    create_class_folder(tmp.path(), "wolf_train", 10, [90, 95, 105])?;
    create_class_folder(tmp.path(), "husky_test", 4, [210, 195, 185])?;
    create_class_folder(tmp.path(), "wolf_test", 4, [85, 90, 100])?;

    let cfg = DataModuleConfig::default()
        .with_base_dir(tmp.path())
        .with_batch_size(4)
        .with_num_workers(4);
    let mut dm = DataModule::new(cfg, None, None)?;
    dm.setup()?;

    println!("\nTraining pass (shuffled):");
    let start = Instant::now();
    let mut batches = dm.train_loader()?.batches();
    let mut n = 0usize;
    while let Some(batch) = batches.next().await {
        let batch = batch?;
        println!(
            "  batch {:2}: images {:?}, labels {:?}",
            n,
            batch.images.dim(),
            batch.labels.to_vec()
        );
        n += 1;
    }
    println!("  {} batches in {:?}", n, start.elapsed());

    println!("\nValidation pass (sequential):");
    let mut batches = dm.val_loader()?.batches();
    while let Some(batch) = batches.next().await {
        let batch = batch?;
        println!("  labels {:?}", batch.labels.to_vec());
    }

    Ok(())
}
