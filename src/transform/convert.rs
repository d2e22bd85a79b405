// src/transform/convert.rs
//
// Conversions between decoded images and ndarray tensors.

use image::RgbImage;
use ndarray::{Array3, s};

/// Convert a decoded RGB image to a CHW `f32` tensor scaled to `[0, 1]`.
///
/// Layout is `(channel, height, width)`, the conventional model input
/// layout for conv nets.
pub fn to_tensor(img: &RgbImage) -> Array3<f32> {
    let (w, h) = img.dimensions();
    let mut out = Array3::<f32>::zeros((3, h as usize, w as usize));
    for (x, y, px) in img.enumerate_pixels() {
        for c in 0..3 {
            out[(c, y as usize, x as usize)] = px.0[c] as f32 / 255.0;
        }
    }
    out
}

/// Convert a decoded RGB image to a raw HWC `f32` array with values in
/// `0..=255`. This is what the dataset yields when no transform is
/// configured.
pub fn to_raw_hwc(img: &RgbImage) -> Array3<f32> {
    let (w, h) = img.dimensions();
    let mut out = Array3::<f32>::zeros((h as usize, w as usize, 3));
    for (x, y, px) in img.enumerate_pixels() {
        for c in 0..3 {
            out[(y as usize, x as usize, c)] = px.0[c] as f32;
        }
    }
    out
}

/// Reverse the channel axis of an HWC pixel array, turning a BGR buffer
/// into RGB (and vice versa).
///
/// The `image` crate decodes into RGB natively, so the dataset never
/// needs this; it exists for interop with pixel buffers produced by
/// BGR-native decoders (OpenCV and friends) that callers feed into the
/// pipeline directly.
pub fn bgr_to_rgb(arr: &Array3<u8>) -> Array3<u8> {
    arr.slice(s![.., .., ..;-1]).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn bgr_pure_blue_becomes_rgb_blue() {
        // A pure-blue pixel in BGR is (255, 0, 0); in RGB it is (0, 0, 255).
        let mut bgr = Array3::<u8>::zeros((1, 1, 3));
        bgr[(0, 0, 0)] = 255;
        let rgb = bgr_to_rgb(&bgr);
        assert_eq!(rgb[(0, 0, 0)], 0);
        assert_eq!(rgb[(0, 0, 1)], 0);
        assert_eq!(rgb[(0, 0, 2)], 255);
    }

    #[test]
    fn bgr_to_rgb_is_an_involution() {
        let mut arr = Array3::<u8>::zeros((2, 2, 3));
        let mut v = 0u8;
        for e in arr.iter_mut() {
            *e = v;
            v = v.wrapping_add(17);
        }
        assert_eq!(bgr_to_rgb(&bgr_to_rgb(&arr)), arr);
    }

    #[test]
    fn to_tensor_is_chw_and_scaled() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 127, 0]));
        let t = to_tensor(&img);
        assert_eq!(t.dim(), (3, 1, 2));
        assert!((t[(0, 0, 0)] - 1.0).abs() < 1e-6);
        assert!((t[(1, 0, 1)] - 127.0 / 255.0).abs() < 1e-6);
        assert_eq!(t[(2, 0, 0)], 0.0);
    }

    #[test]
    fn to_raw_hwc_preserves_values() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, Rgb([12, 34, 56]));
        let a = to_raw_hwc(&img);
        assert_eq!(a.dim(), (1, 1, 3));
        assert_eq!(a[(0, 0, 0)], 12.0);
        assert_eq!(a[(0, 0, 1)], 34.0);
        assert_eq!(a[(0, 0, 2)], 56.0);
    }
}
