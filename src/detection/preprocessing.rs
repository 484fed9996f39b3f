use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::filter::{box_filter, gaussian_blur_f32};
use imageproc::map::map_colors2;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce noise. A non-positive sigma leaves the
/// image untouched.
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return img.clone();
    }
    gaussian_blur_f32(img, sigma)
}

/// Mean over a `(2r + 1)` square window.
pub fn box_blur(img: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return img.clone();
    }
    box_filter(img, radius, radius)
}

/// Fixed-level binarization: brighter than `level` becomes 255, the rest 0.
pub fn binarize(img: &GrayImage, level: u8) -> GrayImage {
    threshold(img, level, ThresholdType::Binary)
}

/// Inverted adaptive threshold against a Gaussian-weighted local mean.
///
/// A pixel becomes 255 when it is no brighter than the local mean minus
/// `offset`, otherwise 0. Dark strokes and the dark side of edges light up
/// while flat areas go black.
pub fn adaptive_threshold_inv(img: &GrayImage, sigma: f32, offset: i16) -> GrayImage {
    let local_mean = apply_blur(img, sigma);
    map_colors2(img, &local_mean, |p, mean| {
        if p[0] as i16 > mean[0] as i16 - offset {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

/// Per-pixel absolute difference of two equally sized images.
pub fn abs_diff(a: &GrayImage, b: &GrayImage) -> GrayImage {
    map_colors2(a, b, |p, q| Luma([p[0].abs_diff(q[0])]))
}
