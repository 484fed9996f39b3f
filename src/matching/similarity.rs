use image::imageops::rotate90;
use image::{DynamicImage, GrayImage, RgbImage};

use crate::config::MatchConfig;
use crate::detection::preprocessing;

/// Feature image of a rectified card: grayscale, blur, inverted adaptive
/// threshold. Training templates and queries both go through here.
pub fn features(card: &RgbImage, config: &MatchConfig) -> GrayImage {
    let gray = DynamicImage::ImageRgb8(card.clone()).to_luma8();
    let blurred = preprocessing::apply_blur(&gray, config.feature_sigma);
    preprocessing::adaptive_threshold_inv(&blurred, config.adaptive_sigma, config.adaptive_offset)
}

/// The feature image turned by 0, 90, 180 and 270 degrees, each variant
/// derived from the one before it.
pub fn rotations(features: &GrayImage) -> [GrayImage; 4] {
    let quarter = rotate90(features);
    let half = rotate90(&quarter);
    let three_quarters = rotate90(&half);
    [features.clone(), quarter, half, three_quarters]
}

/// Feature image blurred for differencing. Corpus templates store this so
/// only the query side is blurred per request.
pub fn smooth(features: &GrayImage, config: &MatchConfig) -> GrayImage {
    preprocessing::box_blur(features, config.diff_blur_radius)
}

/// Pixel-difference score between two feature images. Lower is closer,
/// identical images score 0.
///
/// Both inputs are box blurred, differenced, the difference is blurred
/// again, and the sum of the thresholded difference is returned. Images of
/// different sizes never match and score `u64::MAX`.
pub fn dissimilarity(a: &GrayImage, b: &GrayImage, config: &MatchConfig) -> u64 {
    smoothed_dissimilarity(&smooth(a, config), &smooth(b, config), config)
}

/// [`dissimilarity`] of two images already passed through [`smooth`].
pub fn smoothed_dissimilarity(a: &GrayImage, b: &GrayImage, config: &MatchConfig) -> u64 {
    if a.dimensions() != b.dimensions() {
        return u64::MAX;
    }

    let diff = preprocessing::abs_diff(a, b);
    let diff = preprocessing::box_blur(&diff, config.diff_blur_radius);
    let diff = preprocessing::binarize(&diff, config.diff_threshold);

    diff.pixels().map(|p| p[0] as u64).sum()
}

/// Smallest score of any smoothed query rotation against a smoothed
/// template.
pub fn min_rotated_dissimilarity(
    rotations: &[GrayImage; 4],
    template: &GrayImage,
    config: &MatchConfig,
) -> u64 {
    rotations
        .iter()
        .map(|variant| smoothed_dissimilarity(template, variant, config))
        .min()
        .unwrap_or(u64::MAX)
}
