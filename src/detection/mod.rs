pub mod contours;
pub mod geometry;
pub mod preprocessing;
pub mod rectify;
pub mod select;

use image::{DynamicImage, GrayImage, RgbImage};
use log::debug;

use crate::config::DetectionConfig;
use crate::models::{Point, RegionCandidate};

/// Finds card-shaped regions in a photo and cuts them out.
#[derive(Debug, Clone, Default)]
pub struct CardDetector {
    pub config: DetectionConfig,
}

impl CardDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Grayscale, blur and fixed-level threshold.
    pub fn binarize(&self, img: &DynamicImage) -> GrayImage {
        let gray = preprocessing::to_grayscale(img);
        let blurred = preprocessing::apply_blur(&gray, self.config.blur_sigma);
        preprocessing::binarize(&blurred, self.config.threshold)
    }

    /// Up to `limit` quadrilateral candidates from an already binarized image.
    pub fn candidates_in(&self, binary: &GrayImage, limit: usize) -> Vec<RegionCandidate> {
        contours::find_regions(
            binary,
            limit,
            self.config.epsilon_fraction,
            self.config.reject_frame_regions,
        )
    }

    /// Up to `limit` quadrilateral candidates, largest first.
    pub fn candidates(&self, img: &DynamicImage, limit: usize) -> Vec<RegionCandidate> {
        self.candidates_in(&self.binarize(img), limit)
    }

    /// The largest candidate in an already binarized image containing
    /// `target`, searching the configured number of largest regions.
    pub fn locate_in(&self, binary: &GrayImage, target: Point) -> Option<RegionCandidate> {
        let candidates = self.candidates_in(binary, self.config.max_candidates);
        let found = select::select_card(&candidates, target).cloned();
        match &found {
            Some(candidate) => debug!(
                "Selected region of area {:.0} with corners {:?}",
                candidate.area,
                candidate.quad.corners()
            ),
            None => debug!(
                "No card contains ({}, {}) among {} candidates",
                target.x,
                target.y,
                candidates.len()
            ),
        }
        found
    }

    /// Warp a candidate onto the canonical square.
    pub fn rectify(&self, img: &RgbImage, candidate: &RegionCandidate) -> Option<RgbImage> {
        rectify::rectify(img, &candidate.quad, self.config.canonical_size)
    }

    /// Rectify the `count` largest regions of a sheet, in ranked order.
    ///
    /// Each entry pairs the candidate with its rectified image, or `None`
    /// when the outline was degenerate.
    pub fn extract_cards(
        &self,
        img: &DynamicImage,
        count: usize,
    ) -> Vec<(RegionCandidate, Option<RgbImage>)> {
        let rgb = img.to_rgb8();
        self.candidates(img, count)
            .into_iter()
            .map(|candidate| {
                let card = self.rectify(&rgb, &candidate);
                (candidate, card)
            })
            .collect()
    }
}
