//! Tunable parameters for detection, matching and corpus building.
//!
//! Every section defaults to the values the card recognizer was tuned with;
//! a JSON file only needs to name the fields it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub matching: MatchConfig,
    pub training: TrainingConfig,
}

impl Config {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Region extraction and rectification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Gaussian sigma applied before binarizing.
    pub blur_sigma: f32,
    /// Pixels brighter than this become foreground.
    pub threshold: u8,
    /// How many of the largest regions are considered per photo.
    pub max_candidates: usize,
    /// Polygon simplification tolerance as a fraction of the perimeter.
    pub epsilon_fraction: f64,
    /// Side of the square every card is warped onto.
    pub canonical_size: u32,
    /// Drop regions that reach all four image edges. A bright background
    /// otherwise shows up as one frame-sized "card".
    pub reject_frame_regions: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            threshold: 120,
            max_candidates: 10,
            epsilon_fraction: 0.02,
            canonical_size: 450,
            reject_frame_regions: true,
        }
    }
}

/// Feature extraction and pairwise scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Gaussian sigma applied before the adaptive threshold.
    pub feature_sigma: f32,
    /// Sigma of the Gaussian-weighted local mean (11x11 block).
    pub adaptive_sigma: f32,
    /// Offset subtracted from the local mean.
    pub adaptive_offset: i16,
    /// Radius of the box blur used when comparing two feature images.
    pub diff_blur_radius: u32,
    /// Blurred differences above this count as disagreement.
    pub diff_threshold: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            feature_sigma: 2.0,
            adaptive_sigma: 2.0,
            adaptive_offset: 1,
            diff_blur_radius: 2,
            diff_threshold: 200,
        }
    }
}

/// Training sheet extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Cards printed on the training sheet.
    pub num_cards: usize,
    /// Relative area difference below which two neighbouring cards are
    /// considered tied in the extraction order.
    pub ambiguity_tolerance: f64,
    /// Fail instead of warning when the extraction order is ambiguous.
    pub strict_ordering: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_cards: 56,
            ambiguity_tolerance: 0.01,
            strict_ordering: false,
        }
    }
}
