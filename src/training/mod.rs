//! Reference corpus built from a labeled training sheet.
//!
//! The sheet is a single photo of every card laid out apart from each other.
//! Cards are extracted largest first (reading order on equal areas) and the
//! n-th extracted card gets the label with index n. Whoever writes the label
//! file has to follow that order; [`check_ordering`] flags neighbours whose
//! areas are too close for the order to be trusted.

pub mod export;
pub mod labels;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageReader};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::{Config, MatchConfig};
use crate::detection::CardDetector;
use crate::error::{Error, Result};
use crate::matching::similarity;
use crate::models::{CardLabel, RegionCandidate};

pub use labels::Labels;

/// A labeled reference card, stored as its feature image and the blurred
/// copy the matcher compares against.
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub label: CardLabel,
    pub features: GrayImage,
    pub smoothed: GrayImage,
}

impl TemplateEntry {
    pub fn new(label: CardLabel, features: GrayImage, config: &MatchConfig) -> Self {
        let smoothed = similarity::smooth(&features, config);
        Self {
            label,
            features,
            smoothed,
        }
    }
}

/// Cards to leave out of the corpus, e.g. to hold them out for validation.
#[derive(Debug, Clone, Default)]
pub struct Exclusion {
    pub ranks: HashSet<String>,
    pub suits: HashSet<String>,
}

impl Exclusion {
    pub fn new<R, S>(ranks: R, suits: S) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            ranks: ranks.into_iter().map(Into::into).collect(),
            suits: suits.into_iter().map(Into::into).collect(),
        }
    }

    pub fn excludes(&self, label: &CardLabel) -> bool {
        self.ranks.contains(&label.rank) || self.suits.contains(&label.suit)
    }
}

/// Two neighbouring candidates whose areas are within tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbiguousPair {
    pub first: usize,
    pub second: usize,
    pub first_area: f64,
    pub second_area: f64,
}

impl From<AmbiguousPair> for Error {
    fn from(pair: AmbiguousPair) -> Self {
        Error::AmbiguousOrdering {
            first: pair.first,
            second: pair.second,
            first_area: pair.first_area,
            second_area: pair.second_area,
        }
    }
}

/// Neighbouring candidates, in ranked order, whose relative area difference
/// is below `tolerance`.
pub fn check_ordering(candidates: &[RegionCandidate], tolerance: f64) -> Vec<AmbiguousPair> {
    candidates
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let (larger, smaller) = (pair[0].area, pair[1].area);
            let relative = if larger > 0.0 {
                (larger - smaller) / larger
            } else {
                0.0
            };
            (relative < tolerance).then_some(AmbiguousPair {
                first: i,
                second: i + 1,
                first_area: larger,
                second_area: smaller,
            })
        })
        .collect()
}

/// Immutable label -> template store shared by every classification.
///
/// Keys are extraction indices; iteration is by ascending key.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    templates: BTreeMap<usize, TemplateEntry>,
    expected_cards: usize,
}

impl Corpus {
    /// Extract, label and preprocess every card on a training sheet.
    ///
    /// Fails when the sheet does not yield exactly
    /// `config.training.num_cards` cards, when a card has no label, or, with
    /// `strict_ordering`, when the extraction order is ambiguous.
    pub fn build(
        sheet: &DynamicImage,
        labels: &Labels,
        exclusion: &Exclusion,
        config: &Config,
    ) -> Result<Self> {
        let expected = config.training.num_cards;
        info!("Training from {} labels, expecting {} cards", labels.len(), expected);

        let detector = CardDetector::new(config.detection.clone());
        let extracted = detector.extract_cards(sheet, expected);
        if extracted.len() != expected {
            return Err(Error::CandidateCount {
                expected,
                found: extracted.len(),
            });
        }

        let candidates: Vec<RegionCandidate> = extracted.iter().map(|(c, _)| c.clone()).collect();
        let ambiguous = check_ordering(&candidates, config.training.ambiguity_tolerance);
        if let Some(&pair) = ambiguous.first() {
            if config.training.strict_ordering {
                return Err(pair.into());
            }
            warn!(
                "{} neighbouring training cards have near-equal areas; relying on reading order",
                ambiguous.len()
            );
            for pair in &ambiguous {
                debug!(
                    "Cards {} and {}: areas {:.0} and {:.0}",
                    pair.first, pair.second, pair.first_area, pair.second_area
                );
            }
        }

        let mut kept = Vec::with_capacity(extracted.len());
        for (index, (_, card)) in extracted.into_iter().enumerate() {
            let label = labels.get(index).ok_or(Error::MissingLabel(index))?;
            let card = card.ok_or(Error::DegenerateCard(index))?;
            if exclusion.excludes(label) {
                debug!("Holding out card {} ({})", index, label);
                continue;
            }
            kept.push((index, label.clone(), card));
        }

        let templates: BTreeMap<usize, TemplateEntry> = kept
            .into_par_iter()
            .map(|(index, label, card)| {
                let features = similarity::features(&card, &config.matching);
                (index, TemplateEntry::new(label, features, &config.matching))
            })
            .collect();

        info!("Corpus ready with {} templates", templates.len());
        Ok(Self {
            templates,
            expected_cards: expected,
        })
    }

    /// [`Corpus::build`] from a sheet image file and a label file.
    pub fn from_files(
        sheet_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
        exclusion: &Exclusion,
        config: &Config,
    ) -> Result<Self> {
        let sheet = ImageReader::open(sheet_path.as_ref())?.decode()?;
        let labels = Labels::load(labels_path)?;
        Self::build(&sheet, &labels, exclusion, config)
    }

    /// Assemble a corpus from already prepared templates.
    pub fn from_templates(templates: impl IntoIterator<Item = (usize, TemplateEntry)>) -> Self {
        let templates: BTreeMap<usize, TemplateEntry> = templates.into_iter().collect();
        let expected_cards = templates.len();
        Self {
            templates,
            expected_cards,
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Number of cards the training sheet held, held-out cards included.
    pub fn expected_cards(&self) -> usize {
        self.expected_cards
    }

    pub fn get(&self, key: usize) -> Option<&TemplateEntry> {
        self.templates.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &TemplateEntry)> {
        self.templates.iter().map(|(&k, v)| (k, v))
    }

    pub fn templates(&self) -> &BTreeMap<usize, TemplateEntry> {
        &self.templates
    }
}
