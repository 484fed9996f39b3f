//! Nearest-template classification of rectified cards.
//!
//! A query is compared against every template in the corpus in all four
//! cardinal orientations and takes the label of the closest template. There
//! is no rejection threshold: any detected card gets the best label.

pub mod similarity;

use image::GrayImage;
use log::debug;
use rayon::prelude::*;

use crate::config::MatchConfig;
use crate::models::{Classification, DetectedCard};
use crate::training::Corpus;

/// Score of one corpus template against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateScore {
    pub key: usize,
    pub score: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    pub config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Rotation-invariant score of `features` against every template,
    /// ordered by ascending score, ties by ascending corpus key.
    pub fn score_templates(&self, corpus: &Corpus, features: &GrayImage) -> Vec<TemplateScore> {
        let rotations =
            similarity::rotations(features).map(|r| similarity::smooth(&r, &self.config));
        let mut scores: Vec<TemplateScore> = corpus
            .templates()
            .par_iter()
            .map(|(&key, entry)| {
                let score = similarity::min_rotated_dissimilarity(
                    &rotations,
                    &entry.smoothed,
                    &self.config,
                );
                TemplateScore { key, score }
            })
            .collect();
        scores.sort_by_key(|s| (s.score, s.key));
        scores
    }

    /// Closest template to `features`, or `None` for an empty corpus.
    pub fn best_template(&self, corpus: &Corpus, features: &GrayImage) -> Option<TemplateScore> {
        self.score_templates(corpus, features).into_iter().next()
    }

    /// Label a detected card. A missing card, or an empty corpus, yields a
    /// no-match result carrying whatever outline was found.
    pub fn classify(&self, corpus: &Corpus, card: Option<&DetectedCard>) -> Classification {
        let Some(card) = card else {
            return Classification::no_match(None);
        };

        let features = similarity::features(&card.image, &self.config);
        let Some(best) = self.best_template(corpus, &features) else {
            return Classification::no_match(Some(card.polygon.clone()));
        };

        // Keys in `best` always come from this corpus.
        let label = corpus.get(best.key).map(|entry| entry.label.clone());
        debug!(
            "Closest template {} ({:?}) with score {}",
            best.key, label, best.score
        );

        Classification {
            label,
            contour: Some(card.polygon.clone()),
            score: Some(best.score),
            template: Some(best.key),
        }
    }
}
