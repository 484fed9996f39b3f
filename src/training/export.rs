use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use log::debug;

use crate::config::Config;
use crate::detection::CardDetector;
use crate::error::{Error, Result};
use crate::training::Labels;

/// Write every rectified card of a training sheet to
/// `<root>/<suit>/<rank>/<rank>-<n>.png`.
///
/// `n` counts the files already in the directory, so repeated exports add
/// new samples next to earlier ones. Looking through the tree is the quickest
/// way to confirm the label file matches the extraction order.
pub fn export_training_cards(
    sheet: &DynamicImage,
    labels: &Labels,
    config: &Config,
    root: &Path,
) -> Result<Vec<PathBuf>> {
    let expected = config.training.num_cards;
    let detector = CardDetector::new(config.detection.clone());
    let extracted = detector.extract_cards(sheet, expected);
    if extracted.len() != expected {
        return Err(Error::CandidateCount {
            expected,
            found: extracted.len(),
        });
    }

    let mut written = Vec::with_capacity(extracted.len());
    for (index, (_, card)) in extracted.into_iter().enumerate() {
        let label = labels.get(index).ok_or(Error::MissingLabel(index))?;
        let card = card.ok_or(Error::DegenerateCard(index))?;

        let dir = root.join(&label.suit).join(&label.rank);
        fs::create_dir_all(&dir)?;
        let n = fs::read_dir(&dir)?.count();
        let path = dir.join(format!("{}-{}.png", label.rank, n));

        card.save(&path)?;
        debug!("Card {} ({}) -> {}", index, label, path.display());
        written.push(path);
    }

    Ok(written)
}
