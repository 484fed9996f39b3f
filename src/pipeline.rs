use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::DynamicImage;
use log::{debug, warn};

use crate::config::Config;
use crate::detection::CardDetector;
use crate::detection::select::image_center;
use crate::error::{Error, Result};
use crate::matching::{Matcher, similarity};
use crate::models::{Classification, DetectedCard, Point};
use crate::training::Corpus;

/// Debug configuration for classification
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Classification entry point: detect the card under a target point,
/// rectify it and look it up in the corpus.
///
/// The corpus is shared read-only, so a `Classifier` can be cloned into as
/// many concurrent callers as needed.
#[derive(Clone)]
pub struct Classifier {
    corpus: Arc<Corpus>,
    detector: CardDetector,
    matcher: Matcher,
    debug: Option<DebugConfig>,
    requests: Arc<AtomicUsize>,
}

impl Classifier {
    pub fn new(corpus: impl Into<Arc<Corpus>>, config: &Config) -> Self {
        Self {
            corpus: corpus.into(),
            detector: CardDetector::new(config.detection.clone()),
            matcher: Matcher::new(config.matching.clone()),
            debug: None,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.count() > 0 {
                return Err(Error::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Classify the card at the image centre.
    pub fn classify(&self, img: &DynamicImage) -> Result<Classification> {
        self.classify_at(img, image_center(img.width(), img.height()))
    }

    /// Classify the card containing `target`.
    pub fn classify_at(&self, img: &DynamicImage, target: Point) -> Result<Classification> {
        let request = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        self.save_debug("00_input", request, || img.clone())?;

        let binary = self.detector.binarize(img);
        self.save_debug("01_threshold", request, || DynamicImage::ImageLuma8(binary.clone()))?;

        let Some(candidate) = self.detector.locate_in(&binary, target) else {
            return Ok(self.matcher.classify(&self.corpus, None));
        };

        let Some(image) = self.detector.rectify(&img.to_rgb8(), &candidate) else {
            warn!("Selected region is degenerate, cannot rectify");
            return Ok(Classification::no_match(Some(candidate.polygon)));
        };
        self.save_debug("02_rectified", request, || DynamicImage::ImageRgb8(image.clone()))?;
        self.save_debug("03_features", request, || {
            DynamicImage::ImageLuma8(similarity::features(&image, &self.matcher.config))
        })?;

        let card = DetectedCard {
            image,
            polygon: candidate.polygon,
        };
        Ok(self.matcher.classify(&self.corpus, Some(&card)))
    }

    /// Classify on the blocking pool, giving up after `deadline`.
    ///
    /// The scan cost grows with the corpus, so callers serving requests
    /// should go through here. On timeout the worker is left to finish in
    /// the background and its result is discarded.
    pub async fn classify_within(
        &self,
        img: DynamicImage,
        target: Option<Point>,
        deadline: Duration,
    ) -> Result<Classification> {
        let this = self.clone();
        let task = tokio::task::spawn_blocking(move || {
            let target = target.unwrap_or_else(|| image_center(img.width(), img.height()));
            this.classify_at(&img, target)
        });

        match tokio::time::timeout(deadline, task).await {
            Ok(joined) => joined?,
            Err(_) => Err(Error::DeadlineExceeded(deadline)),
        }
    }

    /// Save a stage image if debug mode is enabled
    fn save_debug(
        &self,
        stage: &str,
        request: usize,
        image: impl FnOnce() -> DynamicImage,
    ) -> Result<()> {
        let Some(debug_config) = &self.debug else {
            return Ok(());
        };

        let stage_dir = debug_config.output_dir.join(stage);
        std::fs::create_dir_all(&stage_dir)?;
        let output_path = stage_dir.join(format!("{:02}.png", request));
        image().save(&output_path)?;
        debug!("Debug: saved {}/{:02}.png", stage, request);
        Ok(())
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("templates", &self.corpus.len())
            .field("detector", &self.detector)
            .field("debug", &self.debug)
            .finish()
    }
}
