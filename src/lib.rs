pub mod config;
pub mod detection;
pub mod error;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod training;

pub use config::{Config, DetectionConfig, MatchConfig, TrainingConfig};
pub use error::{Error, Result};
pub use models::{CardLabel, Classification, DetectedCard, Point, Quad, RegionCandidate};
pub use pipeline::{Classifier, DebugConfig};
pub use training::{Corpus, Exclusion, TemplateEntry};
