#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from cardrec for tests
pub use cardrec::training::Labels;
pub use cardrec::{
    CardLabel, Classification, Classifier, Config, Corpus, Error, Exclusion, Point, TemplateEntry,
};

/// Defaults with a smaller canonical square so corpus-heavy tests stay fast.
pub fn small_config(num_cards: usize) -> Config {
    let mut config = Config::default();
    config.detection.canonical_size = 150;
    config.training.num_cards = num_cards;
    config
}
