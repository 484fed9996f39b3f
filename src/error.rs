use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Label file line {line}: expected `index rank suit`, got {content:?}")]
    LabelSyntax { line: usize, content: String },

    #[error("Label file lists index {0} more than once")]
    DuplicateLabel(usize),

    #[error("Label file has no entry for extracted card {0}")]
    MissingLabel(usize),

    #[error("Training sheet yielded {found} cards, expected {expected}")]
    CandidateCount { expected: usize, found: usize },

    #[error(
        "Training cards {first} and {second} have near-equal areas ({first_area:.0} vs {second_area:.0}); label order is ambiguous"
    )]
    AmbiguousOrdering {
        first: usize,
        second: usize,
        first_area: f64,
        second_area: f64,
    },

    #[error("Training card {0} has a degenerate outline and cannot be rectified")]
    DegenerateCard(usize),

    #[error("Debug directory is not empty: {0}")]
    DebugDirNotEmpty(PathBuf),

    #[error("Classification did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Classification task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
