use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use image::ImageReader;
use log::{LevelFilter, info};
use serde::Serialize;

use cardrec::training::Labels;
use cardrec::training::export::export_training_cards;
use cardrec::{CardLabel, Classification, Classifier, Config, Corpus, Exclusion, Point};

#[derive(Parser)]
#[command(name = "cardrec")]
#[command(about = "Recognize playing cards in photos against a labeled training sheet")]
struct Cli {
    /// Photo of the training sheet
    #[arg(long, value_name = "IMAGE")]
    training_image: PathBuf,

    /// Label file with one `index rank suit` line per card
    #[arg(long, value_name = "FILE")]
    training_labels: PathBuf,

    /// Number of cards on the training sheet
    #[arg(long)]
    num_cards: Option<usize>,

    /// JSON file overriding detection, matching and training parameters
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Leave cards of this rank out of the corpus
    #[arg(long, value_name = "RANK")]
    exclude_rank: Vec<String>,

    /// Leave cards of this suit out of the corpus
    #[arg(long, value_name = "SUIT")]
    exclude_suit: Vec<String>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the card at the centre (or at --target) of each photo
    Classify {
        /// Photos to classify
        #[arg(value_name = "IMAGE", required = true)]
        images: Vec<PathBuf>,

        /// Point the card must cover, as X,Y (defaults to the image centre)
        #[arg(long, value_parser = parse_point)]
        target: Option<Point>,

        /// Give up on a photo after this many milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,

        /// Save intermediate images to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },
    /// Write every rectified training card to OUT/<suit>/<rank>/
    ExportTraining {
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
}

/// One hit in the response, shaped like the card recognition server's.
#[derive(Serialize)]
struct CardHit<'a> {
    rank: &'a str,
    suit: &'a str,
    contour: &'a [Point],
}

#[derive(Serialize)]
struct Response<'a> {
    result: Vec<CardHit<'a>>,
}

impl<'a> From<&'a Classification> for Response<'a> {
    fn from(classification: &'a Classification) -> Self {
        let result = match (&classification.label, &classification.contour) {
            (Some(CardLabel { rank, suit }), Some(contour)) => vec![CardHit {
                rank,
                suit,
                contour,
            }],
            _ => Vec::new(),
        };
        Self { result }
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Point::new(x, y))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => Config::load_json(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(num_cards) = args.num_cards {
        config.training.num_cards = num_cards;
    }

    match args.command {
        Command::Classify {
            images,
            target,
            timeout_ms,
            debug_out,
        } => {
            let exclusion = Exclusion::new(args.exclude_rank, args.exclude_suit);
            let corpus = Corpus::from_files(
                &args.training_image,
                &args.training_labels,
                &exclusion,
                &config,
            )
            .context("Failed to build training corpus")?;

            let mut classifier = Classifier::new(corpus, &config);
            if let Some(debug_dir) = debug_out {
                classifier = classifier.with_debug(debug_dir)?;
            }

            let deadline = Duration::from_millis(timeout_ms);
            for path in images {
                info!("Classifying {}", path.display());
                let img = ImageReader::open(&path)?
                    .decode()
                    .map_err(|e| anyhow::anyhow!("Failed to decode {}: {}", path.display(), e))?;

                let classification = classifier.classify_within(img, target, deadline).await?;
                println!("{}", serde_json::to_string(&Response::from(&classification))?);
            }
        }
        Command::ExportTraining { out } => {
            let sheet = ImageReader::open(&args.training_image)?
                .decode()
                .map_err(|e| anyhow::anyhow!("Failed to decode training sheet: {}", e))?;
            let labels = Labels::load(&args.training_labels)?;

            let written = export_training_cards(&sheet, &labels, &config, &out)?;
            println!("Wrote {} training cards under {}", written.len(), out.display());
        }
    }

    Ok(())
}
