mod common;

use std::time::Duration;

use common::*;
use image::imageops::rotate90;
use image::{DynamicImage, Rgb, RgbImage};

/// Four cards in a row, card `i` carrying `i + 1` pips, labeled A of each
/// suit in turn.
fn classifier() -> Classifier {
    let sheet = Sheet {
        cols: 4,
        rows: 1,
        card: 120,
        gap: 40,
    };
    let config = small_config(sheet.count());
    let labels = Labels::parse(&labels_text(sheet.count())).expect("Failed to parse labels");
    let corpus = Corpus::build(
        &sheet.render(|i| i as u32 + 1),
        &labels,
        &Exclusion::default(),
        &config,
    )
    .expect("Failed to build corpus");
    Classifier::new(corpus, &config)
}

fn expected_label(pips: u32) -> CardLabel {
    let (rank, suit) = label_of(pips as usize - 1);
    CardLabel::new(rank, suit)
}

#[test]
fn blank_photo_is_no_match() {
    let classifier = classifier();
    let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([255, 255, 255])));

    let result = classifier.classify(&white).expect("classification");
    assert_eq!(result, Classification::no_match(None));
}

#[test]
fn every_card_is_recognised_in_every_orientation() {
    let classifier = classifier();

    for pips in 1..=4 {
        let mut photo = card_photo(300, 120, pips);
        for quarter in 0..4 {
            let result = classifier
                .classify(&DynamicImage::ImageRgb8(photo.clone()))
                .expect("classification");
            assert_eq!(
                result.label,
                Some(expected_label(pips)),
                "{pips} pips turned {quarter} times"
            );
            let contour = result.contour.expect("matched card keeps its outline");
            assert_eq!(contour.len(), 4);
            photo = rotate90(&photo);
        }
    }
}

#[test]
fn card_flush_with_the_frame_edge_is_recognised() {
    let classifier = classifier();
    let mut photo = RgbImage::from_pixel(200, 200, TABLE);
    draw_card(&mut photo, 0, 40, 120, 120, 2);

    let result = classifier
        .classify(&DynamicImage::ImageRgb8(photo))
        .expect("classification");
    assert_eq!(result.label, Some(expected_label(2)));
    assert_eq!(result.contour.map(|c| c.len()), Some(4));
}

#[test]
fn target_outside_every_card_is_no_match() {
    let classifier = classifier();
    let photo = DynamicImage::ImageRgb8(card_photo(300, 120, 2));

    let result = classifier
        .classify_at(&photo, Point::new(20, 20))
        .expect("classification");
    assert!(!result.is_match());
    assert_eq!(result.contour, None);

    let result = classifier
        .classify_at(&photo, Point::new(100, 200))
        .expect("classification");
    assert_eq!(result.label, Some(expected_label(2)));
}

#[tokio::test]
async fn classify_within_runs_on_the_blocking_pool() {
    let classifier = classifier();
    let photo = DynamicImage::ImageRgb8(card_photo(300, 120, 3));

    let result = classifier
        .classify_within(photo, None, Duration::from_secs(30))
        .await
        .expect("classification");
    assert_eq!(result.label, Some(expected_label(3)));
}

#[test]
fn classify_within_gives_up_at_the_deadline() {
    // A single blocking thread, held busy until the deadline has passed, so
    // the classification cannot start in time.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .max_blocking_threads(1)
        .enable_time()
        .build()
        .expect("Failed to build runtime");
    let (release, held) = std::sync::mpsc::channel::<()>();
    let _occupant = runtime.spawn_blocking(move || held.recv());

    let classifier = classifier();
    let photo = DynamicImage::ImageRgb8(card_photo(300, 120, 1));
    let deadline = Duration::from_millis(50);
    let err = runtime
        .block_on(classifier.classify_within(photo, None, deadline))
        .unwrap_err();
    assert!(matches!(err, Error::DeadlineExceeded(d) if d == deadline), "{err}");

    release.send(()).expect("blocking thread still waiting");
    runtime.shutdown_timeout(Duration::from_secs(30));
}

#[test]
fn debug_mode_saves_every_stage() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let debug_dir = dir.path().join("debug");
    let classifier = classifier()
        .with_debug(debug_dir.clone())
        .expect("Failed to enable debug mode");

    let photo = DynamicImage::ImageRgb8(card_photo(300, 120, 4));
    let result = classifier.classify(&photo).expect("classification");
    assert_eq!(result.label, Some(expected_label(4)));

    for stage in ["00_input", "01_threshold", "02_rectified", "03_features"] {
        let path = debug_dir.join(stage).join("01.png");
        assert!(path.exists(), "missing {}", path.display());
    }

    let err = classifier.clone().with_debug(debug_dir).unwrap_err();
    assert!(matches!(err, Error::DebugDirNotEmpty(_)), "{err}");
}
