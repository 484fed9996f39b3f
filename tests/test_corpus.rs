mod common;

use cardrec::matching::{Matcher, similarity};
use cardrec::training::export::export_training_cards;
use common::*;
use image::{DynamicImage, RgbImage};

fn full_sheet() -> Sheet {
    Sheet {
        cols: 8,
        rows: 7,
        card: 40,
        gap: 20,
    }
}

fn build(
    sheet: &DynamicImage,
    labels: &str,
    exclusion: &Exclusion,
    config: &Config,
) -> Result<Corpus, Error> {
    Corpus::build(sheet, &Labels::parse(labels)?, exclusion, config)
}

#[test]
fn full_sheet_yields_one_template_per_card() {
    let sheet = full_sheet();
    let img = sheet.render(|i| (i % 4) as u32 + 1);

    let corpus = build(&img, &labels_text(56), &Exclusion::default(), &small_config(56))
        .expect("Failed to build corpus");

    assert_eq!(corpus.len(), 56);
    assert_eq!(corpus.expected_cards(), 56);
    let (rank, suit) = label_of(9);
    assert_eq!(corpus.get(9).map(|t| &t.label), Some(&CardLabel::new(rank, suit)));
    assert!(corpus.iter().all(|(_, t)| t.features.dimensions() == (150, 150)));
    assert!(corpus.iter().all(|(_, t)| t.smoothed.dimensions() == (150, 150)));
    assert!(corpus.iter().map(|(k, _)| k).eq(0..56));
}

#[test]
fn missing_label_is_an_error() {
    let img = full_sheet().render(|_| 1);
    let err = build(&img, &labels_text(55), &Exclusion::default(), &small_config(56)).unwrap_err();
    assert!(matches!(err, Error::MissingLabel(55)), "{err}");
}

#[test]
fn wrong_card_count_is_an_error() {
    let sheet = Sheet {
        cols: 10,
        rows: 5,
        card: 40,
        gap: 20,
    };
    let img = sheet.render(|_| 1);

    let err = build(&img, &labels_text(56), &Exclusion::default(), &small_config(56)).unwrap_err();
    assert!(
        matches!(err, Error::CandidateCount { expected: 56, found: 50 }),
        "{err}"
    );
}

#[test]
fn strict_ordering_rejects_equal_areas() {
    let sheet = Sheet {
        cols: 3,
        rows: 1,
        card: 50,
        gap: 20,
    };
    let img = sheet.render(|_| 1);
    let mut config = small_config(3);

    assert!(build(&img, &labels_text(3), &Exclusion::default(), &config).is_ok());

    config.training.strict_ordering = true;
    let err = build(&img, &labels_text(3), &Exclusion::default(), &config).unwrap_err();
    assert!(
        matches!(err, Error::AmbiguousOrdering { first: 0, second: 1, .. }),
        "{err}"
    );
}

#[test]
fn distinct_sizes_are_labeled_largest_first() {
    // Smallest card on the left so reading order and size order disagree.
    let mut img = RgbImage::from_pixel(500, 200, TABLE);
    draw_card(&mut img, 20, 40, 40, 40, 4);
    draw_card(&mut img, 80, 40, 60, 60, 3);
    draw_card(&mut img, 160, 40, 80, 80, 2);
    draw_card(&mut img, 260, 40, 100, 100, 1);
    let img = DynamicImage::ImageRgb8(img);

    let mut config = small_config(4);
    config.training.strict_ordering = true;
    let corpus = build(&img, &labels_text(4), &Exclusion::default(), &config)
        .expect("Failed to build corpus");
    assert_eq!(corpus.len(), 4);

    let matcher = Matcher::new(config.matching.clone());
    for key in 0..4 {
        let pips = key as u32 + 1;
        let query = similarity::features(&rectified_card(150, pips), &matcher.config);
        let best = matcher.best_template(&corpus, &query).expect("non-empty corpus");
        assert_eq!(best.key, key, "card with {pips} pips");
    }
}

#[test]
fn excluded_cards_are_left_out() {
    let img = full_sheet().render(|i| (i % 4) as u32 + 1);
    let config = small_config(56);

    let no_spades = Exclusion::new(Vec::<String>::new(), ["S"]);
    let corpus =
        build(&img, &labels_text(56), &no_spades, &config).expect("Failed to build corpus");
    assert_eq!(corpus.len(), 42);
    assert_eq!(corpus.expected_cards(), 56);
    assert!(corpus.iter().all(|(_, t)| t.label.suit != "S"));

    let mixed = Exclusion::new(["A"], ["H"]);
    let corpus = build(&img, &labels_text(56), &mixed, &config).expect("Failed to build corpus");
    assert_eq!(corpus.len(), 39);
    assert!(corpus.get(0).is_none());
    assert!(corpus.get(2).is_none());
    assert_eq!(corpus.get(4).map(|t| &t.label), Some(&CardLabel::new("2", "S")));
}

#[test]
fn corpus_loads_from_files() {
    let sheet = Sheet {
        cols: 2,
        rows: 2,
        card: 60,
        gap: 30,
    };
    let png = temp_png(&sheet.render(|i| i as u32 + 1));
    let labels = temp_text_file(&labels_text(4));

    let corpus = Corpus::from_files(
        png.path(),
        labels.path(),
        &Exclusion::default(),
        &small_config(4),
    )
    .expect("Failed to load corpus");
    assert_eq!(corpus.len(), 4);

    let err = Corpus::from_files(
        png.path().with_extension("missing"),
        labels.path(),
        &Exclusion::default(),
        &small_config(4),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err}");
}

#[test]
fn export_sorts_cards_by_suit_and_rank() {
    let sheet = Sheet {
        cols: 4,
        rows: 2,
        card: 50,
        gap: 20,
    };
    let img = sheet.render(|i| (i % 4) as u32 + 1);
    let labels = Labels::parse(&labels_text(8)).expect("Failed to parse labels");
    let config = small_config(8);
    let out = tempfile::tempdir().expect("Failed to create temp dir");

    let written = export_training_cards(&img, &labels, &config, out.path()).expect("export");
    assert_eq!(written.len(), 8);
    assert_eq!(written[0], out.path().join("S").join("A").join("A-0.png"));
    assert_eq!(written[5], out.path().join("C").join("2").join("2-0.png"));

    let saved = image::open(&written[0]).expect("Failed to open exported card");
    assert_eq!((saved.width(), saved.height()), (150, 150));

    let again = export_training_cards(&img, &labels, &config, out.path()).expect("export");
    assert_eq!(again[0], out.path().join("S").join("A").join("A-1.png"));
    assert!(written[0].exists());
}
