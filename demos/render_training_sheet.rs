//! Renders a synthetic 56-card training sheet, its label file and one query
//! photo, for trying the CLI without a camera:
//!
//! ```text
//! cargo run --example render_training_sheet -- out/
//! cargo run -- --training-image out/training_sheet.png \
//!     --training-labels out/training_labels.txt classify out/query.png
//! ```

use std::fs;
use std::path::PathBuf;

use image::imageops::rotate90;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

const SUITS: [&str; 4] = ["S", "C", "H", "D"];
const RANKS: [&str; 14] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "X",
];

const CARD: u32 = 90;
const GAP: u32 = 30;
const COLS: u32 = 8;
const ROWS: u32 = 7;

/// Rank as a 4-bit bar code along the top edge, suit as a block whose
/// position along the bottom edge encodes it.
fn draw_card(img: &mut RgbImage, x: i32, y: i32, rank: usize, suit: usize) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(CARD, CARD), Rgb([240, 240, 240]));

    let ink = Rgb([30, 30, 30]);
    for bit in 0..4 {
        if (rank + 1) & (1 << bit) != 0 {
            let bx = x + 10 + bit as i32 * 18;
            draw_filled_rect_mut(img, Rect::at(bx, y + 10).of_size(12, 24), ink);
        }
    }
    let sx = x + 10 + suit as i32 * 18;
    draw_filled_rect_mut(img, Rect::at(sx, y + 56).of_size(14, 14), ink);
}

fn main() -> anyhow::Result<()> {
    let out = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&out)?;

    let width = GAP + COLS * (CARD + GAP);
    let height = GAP + ROWS * (CARD + GAP);
    let mut sheet = RgbImage::from_pixel(width, height, Rgb([20, 20, 20]));
    let mut labels = String::from("# index rank suit, in reading order\n");

    for i in 0..(COLS * ROWS) as usize {
        let (rank, suit) = (i / 4, i % 4);
        let col = i as u32 % COLS;
        let row = i as u32 / COLS;
        let x = (GAP + col * (CARD + GAP)) as i32;
        let y = (GAP + row * (CARD + GAP)) as i32;
        draw_card(&mut sheet, x, y, rank, suit);
        labels.push_str(&format!("{} {} {}\n", i, RANKS[rank], SUITS[suit]));
    }

    let sheet_path = out.join("training_sheet.png");
    sheet.save(&sheet_path)?;
    fs::write(out.join("training_labels.txt"), labels)?;

    // Nine of hearts, turned a quarter.
    let mut query = RgbImage::from_pixel(400, 400, Rgb([20, 20, 20]));
    draw_card(&mut query, 155, 155, 8, 2);
    let query_path = out.join("query.png");
    rotate90(&query).save(&query_path)?;

    println!(
        "Created {} ({}x{}, {} cards), training_labels.txt and query.png in {}",
        sheet_path.display(),
        width,
        height,
        COLS * ROWS,
        out.display()
    );
    Ok(())
}
