use std::io::Write;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tempfile::NamedTempFile;

pub const TABLE: Rgb<u8> = Rgb([20, 20, 20]);
pub const PAPER: Rgb<u8> = Rgb([240, 240, 240]);
pub const INK: Rgb<u8> = Rgb([30, 30, 30]);

/// Suits and ranks used to label synthetic sheets, in label-file order.
pub const SUITS: [&str; 4] = ["S", "C", "H", "D"];
pub const RANKS: [&str; 14] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "X",
];

/// Draw a card with `pips` dark squares along its top edge.
///
/// Cards with different pip counts are never rotations of each other.
pub fn draw_card(img: &mut RgbImage, x: i32, y: i32, width: u32, height: u32, pips: u32) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(width, height), PAPER);

    let side = width / 6;
    for i in 0..pips {
        let px = x + (width / 8 + i * (width / 5)) as i32;
        let py = y + (height / 6) as i32;
        draw_filled_rect_mut(img, Rect::at(px, py).of_size(side, side), INK);
    }
}

/// A `canvas` x `canvas` photo with one square card of side `card` centred
/// on it.
pub fn card_photo(canvas: u32, card: u32, pips: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(canvas, canvas, TABLE);
    let offset = ((canvas - card) / 2) as i32;
    draw_card(&mut img, offset, offset, card, card, pips);
    img
}

/// A card already warped onto the `size` x `size` canonical square.
pub fn rectified_card(size: u32, pips: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, PAPER);
    draw_card(&mut img, 0, 0, size, size, pips);
    img
}

/// Layout of a synthetic training sheet.
pub struct Sheet {
    pub cols: u32,
    pub rows: u32,
    pub card: u32,
    pub gap: u32,
}

impl Sheet {
    pub fn count(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    /// Render the sheet. The card at reading-order position `i` gets
    /// `pips(i)` pips.
    pub fn render(&self, pips: impl Fn(usize) -> u32) -> DynamicImage {
        let width = self.gap + self.cols * (self.card + self.gap);
        let height = self.gap + self.rows * (self.card + self.gap);
        let mut img = RgbImage::from_pixel(width, height, TABLE);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let i = (row * self.cols + col) as usize;
                let x = (self.gap + col * (self.card + self.gap)) as i32;
                let y = (self.gap + row * (self.card + self.gap)) as i32;
                draw_card(&mut img, x, y, self.card, self.card, pips(i));
            }
        }
        DynamicImage::ImageRgb8(img)
    }
}

/// Label file text for the first `count` cards: `index rank suit` with the
/// suit cycling fastest.
pub fn labels_text(count: usize) -> String {
    (0..count)
        .map(|i| format!("{} {} {}\n", i, RANKS[(i / 4) % RANKS.len()], SUITS[i % 4]))
        .collect()
}

/// Rank and suit that [`labels_text`] assigns to card `i`.
pub fn label_of(i: usize) -> (&'static str, &'static str) {
    (RANKS[(i / 4) % RANKS.len()], SUITS[i % 4])
}

/// Writes `text` to a temp file that lives as long as the returned handle.
pub fn temp_text_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp label file");
    file.write_all(text.as_bytes())
        .expect("Failed to write temp label file");
    file
}

/// Saves `img` as a temp PNG that lives as long as the returned handle.
pub fn temp_png(img: &DynamicImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}
