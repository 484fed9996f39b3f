use std::fmt;

use image::RgbImage;
use serde::Serialize;

/// Integer pixel coordinate, x to the right and y down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<imageproc::point::Point<i32>> for Point {
    fn from(p: imageproc::point::Point<i32>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point> for imageproc::point::Point<i32> {
    fn from(p: Point) -> Self {
        imageproc::point::Point::new(p.x, p.y)
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x as f32, p.y as f32)
    }
}

/// Closed boundary traced around one connected foreground region.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area from the shoelace formula over the traced points.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
            })
            .sum();
        twice.abs() as f64 / 2.0
    }

    /// Raster-first point: smallest y, then smallest x.
    pub fn origin(&self) -> Option<Point> {
        self.points.iter().copied().min_by_key(|p| (p.y, p.x))
    }

    /// True when the contour reaches all four edges of a `width` x `height`
    /// image, i.e. the region is the frame itself rather than something in it.
    pub fn spans_frame(&self, width: u32, height: u32) -> bool {
        let max_x = width as i32 - 1;
        let max_y = height as i32 - 1;
        let left = self.points.iter().any(|p| p.x <= 0);
        let top = self.points.iter().any(|p| p.y <= 0);
        let right = self.points.iter().any(|p| p.x >= max_x);
        let bottom = self.points.iter().any(|p| p.y >= max_y);
        left && top && right && bottom
    }
}

/// Four corners ordered top-left, top-right, bottom-right, bottom-left.
///
/// Only [`Quad::from_points`] builds one, so the ordering always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad {
    corners: [Point; 4],
}

impl Quad {
    /// Order four arbitrary points into a quad.
    pub fn from_points(points: [Point; 4]) -> Self {
        Self {
            corners: crate::detection::geometry::order_corners(points),
        }
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }
}

/// One ranked output of region extraction.
#[derive(Debug, Clone)]
pub struct RegionCandidate {
    /// Boundary as traced from the binarized image.
    pub contour: Contour,
    /// Simplified polygon, at least four vertices.
    pub polygon: Vec<Point>,
    /// First four polygon vertices in canonical corner order.
    pub quad: Quad,
    /// Area enclosed by `contour`.
    pub area: f64,
}

/// A card cut out of a photo and warped onto the canonical square.
#[derive(Debug, Clone)]
pub struct DetectedCard {
    pub image: RgbImage,
    pub polygon: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardLabel {
    pub rank: String,
    pub suit: String,
}

impl CardLabel {
    pub fn new(rank: impl Into<String>, suit: impl Into<String>) -> Self {
        Self {
            rank: rank.into(),
            suit: suit.into(),
        }
    }
}

impl fmt::Display for CardLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rank, self.suit)
    }
}

/// Outcome of classifying one photo.
///
/// `label` is `None` when no card region contained the target point. The
/// polygon is kept whenever a region was selected, so callers can draw it
/// even on a miss.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: Option<CardLabel>,
    pub contour: Option<Vec<Point>>,
    /// Dissimilarity of the winning template, lower is closer.
    pub score: Option<u64>,
    /// Corpus key of the winning template.
    pub template: Option<usize>,
}

impl Classification {
    pub fn no_match(contour: Option<Vec<Point>>) -> Self {
        Self {
            label: None,
            contour,
            score: None,
            template: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.label.is_some()
    }
}
