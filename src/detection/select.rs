use crate::detection::geometry::quad_contains;
use crate::models::{Point, RegionCandidate};

/// First candidate, in ranked order, whose quad contains `target`.
///
/// Candidates arrive largest first, so among nested or overlapping shapes the
/// larger one wins. `None` means no card sits at the target.
pub fn select_card(candidates: &[RegionCandidate], target: Point) -> Option<&RegionCandidate> {
    candidates.iter().find(|c| quad_contains(&c.quad, target))
}

/// Geometric centre of a `width` x `height` image.
pub fn image_center(width: u32, height: u32) -> Point {
    Point::new((width / 2) as i32, (height / 2) as i32)
}
