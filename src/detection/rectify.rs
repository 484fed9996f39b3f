use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

use crate::models::Quad;

/// Corners of the `size` x `size` target square in quad order.
pub fn canonical_corners(size: u32) -> [(f32, f32); 4] {
    let m = size.saturating_sub(1) as f32;
    [(0.0, 0.0), (m, 0.0), (m, m), (0.0, m)]
}

/// Homography taking the quad's corners onto the canonical square.
pub fn card_projection(quad: &Quad, size: u32) -> Option<Projection> {
    let from = quad.corners().map(<(f32, f32)>::from);
    Projection::from_control_points(from, canonical_corners(size))
}

/// Warp the region bounded by `quad` onto a `size` x `size` square.
///
/// Removes perspective distortion. Which way up the card face ends up
/// depends on which physical corner landed top-left; that is left to the
/// matcher. Returns `None` when the quad is degenerate.
pub fn rectify(image: &RgbImage, quad: &Quad, size: u32) -> Option<RgbImage> {
    let projection = card_projection(quad, size)?;
    let mut out = RgbImage::new(size, size);
    warp_into(image, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut out);
    Some(out)
}
