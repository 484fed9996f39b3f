use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use log::debug;

use crate::models::{Contour, Point, Quad, RegionCandidate};

/// Outer boundaries of the top-level foreground regions of a binary image.
pub fn external_contours(binary: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| Contour::new(c.points.into_iter().map(Point::from).collect()))
        .collect()
}

/// Sort by enclosed area, largest first, and keep at most `limit`.
///
/// Equal areas fall back to reading order of each contour's raster-first
/// point so the ranking never depends on tracing order.
pub fn rank_by_area(contours: Vec<Contour>, limit: usize) -> Vec<(Contour, f64)> {
    let mut ranked: Vec<(Contour, f64, (i32, i32))> = contours
        .into_iter()
        .map(|c| {
            let area = c.area();
            let origin = c.origin().map_or((i32::MAX, i32::MAX), |p| (p.y, p.x));
            (c, area, origin)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
    ranked.truncate(limit);
    ranked.into_iter().map(|(c, area, _)| (c, area)).collect()
}

/// Douglas-Peucker simplification of a closed contour with a tolerance
/// proportional to its perimeter. Returns `None` for contours too small to
/// simplify.
///
/// The loop is cut at its raster-first point, which is always a hull vertex,
/// and at the point farthest from it; both halves are simplified as open
/// chains so no spurious vertex survives where the trace closes.
pub fn simplify(contour: &Contour, epsilon_fraction: f64) -> Option<Vec<Point>> {
    if contour.len() < 3 {
        return None;
    }

    let start = contour
        .points
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| (p.y, p.x))
        .map(|(i, _)| i)?;
    let points: Vec<imageproc::point::Point<i32>> = contour.points[start..]
        .iter()
        .chain(&contour.points[..start])
        .copied()
        .map(Into::into)
        .collect();

    let epsilon = epsilon_fraction * arc_length(&points, true);
    if epsilon <= 0.0 {
        return None;
    }

    let origin = points[0];
    let distance = |p: &imageproc::point::Point<i32>| {
        let (dx, dy) = ((p.x - origin.x) as i64, (p.y - origin.y) as i64);
        dx * dx + dy * dy
    };
    let far = (1..points.len()).max_by_key(|&i| distance(&points[i]))?;
    if distance(&points[far]) == 0 {
        return None;
    }

    let mut closing: Vec<imageproc::point::Point<i32>> = points[far..].to_vec();
    closing.push(origin);

    let mut polygon: Vec<Point> = approximate_polygon_dp(&points[..=far], epsilon, false)
        .into_iter()
        .chain(approximate_polygon_dp(&closing, epsilon, false).into_iter().skip(1))
        .map(Point::from)
        .collect();

    polygon.dedup();
    if polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    Some(polygon)
}

/// Ranked quadrilateral candidates from a binary image, largest first.
///
/// Regions that simplify to fewer than four vertices are dropped. When
/// `reject_frame` is set, regions reaching all four image edges are dropped
/// before ranking. Cards flush against one or two edges are kept.
pub fn find_regions(
    binary: &GrayImage,
    limit: usize,
    epsilon_fraction: f64,
    reject_frame: bool,
) -> Vec<RegionCandidate> {
    let (width, height) = binary.dimensions();
    let contours: Vec<Contour> = external_contours(binary)
        .into_iter()
        .filter(|c| !(reject_frame && c.spans_frame(width, height)))
        .collect();

    debug!("Found {} external contours", contours.len());

    let mut candidates = Vec::new();
    for (contour, area) in rank_by_area(contours, limit) {
        let Some(polygon) = simplify(&contour, epsilon_fraction) else {
            continue;
        };
        if polygon.len() < 4 {
            debug!(
                "Skipping region of area {:.0}: simplifies to {} vertices",
                area,
                polygon.len()
            );
            continue;
        }

        let quad = Quad::from_points([polygon[0], polygon[1], polygon[2], polygon[3]]);
        candidates.push(RegionCandidate {
            contour,
            polygon,
            quad,
            area,
        });
    }

    debug!("Kept {} quadrilateral candidates", candidates.len());
    candidates
}
