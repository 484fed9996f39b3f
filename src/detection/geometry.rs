use crate::models::{Point, Quad};

/// Order four points as top-left, top-right, bottom-right, bottom-left.
///
/// Top-left has the smallest `x + y`, bottom-right the largest. Top-right
/// has the smallest `y - x`, bottom-left the largest. On ties the earlier
/// input point wins.
pub fn order_corners(points: [Point; 4]) -> [Point; 4] {
    let sum = |p: &Point| p.x as i64 + p.y as i64;
    let diff = |p: &Point| p.y as i64 - p.x as i64;

    [
        extreme(&points, sum, false),
        extreme(&points, diff, false),
        extreme(&points, sum, true),
        extreme(&points, diff, true),
    ]
}

/// First point with the smallest (or largest) key.
fn extreme(points: &[Point; 4], key: impl Fn(&Point) -> i64, largest: bool) -> Point {
    let mut best = 0;
    for i in 1..points.len() {
        let (k, b) = (key(&points[i]), key(&points[best]));
        if (largest && k > b) || (!largest && k < b) {
            best = i;
        }
    }
    points[best]
}

/// True when `point` is on the non-negative side of the directed line from
/// `b` to `a` (z component of the 2D cross product).
pub fn signed_side(a: Point, b: Point, point: Point) -> bool {
    let cross = (a.x as i64 - b.x as i64) * (point.y as i64 - b.y as i64)
        - (a.y as i64 - b.y as i64) * (point.x as i64 - b.x as i64);
    cross >= 0
}

/// Point-in-quadrilateral test that works for either winding direction.
pub fn is_inside(point: Point, corners: &[Point; 4]) -> bool {
    let sides = [
        signed_side(corners[0], corners[1], point),
        signed_side(corners[1], corners[2], point),
        signed_side(corners[2], corners[3], point),
        signed_side(corners[3], corners[0], point),
    ];
    sides.iter().all(|&s| s) || sides.iter().all(|&s| !s)
}

/// [`is_inside`] against an ordered quad.
pub fn quad_contains(quad: &Quad, point: Point) -> bool {
    is_inside(point, quad.corners())
}
