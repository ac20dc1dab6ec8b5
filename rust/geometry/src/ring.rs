// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ring normalization and scalar polygon math (shoelace area, perimeter,
//! centroid, bounds). Pure functions with no dependency on the boolean
//! clipping primitive.

use nalgebra::Point2;

/// A single closed polygon boundary (outer or hole), in meters.
pub type Ring = Vec<Point2<f64>>;

/// Consecutive points closer than this are treated as the same vertex.
pub const POINT_EPSILON: f64 = 1e-10;

/// Clean a raw point sequence into a well-formed closed ring.
///
/// Removes consecutive near-identical points, strips an explicit closing
/// duplicate if present, and re-closes the ring so the last point repeats
/// the first. A sequence with fewer than 3 distinct vertices is degenerate
/// and yields the empty ring (zero area, zero perimeter) rather than an
/// error; callers treat it as empty geometry.
///
/// Idempotent: normalizing a normalized ring reproduces it exactly.
pub fn normalize_ring(points: &[Point2<f64>]) -> Ring {
    let mut out: Ring = Vec::with_capacity(points.len() + 1);

    for p in points {
        let duplicate = out.last().map(|q| points_coincide(p, q)).unwrap_or(false);
        if !duplicate {
            out.push(*p);
        }
    }

    // Strip the closing duplicate(s) before the vertex count check
    while out.len() > 1 {
        let closes = points_coincide(&out[0], &out[out.len() - 1]);
        if !closes {
            break;
        }
        out.pop();
    }

    if out.len() < 3 {
        return Ring::new();
    }

    let first = out[0];
    out.push(first);
    out
}

/// Check whether two points coincide within [`POINT_EPSILON`]
#[inline]
pub fn points_coincide(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    (a.x - b.x).abs() <= POINT_EPSILON && (a.y - b.y).abs() <= POINT_EPSILON
}

/// Compute the signed shoelace area of a ring.
/// Positive = counter-clockwise, negative = clockwise.
///
/// Works on both closed and open rings: the wrap-around edge contributes
/// zero when the ring is explicitly closed.
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    let n = ring.len();

    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        sum += a.x * b.y;
        sum -= b.x * a.y;
    }

    sum * 0.5
}

/// Absolute shoelace area of a ring
#[inline]
pub fn ring_area(ring: &[Point2<f64>]) -> f64 {
    signed_area(ring).abs()
}

/// Sum of consecutive edge lengths of a closed ring
pub fn ring_perimeter(ring: &[Point2<f64>]) -> f64 {
    if ring.len() < 2 {
        return 0.0;
    }

    let n = ring.len();
    let mut length = 0.0;

    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        length += (b - a).norm();
    }

    length
}

/// Arithmetic mean of the ring's vertices.
///
/// Not area-weighted; good enough for label placement. The closing
/// duplicate is excluded so the first vertex is not counted twice.
pub fn ring_centroid(ring: &[Point2<f64>]) -> Option<Point2<f64>> {
    if ring.is_empty() {
        return None;
    }

    let closed = ring.len() > 1 && points_coincide(&ring[0], &ring[ring.len() - 1]);
    let vertices = if closed { &ring[..ring.len() - 1] } else { ring };

    let mut x = 0.0;
    let mut y = 0.0;
    for p in vertices {
        x += p.x;
        y += p.y;
    }

    let count = vertices.len() as f64;
    Some(Point2::new(x / count, y / count))
}

/// Compute the axis-aligned bounding box of a ring
pub fn ring_bounds(ring: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    if ring.is_empty() {
        return None;
    }

    let mut min = ring[0];
    let mut max = ring[0];

    for p in ring.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Check if two bounding boxes overlap
pub fn bounds_overlap(
    a_min: &Point2<f64>,
    a_max: &Point2<f64>,
    b_min: &Point2<f64>,
    b_max: &Point2<f64>,
) -> bool {
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}
