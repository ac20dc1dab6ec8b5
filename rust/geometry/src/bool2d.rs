// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defensive wrapper around the i_overlay boolean primitive.
//!
//! This is the only module that touches the clipper. The single contract
//! it relies on is structural ring ordering: the first contour of each
//! output shape is the outer boundary, every later contour is a hole.
//! Hole winding is not guaranteed consistent with the outer ring and is
//! never inspected.
//!
//! Failures of the primitive (a panic on self-intersecting or numerically
//! degenerate input) are caught at this boundary, logged, and reported as
//! [`Error::ClippingFailed`]; they never propagate as panics. An empty
//! result is a valid outcome, distinct from failure.

use crate::error::{Error, Result};
use crate::polygon::Polygon;
use crate::ring::{normalize_ring, points_coincide, Ring};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Boolean difference: subject multipolygon minus one clip ring.
///
/// A degenerate clip ring subtracts nothing and returns the subject
/// unchanged. An empty subject stays empty. `Ok(vec![])` means the clip
/// consumed the subject entirely.
pub fn difference(subject: &[Polygon], clip: &[Point2<f64>]) -> Result<Vec<Polygon>> {
    let clip_ring = normalize_ring(clip);
    if clip_ring.is_empty() {
        return Ok(subject.to_vec());
    }
    if subject.is_empty() {
        return Ok(Vec::new());
    }

    let subject_paths = polygons_to_paths(subject);
    let clip_paths = vec![ring_to_path(&clip_ring)];

    overlay_guarded(subject_paths, clip_paths, OverlayRule::Difference)
}

/// Boolean intersection of two single rings.
///
/// Degenerate input on either side yields the empty multipolygon.
pub fn intersection(a: &[Point2<f64>], b: &[Point2<f64>]) -> Result<Vec<Polygon>> {
    let ring_a = normalize_ring(a);
    let ring_b = normalize_ring(b);
    if ring_a.is_empty() || ring_b.is_empty() {
        return Ok(Vec::new());
    }

    let subject = vec![ring_to_path(&ring_a)];
    let clip = vec![ring_to_path(&ring_b)];

    overlay_guarded(subject, clip, OverlayRule::Intersect)
}

/// Run one overlay operation inside a panic guard
fn overlay_guarded(
    subject: Vec<Vec<[f64; 2]>>,
    clip: Vec<Vec<[f64; 2]>>,
    rule: OverlayRule,
) -> Result<Vec<Polygon>> {
    let shapes = catch_unwind(AssertUnwindSafe(|| {
        subject.overlay(&clip, rule, FillRule::EvenOdd)
    }))
    .map_err(|_| {
        warn!(?rule, "boolean overlay primitive panicked");
        Error::ClippingFailed(format!("overlay primitive panicked during {rule:?}"))
    })?;

    Ok(shapes_to_polygons(&shapes))
}

/// Convert a multipolygon to the clipper's path set.
///
/// All rings of all polygons are flattened into one path list; the
/// even-odd fill rule reconstructs containment, so hole winding does not
/// matter on the way in either.
fn polygons_to_paths(polygons: &[Polygon]) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::with_capacity(polygons.iter().map(|p| 1 + p.holes.len()).sum());

    for polygon in polygons {
        for ring in polygon.rings() {
            paths.push(ring_to_path(ring));
        }
    }

    paths
}

/// Convert a closed ring to a clipper path.
///
/// Clipper paths are implicitly closed, so the explicit closing duplicate
/// is dropped. No scaling or rounding: coordinates pass through exactly.
pub fn ring_to_path(ring: &[Point2<f64>]) -> Vec<[f64; 2]> {
    let closed =
        ring.len() > 1 && points_coincide(&ring[0], &ring[ring.len() - 1]);
    let vertices = if closed { &ring[..ring.len() - 1] } else { ring };

    vertices.iter().map(|p| [p.x, p.y]).collect()
}

/// Convert a clipper path back to an explicitly closed ring
pub fn path_to_ring(path: &[[f64; 2]]) -> Ring {
    let mut ring: Ring = path.iter().map(|p| Point2::new(p[0], p[1])).collect();
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}

/// Map clipper output shapes to polygons by contour index.
///
/// Contour 0 of each shape becomes the outer ring, the rest become holes.
/// Contours that fail normalization are dropped; a shape whose outer
/// contour is degenerate is dropped whole.
fn shapes_to_polygons(shapes: &[Vec<Vec<[f64; 2]>>]) -> Vec<Polygon> {
    let mut polygons = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let Some(outer_path) = shape.first() else {
            continue;
        };

        let outer = normalize_ring(&path_to_ring(outer_path));
        if outer.is_empty() {
            continue;
        }

        let mut polygon = Polygon::from_outer(outer);
        for hole_path in shape.iter().skip(1) {
            let hole = normalize_ring(&path_to_ring(hole_path));
            if !hole.is_empty() {
                polygon.add_hole(hole);
            }
        }

        polygons.push(polygon);
    }

    polygons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::multipolygon_net_area;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Ring {
        normalize_ring(&[
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ])
    }

    #[test]
    fn test_path_round_trip_is_exact() {
        let ring = square(0.3, 0.7, 9.13);
        let path = ring_to_path(&ring);
        let back = path_to_ring(&path);
        assert_eq!(ring, back);
    }

    #[test]
    fn test_difference_inner_clip_makes_hole() {
        let subject = vec![Polygon::from_outer(square(0.0, 0.0, 10.0))];
        let clip = square(2.0, 2.0, 2.0);

        let result = difference(&subject, &clip).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes.len(), 1);
        assert_relative_eq!(multipolygon_net_area(&result), 96.0, epsilon = 1e-3);
    }

    #[test]
    fn test_difference_full_cover_is_empty() {
        let subject = vec![Polygon::from_outer(square(0.0, 0.0, 10.0))];
        let clip = square(0.0, 0.0, 10.0);

        let result = difference(&subject, &clip).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_difference_degenerate_clip_is_noop() {
        let subject = vec![Polygon::from_outer(square(0.0, 0.0, 10.0))];
        let clip = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0)];

        let result = difference(&subject, &clip).unwrap();
        assert_eq!(result, subject);
    }

    #[test]
    fn test_difference_can_split_subject() {
        // A band across the middle splits the square in two
        let subject = vec![Polygon::from_outer(square(0.0, 0.0, 10.0))];
        let clip = normalize_ring(&[
            Point2::new(-1.0, 4.0),
            Point2::new(11.0, 4.0),
            Point2::new(11.0, 6.0),
            Point2::new(-1.0, 6.0),
        ]);

        let result = difference(&subject, &clip).unwrap();
        assert_eq!(result.len(), 2);
        assert_relative_eq!(multipolygon_net_area(&result), 80.0, epsilon = 1e-3);
    }

    #[test]
    fn test_intersection_partial_overlap() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(8.0, 8.0, 4.0);

        let result = intersection(&a, &b).unwrap();
        assert_relative_eq!(multipolygon_net_area(&result), 4.0, epsilon = 1e-3);
    }

    #[test]
    fn test_intersection_disjoint_is_empty() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(20.0, 20.0, 4.0);

        let result = intersection(&a, &b).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_intersection_degenerate_input_is_empty() {
        let a = square(0.0, 0.0, 10.0);
        let b = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];

        assert!(intersection(&a, &b).unwrap().is_empty());
        assert!(intersection(&b, &a).unwrap().is_empty());
    }
}
