// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sequential cutout subtraction against a surface boundary.

use crate::bool2d;
use crate::polygon::{multipolygon_net_area, Polygon};
use crate::ring::{normalize_ring, ring_area, ring_perimeter};
use nalgebra::Point2;
use tracing::warn;

/// Result of clipping a surface boundary against its cutouts.
///
/// Rings stay grouped per polygon (outer + its holes together) so a
/// renderer paints each polygon as one even-odd filled path and holes
/// appear as true gaps. There is deliberately no flattened-ring accessor:
/// filling each ring independently paints hole interiors.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedGeometry {
    /// Remaining polygons, each with its own holes
    pub polygons: Vec<Polygon>,
    /// Hole-aware net area in square meters
    pub net_area: f64,
    /// Sum of outer-ring perimeters. Hole boundaries are excluded: a
    /// cutout's internal edge is not a measurable boundary of the surface.
    pub net_perimeter: f64,
}

impl ClippedGeometry {
    /// Empty geometry: degenerate boundary or fully consumed surface
    pub fn empty() -> Self {
        Self {
            polygons: Vec::new(),
            net_area: 0.0,
            net_perimeter: 0.0,
        }
    }
}

/// Subtract cutouts from a surface boundary, one difference per cutout.
///
/// Cutouts must already be ordered deterministically by the caller
/// (ascending creation sequence). Degenerate cutouts are skipped. If a
/// difference leaves nothing, the surface is fully consumed and the
/// remaining cutouts are not applied. If the clipping primitive fails at
/// any step, the surface falls back to its pre-cutout geometry and value;
/// the failure is logged and contained to this surface.
pub fn clipped_geometry(
    boundary: &[Point2<f64>],
    cutouts: &[&[Point2<f64>]],
) -> ClippedGeometry {
    let outer = normalize_ring(boundary);
    if outer.is_empty() {
        return ClippedGeometry::empty();
    }

    let original = ClippedGeometry {
        net_area: ring_area(&outer),
        net_perimeter: ring_perimeter(&outer),
        polygons: vec![Polygon::from_outer(outer)],
    };

    if cutouts.is_empty() {
        return original;
    }

    let mut current = original.polygons.clone();

    for cutout in cutouts {
        match bool2d::difference(&current, cutout) {
            Ok(remaining) => {
                if remaining.is_empty() {
                    return ClippedGeometry::empty();
                }
                current = remaining;
            }
            Err(err) => {
                warn!(error = %err, "cutout subtraction failed, keeping pre-cutout geometry");
                return original;
            }
        }
    }

    let net_area = multipolygon_net_area(&current);
    let net_perimeter = current.iter().map(|p| ring_perimeter(&p.outer)).sum();

    ClippedGeometry {
        polygons: current,
        net_area,
        net_perimeter,
    }
}
