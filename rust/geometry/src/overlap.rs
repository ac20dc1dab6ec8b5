// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overlap area between a surface boundary and a cutout boundary.

use crate::bool2d;
use crate::polygon::multipolygon_net_area;
use crate::ring::{bounds_overlap, normalize_ring, ring_bounds};
use nalgebra::Point2;
use tracing::warn;

/// Area common to a surface boundary and a cutout boundary, in square
/// meters, always >= 0.
///
/// This is how much of the cutout actually falls within the surface; a
/// cutout extending partially outside contributes only the contained
/// part. Degenerate rings, disjoint bounds and clipping failures all
/// yield 0.0. The UI renders the magnitude with a leading minus sign;
/// this function never returns a negative value.
pub fn overlap_area(surface_boundary: &[Point2<f64>], cutout_boundary: &[Point2<f64>]) -> f64 {
    let surface = normalize_ring(surface_boundary);
    let cutout = normalize_ring(cutout_boundary);
    if surface.is_empty() || cutout.is_empty() {
        return 0.0;
    }

    // Cheap rejection before running the clipper
    if let (Some((s_min, s_max)), Some((c_min, c_max))) =
        (ring_bounds(&surface), ring_bounds(&cutout))
    {
        if !bounds_overlap(&s_min, &s_max, &c_min, &c_max) {
            return 0.0;
        }
    }

    match bool2d::intersection(&surface, &cutout) {
        Ok(pieces) => multipolygon_net_area(&pieces),
        Err(err) => {
            warn!(error = %err, "overlap intersection failed, reporting zero");
            0.0
        }
    }
}
