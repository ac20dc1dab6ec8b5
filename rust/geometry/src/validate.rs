// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Non-fatal invariant diagnostics.
//!
//! These checks mirror the binding data-model invariants. They log loudly
//! and return the violations for test assertions, but they never panic in
//! a production path: a surface must stay usable even while its cutout
//! math is temporarily untrustworthy.

use crate::polygon::Polygon;
use crate::ring::ring_area;
use tracing::error;

/// Tolerance for scalar invariant checks, in square meters
pub const AREA_EPSILON: f64 = 1e-3;

/// Check the net-value invariants of one surface.
///
/// `overlaps` holds the overlap area of each applied cutout with the
/// surface. Returns human-readable descriptions of every violation found;
/// an empty vector means the surface is consistent.
pub fn check_surface_invariants(
    original_area: f64,
    net_area: f64,
    overlaps: &[f64],
) -> Vec<String> {
    let mut violations = Vec::new();

    if net_area < -AREA_EPSILON {
        violations.push(format!("net area {net_area} is negative"));
    }
    if net_area > original_area + AREA_EPSILON {
        violations.push(format!(
            "net area {net_area} exceeds original area {original_area}"
        ));
    }

    for (i, overlap) in overlaps.iter().enumerate() {
        if *overlap < -AREA_EPSILON {
            violations.push(format!("overlap {i} is negative ({overlap})"));
        }
        if *overlap > original_area + AREA_EPSILON {
            violations.push(format!(
                "overlap {i} ({overlap}) exceeds the surface area {original_area}"
            ));
        }
    }

    let expected = (original_area - overlaps.iter().sum::<f64>()).max(0.0);
    if (net_area - expected).abs() > AREA_EPSILON {
        violations.push(format!(
            "net area {net_area} differs from original minus overlaps ({expected})"
        ));
    }

    for violation in &violations {
        error!(%violation, "surface invariant violated");
    }

    violations
}

/// Check the structural consistency of one clipped polygon: every hole
/// must fit inside the outer ring's area.
pub fn check_polygon_invariants(polygon: &Polygon) -> Vec<String> {
    let mut violations = Vec::new();

    let outer_area = ring_area(&polygon.outer);
    let hole_area: f64 = polygon.holes.iter().map(|h| ring_area(h)).sum();

    if hole_area > outer_area + AREA_EPSILON {
        violations.push(format!(
            "hole area {hole_area} exceeds outer ring area {outer_area}"
        ));
    }

    for violation in &violations {
        error!(%violation, "polygon invariant violated");
    }

    violations
}
