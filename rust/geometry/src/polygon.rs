// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon-with-holes type and hole-aware net area.
//!
//! Hole classification is structural: the first ring of a clipper shape is
//! the outer boundary, every later ring is a hole. Winding direction is
//! deliberately ignored here. The clipping primitive does not guarantee
//! hole winding opposite to the outer ring, and classifying by winding
//! makes holes with matching winding get *added* to the area instead of
//! subtracted, producing net areas larger than the original surface.

use crate::ring::{ring_area, Ring};
use smallvec::SmallVec;

/// A single polygon: one outer boundary plus zero or more holes.
///
/// The outer/hole split is positional, never derived from winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Outer boundary ring
    pub outer: Ring,
    /// Interior hole rings; most polygons carry 0-2
    pub holes: SmallVec<[Ring; 2]>,
}

impl Polygon {
    /// Create a polygon from an outer boundary with no holes
    pub fn from_outer(outer: Ring) -> Self {
        Self {
            outer,
            holes: SmallVec::new(),
        }
    }

    /// Add a hole ring
    pub fn add_hole(&mut self, hole: Ring) {
        self.holes.push(hole);
    }

    /// Iterate outer ring first, then holes
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }
}

/// Net area of one polygon: outer area minus the area of every hole,
/// clamped at zero. Indices decide hole-ness, winding never does.
pub fn polygon_net_area(polygon: &Polygon) -> f64 {
    let mut net = ring_area(&polygon.outer);

    for hole in &polygon.holes {
        net -= ring_area(hole);
    }

    net.max(0.0)
}

/// Net area summed over every polygon of a multipolygon
pub fn multipolygon_net_area(polygons: &[Polygon]) -> f64 {
    polygons.iter().map(polygon_net_area).sum::<f64>().abs()
}
