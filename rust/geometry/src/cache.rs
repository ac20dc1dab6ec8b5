// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip-result caching keyed by geometry content hash.
//!
//! A redraw may otherwise recompute the full cutout subtraction once per
//! paint. The key covers the boundary coordinates and every applied
//! cutout's coordinates in application order, so any geometry or
//! assignment change lands on a fresh key.

use crate::clip::{clipped_geometry, ClippedGeometry};
use nalgebra::Point2;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Single-threaded cache of clipped surface geometry.
///
/// Lives on the rendering side of the event loop; not `Sync` by design.
#[derive(Debug, Default)]
pub struct ClipCache {
    entries: RefCell<FxHashMap<u64, Arc<ClippedGeometry>>>,
}

impl ClipCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the clipped geometry for a boundary and its ordered
    /// cutouts, computing and caching it on a miss.
    ///
    /// Hash-only lookup without a full equality check: FxHasher's 64-bit
    /// output makes collisions on plan-scale inputs extremely rare.
    pub fn clipped(
        &self,
        boundary: &[Point2<f64>],
        cutouts: &[&[Point2<f64>]],
    ) -> Arc<ClippedGeometry> {
        let key = Self::geometry_key(boundary, cutouts);

        {
            let entries = self.entries.borrow();
            if let Some(hit) = entries.get(&key) {
                return Arc::clone(hit);
            }
        }

        let computed = Arc::new(clipped_geometry(boundary, cutouts));
        {
            let mut entries = self.entries.borrow_mut();
            entries.insert(key, Arc::clone(&computed));
        }
        computed
    }

    /// Drop all cached results
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Hash ring coordinates as bit patterns for reliable f64 hashing
    fn geometry_key(boundary: &[Point2<f64>], cutouts: &[&[Point2<f64>]]) -> u64 {
        use rustc_hash::FxHasher;
        let mut hasher = FxHasher::default();

        // Lengths first for fast rejection
        boundary.len().hash(&mut hasher);
        cutouts.len().hash(&mut hasher);

        for p in boundary {
            p.x.to_bits().hash(&mut hasher);
            p.y.to_bits().hash(&mut hasher);
        }

        for cutout in cutouts {
            cutout.len().hash(&mut hasher);
            for p in *cutout {
                p.x.to_bits().hash(&mut hasher);
                p.y.to_bits().hash(&mut hasher);
            }
        }

        hasher.finish()
    }
}
