// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Takeoff Geometry
//!
//! Boolean-polygon cutout engine for plan takeoff: given a measured
//! surface's outer boundary and its cutout shapes, produce the net area,
//! net perimeter and renderable ring set, including surfaces with holes.
//!
//! The engine consumes plain point geometry and returns plain point
//! geometry plus scalar totals. It does not parse files, render pixels or
//! persist anything. Boolean clipping is delegated to
//! [i_overlay](https://docs.rs/i_overlay) behind the [`bool2d`] wrapper,
//! which is the only module allowed to rely on the primitive's output
//! contract.

pub mod bool2d;
pub mod cache;
pub mod clip;
pub mod error;
pub mod overlap;
pub mod polygon;
pub mod ring;
pub mod validate;

// Re-export nalgebra types for convenience
pub use nalgebra::Point2;

pub use cache::ClipCache;
pub use clip::{clipped_geometry, ClippedGeometry};
pub use error::{Error, Result};
pub use overlap::overlap_area;
pub use polygon::{multipolygon_net_area, polygon_net_area, Polygon};
pub use ring::{normalize_ring, ring_area, ring_centroid, ring_perimeter, signed_area, Ring};
