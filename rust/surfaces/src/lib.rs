// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Takeoff Surfaces
//!
//! Domain records and lifecycle for measured surfaces and their cutouts.
//! Geometry math lives in [takeoff-geometry](takeoff_geometry); this crate
//! owns the persisted records, the repository boundary and the
//! [`CutoutManager`], which is the only component that calls into storage.

pub mod error;
pub mod lifecycle;
pub mod model;
pub mod store;

pub use error::{Error, Result};
pub use lifecycle::{CutoutCreated, CutoutManager};
pub use model::{Cutout, CutoutId, PlanId, ShapeKind, Surface, SurfaceId, Unit};
pub use store::{MemoryStore, StoreError, SurfaceStore};

// Re-export the geometry entry points lifecycle consumers need
pub use takeoff_geometry::{ClipCache, ClippedGeometry, Point2};
