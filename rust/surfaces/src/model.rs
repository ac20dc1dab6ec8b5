// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted domain records: measured surfaces and cutouts.
//!
//! Geometry is stored as normalized closed rings in meters. A surface's
//! boundary is immutable after creation; the only fields this core
//! mutates afterwards are `cutout_ids` and `net_value`.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;
use takeoff_geometry::{normalize_ring, ring_area, ring_perimeter, Ring};

/// Identifier of a measured surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Identifier of a cutout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CutoutId(pub u64);

/// Identifier of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CutoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authoring shape of a cutout, retained for UI display.
/// Ellipses arrive pre-tessellated; the boundary is always a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Polygon,
    Ellipse,
}

/// Measurement unit of a surface's net value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Area measurement (m²)
    SquareMeter,
    /// Linear measurement (m); cutouts do not apply
    Meter,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::SquareMeter => write!(f, "m²"),
            Unit::Meter => write!(f, "m"),
        }
    }
}

/// A measured entity on a plan: an area, an opening, a linear trim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    pub id: SurfaceId,
    pub plan_id: PlanId,
    pub name: String,
    /// Outer boundary, normalized and closed. Immutable after creation;
    /// holes only ever come from applied cutouts.
    pub boundary: Ring,
    /// Applied cutouts in attachment order. Application order for
    /// geometry is ascending creation sequence, not this order.
    pub cutout_ids: Vec<CutoutId>,
    /// Current net value (area minus cutout overlaps, or length)
    pub net_value: f64,
    pub unit: Unit,
}

impl Surface {
    /// Create a surface from raw boundary points.
    /// Starts with no cutouts and the boundary's own measure as net value.
    pub fn new(
        id: SurfaceId,
        plan_id: PlanId,
        name: impl Into<String>,
        boundary: &[Point2<f64>],
        unit: Unit,
    ) -> Self {
        let boundary = normalize_ring(boundary);
        let net_value = match unit {
            Unit::SquareMeter => ring_area(&boundary),
            Unit::Meter => ring_perimeter(&boundary),
        };

        Self {
            id,
            plan_id,
            name: name.into(),
            boundary,
            cutout_ids: Vec::new(),
            net_value,
            unit,
        }
    }

    /// Whether this surface carries an area value that cutouts apply to
    pub fn is_area(&self) -> bool {
        self.unit == Unit::SquareMeter
    }

    /// The surface's value before any cutouts
    pub fn original_value(&self) -> f64 {
        match self.unit {
            Unit::SquareMeter => ring_area(&self.boundary),
            Unit::Meter => ring_perimeter(&self.boundary),
        }
    }

    /// Whether this surface references the given cutout
    pub fn references(&self, cutout_id: CutoutId) -> bool {
        self.cutout_ids.contains(&cutout_id)
    }
}

/// A user-drawn shape subtracted from one or more surfaces.
/// Geometry is immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cutout {
    pub id: CutoutId,
    pub plan_id: PlanId,
    /// Sequential display name scoped to the plan
    pub name: String,
    /// Normalized closed boundary ring
    pub boundary: Ring,
    pub shape_kind: ShapeKind,
    /// Store-assigned monotonic sequence; the deterministic application
    /// order (ascending, ties by id)
    pub created_at: u64,
}

impl Cutout {
    /// Absolute area of the cutout's own boundary
    pub fn area(&self) -> f64 {
        ring_area(&self.boundary)
    }
}
