// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Repository boundary for persisted surfaces and cutouts.
//!
//! The lifecycle manager is the only component that calls into storage,
//! and it does so exclusively through this trait. The geometry core never
//! sees it. Writes are per-record: there is no cross-record transaction,
//! and a failed write on one surface must not block writes to another.

use crate::model::{Cutout, CutoutId, PlanId, Surface, SurfaceId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::{Cell, RefCell};
use thiserror::Error;

/// Errors reported by a store implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Surface {0} does not exist")]
    SurfaceMissing(SurfaceId),

    #[error("Cutout {0} does not exist")]
    CutoutMissing(CutoutId),

    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

/// Narrow persistence interface for surfaces and cutouts.
///
/// Methods take `&self`; implementations use interior mutability, in line
/// with the single-threaded event-loop model of the application.
pub trait SurfaceStore {
    /// Next value of the monotonic creation sequence
    fn next_sequence(&self) -> u64;

    fn insert_cutout(&self, cutout: Cutout) -> Result<(), StoreError>;
    fn delete_cutout(&self, id: CutoutId) -> Result<(), StoreError>;
    fn get_cutout(&self, id: CutoutId) -> Option<Cutout>;
    fn cutouts_for_plan(&self, plan_id: PlanId) -> Vec<Cutout>;

    fn insert_surface(&self, surface: Surface) -> Result<(), StoreError>;
    fn update_surface(&self, surface: &Surface) -> Result<(), StoreError>;
    fn delete_surface(&self, id: SurfaceId) -> Result<(), StoreError>;
    fn get_surface(&self, id: SurfaceId) -> Option<Surface>;
    fn surfaces_for_plan(&self, plan_id: PlanId) -> Vec<Surface>;
}

/// In-memory store used by tests and demos.
///
/// Plans hold tens to low hundreds of surfaces, so plan-scoped queries
/// scan the maps directly. Individual surface writes can be made to fail
/// via [`MemoryStore::reject_writes_for`] to exercise partial-failure
/// paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    surfaces: RefCell<FxHashMap<SurfaceId, Surface>>,
    cutouts: RefCell<FxHashMap<CutoutId, Cutout>>,
    sequence: Cell<u64>,
    rejected_writes: RefCell<FxHashSet<SurfaceId>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `update_surface` for this id fail
    pub fn reject_writes_for(&self, id: SurfaceId) {
        self.rejected_writes.borrow_mut().insert(id);
    }

    /// Number of stored cutouts
    pub fn cutout_count(&self) -> usize {
        self.cutouts.borrow().len()
    }

    /// Number of stored surfaces
    pub fn surface_count(&self) -> usize {
        self.surfaces.borrow().len()
    }
}

impl SurfaceStore for MemoryStore {
    fn next_sequence(&self) -> u64 {
        let next = self.sequence.get() + 1;
        self.sequence.set(next);
        next
    }

    fn insert_cutout(&self, cutout: Cutout) -> Result<(), StoreError> {
        self.cutouts.borrow_mut().insert(cutout.id, cutout);
        Ok(())
    }

    fn delete_cutout(&self, id: CutoutId) -> Result<(), StoreError> {
        self.cutouts
            .borrow_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::CutoutMissing(id))
    }

    fn get_cutout(&self, id: CutoutId) -> Option<Cutout> {
        self.cutouts.borrow().get(&id).cloned()
    }

    fn cutouts_for_plan(&self, plan_id: PlanId) -> Vec<Cutout> {
        let mut cutouts: Vec<Cutout> = self
            .cutouts
            .borrow()
            .values()
            .filter(|c| c.plan_id == plan_id)
            .cloned()
            .collect();
        cutouts.sort_by_key(|c| (c.created_at, c.id));
        cutouts
    }

    fn insert_surface(&self, surface: Surface) -> Result<(), StoreError> {
        self.surfaces.borrow_mut().insert(surface.id, surface);
        Ok(())
    }

    fn update_surface(&self, surface: &Surface) -> Result<(), StoreError> {
        if self.rejected_writes.borrow().contains(&surface.id) {
            return Err(StoreError::WriteRejected(format!(
                "surface {} is write-protected",
                surface.id
            )));
        }

        let mut surfaces = self.surfaces.borrow_mut();
        if !surfaces.contains_key(&surface.id) {
            return Err(StoreError::SurfaceMissing(surface.id));
        }
        surfaces.insert(surface.id, surface.clone());
        Ok(())
    }

    fn delete_surface(&self, id: SurfaceId) -> Result<(), StoreError> {
        self.surfaces
            .borrow_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::SurfaceMissing(id))
    }

    fn get_surface(&self, id: SurfaceId) -> Option<Surface> {
        self.surfaces.borrow().get(&id).cloned()
    }

    fn surfaces_for_plan(&self, plan_id: PlanId) -> Vec<Surface> {
        let mut surfaces: Vec<Surface> = self
            .surfaces
            .borrow()
            .values()
            .filter(|s| s.plan_id == plan_id)
            .cloned()
            .collect();
        surfaces.sort_by_key(|s| s.id);
        surfaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShapeKind, Unit};
    use takeoff_geometry::{normalize_ring, Point2};

    fn square(size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    fn cutout(id: u64, plan: u64, seq: u64) -> Cutout {
        Cutout {
            id: CutoutId(id),
            plan_id: PlanId(plan),
            name: format!("Cutout {id}"),
            boundary: normalize_ring(&square(1.0)),
            shape_kind: ShapeKind::Rectangle,
            created_at: seq,
        }
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let store = MemoryStore::new();
        let a = store.next_sequence();
        let b = store.next_sequence();
        assert!(b > a);
    }

    #[test]
    fn test_cutouts_for_plan_sorted_by_creation() {
        let store = MemoryStore::new();
        store.insert_cutout(cutout(2, 1, 5)).unwrap();
        store.insert_cutout(cutout(1, 1, 9)).unwrap();
        store.insert_cutout(cutout(3, 2, 1)).unwrap();

        let plan1: Vec<u64> = store
            .cutouts_for_plan(PlanId(1))
            .iter()
            .map(|c| c.id.0)
            .collect();
        assert_eq!(plan1, vec![2, 1]);
    }

    #[test]
    fn test_update_missing_surface_fails() {
        let store = MemoryStore::new();
        let s = Surface::new(SurfaceId(1), PlanId(1), "Floor", &square(4.0), Unit::SquareMeter);
        assert!(matches!(
            store.update_surface(&s),
            Err(StoreError::SurfaceMissing(_))
        ));
    }

    #[test]
    fn test_rejected_write() {
        let store = MemoryStore::new();
        let mut s = Surface::new(SurfaceId(1), PlanId(1), "Floor", &square(4.0), Unit::SquareMeter);
        store.insert_surface(s.clone()).unwrap();

        store.reject_writes_for(SurfaceId(1));
        s.net_value = 1.0;
        assert!(matches!(
            store.update_surface(&s),
            Err(StoreError::WriteRejected(_))
        ));

        // Stored value is untouched
        let stored = store.get_surface(SurfaceId(1)).unwrap();
        assert_eq!(stored.net_value, 16.0);
    }

    #[test]
    fn test_delete_cutout_twice_fails() {
        let store = MemoryStore::new();
        store.insert_cutout(cutout(1, 1, 1)).unwrap();

        assert!(store.delete_cutout(CutoutId(1)).is_ok());
        assert!(matches!(
            store.delete_cutout(CutoutId(1)),
            Err(StoreError::CutoutMissing(_))
        ));
    }
}
