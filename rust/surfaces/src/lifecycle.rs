// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cutout lifecycle: creation, assignment, net-value recomputation and
//! orphan collection.
//!
//! This is the only component that touches persisted state. In-memory
//! values are always updated before the corresponding write is issued; a
//! failed write is reported and never rolls back sibling writes or the
//! in-memory result. A cutout draft is caller-owned until
//! [`CutoutManager::create_cutout`] commits, so discarding a draft leaves
//! no record and mutates no surface.

use crate::error::{Error, Result};
use crate::model::{Cutout, CutoutId, PlanId, ShapeKind, Surface, SurfaceId};
use crate::store::SurfaceStore;
use std::sync::Arc;
use takeoff_geometry::{normalize_ring, overlap_area, ClipCache, ClippedGeometry, Point2};
use tracing::{debug, warn};

/// Outcome of creating a cutout and assigning it to target surfaces
#[derive(Debug)]
pub struct CutoutCreated {
    pub cutout: Cutout,
    /// Surfaces whose net value was recomputed and persisted
    pub updated_surfaces: Vec<SurfaceId>,
    /// Surfaces whose persistence write failed; their update is reported
    /// but siblings are unaffected
    pub failed_surfaces: Vec<SurfaceId>,
}

/// Manages cutout records and their references from surfaces
pub struct CutoutManager<S: SurfaceStore> {
    store: S,
    clip_cache: ClipCache,
}

impl<S: SurfaceStore> CutoutManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clip_cache: ClipCache::new(),
        }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a cutout from a drawn ring and assign it to target surfaces.
    ///
    /// At least one target must be given; a cutout only exists through
    /// its references. The ring is normalized first; fewer than 3
    /// distinct vertices is an error and nothing is persisted. The
    /// display name is sequential and scoped to the plan. Each target
    /// surface is updated independently: the id is appended, the net
    /// value recomputed and the surface written back; one failed write
    /// does not block the others. If every assignment fails the record
    /// is collected again before returning, so no unreferenced cutout
    /// outlives this call.
    pub fn create_cutout(
        &self,
        plan_id: PlanId,
        shape_kind: ShapeKind,
        boundary: &[Point2<f64>],
        target_surface_ids: &[SurfaceId],
    ) -> Result<CutoutCreated> {
        if target_surface_ids.is_empty() {
            return Err(Error::NoTargetSurfaces);
        }

        let ring = normalize_ring(boundary);
        if ring.is_empty() {
            return Err(Error::DegenerateBoundary);
        }

        let sequence = self.store.next_sequence();
        let name = format!(
            "Cutout {}",
            next_cutout_number(&self.store.cutouts_for_plan(plan_id))
        );

        let cutout = Cutout {
            id: CutoutId(sequence),
            plan_id,
            name,
            boundary: ring,
            shape_kind,
            created_at: sequence,
        };
        self.store.insert_cutout(cutout.clone())?;

        let mut updated_surfaces = Vec::with_capacity(target_surface_ids.len());
        let mut failed_surfaces = Vec::new();

        for &surface_id in target_surface_ids {
            let Some(mut surface) = self.store.get_surface(surface_id) else {
                warn!(%surface_id, "target surface not found, skipping assignment");
                failed_surfaces.push(surface_id);
                continue;
            };

            if !surface.references(cutout.id) {
                surface.cutout_ids.push(cutout.id);
            }
            surface.net_value = self.recompute_net_value(&surface);

            match self.store.update_surface(&surface) {
                Ok(()) => updated_surfaces.push(surface_id),
                Err(err) => {
                    warn!(%surface_id, error = %err, "surface write failed after cutout assignment");
                    failed_surfaces.push(surface_id);
                }
            }
        }

        // No assignment was persisted: nothing references the record
        if updated_surfaces.is_empty() {
            self.sweep_orphan(plan_id, cutout.id);
        }

        Ok(CutoutCreated {
            cutout,
            updated_surfaces,
            failed_surfaces,
        })
    }

    /// Remove a cutout from one surface, recompute and persist, then
    /// collect the cutout if nothing references it anymore.
    pub fn unassign_cutout(&self, surface_id: SurfaceId, cutout_id: CutoutId) -> Result<()> {
        let mut surface = self
            .store
            .get_surface(surface_id)
            .ok_or(Error::SurfaceNotFound(surface_id))?;

        surface.cutout_ids.retain(|id| *id != cutout_id);
        surface.net_value = self.recompute_net_value(&surface);
        self.store.update_surface(&surface)?;

        self.sweep_orphan(surface.plan_id, cutout_id);
        Ok(())
    }

    /// React to a surface deletion performed by its owning flow.
    ///
    /// `released_cutout_ids` are the cutouts the deleted surface used to
    /// reference. Each one is deleted if no remaining surface on the plan
    /// references it (reference-counted by scan; plans hold at most a few
    /// hundred surfaces).
    pub fn on_surface_deleted(&self, plan_id: PlanId, released_cutout_ids: &[CutoutId]) {
        for &cutout_id in released_cutout_ids {
            self.sweep_orphan(plan_id, cutout_id);
        }
    }

    /// Recompute a surface's net value from its boundary and referenced
    /// cutouts. Cutouts are applied in ascending creation sequence, ties
    /// broken by id, regardless of attachment order. Linear surfaces pass
    /// through unchanged: cutouts do not apply to them.
    pub fn recompute_net_value(&self, surface: &Surface) -> f64 {
        if !surface.is_area() {
            return surface.net_value;
        }
        self.clipped(surface).net_area
    }

    /// Clipped geometry of a surface for rendering: rings grouped per
    /// polygon plus net area and net perimeter.
    ///
    /// Results are cached by geometry content, so a repaint that changes
    /// neither the boundary nor the applied cutouts is a hash lookup.
    /// Boundaries and cutout rings are immutable once stored, which makes
    /// the content key a complete invalidation signal.
    pub fn clipped(&self, surface: &Surface) -> Arc<ClippedGeometry> {
        let mut cutouts: Vec<Cutout> = surface
            .cutout_ids
            .iter()
            .filter_map(|id| {
                let found = self.store.get_cutout(*id);
                if found.is_none() {
                    warn!(cutout_id = %id, surface_id = %surface.id, "referenced cutout missing from store");
                }
                found
            })
            .collect();
        cutouts.sort_by_key(|c| (c.created_at, c.id));

        let rings: Vec<&[Point2<f64>]> =
            cutouts.iter().map(|c| c.boundary.as_slice()).collect();

        let result = self.clip_cache.clipped(&surface.boundary, &rings);

        #[cfg(debug_assertions)]
        if surface.is_area() {
            let overlaps: Vec<f64> = cutouts
                .iter()
                .map(|c| overlap_area(&surface.boundary, &c.boundary))
                .collect();
            takeoff_geometry::validate::check_surface_invariants(
                surface.original_value(),
                result.net_area,
                &overlaps,
            );
        }

        result
    }

    /// Overlap area between a surface and a cutout, always >= 0.
    /// The UI is responsible for rendering it with a leading minus sign.
    pub fn overlap(&self, surface: &Surface, cutout: &Cutout) -> f64 {
        overlap_area(&surface.boundary, &cutout.boundary)
    }

    /// Collect one cutout if no surface on the plan references it
    fn sweep_orphan(&self, plan_id: PlanId, cutout_id: CutoutId) {
        let referenced = self
            .store
            .surfaces_for_plan(plan_id)
            .iter()
            .any(|s| s.references(cutout_id));
        if referenced {
            return;
        }

        match self.store.delete_cutout(cutout_id) {
            Ok(()) => debug!(%cutout_id, "removed orphaned cutout"),
            Err(err) => warn!(%cutout_id, error = %err, "failed to remove orphaned cutout"),
        }
    }
}

/// Next display-name number for a plan: one past the highest existing
/// "Cutout N" suffix, so names are never reused after a deletion.
fn next_cutout_number(existing: &[Cutout]) -> u64 {
    existing
        .iter()
        .filter_map(|c| c.name.strip_prefix("Cutout "))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;
    use crate::store::MemoryStore;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ]
    }

    fn manager_with_surface(id: u64) -> CutoutManager<MemoryStore> {
        let store = MemoryStore::new();
        store
            .insert_surface(Surface::new(
                SurfaceId(id),
                PlanId(1),
                "Wall",
                &square(0.0, 0.0, 10.0),
                Unit::SquareMeter,
            ))
            .unwrap();
        CutoutManager::new(store)
    }

    #[test]
    fn test_create_cutout_updates_target() {
        let manager = manager_with_surface(1);

        let created = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(2.0, 2.0, 2.0),
                &[SurfaceId(1)],
            )
            .unwrap();

        assert_eq!(created.updated_surfaces, vec![SurfaceId(1)]);
        assert!(created.failed_surfaces.is_empty());

        let surface = manager.store().get_surface(SurfaceId(1)).unwrap();
        assert_relative_eq!(surface.net_value, 96.0, epsilon = 1e-3);
        assert_eq!(surface.cutout_ids, vec![created.cutout.id]);
    }

    #[test]
    fn test_degenerate_ring_rejected_without_side_effects() {
        let manager = manager_with_surface(1);

        let result = manager.create_cutout(
            PlanId(1),
            ShapeKind::Polygon,
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
            &[SurfaceId(1)],
        );

        assert!(matches!(result, Err(Error::DegenerateBoundary)));
        assert_eq!(manager.store().cutout_count(), 0);
        let surface = manager.store().get_surface(SurfaceId(1)).unwrap();
        assert!(surface.cutout_ids.is_empty());
        assert_relative_eq!(surface.net_value, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_names_are_sequential_per_plan() {
        let manager = manager_with_surface(1);
        manager
            .store()
            .insert_surface(Surface::new(
                SurfaceId(2),
                PlanId(2),
                "Floor",
                &square(0.0, 0.0, 10.0),
                Unit::SquareMeter,
            ))
            .unwrap();

        let first = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(1.0, 1.0, 1.0),
                &[SurfaceId(1)],
            )
            .unwrap();
        let second = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(3.0, 3.0, 1.0),
                &[SurfaceId(1)],
            )
            .unwrap();
        let other_plan = manager
            .create_cutout(
                PlanId(2),
                ShapeKind::Rectangle,
                &square(5.0, 5.0, 1.0),
                &[SurfaceId(2)],
            )
            .unwrap();

        assert_eq!(first.cutout.name, "Cutout 1");
        assert_eq!(second.cutout.name, "Cutout 2");
        assert_eq!(other_plan.cutout.name, "Cutout 1");
    }

    #[test]
    fn test_deleted_names_are_not_recycled() {
        let manager = manager_with_surface(1);

        let first = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(1.0, 1.0, 1.0),
                &[SurfaceId(1)],
            )
            .unwrap();
        let second = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(3.0, 3.0, 1.0),
                &[SurfaceId(1)],
            )
            .unwrap();
        assert_eq!(second.cutout.name, "Cutout 2");

        // Removing the only reference collects "Cutout 1"; the next
        // cutout must still get a fresh name, not a duplicate of 2.
        manager.unassign_cutout(SurfaceId(1), first.cutout.id).unwrap();
        assert!(manager.store().get_cutout(first.cutout.id).is_none());

        let third = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(5.0, 5.0, 1.0),
                &[SurfaceId(1)],
            )
            .unwrap();
        assert_eq!(third.cutout.name, "Cutout 3");
    }

    #[test]
    fn test_empty_target_list_rejected_without_side_effects() {
        let manager = manager_with_surface(1);

        let result = manager.create_cutout(
            PlanId(1),
            ShapeKind::Rectangle,
            &square(2.0, 2.0, 2.0),
            &[],
        );

        assert!(matches!(result, Err(Error::NoTargetSurfaces)));
        assert_eq!(manager.store().cutout_count(), 0);
    }

    #[test]
    fn test_cutout_is_collected_when_no_assignment_lands() {
        let manager = manager_with_surface(1);

        // The only target does not exist, so the fresh record ends up
        // unreferenced and must not survive the call.
        let created = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(2.0, 2.0, 2.0),
                &[SurfaceId(99)],
            )
            .unwrap();

        assert!(created.updated_surfaces.is_empty());
        assert_eq!(created.failed_surfaces, vec![SurfaceId(99)]);
        assert_eq!(manager.store().cutout_count(), 0);
        assert!(manager.store().get_cutout(created.cutout.id).is_none());
    }

    #[test]
    fn test_application_order_is_creation_sequence() {
        let manager = manager_with_surface(1);

        let a = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(1.0, 1.0, 2.0),
                &[SurfaceId(1)],
            )
            .unwrap();
        let b = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(6.0, 6.0, 2.0),
                &[SurfaceId(1)],
            )
            .unwrap();

        // Attach in reverse order; net value must be order-independent
        // because application sorts by creation sequence.
        let mut surface = manager.store().get_surface(SurfaceId(1)).unwrap();
        surface.cutout_ids = vec![b.cutout.id, a.cutout.id];
        let net = manager.recompute_net_value(&surface);

        assert_relative_eq!(net, 92.0, epsilon = 1e-3);
        assert!(a.cutout.created_at < b.cutout.created_at);
    }

    #[test]
    fn test_linear_surface_is_not_clipped() {
        let store = MemoryStore::new();
        store
            .insert_surface(Surface::new(
                SurfaceId(1),
                PlanId(1),
                "Skirting",
                &square(0.0, 0.0, 10.0),
                Unit::Meter,
            ))
            .unwrap();
        let manager = CutoutManager::new(store);

        manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(2.0, 2.0, 2.0),
                &[SurfaceId(1)],
            )
            .unwrap();

        let surface = manager.store().get_surface(SurfaceId(1)).unwrap();
        assert_relative_eq!(surface.net_value, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overlap_reported_non_negative() {
        let manager = manager_with_surface(1);
        let created = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(8.0, 8.0, 4.0),
                &[SurfaceId(1)],
            )
            .unwrap();

        let surface = manager.store().get_surface(SurfaceId(1)).unwrap();
        let overlap = manager.overlap(&surface, &created.cutout);
        assert_relative_eq!(overlap, 4.0, epsilon = 1e-3);
    }

    #[test]
    fn test_repeated_clipped_calls_share_the_cached_result() {
        let manager = manager_with_surface(1);
        let created = manager
            .create_cutout(
                PlanId(1),
                ShapeKind::Rectangle,
                &square(2.0, 2.0, 2.0),
                &[SurfaceId(1)],
            )
            .unwrap();

        let surface = manager.store().get_surface(SurfaceId(1)).unwrap();
        let first = manager.clipped(&surface);
        let second = manager.clipped(&surface);
        assert!(Arc::ptr_eq(&first, &second));
        assert_relative_eq!(first.net_area, 96.0, epsilon = 1e-3);

        // Dropping the assignment changes the key and the result.
        manager.unassign_cutout(SurfaceId(1), created.cutout.id).unwrap();
        let surface = manager.store().get_surface(SurfaceId(1)).unwrap();
        let unclipped = manager.clipped(&surface);
        assert!(!Arc::ptr_eq(&first, &unclipped));
        assert_relative_eq!(unclipped.net_area, 100.0, epsilon = 1e-9);
    }
}
