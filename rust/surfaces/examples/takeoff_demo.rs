// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal walkthrough: one wall surface, one window cutout.
//!
//! Run with: cargo run --example takeoff_demo

use takeoff_surfaces::{
    CutoutManager, MemoryStore, PlanId, Point2, ShapeKind, Surface, SurfaceId, SurfaceStore, Unit,
};

fn main() {
    let store = MemoryStore::new();

    // A 6m x 2.8m wall elevation
    let wall = Surface::new(
        SurfaceId(1),
        PlanId(1),
        "Wall north",
        &[
            Point2::new(0.0, 0.0),
            Point2::new(6.0, 0.0),
            Point2::new(6.0, 2.8),
            Point2::new(0.0, 2.8),
        ],
        Unit::SquareMeter,
    );
    println!("{}: {:.2} {}", wall.name, wall.net_value, wall.unit);
    store.insert_surface(wall).expect("insert surface");

    let manager = CutoutManager::new(store);

    // A 1.2m x 1.4m window opening
    let created = manager
        .create_cutout(
            PlanId(1),
            ShapeKind::Rectangle,
            &[
                Point2::new(1.0, 0.9),
                Point2::new(2.2, 0.9),
                Point2::new(2.2, 2.3),
                Point2::new(1.0, 2.3),
            ],
            &[SurfaceId(1)],
        )
        .expect("create cutout");

    let wall = manager
        .store()
        .get_surface(SurfaceId(1))
        .expect("surface exists");
    let overlap = manager.overlap(&wall, &created.cutout);

    println!("{}: -{:.2} m²", created.cutout.name, overlap);
    println!("{} net: {:.2} {}", wall.name, wall.net_value, wall.unit);

    let clipped = manager.clipped(&wall);
    println!(
        "render: {} polygon(s), {} hole(s), perimeter {:.2} m",
        clipped.polygons.len(),
        clipped
            .polygons
            .iter()
            .map(|p| p.holes.len())
            .sum::<usize>(),
        clipped.net_perimeter
    );
}
