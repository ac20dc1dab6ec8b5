// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::model::SurfaceId;
use crate::store::StoreError;
use thiserror::Error;

/// Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the cutout lifecycle
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cutout boundary is degenerate (fewer than 3 distinct vertices)")]
    DegenerateBoundary,

    #[error("Cutout creation requires at least one target surface")]
    NoTargetSurfaces,

    #[error("Surface {0} not found")]
    SurfaceNotFound(SurfaceId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
