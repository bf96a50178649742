use thiserror::Error;

use crate::persistence::PersistenceError;
use crate::surface::SurfaceError;

/// Errors that can occur while saving the current drawing
#[derive(Error, Debug)]
pub enum SaveError {
    /// Save was requested before the surface existed
    #[error("Drawing surface is not mounted yet")]
    NotMounted,
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
