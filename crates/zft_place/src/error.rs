//! Error type for placement runs.

use thiserror::Error;
use zft_common::InternalError;

/// Ways a placement run can fail to complete.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// The run was cancelled before its next pass.
    #[error("placement interrupted after {completed_iterations} iterations")]
    Interrupted {
        /// Passes finished before the cancellation was seen.
        completed_iterations: u32,
    },

    /// An invariant of the grid or netlist was violated.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
