//! Common result and error types for the placement toolchain.

/// The standard result type for operations that can break a placement invariant.
///
/// `Err` means the input was malformed in a way the parsers did not catch, or
/// the engine has a bug. Either way the current placement run must stop; the
/// grid is not to be trusted afterwards.
pub type ZftResult<T> = Result<T, InternalError>;

/// A violated placement invariant.
///
/// Raised for conditions such as a full I/O cell, a logic block outside the
/// interior, a swap involving an I/O pad or a duplicate pad on a net.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal placement error: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
